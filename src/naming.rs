//! Procedural body names
//!
//! Names are one to three syllables. Each syllable picks a consonant/vowel
//! pattern by weight, then fills the pattern letter by letter.

use crate::random::RandomStream;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];
const CONSONANTS: [char; 21] = [
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v', 'w',
    'x', 'y', 'z',
];

/// Syllable patterns (`c` consonant, `v` vowel) with their selection weights
const SYLLABLES: [(&str, f64); 8] = [
    ("vc", 0.1),
    ("cvc", 0.2),
    ("cv", 0.2),
    ("v", 0.2),
    ("cvcc", 0.1),
    ("vcc", 0.1),
    ("ccv", 0.05),
    ("ccvc", 0.05),
];

const MAX_SYLLABLES: usize = 3;

/// Generate a capitalized name from the stream
///
/// Draws: one for the syllable count, then per syllable one for the pattern
/// plus one per letter.
pub fn generate_name(rng: &mut RandomStream) -> String {
    let syllables = 1 + rng.index(MAX_SYLLABLES);
    let mut name = String::new();

    for _ in 0..syllables {
        let pattern = pick_pattern(rng.next_uniform());
        for kind in pattern.chars() {
            let letter = if kind == 'v' {
                VOWELS[rng.index(VOWELS.len())]
            } else {
                CONSONANTS[rng.index(CONSONANTS.len())]
            };
            name.push(letter);
        }
    }

    capitalize(&name)
}

/// Cumulative-weight lookup; rounding past the last bucket falls into it
fn pick_pattern(value: f64) -> &'static str {
    let mut sum = 0.0;
    for (pattern, weight) in SYLLABLES {
        sum += weight;
        if value <= sum {
            return pattern;
        }
    }
    SYLLABLES[SYLLABLES.len() - 1].0
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_capitalized_and_alphabetic() {
        let mut rng = RandomStream::new(42u64);
        for _ in 0..200 {
            let name = generate_name(&mut rng);
            assert!(!name.is_empty());
            assert!(name.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
            assert!(name.chars().skip(1).all(|c| c.is_ascii_lowercase()));
            // 3 syllables of at most 4 letters
            assert!(name.len() <= 12, "name {} too long", name);
        }
    }

    #[test]
    fn test_names_deterministic() {
        let mut a = RandomStream::new("61");
        let mut b = RandomStream::new("61");
        for _ in 0..20 {
            assert_eq!(generate_name(&mut a), generate_name(&mut b));
        }
        assert_eq!(a.draws(), b.draws());
    }

    #[test]
    fn test_pattern_weights() {
        assert_eq!(pick_pattern(0.0), "vc");
        assert_eq!(pick_pattern(0.1), "vc");
        assert_eq!(pick_pattern(0.25), "cvc");
        assert_eq!(pick_pattern(0.69), "v");
        assert_eq!(pick_pattern(0.97), "ccvc");
        assert_eq!(pick_pattern(1.5), "ccvc");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("orion"), "Orion");
        assert_eq!(capitalize(""), "");
    }
}
