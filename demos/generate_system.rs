//! Example: Generate and simulate a solar system
//!
//! Run with `RUST_LOG=debug` to see the generation log.

use rust_solar_system::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== rust_solar_system Demo ===\n");

    // Step 1: Configure
    println!("Step 1: Configuring system...");
    let config = SystemConfigBuilder::new()
        .seed("61")
        .chunk_size(512.0)?
        .planet_detail(3)
        .moon_detail(2)
        .time_scale(4.0)?
        .build()?;

    println!("  Seed: {} (key {})", config.seed, config.seed.key());
    println!("  Chunk: {} units around {:?}", config.chunk_size, config.chunk_offset);

    // Step 2: Generate
    println!("\nStep 2: Generating...");
    let mut generator = SolarSystemGenerator::new(config);
    let system = generator.regenerate();
    println!("  Stars:     {}", system.count(BodyKind::Star));
    println!("  Planets:   {}", system.count(BodyKind::Planet));
    println!("  Moons:     {}", system.count(BodyKind::Moon));
    println!("  Asteroids: {}", system.count(BodyKind::Asteroid));

    let triangles: usize = system.bodies().iter().map(|b| b.mesh.triangle_count()).sum();
    println!("  Triangles: {}", triangles);

    // Step 3: Detail tables for the star and planets
    println!("\nStep 3: Bodies:");
    let mut shown = system.star().into_iter().collect::<Vec<_>>();
    shown.extend(system.planets());
    for handle in shown {
        println!("{}", system.detail_table(handle)?);
        for moon in system.moons_of(handle) {
            let body = system.body(moon).ok_or(SystemError::BodyNotFound(moon.index()))?;
            println!("    moon {} (size {:.2})", body.name, body.size);
        }
        println!();
    }

    // Step 4: Simulate ten seconds at 60 fps
    println!("Step 4: Simulating...");
    if let Some(system) = generator.system_mut() {
        let first_planet = system.planets().first().copied();
        let before = first_planet.and_then(|p| system.body(p)).map(|b| b.position);
        for _ in 0..600 {
            system.step(1.0 / 60.0);
        }
        let after = first_planet.and_then(|p| system.body(p)).map(|b| b.position);
        println!("  First planet moved {:?} -> {:?}", before, after);

        // Step 5: Pick from above the star
        let origin = system.chunk().offset + Vec3::new(0.0, 0.0, 200.0);
        match system.pick(origin, Vec3::NEG_Z, 400.0) {
            Some(hit) => println!("  Pick hit {:?} at {:.2}", hit.handle, hit.distance),
            None => println!("  Pick missed"),
        }
    }

    // Step 6: Regenerate with the same seed
    let first_star = generator.system().map(|s| s.bodies()[0].name.clone());
    let replay = generator.regenerate();
    println!("\nRegenerated star: {:?} (was {:?})", replay.bodies()[0].name, first_star);

    println!("\n=== Demo Complete ===");
    Ok(())
}
