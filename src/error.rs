//! Error types for solar system generation

use thiserror::Error;

/// Errors that can occur while configuring or querying a solar system
///
/// Generation itself never fails: bodies whose derived ranges collapse are
/// skipped instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Requested body handle does not exist in the current body list
    #[error("body not found: {0}")]
    BodyNotFound(usize),
}

/// Result type alias for solar system operations
pub type Result<T> = std::result::Result<T, SystemError>;
