//! Error types for the control crate

use thiserror::Error;

/// Result type for control operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting the controller up
///
/// The per-frame path never returns these.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Value outside its allowed range
    #[error("Invalid config value: {0}")]
    InvalidConfig(String),
}
