//! Error types for RakshaIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// RakshaIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse error
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown actuator driver name in config
    #[error("Unknown actuator driver: {0}")]
    UnknownDriver(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
