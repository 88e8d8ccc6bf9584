use thiserror::Error;

/// Top-level error type for PowerPredict.
///
/// Subsystem crates (billing, chat, api) define their own error enums; this
/// type covers the shared concerns of loading configuration and data files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PowerPredictError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

impl From<toml::de::Error> for PowerPredictError {
    fn from(err: toml::de::Error) -> Self {
        PowerPredictError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PowerPredictError {
    fn from(err: toml::ser::Error) -> Self {
        PowerPredictError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PowerPredictError {
    fn from(err: serde_json::Error) -> Self {
        PowerPredictError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for PowerPredict operations.
pub type Result<T> = std::result::Result<T, PowerPredictError>;
