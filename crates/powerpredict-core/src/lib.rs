pub mod config;
pub mod error;
pub mod types;

pub use config::PowerPredictConfig;
pub use error::{PowerPredictError, Result};
pub use types::*;
