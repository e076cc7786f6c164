pub mod app_config;
pub mod catalog;
pub mod config;

pub use app_config::{AppConfig, RetrySettings};
pub use catalog::{CategoryId, OutputRow, PageDescriptor};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
