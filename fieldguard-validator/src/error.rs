// Error types for validator construction

use fieldguard_config::ConfigError;
use fieldguard_core::CoreError;
use thiserror::Error;

/// Why a validator could not be built.
///
/// Everything after construction is absorbed: a missing container or a
/// missing runtime only means less feedback, never an error.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Control not found: {0}")]
    ControlNotFound(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
