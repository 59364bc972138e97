//! Application error type.

use std::io;

use filterbar::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize logger: {0}")]
    Log(#[from] log::SetLoggerError),
}
