//! Error types

use std::io;

use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid breakpoint table: {0}")]
    InvalidBreakpoints(String),
}

/// Errors raised while decoding a filter-data record.
#[derive(Debug, Error)]
pub enum FilterDataError {
    #[error("failed to parse filter data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("provider reported errors: {0}")]
    Provider(String),
    #[error("response contains no filter data")]
    MissingData,
}
