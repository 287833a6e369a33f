//! Error types for prefix reconciliation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type.
///
/// Input variants are fatal pre-flight errors. API variants are returned by
/// [`crate::api::ControllerApi`] implementations and are turned into reported
/// events by the reconciliation steps rather than propagated.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file {} does not exist. Please enter the accurate file path", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid CSV file: {0}")]
    InvalidCsv(String),

    #[error("invalid CSV file. File does not contain mandatory header: {0}")]
    MissingColumn(&'static str),

    #[error("please provide an action. Allowed values: delete_prefix, delete_binding")]
    MissingAction,

    #[error("invalid action '{0}'. Allowed values: delete_prefix, delete_binding")]
    InvalidAction(String),

    #[error("unsupported resource '{0}'. Allowed values: security, path, qos, nat")]
    InvalidResource(String),

    #[error("resource '{0}' is not supported yet; only 'security' local prefixes can be removed")]
    UnsupportedResource(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
