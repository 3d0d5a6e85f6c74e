//! Error types for layout-switcher

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A platform collaborator cannot be constructed. Fatal for the subsystem that needs it.
    #[error("platform unavailable: {0}")]
    PlatformUnavailable(String),

    #[error("command `{program}` failed: {message}")]
    Command { program: String, message: String },

    #[error("command `{program}` timed out after {timeout:?}")]
    CommandTimeout { program: String, timeout: Duration },

    #[error("layout not found: {0}")]
    LayoutNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
