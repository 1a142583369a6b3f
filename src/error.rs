//! Error type shared by the whole crate.

use thiserror::Error;

/// Boxed error reported by an injected collaborator (model or capture device).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// `detect` was called before the model finished loading.
    #[error("detection model is not ready")]
    ModelNotReady,

    #[error("failed to load detection model: {0}")]
    ModelLoad(#[source] BoxError),

    /// Opening or reading the capture device failed (e.g. permission denied).
    #[error("frame capture failed: {0}")]
    Capture(#[source] BoxError),

    #[error("unknown zone id {0}")]
    UnknownZone(u64),

    #[error("invalid zone: {0}")]
    InvalidZone(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
