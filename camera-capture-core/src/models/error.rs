use thiserror::Error;

/// Errors surfaced by session lifecycle operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Neither a back nor a front camera is available. Unrecoverable; the
    /// session cannot start.
    #[error("back and front camera are unavailable")]
    NoCameraAvailable,

    #[error("camera provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("session not started")]
    NotStarted,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Recoverable by adjusting the configuration and rebinding.
    #[error("use case binding failed: {0}")]
    BindingFailed(#[from] BindError),
}

/// Device rejection of a use-case configuration at bind time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("unsupported use case combination: {0}")]
    UnsupportedCombination(String),

    #[error("no camera for the requested selector: {0}")]
    CameraUnavailable(String),

    #[error("device error during bind: {0}")]
    Device(String),
}

/// Failure reason delivered for one still-capture request.
///
/// Reported exactly once per request, never retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureFailure {
    #[error("no use cases bound")]
    NotBound,

    #[error("photo capture failed: {0}")]
    Device(String),
}

/// Filesystem or serialization failure in the storage helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);
