use thiserror::Error;

/// Camera subsystem errors.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera unavailable: {0}")]
    Unavailable(String),

    #[error("camera access denied: {0}")]
    PermissionDenied(String),

    #[error("frame stream failed: {0}")]
    Stream(String),

    #[error("failed to spawn capture thread: {0}")]
    Spawn(String),
}

impl CameraError {
    /// Plain-language message for the offline indicator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "No camera was found. Connect a camera and try again.",
            Self::PermissionDenied(_) => {
                "Camera access was denied. Allow camera access and try again."
            }
            Self::Stream(_) | Self::Spawn(_) => "The camera stopped responding.",
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CameraError>;
