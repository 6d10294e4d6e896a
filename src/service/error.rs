use thiserror::Error;

/// Failures talking to the gesture service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    #[error("server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
}

impl ServiceError {
    /// Plain-language message for alerts.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Connection(_) | Self::Timeout => "Could not reach the gesture service.",
            Self::ServerError { .. } => "The gesture service rejected the request.",
            Self::Http(_) | Self::Parse(_) => "The gesture service sent an unexpected reply.",
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_connect() {
            ServiceError::Connection(err.to_string())
        } else if err.is_decode() {
            ServiceError::Parse(err.to_string())
        } else {
            ServiceError::Http(err.to_string())
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_status() {
        let err = ServiceError::ServerError {
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(err.to_string(), "server error (status 503): busy");
        assert!(!err.user_message().contains("503"));
    }
}
