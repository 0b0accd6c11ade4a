//! Error types for the storefront client.

use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
///
/// Both variants render as the single human-readable message shown to
/// users, so callers can forward `to_string()` without inspecting the kind.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, decode).
    #[error("An error occurred: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Backend returned code {status}: {body}")]
    Backend { status: u16, body: String },
}

impl ApiError {
    /// HTTP status of a backend error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Backend { status, .. } => Some(*status),
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message() {
        let err = ApiError::Backend {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned code 404: not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transport());
    }
}
