//! Error types for the announcement collaborator.
//!
//! None of these ever stop an unlock sequence. The orchestrator logs them and
//! acknowledges with no delay.

/// Result type alias for announcement calls.
pub type Result<T> = std::result::Result<T, AnnouncementError>;

/// Ways an announcement call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnouncementError {
    /// No response within the call bound.
    #[error("Announcement timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Collaborator answered with a non-200 status.
    #[error("Announcement returned HTTP {0}")]
    Status(u16),

    /// Response body did not match the expected shape.
    #[error("Announcement response could not be decoded: {0}")]
    Decode(String),

    /// Connection or request failure.
    #[error("Announcement transport error: {0}")]
    Transport(String),
}

impl AnnouncementError {
    /// Create a new decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = AnnouncementError::Timeout { timeout_ms: 5000 };
        assert_eq!(error.to_string(), "Announcement timed out after 5000ms");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            AnnouncementError::Status(503).to_string(),
            "Announcement returned HTTP 503"
        );
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            AnnouncementError::decode("missing field"),
            AnnouncementError::Decode("missing field".to_string())
        );
        assert!(matches!(
            AnnouncementError::transport("connection refused"),
            AnnouncementError::Transport(_)
        ));
    }
}
