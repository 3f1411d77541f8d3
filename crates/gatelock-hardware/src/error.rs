//! Error types for pin backend operations.
//!
//! Only [`HardwareError::InitializationFailed`] is fatal. Every other variant
//! is returned from a read or write on an already-open backend; callers log
//! it and treat the operation as "no change".

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during pin backend operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Backend could not be opened.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Backend has already been closed.
    #[error("Backend closed")]
    Closed,

    /// Read or write on a line failed at the backend level.
    #[error("Line {line} I/O failed: {message}")]
    LineIo { line: String, message: String },
}

impl HardwareError {
    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new line I/O error.
    pub fn line_io(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LineIo {
            line: line.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the process cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InitializationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_failed_error() {
        let error = HardwareError::initialization_failed("/dev/gpiomem: permission denied");
        assert!(error.is_fatal());
        assert_eq!(
            error.to_string(),
            "Initialization failed: /dev/gpiomem: permission denied"
        );
    }

    #[test]
    fn test_line_io_error() {
        let error = HardwareError::line_io("relay", "bus fault");
        assert!(!error.is_fatal());
        assert_eq!(error.to_string(), "Line relay I/O failed: bus fault");
    }

    #[test]
    fn test_closed_error() {
        let error = HardwareError::Closed;
        assert!(!error.is_fatal());
        assert_eq!(error.to_string(), "Backend closed");
    }
}
