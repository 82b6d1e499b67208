//! Error types for SASS compilation.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Errors that can occur while compiling a stylesheet
#[derive(Debug, Error)]
pub enum SassError {
    /// The compiler reported a non-zero status. `message` is its text, verbatim.
    #[error("SASS compilation failed (status {status}): {message}")]
    Compile { status: i32, message: String },

    /// The compiler could not allocate a context
    #[error("failed to allocate {kind} context")]
    ContextAllocation { kind: &'static str },

    /// An input could not be passed across the C boundary
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An options file could not be parsed
    #[error("invalid compile options: {0}")]
    Config(String),

    /// An options file could not be read
    #[error("failed to read compile options: {0}")]
    Io(#[from] std::io::Error),
}

impl SassError {
    /// The compiler's status code, for errors the compiler reported.
    pub fn status(&self) -> Option<i32> {
        match self {
            SassError::Compile { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display_keeps_message() {
        let err = SassError::Compile {
            status: 1,
            message: "expected \"}\".".to_string(),
        };
        assert_eq!(err.status(), Some(1));
        assert!(err.to_string().contains("expected \"}\"."));
    }

    #[test]
    fn test_non_compile_errors_have_no_status() {
        let err = SassError::ContextAllocation { kind: "file" };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "failed to allocate file context");
    }
}
