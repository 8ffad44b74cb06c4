//! Unified error handling for Keel Core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions. Lint findings are not errors; a pass that produces issues
//! still returns `Ok`.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Keel Core operations.
#[derive(Debug, Error, Clone)]
pub enum KeelError {
    /// Malformed model input (bad version strings, unknown names).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures (toolchain query, graph loading).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl KeelError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `keel config show` to inspect the resolved configuration".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Keel".into(),
                "Please report it with the graph file that triggered it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if running the same pass again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::XcodeVersionUnavailable { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    /// The host environment (toolchain, permissions) is not usable.
    Environment,
    Internal,
}

/// Convenient result type alias.
pub type KeelResult<T> = Result<T, KeelError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> KeelResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> KeelResult<T> {
        self.map_err(|e| KeelError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
