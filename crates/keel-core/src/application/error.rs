//! Application layer errors.
//!
//! These errors represent failures in orchestration, not findings.
//! Findings about the graph are `LintingIssue`s from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The selected Xcode version could not be determined.
    #[error("Could not determine the selected Xcode version: {reason}")]
    XcodeVersionUnavailable { reason: String },

    /// A graph file could not be read or decoded.
    #[error("Failed to load graph from {path}: {reason}")]
    GraphLoad { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::XcodeVersionUnavailable { .. } => vec![
                "Check that Xcode is installed: xcode-select -p".into(),
                "Select a toolchain with: sudo xcode-select -s /Applications/Xcode.app".into(),
                "Or pin a version with --xcode-version".into(),
            ],
            Self::GraphLoad { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Check the file exists and contains a JSON graph".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read permissions".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::XcodeVersionUnavailable { .. } => ErrorCategory::Environment,
            Self::GraphLoad { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
