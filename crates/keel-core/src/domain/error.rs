// ============================================================================
// domain/error.rs - MODEL CONSTRUCTION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Raised only while parsing value objects from text (CLI flags, JSON
/// graphs, `xcodebuild` output). Findings about a well-formed model are
/// never errors; they are reported as `LintingIssue`s.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("Unknown destination '{0}'")]
    UnknownDestination(String),

    #[error("Unknown product type '{0}'")]
    UnknownProduct(String),

    #[error("Unknown platform filter '{0}'")]
    UnknownPlatformFilter(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Target '{target}' declares no destinations")]
    EmptyDestinations { target: String },

    #[error("A platform condition must name at least one platform filter")]
    EmptyPlatformCondition,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersion { input, .. } => vec![
                format!("'{input}' is not a dotted numeric version"),
                "Use a version like 15.2 or 15.2.1".into(),
            ],
            Self::UnknownPlatform(_) => {
                vec!["Supported platforms: iOS, macOS, tvOS, watchOS, visionOS".into()]
            }
            Self::UnknownDestination(_) => vec![
                "Supported destinations: iPhone, iPad, mac, macWithiPadDesign, macCatalyst,"
                    .into(),
                "  appleWatch, appleTv, appleVision, appleVisionWithiPadDesign".into(),
            ],
            Self::UnknownProduct(p) => vec![
                format!("'{p}' is not a known product type"),
                "Product names are camelCase, e.g. app, staticFramework, unitTests".into(),
            ],
            Self::UnknownPlatformFilter(_) => vec![
                "Supported filters: ios, macos, tvos, catalyst, driverkit, watchos, visionos"
                    .into(),
            ],
            Self::EmptyDestinations { target } => vec![
                format!("Declare at least one destination for '{target}'"),
            ],
            Self::EmptyPlatformCondition => {
                vec!["Omit the condition to apply the dependency on every platform".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidVersion { .. }
            | Self::UnknownPlatform(_)
            | Self::UnknownDestination(_)
            | Self::UnknownProduct(_)
            | Self::UnknownPlatformFilter(_) => ErrorCategory::Validation,
            Self::EmptyDestinations { .. } | Self::EmptyPlatformCondition => {
                ErrorCategory::Validation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
