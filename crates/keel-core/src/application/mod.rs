//! Application layer for Keel.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (LintService)
//! - **Linters**: The individual checks the service composes
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Linking rules and the graph queries live in `crate::domain`; this layer
//! decides what to check and in which order.

pub mod error;
pub mod linters;
pub mod ports;
pub mod services;
pub mod toolchain;

#[cfg(test)]
pub(crate) mod test_support;

pub use services::{LintOptions, LintReport, LintService};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, XcodeController};

pub use error::ApplicationError;
pub use toolchain::SelectedXcodeVersion;
