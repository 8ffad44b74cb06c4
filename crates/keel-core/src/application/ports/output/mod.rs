use std::path::Path;

use async_trait::async_trait;

use crate::application::ApplicationError;
use crate::domain::Version;

/// Read-only filesystem queries used by the linters.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if `path` exists and is a directory.
    fn is_directory(&self, path: &Path) -> bool;
}

/// Access to the selected Xcode toolchain.
///
/// Querying may spawn an external process, so callers fetch the version
/// once per lint pass through `SelectedXcodeVersion`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait XcodeController: Send + Sync {
    async fn selected_version(&self) -> Result<Version, ApplicationError>;
}
