use async_trait::async_trait;

use keel_core::application::{ApplicationError, ports::XcodeController};
use keel_core::domain::Version;

/// Reports a version chosen up front instead of asking the toolchain.
///
/// Backs `--xcode-version` and lets the linter run on hosts without Xcode.
#[derive(Debug, Clone, Copy)]
pub struct FixedXcodeController {
    version: Version,
}

impl FixedXcodeController {
    pub fn new(version: Version) -> Self {
        Self { version }
    }
}

#[async_trait]
impl XcodeController for FixedXcodeController {
    async fn selected_version(&self) -> Result<Version, ApplicationError> {
        Ok(self.version)
    }
}
