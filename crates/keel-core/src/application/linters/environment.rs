use tracing::{debug, instrument};

use crate::application::toolchain::SelectedXcodeVersion;
use crate::domain::{CompatibleXcodeVersions, LintingIssue};
use crate::error::KeelResult;

/// Checks the host toolchain against the project's requirement.
#[derive(Debug, Default)]
pub struct EnvironmentLinter;

impl EnvironmentLinter {
    pub fn new() -> Self {
        Self
    }

    /// With `CompatibleXcodeVersions::All` the toolchain is never queried.
    #[instrument(skip_all, fields(requirement = %compatible))]
    pub async fn lint(
        &self,
        compatible: &CompatibleXcodeVersions,
        xcode: &SelectedXcodeVersion<'_>,
    ) -> KeelResult<Vec<LintingIssue>> {
        if *compatible == CompatibleXcodeVersions::All {
            return Ok(Vec::new());
        }

        let version = xcode.get().await?;
        if compatible.is_compatible(&version) {
            debug!(%version, "Selected Xcode is compatible");
            return Ok(Vec::new());
        }
        Ok(vec![LintingIssue::error(format!(
            "The selected Xcode version is {version}, which is not compatible with this project's Xcode version requirement of {compatible}."
        ))])
    }
}
