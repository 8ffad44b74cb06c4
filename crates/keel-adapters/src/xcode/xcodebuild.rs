//! Reads the selected toolchain version from `xcodebuild -version`.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use keel_core::application::{ApplicationError, ports::XcodeController};
use keel_core::domain::Version;

const DEFAULT_PROGRAM: &str = "xcodebuild";

/// Spawns `xcodebuild` once per query.
#[derive(Debug, Clone)]
pub struct XcodeBuildController {
    program: String,
}

impl XcodeBuildController {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Use a different executable, e.g. a wrapper script in tests.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for XcodeBuildController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl XcodeController for XcodeBuildController {
    #[instrument(skip_all, fields(program = %self.program))]
    async fn selected_version(&self) -> Result<Version, ApplicationError> {
        let output = Command::new(&self.program)
            .arg("-version")
            .output()
            .await
            .map_err(|e| unavailable(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let version = parse_version_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!(%version, "Selected Xcode version");
        Ok(version)
    }
}

/// Extract the version from output such as:
///
/// ```text
/// Xcode 16.2
/// Build version 16C5032a
/// ```
pub fn parse_version_output(output: &str) -> Result<Version, ApplicationError> {
    let raw = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Xcode "))
        .ok_or_else(|| unavailable("no 'Xcode' line in xcodebuild output"))?;

    raw.trim()
        .parse()
        .map_err(|e| unavailable(format!("unrecognised version '{}': {e}", raw.trim())))
}

fn unavailable(reason: impl Into<String>) -> ApplicationError {
    ApplicationError::XcodeVersionUnavailable {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_two_component_versions() {
        let version = parse_version_output("Xcode 16.2\nBuild version 16C5032a\n").unwrap();
        assert_eq!(version, Version::new(16, 2, 0));
    }

    #[test]
    fn parses_patch_versions() {
        let version = parse_version_output("Xcode 15.4.1\nBuild version 15F31d").unwrap();
        assert_eq!(version, Version::new(15, 4, 1));
    }

    #[test]
    fn rejects_unexpected_output() {
        assert!(matches!(
            parse_version_output("xcode-select: error: tool 'xcodebuild' requires Xcode"),
            Err(ApplicationError::XcodeVersionUnavailable { .. })
        ));
        assert!(parse_version_output("Xcode sixteen").is_err());
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let controller = XcodeBuildController::with_program("keel-test-no-such-xcodebuild");
        let result = controller.selected_version().await;
        assert!(matches!(
            result,
            Err(ApplicationError::XcodeVersionUnavailable { .. })
        ));
    }
}
