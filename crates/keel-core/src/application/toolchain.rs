//! Memoized toolchain version for a single lint pass.

use tokio::sync::OnceCell;
use tracing::debug;

use crate::application::ApplicationError;
use crate::application::ports::XcodeController;
use crate::domain::Version;

/// Fetches the selected Xcode version at most once.
///
/// Every check that needs the version awaits [`SelectedXcodeVersion::get`];
/// the first successful answer is reused for the rest of the pass. A
/// failed query is returned to the caller and not cached.
pub struct SelectedXcodeVersion<'a> {
    controller: &'a dyn XcodeController,
    cell: OnceCell<Version>,
}

impl<'a> SelectedXcodeVersion<'a> {
    pub fn new(controller: &'a dyn XcodeController) -> Self {
        Self {
            controller,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<Version, ApplicationError> {
        self.cell
            .get_or_try_init(|| async {
                let version = self.controller.selected_version().await?;
                debug!(%version, "Resolved selected Xcode version");
                Ok(version)
            })
            .await
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockXcodeController;

    #[tokio::test]
    async fn queries_the_controller_once() {
        let mut controller = MockXcodeController::new();
        controller
            .expect_selected_version()
            .times(1)
            .returning(|| Ok(Version::new(15, 2, 0)));

        let selected = SelectedXcodeVersion::new(&controller);
        assert_eq!(selected.get().await.unwrap(), Version::new(15, 2, 0));
        assert_eq!(selected.get().await.unwrap(), Version::new(15, 2, 0));
    }

    #[tokio::test]
    async fn failures_propagate() {
        let mut controller = MockXcodeController::new();
        controller.expect_selected_version().returning(|| {
            Err(ApplicationError::XcodeVersionUnavailable {
                reason: "xcodebuild missing".into(),
            })
        });

        let selected = SelectedXcodeVersion::new(&controller);
        assert!(matches!(
            selected.get().await,
            Err(ApplicationError::XcodeVersionUnavailable { .. })
        ));
    }
}
