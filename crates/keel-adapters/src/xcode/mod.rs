//! Xcode toolchain adapters.

mod fixed;
mod xcodebuild;

pub use fixed::FixedXcodeController;
pub use xcodebuild::{XcodeBuildController, parse_version_output};
