//! Linters - each one checks a single concern and returns findings.
//!
//! Linters never fail on findings. Only the graph and environment linters
//! can return `Err`, and only when the toolchain cannot be queried.

pub mod environment;
pub mod graph;
pub mod manifest;
pub mod package;
pub mod project;
pub mod target;

pub use environment::EnvironmentLinter;
pub use graph::GraphLinter;
pub use manifest::ManifestLinter;
pub use package::PackageLinter;
pub use project::ProjectLinter;
pub use target::TargetLinter;
