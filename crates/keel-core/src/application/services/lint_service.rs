//! Lint Service - main application orchestrator.
//!
//! One call lints one graph snapshot:
//! 1. Validate the graph structure
//! 2. Check the host toolchain against the workspace requirement
//! 3. Run the graph linter (which runs the project linter per project)
//! 4. Optionally lint the manifests themselves
//!
//! The toolchain version is fetched at most once per call and shared by
//! every check that needs it.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    application::{
        linters::{EnvironmentLinter, GraphLinter, ManifestLinter},
        ports::{Filesystem, XcodeController},
        toolchain::SelectedXcodeVersion,
    },
    domain::{Graph, GraphTraverser, LintingIssue, LintingIssueExt, Severity},
    error::KeelResult,
};

/// Per-call switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Also run the manifest linter over the workspace and every project.
    pub manifests: bool,
}

/// Everything one lint pass found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    pub graph: String,
    pub issues: Vec<LintingIssue>,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.issues.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Main lint service.
pub struct LintService {
    filesystem: Box<dyn Filesystem>,
    xcode: Box<dyn XcodeController>,
}

impl LintService {
    /// Create a new lint service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use keel_core::application::LintService;
    /// # use keel_core::prelude::{Filesystem, XcodeController};
    /// # fn adapters() -> (Box<dyn Filesystem>, Box<dyn XcodeController>) { unimplemented!() }
    /// # let (filesystem, xcode) = adapters();
    ///
    /// let service = LintService::new(
    ///     filesystem, // Box<dyn Filesystem>
    ///     xcode,      // Box<dyn XcodeController>
    /// );
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, xcode: Box<dyn XcodeController>) -> Self {
        Self { filesystem, xcode }
    }

    /// Lint a graph snapshot.
    ///
    /// Findings never make this fail. It returns `Err` for a structurally
    /// invalid graph or when the toolchain version is needed but cannot be
    /// determined.
    #[instrument(
        skip_all,
        fields(
            graph = %graph.name,
            projects = graph.projects.len(),
            manifests = options.manifests
        )
    )]
    pub async fn lint(&self, graph: &Graph, options: LintOptions) -> KeelResult<LintReport> {
        info!("Linting graph");
        graph.validate()?;

        let fs = self.filesystem.as_ref();
        let xcode = SelectedXcodeVersion::new(self.xcode.as_ref());
        let traverser = GraphTraverser::new(graph);
        let generation_options = graph
            .workspace
            .as_ref()
            .map(|w| w.generation_options.clone())
            .unwrap_or_default();

        let environment_linter = EnvironmentLinter::new();
        let graph_linter = GraphLinter::new(fs);
        let (environment, structure) = futures::try_join!(
            environment_linter.lint(&generation_options.compatible_xcode_versions, &xcode),
            graph_linter.lint(&traverser, &generation_options, &xcode),
        )?;

        let mut issues = environment;
        issues.extend(structure);

        if options.manifests {
            let manifests = ManifestLinter::new(fs);
            if let Some(workspace) = traverser.workspace() {
                issues.extend(manifests.lint_workspace(workspace));
            }
            for project in traverser.projects() {
                issues.extend(manifests.lint_project(project));
            }
        }

        let report = LintReport {
            graph: graph.name.clone(),
            issues,
        };
        info!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Lint finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::MockXcodeController;
    use crate::application::test_support::{FakeFilesystem, ios_target, project};
    use crate::domain::{
        CompatibleXcodeVersions, Destination, GraphDependency, Product, Target, Version,
        Workspace,
    };
    use crate::error::KeelError;

    fn service(fs: FakeFilesystem, xcode: MockXcodeController) -> LintService {
        LintService::new(Box::new(fs), Box::new(xcode))
    }

    fn xcode_once(version: Version) -> MockXcodeController {
        let mut controller = MockXcodeController::new();
        controller
            .expect_selected_version()
            .times(1)
            .returning(move || Ok(version));
        controller
    }

    fn package_graph(requirement: CompatibleXcodeVersions) -> Graph {
        let mut workspace = Workspace::new("W", "/", vec!["/app".into()]);
        workspace.generation_options.compatible_xcode_versions = requirement;
        Graph::new("G", "/")
            .with_project(project("App", "/app", vec![ios_target("App", Product::App)]))
            .with_edge(
                GraphDependency::target("App", "/app"),
                GraphDependency::Package {
                    product: "Kit".into(),
                },
                None,
            )
            .with_workspace(workspace)
    }

    #[tokio::test]
    async fn toolchain_is_queried_once_per_pass() {
        let graph = package_graph(CompatibleXcodeVersions::Exact(Version::new(10, 3, 0)));
        let service = service(
            FakeFilesystem::everything(),
            xcode_once(Version::new(10, 3, 0)),
        );

        let report = service.lint(&graph, LintOptions::default()).await.unwrap();
        assert_eq!(report.error_count(), 1);
        assert!(report.issues[0].reason.contains("Need at least 11 but got 10.3.0"));
    }

    #[tokio::test]
    async fn environment_issues_come_first() {
        let graph = package_graph(CompatibleXcodeVersions::Exact(Version::new(15, 0, 0)));
        let service = service(FakeFilesystem::everything(), xcode_once(Version::new(10, 0, 0)));

        let report = service.lint(&graph, LintOptions::default()).await.unwrap();
        assert_eq!(report.error_count(), 2);
        assert!(report.issues[0].reason.starts_with("The selected Xcode version is 10.0.0"));
    }

    #[tokio::test]
    async fn toolchain_failures_abort_the_pass() {
        let graph = package_graph(CompatibleXcodeVersions::All);
        let mut controller = MockXcodeController::new();
        controller.expect_selected_version().returning(|| {
            Err(ApplicationError::XcodeVersionUnavailable {
                reason: "xcodebuild not found".into(),
            })
        });

        let result = service(FakeFilesystem::everything(), controller)
            .lint(&graph, LintOptions::default())
            .await;
        assert!(matches!(
            result,
            Err(KeelError::Application(
                ApplicationError::XcodeVersionUnavailable { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn invalid_graphs_are_rejected() {
        let broken = Target::new("Empty", Default::default(), Product::App, "dev.keel.empty");
        let graph = Graph::new("G", "/").with_project(project("App", "/app", vec![broken]));
        let mut controller = MockXcodeController::new();
        controller.expect_selected_version().never();

        let result = service(FakeFilesystem::everything(), controller)
            .lint(&graph, LintOptions::default())
            .await;
        assert!(matches!(result, Err(KeelError::Domain(_))));
    }

    #[tokio::test]
    async fn manifests_are_linted_on_request() {
        let graph = Graph::new("G", "/")
            .with_project(project(
                "App",
                "/app",
                vec![
                    ios_target("App", Product::App),
                    ios_target("App", Product::App),
                ],
            ))
            .with_workspace(Workspace::new("W", "/", vec!["/app".into()]));
        let mut controller = MockXcodeController::new();
        controller.expect_selected_version().never();
        let service = service(FakeFilesystem::everything(), controller);

        let plain = service.lint(&graph, LintOptions::default()).await.unwrap();
        assert!(plain.is_clean());

        let report = service
            .lint(&graph, LintOptions { manifests: true })
            .await
            .unwrap();
        assert_eq!(
            report.issues,
            vec![LintingIssue::error(
                "The target 'App' is declared multiple times within 'App' project."
            )]
        );
    }

    #[tokio::test]
    async fn linting_twice_gives_the_same_report() {
        let graph = Graph::new("G", "/")
            .with_project(project(
                "P",
                "/p",
                vec![
                    crate::application::test_support::target(
                        "MacKit",
                        Destination::macos(),
                        Product::StaticFramework,
                    ),
                    ios_target("IosKit", Product::StaticLibrary),
                ],
            ))
            .with_edge(
                GraphDependency::target("MacKit", "/p"),
                GraphDependency::target("IosKit", "/p"),
                None,
            );
        let mut controller = MockXcodeController::new();
        controller.expect_selected_version().never();
        let service = service(FakeFilesystem::everything(), controller);

        let first = service.lint(&graph, LintOptions::default()).await.unwrap();
        let second = service.lint(&graph, LintOptions::default()).await.unwrap();
        assert_eq!(first, second);
        assert!(first.has_errors());
    }
}
