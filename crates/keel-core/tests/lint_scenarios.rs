//! End-to-end lint passes through the public service API.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keel_core::domain::{BuildConfiguration, Destination, Settings, SourceFile};
use keel_core::prelude::*;

/// Every path exists unless listed as missing.
struct StubFilesystem {
    missing: BTreeSet<PathBuf>,
}

impl StubFilesystem {
    fn everything() -> Self {
        Self {
            missing: BTreeSet::new(),
        }
    }

    fn without(paths: &[&str]) -> Self {
        Self {
            missing: paths.iter().map(PathBuf::from).collect(),
        }
    }
}

impl Filesystem for StubFilesystem {
    fn exists(&self, path: &Path) -> bool {
        !self.missing.contains(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.exists(path) && path.extension().is_none()
    }
}

/// Reports a fixed version and counts how often it was asked.
#[derive(Clone)]
struct FixedXcode {
    version: Version,
    calls: Arc<AtomicUsize>,
}

impl FixedXcode {
    fn new(major: u32, minor: u32) -> Self {
        Self {
            version: Version::new(major, minor, 0),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl XcodeController for FixedXcode {
    async fn selected_version(&self) -> Result<Version, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.version)
    }
}

const PACKAGE_GRAPH: &str = r#"{
    "name": "Keel",
    "path": "/ws",
    "workspace": {
        "name": "Keel",
        "path": "/ws",
        "projects": ["/ws/App"],
        "generation_options": {
            "compatible_xcode_versions": { "upToNextMajor": "16.0" }
        }
    },
    "projects": [
        {
            "name": "App",
            "path": "/ws/App",
            "targets": [
                {
                    "name": "App",
                    "destinations": ["iPhone", "iPad"],
                    "product": "app",
                    "bundle_id": "dev.keel.app",
                    "sources": [{ "path": "/ws/App/Sources/App.swift" }]
                },
                {
                    "name": "Core",
                    "destinations": ["iPhone", "iPad"],
                    "product": "framework",
                    "bundle_id": "dev.keel.core",
                    "sources": [{ "path": "/ws/App/Sources/Core.swift" }]
                }
            ]
        }
    ],
    "dependencies": [
        [
            { "type": "target", "name": "App", "path": "/ws/App" },
            [
                { "type": "target", "name": "Core", "path": "/ws/App" },
                { "type": "package", "product": "Collections" }
            ]
        ]
    ]
}"#;

fn load(json: &str) -> Graph {
    serde_json::from_str(json).expect("fixture graph decodes")
}

fn service(fs: StubFilesystem, xcode: &FixedXcode) -> LintService {
    LintService::new(Box::new(fs), Box::new(xcode.clone()))
}

fn ios_target(name: &str, product: Product, bundle_id: &str) -> Target {
    let mut target = Target::new(name, Destination::ios(), product, bundle_id);
    target.sources = vec![SourceFile::new(format!("/{name}/{name}.swift"))];
    target
}

#[tokio::test]
async fn decoded_graph_lints_clean_on_a_compatible_toolchain() {
    let graph = load(PACKAGE_GRAPH);
    let xcode = FixedXcode::new(16, 2);

    let report = service(StubFilesystem::everything(), &xcode)
        .lint(&graph, LintOptions::default())
        .await
        .unwrap();

    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
    assert_eq!(report.graph, "Keel");
    assert_eq!(xcode.calls(), 1);
}

#[tokio::test]
async fn old_toolchain_reports_both_environment_and_package_errors_once() {
    let graph = load(PACKAGE_GRAPH);
    let xcode = FixedXcode::new(10, 3);

    let report = service(StubFilesystem::everything(), &xcode)
        .lint(&graph, LintOptions::default())
        .await
        .unwrap();

    let reasons: Vec<&str> = report.issues.iter().map(|i| i.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec![
            "The selected Xcode version is 10.3.0, which is not compatible with this project's Xcode version requirement of 16.0.0..<17.0.0.",
            "The project contains package dependencies but the selected version of Xcode is not compatible. Need at least 11 but got 10.3.0",
        ]
    );
    assert_eq!(report.error_count(), 2);
    assert_eq!(xcode.calls(), 1);
}

#[tokio::test]
async fn graphs_without_packages_or_requirements_never_query_the_toolchain() {
    let graph = Graph::new("G", "/p").with_project({
        let mut project = Project::new("P", "/p");
        project.targets = vec![ios_target("App", Product::App, "dev.keel.app")];
        project
    });
    let xcode = FixedXcode::new(9, 0);

    let report = service(StubFilesystem::everything(), &xcode)
        .lint(&graph, LintOptions::default())
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(xcode.calls(), 0);
}

#[tokio::test]
async fn watch_app_bundle_ids_must_extend_the_host_app() {
    let app = ios_target("App", Product::App, "dev.keel.app");
    let mut watch = Target::new(
        "WatchApp",
        [Destination::AppleWatch].into_iter().collect(),
        Product::Watch2App,
        "dev.other.watch",
    );
    watch.sources = vec![SourceFile::new("/WatchApp/WatchApp.swift")];

    let mut project = Project::new("P", "/p");
    project.targets = vec![app, watch];
    let graph = Graph::new("G", "/p").with_project(project).with_edge(
        GraphDependency::target("App", "/p"),
        GraphDependency::target("WatchApp", "/p"),
        None,
    );
    let xcode = FixedXcode::new(16, 0);

    let report = service(StubFilesystem::everything(), &xcode)
        .lint(&graph, LintOptions::default())
        .await
        .unwrap();

    assert_eq!(
        report.issues,
        vec![LintingIssue::error(
            "Watch app 'WatchApp' bundleId: dev.other.watch isn't prefixed with its parent's app 'App' bundleId 'dev.keel.app'"
        )]
    );
}

#[tokio::test]
async fn reached_projects_must_not_introduce_configurations() {
    let mut app = Project::new("App", "/ws/App");
    app.targets = vec![ios_target("App", Product::App, "dev.keel.app")];

    let mut lib = Project::new("Lib", "/ws/Lib");
    lib.targets = vec![ios_target("Lib", Product::Framework, "dev.keel.lib")];
    lib.settings = Settings::with_configurations([
        BuildConfiguration::debug("Debug"),
        BuildConfiguration::release("Release"),
        BuildConfiguration::release("Beta"),
    ]);

    let graph = Graph::new("Keel", "/ws")
        .with_project(app)
        .with_project(lib)
        .with_edge(
            GraphDependency::target("App", "/ws/App"),
            GraphDependency::target("Lib", "/ws/Lib"),
            None,
        )
        .with_workspace(Workspace::new("Keel", "/ws", vec!["/ws/App".into()]));
    let xcode = FixedXcode::new(16, 0);

    let report = service(StubFilesystem::everything(), &xcode)
        .lint(&graph, LintOptions::default())
        .await
        .unwrap();

    assert_eq!(report.warning_count(), 1);
    assert!(report.issues[0].reason.starts_with(
        "The project 'Lib' has missing or mismatching configurations."
    ));
    assert!(!report.has_errors());
}

#[tokio::test]
async fn missing_precompiled_binaries_and_manifest_files_are_reported() {
    let mut graph = load(PACKAGE_GRAPH);
    graph.add_edge(
        GraphDependency::target("App", "/ws/App"),
        GraphDependency::Framework {
            path: "/ws/Vendor/Analytics.framework".into(),
        },
        None,
    );
    let fs = StubFilesystem::without(&["/ws/Vendor/Analytics.framework", "/ws/App"]);
    let xcode = FixedXcode::new(16, 1);

    let report = service(fs, &xcode)
        .lint(&graph, LintOptions { manifests: true })
        .await
        .unwrap();

    assert_eq!(
        report.issues,
        vec![
            LintingIssue::error("Framework not found at path /ws/Vendor/Analytics.framework"),
            LintingIssue::warning("No projects found at: /ws/App"),
        ]
    );
}

fn multi_platform_graph(condition: &str) -> String {
    format!(
        r#"{{
            "name": "Keel",
            "path": "/p",
            "projects": [
                {{
                    "name": "P",
                    "path": "/p",
                    "targets": [
                        {{
                            "name": "App",
                            "destinations": ["iPhone", "mac"],
                            "product": "app",
                            "bundle_id": "dev.keel.app",
                            "sources": [{{ "path": "/p/App.swift" }}]
                        }},
                        {{
                            "name": "IosKit",
                            "destinations": ["iPhone"],
                            "product": "framework",
                            "bundle_id": "dev.keel.ioskit",
                            "sources": [{{ "path": "/p/IosKit.swift" }}]
                        }}
                    ]
                }}
            ],
            "dependencies": [
                [
                    {{ "type": "target", "name": "App", "path": "/p" }},
                    [{{ "type": "target", "name": "IosKit", "path": "/p" }}]
                ]
            ],
            "dependency_conditions": [
                [
                    {{
                        "from": {{ "type": "target", "name": "App", "path": "/p" }},
                        "to": {{ "type": "target", "name": "IosKit", "path": "/p" }}
                    }},
                    {condition}
                ]
            ]
        }}"#
    )
}

#[tokio::test]
async fn empty_edge_conditions_are_linted_as_unrestricted() {
    let xcode = FixedXcode::new(16, 0);
    let service = service(StubFilesystem::everything(), &xcode);
    let expected = vec![LintingIssue::error(
        "Target App which depends on IosKit does not support the required platforms: macos. The dependency on IosKit must have a dependency condition constraining to at most: ios.",
    )];

    let empty = load(&multi_platform_graph("[]"));
    assert!(empty.dependency_conditions.is_empty());
    let report = service.lint(&empty, LintOptions::default()).await.unwrap();
    assert_eq!(report.issues, expected);

    let constrained = load(&multi_platform_graph(r#"["ios"]"#));
    let report = service
        .lint(&constrained, LintOptions::default())
        .await
        .unwrap();
    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
}

#[tokio::test]
async fn linting_is_idempotent() {
    let graph = load(PACKAGE_GRAPH);
    let xcode = FixedXcode::new(10, 0);
    let service = service(StubFilesystem::everything(), &xcode);

    let first = service.lint(&graph, LintOptions::default()).await.unwrap();
    let second = service.lint(&graph, LintOptions::default()).await.unwrap();

    assert_eq!(first, second);
    // One query per pass.
    assert_eq!(xcode.calls(), 2);
}
