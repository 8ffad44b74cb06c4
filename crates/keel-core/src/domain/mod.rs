// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Keel.
//!
//! Pure data plus the queries over it. Filesystem and toolchain access go
//! through the ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable snapshot**: a `Graph` is built once and only read afterwards
//! - **Deterministic**: every collection is a `BTreeMap`/`BTreeSet` or an
//!   ordered `Vec`, so queries answer in a stable order
//!
pub mod entities;
pub mod error;
pub mod graph;
pub mod links;
pub mod linting;
pub mod value_objects;

pub use entities::{
    AutogeneratedWorkspaceSchemes, BuildAction, CodeCoverageMode, CodeGen, Configuration,
    ConfigurationEntry, CopyFilesAction, CoreDataModel, Entitlements, ExecutionAction,
    FileElement, GenerationOptions, InfoPlist, OnDemandResourcesTags, Package, ProfileAction,
    Project, ResourceFileElement, RunAction, Scheme, SdkStatus, SettingValue, Settings, SettingsDictionary, SourceFile, Target,
    TargetDependency, TargetKind, TargetReference, TargetScript, TestAction, TestingOption,
    Workspace,
};
pub use error::{DomainError, ErrorCategory};
pub use graph::{Graph, GraphDependency, GraphEdge, GraphTarget, GraphTargetReference, GraphTraverser};
pub use linting::{LintingIssue, LintingIssueExt, Severity};
pub use value_objects::{
    BuildConfiguration, CompatibleXcodeVersions, DeploymentTargets, Destination, Destinations,
    Platform, PlatformCondition, PlatformFilter, PlatformFilters, Product, Variant, Version,
};
