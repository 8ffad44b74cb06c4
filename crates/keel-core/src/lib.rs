//! Keel Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Keel, a
//! linter for Xcode project dependency graphs, following hexagonal (ports
//! and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            keel-cli (CLI)               │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (LintService + the linters)         │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Filesystem, XcodeController) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     keel-adapters (Infrastructure)      │
//! │ (LocalFilesystem, XcodeBuildController) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Graph, GraphTraverser, link rules)    │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keel_core::prelude::*;
//!
//! # async fn run(graph: Graph, filesystem: Box<dyn Filesystem>, xcode: Box<dyn XcodeController>) -> KeelResult<()> {
//! let service = LintService::new(filesystem, xcode);
//! let report = service.lint(&graph, LintOptions::default()).await?;
//! for issue in &report.issues {
//!     println!("{issue}");
//! }
//! # Ok(())
//! # }
//! ```

// Domain layer (graph model, traverser, linking rules)
pub mod domain;

// Application layer (linters and orchestration)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, LintOptions, LintReport, LintService, SelectedXcodeVersion,
        ports::{Filesystem, XcodeController},
    };
    pub use crate::domain::{
        Graph, GraphDependency, GraphTraverser, LintingIssue, LintingIssueExt, Platform,
        Product, Project, Severity, Target, Version, Workspace,
    };
    pub use crate::error::{KeelError, KeelResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
