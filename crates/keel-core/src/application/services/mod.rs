//! Application services - orchestrate use cases.
//!
//! Services own the adapters and run the linters in the right order for a
//! high-level use case such as "lint this graph".

pub mod lint_service;

pub use lint_service::{LintOptions, LintReport, LintService};
