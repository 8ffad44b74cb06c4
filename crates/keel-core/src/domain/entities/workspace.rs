//! Workspace entity and the generation options it carries.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::scheme::{Scheme, TargetReference};
use crate::domain::entities::target::FileElement;
use crate::domain::value_objects::CompatibleXcodeVersions;

/// Aggregates projects for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub projects: Vec<PathBuf>,
    #[serde(default)]
    pub schemes: Vec<Scheme>,
    #[serde(default)]
    pub additional_files: Vec<FileElement>,
    #[serde(default)]
    pub generation_options: GenerationOptions,
}

impl Workspace {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, projects: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            projects,
            schemes: Vec::new(),
            additional_files: Vec::new(),
            generation_options: GenerationOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeCoverageMode {
    /// Every target gathers coverage.
    #[default]
    All,
    /// Only targets a scheme's test action marks for coverage.
    Relevant,
    /// An explicit list.
    Targets(Vec<TargetReference>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestingOption {
    Parallelizable,
    RandomExecutionOrdering,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutogeneratedWorkspaceSchemes {
    pub code_coverage_mode: CodeCoverageMode,
    pub testing_options: BTreeSet<TestingOption>,
}

/// Options consumed read-only by the linters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub compatible_xcode_versions: CompatibleXcodeVersions,
    pub disable_bundle_accessors: bool,
    pub autogenerated_workspace_schemes: AutogeneratedWorkspaceSchemes,
}
