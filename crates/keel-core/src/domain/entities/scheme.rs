//! Schemes and the target references inside their actions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Points at a target by owning project path and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetReference {
    pub project_path: PathBuf,
    pub name: String,
}

impl TargetReference {
    pub fn new(project_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TargetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.project_path.display())
    }
}

/// A script run before or after an action, optionally in a target's build
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionAction {
    pub title: String,
    #[serde(default)]
    pub script_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildAction {
    pub targets: Vec<TargetReference>,
    pub pre_actions: Vec<ExecutionAction>,
    pub post_actions: Vec<ExecutionAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestAction {
    pub targets: Vec<TargetReference>,
    pub coverage: bool,
    pub code_coverage_targets: Vec<TargetReference>,
    pub pre_actions: Vec<ExecutionAction>,
    pub post_actions: Vec<ExecutionAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<TargetReference>,
    /// A literal binary to launch instead of a built target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_variable_from_target: Option<TargetReference>,
    pub pre_actions: Vec<ExecutionAction>,
    pub post_actions: Vec<ExecutionAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<TargetReference>,
    pub pre_actions: Vec<ExecutionAction>,
    pub post_actions: Vec<ExecutionAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub name: String,
    #[serde(default = "default_shared")]
    pub shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_action: Option<BuildAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_action: Option<TestAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_action: Option<RunAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_action: Option<ProfileAction>,
}

fn default_shared() -> bool {
    true
}

impl Scheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: true,
            build_action: None,
            test_action: None,
            run_action: None,
            profile_action: None,
        }
    }

    pub fn with_build_targets(mut self, targets: Vec<TargetReference>) -> Self {
        self.build_action = Some(BuildAction {
            targets,
            ..BuildAction::default()
        });
        self
    }
}
