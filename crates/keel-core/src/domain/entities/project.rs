//! Project and package entities.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::scheme::Scheme;
use crate::domain::entities::settings::Settings;
use crate::domain::entities::target::{FileElement, Target};

/// An Xcode project. `path` is its identity within a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default = "Settings::default_configurations")]
    pub settings: Settings,
    #[serde(default)]
    pub schemes: Vec<Scheme>,
    #[serde(default)]
    pub file_elements: Vec<FileElement>,
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            targets: Vec::new(),
            settings: Settings::default_configurations(),
            schemes: Vec::new(),
            file_elements: Vec::new(),
            packages: Vec::new(),
        }
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// A Swift package referenced by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Package {
    Local {
        path: PathBuf,
    },
    Remote {
        url: String,
        #[serde(default)]
        requirement: String,
    },
}

impl Package {
    /// Name used to key the package inside a project.
    pub fn identity(&self) -> String {
        match self {
            Self::Local { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Remote { url, .. } => url
                .trim_end_matches('/')
                .trim_end_matches(".git")
                .rsplit('/')
                .next()
                .unwrap_or(url)
                .to_string(),
        }
    }
}
