//! The dependency graph aggregate.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Package, Project, Workspace};
use crate::domain::error::DomainError;
use crate::domain::value_objects::PlatformCondition;

/// A node of the dependency graph.
///
/// Identity is structural: two mentions of the same framework path are the
/// same node, and two targets with the same name in different projects are
/// different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphDependency {
    Target { name: String, path: PathBuf },
    Framework { path: PathBuf },
    Library { path: PathBuf },
    Xcframework { path: PathBuf },
    Sdk { name: String },
    Package { product: String },
}

impl GraphDependency {
    pub fn target(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Target {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn is_target(&self) -> bool {
        matches!(self, Self::Target { .. })
    }

    /// `(project path, target name)` for target nodes.
    pub fn as_target(&self) -> Option<(&Path, &str)> {
        match self {
            Self::Target { name, path } => Some((path, name)),
            _ => None,
        }
    }

    /// On-disk location of a prebuilt binary node.
    pub fn binary_path(&self) -> Option<&Path> {
        match self {
            Self::Framework { path } | Self::Library { path } | Self::Xcframework { path } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Capitalised kind word for "not found" diagnostics.
    pub const fn binary_kind(&self) -> Option<&'static str> {
        match self {
            Self::Framework { .. } => Some("Framework"),
            Self::Library { .. } => Some("Library"),
            Self::Xcframework { .. } => Some("XCFramework"),
            _ => None,
        }
    }
}

impl fmt::Display for GraphDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target { name, path } => write!(f, "target {name} ({})", path.display()),
            Self::Framework { path } => write!(f, "framework {}", path.display()),
            Self::Library { path } => write!(f, "library {}", path.display()),
            Self::Xcframework { path } => write!(f, "xcframework {}", path.display()),
            Self::Sdk { name } => write!(f, "sdk {name}"),
            Self::Package { product } => write!(f, "package {product}"),
        }
    }
}

/// `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: GraphDependency,
    pub to: GraphDependency,
}

impl GraphEdge {
    pub fn new(from: GraphDependency, to: GraphDependency) -> Self {
        Self { from, to }
    }
}

pub type Adjacency = BTreeMap<GraphDependency, BTreeSet<GraphDependency>>;

/// Root aggregate handed to the linters. Read-only once built.
///
/// Edges may point at nodes no project declares; reporting those is the
/// linter's job, so construction accepts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,
    #[serde(default, with = "project_list")]
    pub projects: BTreeMap<PathBuf, Project>,
    #[serde(default, with = "entries")]
    pub dependencies: Adjacency,
    #[serde(default, with = "conditions")]
    pub dependency_conditions: BTreeMap<GraphEdge, PlatformCondition>,
    #[serde(default)]
    pub packages: BTreeMap<PathBuf, BTreeMap<String, Package>>,
}

impl Graph {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.path.clone(), project);
        self
    }

    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    /// Adds `from -> to`, with an optional platform restriction.
    pub fn with_edge(
        mut self,
        from: GraphDependency,
        to: GraphDependency,
        condition: Option<PlatformCondition>,
    ) -> Self {
        self.add_edge(from, to, condition);
        self
    }

    pub fn add_edge(
        &mut self,
        from: GraphDependency,
        to: GraphDependency,
        condition: Option<PlatformCondition>,
    ) {
        if let Some(condition) = condition {
            self.dependency_conditions
                .insert(GraphEdge::new(from.clone(), to.clone()), condition);
        }
        self.dependencies.entry(from).or_default().insert(to);
    }

    /// Structural checks a deserialized graph must pass before linting.
    pub fn validate(&self) -> Result<(), DomainError> {
        for project in self.projects.values() {
            if let Some(target) = project.targets.iter().find(|t| t.destinations.is_empty()) {
                return Err(DomainError::EmptyDestinations {
                    target: target.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Serializes a map keyed by a non-string type as a list of `[key, value]`
/// pairs so it survives JSON.
mod entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

/// Edge conditions as `[edge, filters]` pairs. An empty filter list means the
/// edge is unrestricted, so it is dropped on load.
mod conditions {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::GraphEdge;
    use crate::domain::value_objects::{PlatformCondition, PlatformFilters};

    pub fn serialize<S>(
        map: &BTreeMap<GraphEdge, PlatformCondition>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::entries::serialize(map, serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<GraphEdge, PlatformCondition>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(GraphEdge, PlatformFilters)>::deserialize(deserializer)?;
        Ok(pairs
            .into_iter()
            .filter_map(|(edge, filters)| PlatformCondition::when(filters).map(|c| (edge, c)))
            .collect())
    }
}

/// Projects are written as a plain list and keyed by their path on load.
mod project_list {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::entities::Project;

    pub fn serialize<S>(map: &BTreeMap<PathBuf, Project>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<PathBuf, Project>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let projects = Vec::<Project>::deserialize(deserializer)?;
        Ok(projects.into_iter().map(|p| (p.path.clone(), p)).collect())
    }
}
