//! Read-only queries over a [`Graph`].
//!
//! Nothing here mutates the graph or remembers anything between calls.
//! Unknown nodes and dangling edges give empty answers, never panics:
//! reporting them is the linter's job.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::domain::entities::{Project, Scheme, Target, Workspace};
use crate::domain::graph::model::{Graph, GraphDependency, GraphEdge};
use crate::domain::value_objects::{Platform, PlatformCondition, Product};

static NO_DEPENDENCIES: BTreeSet<GraphDependency> = BTreeSet::new();

/// A target together with the project that owns it.
///
/// Equality and ordering use `(project path, target name)`, the same
/// identity a target node has in the graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphTarget<'g> {
    pub path: &'g Path,
    pub target: &'g Target,
    pub project: &'g Project,
}

impl GraphTarget<'_> {
    pub fn node(&self) -> GraphDependency {
        GraphDependency::target(self.target.name.clone(), self.path)
    }

    fn key(&self) -> (&Path, &str) {
        (self.path, &self.target.name)
    }
}

impl PartialEq for GraphTarget<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GraphTarget<'_> {}

impl PartialOrd for GraphTarget<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GraphTarget<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for GraphTarget<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A resolved target dependency and the platform condition on its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphTargetReference<'g> {
    pub graph_target: GraphTarget<'g>,
    pub condition: Option<&'g PlatformCondition>,
}

#[derive(Debug, Clone, Copy)]
pub struct GraphTraverser<'g> {
    graph: &'g Graph,
}

impl<'g> GraphTraverser<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn name(&self) -> &'g str {
        &self.graph.name
    }

    pub fn path(&self) -> &'g Path {
        &self.graph.path
    }

    pub fn workspace(&self) -> Option<&'g Workspace> {
        self.graph.workspace.as_ref()
    }

    pub fn projects(&self) -> impl Iterator<Item = &'g Project> + 'g {
        self.graph.projects.values()
    }

    pub fn project(&self, path: &Path) -> Option<&'g Project> {
        self.graph.projects.get(path)
    }

    // ── Targets ──────────────────────────────────────────────────────────

    /// Every target of every project.
    pub fn all_targets(&self) -> BTreeSet<GraphTarget<'g>> {
        self.graph
            .projects
            .iter()
            .flat_map(|(path, project)| {
                project.targets.iter().map(move |target| GraphTarget {
                    path,
                    target,
                    project,
                })
            })
            .collect()
    }

    pub fn target(&self, path: &Path, name: &str) -> Option<GraphTarget<'g>> {
        let (path, project) = self.graph.projects.get_key_value(path)?;
        let target = project.target(name)?;
        Some(GraphTarget {
            path,
            target,
            project,
        })
    }

    /// Resolves a target node; `None` for other nodes or dangling targets.
    pub fn resolve(&self, node: &GraphDependency) -> Option<GraphTarget<'g>> {
        let (path, name) = node.as_target()?;
        self.target(path, name)
    }

    /// Targets of one project in declaration order.
    pub fn targets_of(&self, project_path: &Path) -> Vec<GraphTarget<'g>> {
        match self.graph.projects.get_key_value(project_path) {
            Some((path, project)) => project
                .targets
                .iter()
                .map(|target| GraphTarget {
                    path,
                    target,
                    project,
                })
                .collect(),
            None => Vec::new(),
        }
    }

    // ── Edges ────────────────────────────────────────────────────────────

    /// One adjacency hop.
    pub fn direct_dependencies(&self, node: &GraphDependency) -> &'g BTreeSet<GraphDependency> {
        self.graph.dependencies.get(node).unwrap_or(&NO_DEPENDENCIES)
    }

    /// The platform restriction on `from -> to`; `None` means unrestricted.
    pub fn filters(
        &self,
        from: &GraphDependency,
        to: &GraphDependency,
    ) -> Option<&'g PlatformCondition> {
        self.graph
            .dependency_conditions
            .get(&GraphEdge::new(from.clone(), to.clone()))
    }

    /// Every `(from, to)` pair in graph order.
    pub fn edges(&self) -> impl Iterator<Item = (&'g GraphDependency, &'g GraphDependency)> + 'g {
        self.graph
            .dependencies
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from, to)))
    }

    /// Every node that appears on either side of an edge.
    pub fn dependencies(&self) -> BTreeSet<&'g GraphDependency> {
        self.edges().flat_map(|(from, to)| [from, to]).collect()
    }

    /// Prebuilt binary nodes (frameworks, libraries, xcframeworks).
    pub fn precompiled_dependencies(&self) -> BTreeSet<&'g GraphDependency> {
        let mut binaries = self.all_framework_dependencies();
        binaries.extend(self.all_library_dependencies());
        binaries.extend(self.all_xcframework_dependencies());
        binaries
    }

    pub fn all_framework_dependencies(&self) -> BTreeSet<&'g GraphDependency> {
        self.dependencies()
            .into_iter()
            .filter(|d| matches!(d, GraphDependency::Framework { .. }))
            .collect()
    }

    pub fn all_library_dependencies(&self) -> BTreeSet<&'g GraphDependency> {
        self.dependencies()
            .into_iter()
            .filter(|d| matches!(d, GraphDependency::Library { .. }))
            .collect()
    }

    pub fn all_xcframework_dependencies(&self) -> BTreeSet<&'g GraphDependency> {
        self.dependencies()
            .into_iter()
            .filter(|d| matches!(d, GraphDependency::Xcframework { .. }))
            .collect()
    }

    /// Platforms of `from` on which an edge with `condition` applies.
    pub fn dependency_platforms(
        &self,
        from: &Target,
        condition: Option<&PlatformCondition>,
    ) -> BTreeSet<Platform> {
        from.platforms()
            .into_iter()
            .filter(|p| condition.is_none_or(|c| c.contains(p.platform_filter())))
            .collect()
    }

    pub fn has_package_dependencies(&self) -> bool {
        self.edges()
            .any(|(_, to)| matches!(to, GraphDependency::Package { .. }))
    }

    /// Direct dependencies of a target that resolve to declared targets.
    pub fn direct_target_dependencies(
        &self,
        path: &Path,
        name: &str,
    ) -> Vec<GraphTargetReference<'g>> {
        let from = GraphDependency::target(name, path);
        self.direct_dependencies(&from)
            .iter()
            .filter_map(|to| {
                let graph_target = self.resolve(to)?;
                Some(GraphTargetReference {
                    graph_target,
                    condition: self.filters(&from, to),
                })
            })
            .collect()
    }

    /// Direct dependencies of a target with the given product type.
    pub fn direct_dependencies_with_product(
        &self,
        path: &Path,
        name: &str,
        product: Product,
    ) -> Vec<GraphTarget<'g>> {
        self.direct_target_dependencies(path, name)
            .into_iter()
            .map(|r| r.graph_target)
            .filter(|t| t.target.product == product)
            .collect()
    }

    pub fn app_clip_dependencies(&self, path: &Path, name: &str) -> Vec<GraphTarget<'g>> {
        self.direct_dependencies_with_product(path, name, Product::AppClip)
    }

    /// Every node reachable from `node`, excluding `node` itself unless a
    /// cycle leads back to it.
    pub fn transitive_dependencies(&self, node: &GraphDependency) -> BTreeSet<&'g GraphDependency> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<&GraphDependency> = self.direct_dependencies(node).iter().collect();
        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.direct_dependencies(current).iter());
            }
        }
        visited
    }

    /// Declared targets reachable from `path`/`name`.
    pub fn transitive_target_dependencies(&self, path: &Path, name: &str) -> Vec<GraphTarget<'g>> {
        let root = GraphDependency::target(name, path);
        self.transitive_dependencies(&root)
            .into_iter()
            .filter_map(|node| self.resolve(node))
            .collect()
    }

    // ── Schemes and projects ─────────────────────────────────────────────

    /// Project schemes in path order, then workspace schemes.
    pub fn schemes(&self) -> Vec<&'g Scheme> {
        self.projects()
            .flat_map(|p| p.schemes.iter())
            .chain(self.workspace().into_iter().flat_map(|w| w.schemes.iter()))
            .collect()
    }

    /// Projects reachable from the workspace's declared projects through
    /// target edges, the declared ones included. Sorted by path.
    pub fn all_dependency_projects(&self, workspace: &Workspace) -> Vec<&'g Project> {
        let mut reached: BTreeMap<&'g Path, &'g Project> = BTreeMap::new();
        for declared in &workspace.projects {
            let Some(project) = self.project(declared) else {
                continue;
            };
            reached.insert(&project.path, project);
            for target in self.targets_of(declared) {
                for dependency in self.transitive_target_dependencies(target.path, &target.target.name)
                {
                    reached.insert(dependency.path, dependency.project);
                }
            }
        }
        reached.into_values().collect()
    }

    /// Path of `path` relative to the graph root; `.` when they match.
    pub fn relative_to_root(&self, path: &Path) -> PathBuf {
        let base = self
            .workspace()
            .map(|w| w.path.as_path())
            .unwrap_or(self.path());
        match path.strip_prefix(base) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    }
}
