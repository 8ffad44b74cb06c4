//! Cross-entity checks over a resolved graph.
//!
//! Each check is an independent read-only pass. They are fanned out as
//! futures and joined in a fixed order, so the concatenated issue list is
//! deterministic. Only the toolchain query can fail the whole pass.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use futures::future::{BoxFuture, FutureExt, try_join_all};
use tracing::{debug, instrument};

use crate::application::linters::ProjectLinter;
use crate::application::ports::Filesystem;
use crate::application::toolchain::SelectedXcodeVersion;
use crate::domain::links::{is_link_allowed, is_supported_source};
use crate::domain::value_objects::join_filters;
use crate::domain::{
    BuildConfiguration, CodeCoverageMode, Entitlements, GenerationOptions, GraphTarget,
    GraphTraverser, LintingIssue, Platform, PlatformFilters, Product,
};
use crate::error::KeelResult;

/// First toolchain major version able to resolve Swift packages.
const MINIMUM_PACKAGE_XCODE_MAJOR: u32 = 11;

type Check<'f> = BoxFuture<'f, KeelResult<Vec<LintingIssue>>>;

pub struct GraphLinter<'a> {
    fs: &'a dyn Filesystem,
    projects: ProjectLinter<'a>,
}

impl<'a> GraphLinter<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self {
            fs,
            projects: ProjectLinter::new(fs),
        }
    }

    #[instrument(skip_all, fields(graph = %traverser.name()))]
    pub async fn lint(
        &self,
        traverser: &GraphTraverser<'_>,
        options: &GenerationOptions,
        xcode: &SelectedXcodeVersion<'_>,
    ) -> KeelResult<Vec<LintingIssue>> {
        let traverser = *traverser;
        let checks: Vec<Check<'_>> = vec![
            sync_check("projects", move || self.lint_projects(traverser, options)),
            sync_check("precompiled", move || self.lint_precompiled(traverser)),
            self.lint_package_dependencies(traverser, xcode).boxed(),
            sync_check("schemes", move || lint_scheme_targets(traverser)),
            sync_check("links", move || lint_links(traverser)),
            sync_check("platform_filters", move || lint_platform_filters(traverser)),
            sync_check("product_names", move || lint_duplicate_product_names(traverser)),
            sync_check("bundle_ids", move || lint_bundle_id_prefixes(traverser)),
            sync_check("app_clips", move || self.lint_app_clips(traverser)),
            sync_check("configurations", move || lint_configurations(traverser)),
            sync_check("code_coverage", move || lint_code_coverage(traverser, options)),
            sync_check("run_actions", move || lint_run_actions(traverser)),
        ];

        let results = try_join_all(checks).await?;
        Ok(results.into_iter().flatten().collect())
    }

    fn lint_projects(
        &self,
        traverser: GraphTraverser<'_>,
        options: &GenerationOptions,
    ) -> Vec<LintingIssue> {
        traverser
            .projects()
            .flat_map(|project| self.projects.lint(project, options))
            .collect()
    }

    fn lint_precompiled(&self, traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
        traverser
            .precompiled_dependencies()
            .into_iter()
            .filter_map(|dependency| {
                let path = dependency.binary_path()?;
                let kind = dependency.binary_kind()?;
                (!self.fs.exists(path)).then(|| {
                    LintingIssue::error(format!("{kind} not found at path {}", path.display()))
                })
            })
            .collect()
    }

    async fn lint_package_dependencies(
        &self,
        traverser: GraphTraverser<'_>,
        xcode: &SelectedXcodeVersion<'_>,
    ) -> KeelResult<Vec<LintingIssue>> {
        if !traverser.has_package_dependencies() {
            return Ok(Vec::new());
        }
        let version = xcode.get().await?;
        debug!(check = "packages", %version, "Check finished");
        if version.major >= MINIMUM_PACKAGE_XCODE_MAJOR {
            return Ok(Vec::new());
        }
        Ok(vec![LintingIssue::error(format!(
            "The project contains package dependencies but the selected version of Xcode is not compatible. Need at least {MINIMUM_PACKAGE_XCODE_MAJOR} but got {version}"
        ))])
    }

    fn lint_app_clips(&self, traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for app in traverser
            .all_targets()
            .into_iter()
            .filter(|t| t.target.product == Product::App)
        {
            let clips = traverser.app_clip_dependencies(app.path, &app.target.name);
            match clips.as_slice() {
                [] => {}
                [clip] => issues.extend(self.lint_app_clip_entitlements(clip)),
                _ => {
                    let names: BTreeSet<&str> =
                        clips.iter().map(|c| c.target.name.as_str()).collect();
                    issues.push(LintingIssue::error(format!(
                        "Target '{}' at path '{}' cannot depend on more than one app clip: {}",
                        app.target.name,
                        app.path.display(),
                        names.into_iter().collect::<Vec<_>>().join(" and ")
                    )));
                }
            }
        }
        issues
    }

    fn lint_app_clip_entitlements(&self, clip: &GraphTarget<'_>) -> Option<LintingIssue> {
        match &clip.target.entitlements {
            None => Some(LintingIssue::error(format!(
                "An AppClip '{}' requires its Parent Application Identifiers Entitlement to be set",
                clip.target.name
            ))),
            Some(Entitlements::File { path }) if !self.fs.exists(path) => {
                Some(LintingIssue::error(format!(
                    "The entitlements at path '{}' referenced by target does not exist",
                    path.display()
                )))
            }
            Some(_) => None,
        }
    }
}

fn sync_check<'f, F>(name: &'static str, check: F) -> Check<'f>
where
    F: FnOnce() -> Vec<LintingIssue> + Send + 'f,
{
    async move {
        let issues = check();
        debug!(check = name, count = issues.len(), "Check finished");
        Ok(issues)
    }
    .boxed()
}

fn render_platforms(platforms: &BTreeSet<Platform>) -> String {
    platforms
        .iter()
        .map(Platform::case_value)
        .collect::<Vec<_>>()
        .join(", ")
}

fn lint_scheme_targets(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for scheme in traverser.schemes() {
        let Some(build_action) = &scheme.build_action else {
            continue;
        };
        let mut missing: BTreeMap<&Path, Vec<&str>> = BTreeMap::new();
        for reference in &build_action.targets {
            if traverser
                .target(&reference.project_path, &reference.name)
                .is_none()
            {
                missing
                    .entry(reference.project_path.as_path())
                    .or_default()
                    .push(reference.name.as_str());
            }
        }
        for (project_path, names) in missing {
            issues.push(LintingIssue::warning(format!(
                "Cannot find targets {} ({}) defined in {}",
                names.join(", "),
                traverser.relative_to_root(project_path).display(),
                scheme.name
            )));
        }
    }
    issues
}

/// The product matrix plus the static platform-family check.
fn lint_links(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for from in traverser.all_targets() {
        let source = from.target;
        let mut target_issues: Vec<LintingIssue> = Vec::new();
        let mut push = |issue: LintingIssue| {
            if !target_issues.contains(&issue) {
                target_issues.push(issue);
            }
        };

        for reference in traverser.direct_target_dependencies(from.path, &source.name) {
            let dependency = reference.graph_target.target;
            let platforms = traverser.dependency_platforms(source, reference.condition);

            for platform in &platforms {
                if !is_supported_source(source.product, *platform) {
                    push(LintingIssue::error(format!(
                        "Target {} has a platform '{platform}' and product '{}' invalid or not supported yet.",
                        source.name, source.product
                    )));
                } else if !is_link_allowed(source.product, *platform, dependency.product) {
                    push(LintingIssue::error(format!(
                        "Target {} has a dependency with target {} of type {} for platform '{platform}' which is invalid or not supported yet.",
                        source.name,
                        dependency.name,
                        dependency.product.description()
                    )));
                }
            }

            if source.product.is_static() && dependency.product.is_static() {
                let dependency_platforms = dependency.platforms();
                if !platforms.is_empty() && platforms.is_disjoint(&dependency_platforms) {
                    push(LintingIssue::error(format!(
                        "Target {} ({}) cannot statically link {} ({}) because they target different platform families",
                        source.name,
                        render_platforms(&platforms),
                        dependency.name,
                        render_platforms(&dependency_platforms)
                    )));
                }
            }
        }
        issues.extend(target_issues);
    }
    issues
}

fn lint_platform_filters(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for from in traverser.all_targets() {
        let source_filters = from.target.supported_platform_filters();
        if source_filters.len() <= 1 {
            continue;
        }
        for reference in traverser.direct_target_dependencies(from.path, &from.target.name) {
            let required: PlatformFilters = match reference.condition {
                Some(condition) => source_filters
                    .intersection(condition.filters())
                    .copied()
                    .collect(),
                None => source_filters.clone(),
            };
            let dependency = reference.graph_target.target;
            let supported = dependency.supported_platform_filters();
            let missing: PlatformFilters = required.difference(&supported).copied().collect();
            if missing.is_empty() {
                continue;
            }
            issues.push(LintingIssue::error(format!(
                "Target {from} which depends on {to} does not support the required platforms: {missing}. The dependency on {to} must have a dependency condition constraining to at most: {supported}.",
                from = from.target.name,
                to = dependency.name,
                missing = join_filters(&missing),
                supported = join_filters(&supported),
            )));
        }
    }
    issues
}

fn lint_duplicate_product_names(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for target in traverser.all_targets() {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for dependency in traverser.transitive_target_dependencies(target.path, &target.target.name)
        {
            *counts
                .entry(dependency.target.product_name_with_extension())
                .or_default() += 1;
        }
        let duplicated: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();
        if !duplicated.is_empty() {
            issues.push(LintingIssue::warning(format!(
                "The target '{}' has dependencies with the following duplicated product names: {}",
                target.target.name,
                duplicated.join(", ")
            )));
        }
    }
    issues
}

fn has_variable(bundle_id: &str) -> bool {
    bundle_id.contains("${")
}

/// `child` must extend `parent`; unresolved variables on either side exempt the pair.
fn is_prefixed(child: &str, parent: &str) -> bool {
    has_variable(child) || has_variable(parent) || child.starts_with(parent)
}

fn lint_bundle_id_prefixes(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for parent in traverser.all_targets() {
        let parent_target = parent.target;
        match parent_target.product {
            Product::App => {
                for watch_app in traverser.direct_dependencies_with_product(
                    parent.path,
                    &parent_target.name,
                    Product::Watch2App,
                ) {
                    if !is_prefixed(&watch_app.target.bundle_id, &parent_target.bundle_id) {
                        issues.push(LintingIssue::error(format!(
                            "Watch app '{}' bundleId: {} isn't prefixed with its parent's app '{}' bundleId '{}'",
                            watch_app.target.name,
                            watch_app.target.bundle_id,
                            parent_target.name,
                            parent_target.bundle_id
                        )));
                    }
                }
                for clip in traverser.app_clip_dependencies(parent.path, &parent_target.name) {
                    if !is_prefixed(&clip.target.bundle_id, &parent_target.bundle_id) {
                        issues.push(LintingIssue::error(format!(
                            "AppClip '{}' bundleId: {} isn't prefixed with its parent's app '{}' bundleId '{}'",
                            clip.target.name,
                            clip.target.bundle_id,
                            parent_target.name,
                            parent_target.bundle_id
                        )));
                    }
                }
            }
            Product::Watch2App => {
                for extension in traverser.direct_dependencies_with_product(
                    parent.path,
                    &parent_target.name,
                    Product::Watch2Extension,
                ) {
                    if !is_prefixed(&extension.target.bundle_id, &parent_target.bundle_id) {
                        issues.push(LintingIssue::error(format!(
                            "Watch extension '{}' bundleId: {} isn't prefixed with its parent's watch app '{}' bundleId '{}'",
                            extension.target.name,
                            extension.target.bundle_id,
                            parent_target.name,
                            parent_target.bundle_id
                        )));
                    }
                }
            }
            _ => {}
        }
    }
    issues
}

fn render_configurations(configurations: &BTreeSet<BuildConfiguration>) -> String {
    configurations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Transitively reached projects may only use configurations the
/// workspace's own projects declare.
fn lint_configurations(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    let Some(workspace) = traverser.workspace() else {
        return Vec::new();
    };
    let declared: BTreeSet<&Path> = workspace.projects.iter().map(|p| p.as_path()).collect();
    let known: BTreeSet<BuildConfiguration> = declared
        .iter()
        .filter_map(|path| traverser.project(path))
        .flat_map(|project| project.settings.configuration_set())
        .collect();

    traverser
        .all_dependency_projects(workspace)
        .into_iter()
        .filter(|project| !declared.contains(project.path.as_path()))
        .filter_map(|project| {
            let configurations = project.settings.configuration_set();
            (!configurations.is_subset(&known)).then(|| {
                LintingIssue::warning(format!(
                    "The project '{}' has missing or mismatching configurations. It has [{}], other projects have [{}]",
                    project.name,
                    render_configurations(&configurations),
                    render_configurations(&known)
                ))
            })
        })
        .collect()
}

fn lint_code_coverage(
    traverser: GraphTraverser<'_>,
    options: &GenerationOptions,
) -> Vec<LintingIssue> {
    match &options.autogenerated_workspace_schemes.code_coverage_mode {
        CodeCoverageMode::All => Vec::new(),
        CodeCoverageMode::Relevant => {
            let any_relevant = traverser.schemes().into_iter().any(|scheme| {
                scheme
                    .test_action
                    .as_ref()
                    .is_some_and(|t| t.coverage && !t.code_coverage_targets.is_empty())
            });
            if any_relevant {
                Vec::new()
            } else {
                vec![LintingIssue::warning(
                    "Cannot find any any targets configured for code coverage, perhaps you wanted to use `CodeCoverageMode.all`?",
                )]
            }
        }
        CodeCoverageMode::Targets(references) if references.is_empty() => {
            vec![LintingIssue::warning(
                "List of targets for code coverage is empty",
            )]
        }
        CodeCoverageMode::Targets(references) => references
            .iter()
            .filter(|r| traverser.target(&r.project_path, &r.name).is_none())
            .map(|r| {
                LintingIssue::error(format!(
                    "Target '{}' at '{}' doesn't exist",
                    r.name,
                    r.project_path.display()
                ))
            })
            .collect(),
    }
}

fn lint_run_actions(traverser: GraphTraverser<'_>) -> Vec<LintingIssue> {
    traverser
        .schemes()
        .into_iter()
        .filter_map(|scheme| {
            let run = scheme.run_action.as_ref()?;
            let (path, executable) = (run.file_path.as_ref()?, run.executable.as_ref()?);
            Some(LintingIssue::warning(format!(
                "On scheme '{}', filePath ('{}') takes precedence over executable ('{}').",
                scheme.name,
                path.display(),
                executable.name
            )))
        })
        .collect()
}
