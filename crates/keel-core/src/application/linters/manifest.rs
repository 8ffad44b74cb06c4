//! Checks over the declarative manifests, before graph resolution.
//!
//! Everything reported here is a warning except duplicate target names and
//! scheme references without a project path, which make generation
//! ambiguous.

use std::path::Path;

use tracing::instrument;

use crate::application::linters::project::lint_file_element;
use crate::application::ports::Filesystem;
use crate::domain::{
    ExecutionAction, FileElement, LintingIssue, Project, ResourceFileElement, Scheme, Settings,
    Target, TargetReference, Workspace,
};

pub struct ManifestLinter<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> ManifestLinter<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    #[instrument(skip_all, fields(workspace = %workspace.name))]
    pub fn lint_workspace(&self, workspace: &Workspace) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for scheme in &workspace.schemes {
            issues.extend(lint_scheme_project_paths(scheme));
        }

        if workspace.projects.is_empty() {
            issues.push(LintingIssue::warning(format!(
                "The workspace '{}' doesn't contain any projects",
                workspace.name
            )));
        }
        for path in &workspace.projects {
            if !(self.fs.exists(path) && self.fs.is_directory(path)) {
                issues.push(LintingIssue::warning(format!(
                    "No projects found at: {}",
                    path.display()
                )));
            }
        }

        for element in &workspace.additional_files {
            issues.extend(self.lint_element(element));
        }
        issues
    }

    #[instrument(skip_all, fields(project = %project.name))]
    pub fn lint_project(&self, project: &Project) -> Vec<LintingIssue> {
        let mut issues = lint_settings(&project.settings, &project.name);
        issues.extend(lint_duplicate_targets(project));

        for target in &project.targets {
            if let Some(settings) = &target.settings {
                issues.extend(lint_settings(settings, &target.name));
            }
            issues.extend(lint_core_data_versions(target));
            issues.extend(self.lint_target_files(target));
        }

        for element in &project.file_elements {
            issues.extend(self.lint_element(element));
        }
        issues
    }

    fn lint_target_files(&self, target: &Target) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for resource in &target.resources {
            let issue = match resource {
                ResourceFileElement::File { path, .. } => self.lint_glob(path),
                ResourceFileElement::FolderReference { path, .. } => {
                    lint_file_element(self.fs, &FileElement::FolderReference { path: path.clone() })
                }
            };
            issues.extend(issue);
        }
        for element in target.copy_files.iter().flat_map(|a| a.files.iter()) {
            issues.extend(self.lint_element(element));
        }
        for element in &target.additional_files {
            issues.extend(self.lint_element(element));
        }
        issues
    }

    fn lint_element(&self, element: &FileElement) -> Option<LintingIssue> {
        match element {
            FileElement::File { path } => self.lint_glob(path),
            FileElement::FolderReference { .. } => lint_file_element(self.fs, element),
        }
    }

    /// A plain file path is a glob that must match something. Patterns are
    /// not expanded; only the literal path is checked.
    fn lint_glob(&self, path: &Path) -> Option<LintingIssue> {
        if self.fs.is_directory(path) {
            return Some(LintingIssue::warning(format!(
                "'{p}' is a directory, try using: '{p}/**' to list its files",
                p = path.display()
            )));
        }
        if self.fs.exists(path) || is_glob_pattern(path) {
            return None;
        }
        Some(LintingIssue::warning(format!(
            "No files found at: {}",
            path.display()
        )))
    }
}

fn is_glob_pattern(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .any(|c| matches!(c, '*' | '?' | '[' | '{'))
}

fn lint_settings(settings: &Settings, location: &str) -> Vec<LintingIssue> {
    let names = settings
        .configurations
        .iter()
        .map(|c| c.build_configuration.name.as_str());
    duplicates(names)
        .into_iter()
        .map(|name| {
            LintingIssue::warning(format!(
                "The configuration '{name}' is declared multiple times within '{location}' settings. The last declared configuration will be used."
            ))
        })
        .collect()
}

fn lint_duplicate_targets(project: &Project) -> Vec<LintingIssue> {
    duplicates(project.targets.iter().map(|t| t.name.as_str()))
        .into_iter()
        .map(|name| {
            LintingIssue::error(format!(
                "The target '{name}' is declared multiple times within '{}' project.",
                project.name
            ))
        })
        .collect()
}

/// Every target a scheme mentions, tagged with the action it sits in, in
/// declaration order: pre-actions, post-actions, then the action's own
/// references.
fn scheme_references(scheme: &Scheme) -> Vec<(&'static str, &TargetReference)> {
    fn scripts<'s>(
        action: &'static str,
        pre: &'s [ExecutionAction],
        post: &'s [ExecutionAction],
    ) -> impl Iterator<Item = (&'static str, &'s TargetReference)> {
        pre.iter()
            .chain(post)
            .filter_map(move |script| script.target.as_ref().map(|r| (action, r)))
    }

    let mut references = Vec::new();
    if let Some(build) = &scheme.build_action {
        references.extend(scripts("buildAction", &build.pre_actions, &build.post_actions));
        references.extend(build.targets.iter().map(|r| ("buildAction", r)));
    }
    if let Some(run) = &scheme.run_action {
        references.extend(scripts("runAction", &run.pre_actions, &run.post_actions));
        references.extend(
            run.executable
                .iter()
                .chain(&run.expand_variable_from_target)
                .map(|r| ("runAction", r)),
        );
    }
    if let Some(profile) = &scheme.profile_action {
        references.extend(scripts(
            "profileAction",
            &profile.pre_actions,
            &profile.post_actions,
        ));
        references.extend(profile.executable.iter().map(|r| ("profileAction", r)));
    }
    if let Some(test) = &scheme.test_action {
        references.extend(scripts("testAction", &test.pre_actions, &test.post_actions));
        references.extend(test.targets.iter().map(|r| ("testAction", r)));
    }
    references
}

fn lint_scheme_project_paths(scheme: &Scheme) -> Vec<LintingIssue> {
    scheme_references(scheme)
        .into_iter()
        .filter(|(_, reference)| is_missing_project(reference))
        .map(|(action, reference)| {
            LintingIssue::error(format!(
                "Workspace.swift: The target '{}' in the {action} of the scheme '{}' is missing the project path.\nPlease specify the project path using .project(path:, target:).",
                reference.name, scheme.name
            ))
        })
        .collect()
}

fn lint_core_data_versions(target: &Target) -> Vec<LintingIssue> {
    target
        .core_data_models
        .iter()
        .filter(|model| model.current_version_declared)
        .map(|model| {
            LintingIssue::warning(format!(
                "The current core data model version '{}' will be inferred automatically in '{}' settings. It is not need it to set the current version anymore.",
                model.current_version, target.name
            ))
        })
        .collect()
}

fn is_missing_project(reference: &TargetReference) -> bool {
    reference.project_path.as_os_str().is_empty()
}

/// Values that occur more than once, in order of first occurrence.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    let mut repeated = Vec::new();
    for value in values {
        if seen.contains(&value) {
            if !repeated.contains(&value) {
                repeated.push(value);
            }
        } else {
            seen.push(value);
        }
    }
    repeated
}
