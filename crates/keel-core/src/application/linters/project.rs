use tracing::{debug, instrument};

use crate::application::linters::{PackageLinter, TargetLinter};
use crate::application::ports::Filesystem;
use crate::domain::{FileElement, GenerationOptions, LintingIssue, Project};

/// Lints one project: its own file elements, then every target in
/// declaration order, then its packages.
pub struct ProjectLinter<'a> {
    fs: &'a dyn Filesystem,
    targets: TargetLinter<'a>,
    packages: PackageLinter<'a>,
}

impl<'a> ProjectLinter<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self {
            fs,
            targets: TargetLinter::new(fs),
            packages: PackageLinter::new(fs),
        }
    }

    #[instrument(skip_all, fields(project = %project.name))]
    pub fn lint(&self, project: &Project, options: &GenerationOptions) -> Vec<LintingIssue> {
        let mut issues: Vec<LintingIssue> = project
            .file_elements
            .iter()
            .filter_map(|element| lint_file_element(self.fs, element))
            .collect();
        for target in &project.targets {
            issues.extend(self.targets.lint(target, options));
        }
        for package in &project.packages {
            issues.extend(self.packages.lint(package));
        }
        debug!(count = issues.len(), "Project linted");
        issues
    }
}

/// Missing elements and folder references that are files.
pub(crate) fn lint_file_element(fs: &dyn Filesystem, element: &FileElement) -> Option<LintingIssue> {
    let path = element.path();
    if !fs.exists(path) {
        return Some(LintingIssue::warning(format!(
            "{} does not exist",
            path.display()
        )));
    }
    match element {
        FileElement::FolderReference { .. } if !fs.is_directory(path) => {
            Some(LintingIssue::warning(format!(
                "{} is not a directory - folder reference paths need to point to directories",
                path.display()
            )))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeFilesystem, ios_target, project};
    use crate::domain::{Package, Product};
    use pretty_assertions::assert_eq;

    #[test]
    fn file_elements_are_checked_for_existence_and_kind() {
        let mut p = project("App", "/app", Vec::new());
        p.file_elements = vec![
            FileElement::File {
                path: "/app/README.md".into(),
            },
            FileElement::FolderReference {
                path: "/app/Docs".into(),
            },
            FileElement::FolderReference {
                path: "/app/notes.txt".into(),
            },
        ];
        let fs = FakeFilesystem::empty()
            .with_directory("/app/Docs")
            .with_path("/app/notes.txt");

        assert_eq!(
            ProjectLinter::new(&fs).lint(&p, &GenerationOptions::default()),
            vec![
                LintingIssue::warning("/app/README.md does not exist"),
                LintingIssue::warning(
                    "/app/notes.txt is not a directory - folder reference paths need to point to directories"
                ),
            ]
        );
    }

    #[test]
    fn targets_then_packages_are_linted_in_order() {
        let mut second = ios_target("Second", Product::App);
        second.sources.clear();
        let mut first = ios_target("First", Product::App);
        first.sources.clear();

        let mut p = project("App", "/app", vec![second, first]);
        p.packages = vec![Package::Remote {
            url: "nope".into(),
            requirement: String::new(),
        }];
        let fs = FakeFilesystem::everything();

        let reasons: Vec<_> = ProjectLinter::new(&fs)
            .lint(&p, &GenerationOptions::default())
            .into_iter()
            .map(|i| i.reason)
            .collect();
        assert_eq!(
            reasons,
            vec![
                "The target Second doesn't contain source files.",
                "The target First doesn't contain source files.",
                "Invalid URL for Swift Package: nope",
            ]
        );
    }
}
