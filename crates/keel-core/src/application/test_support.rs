//! Fixtures shared by the linter unit tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::application::ports::Filesystem;
use crate::domain::{Destination, Destinations, Project, SourceFile, Target};

/// A filesystem that answers from a fixed set of paths.
#[derive(Debug, Default)]
pub struct FakeFilesystem {
    everything: bool,
    files: BTreeSet<PathBuf>,
    directories: BTreeSet<PathBuf>,
}

impl FakeFilesystem {
    /// Every path exists and is a directory.
    pub fn everything() -> Self {
        Self {
            everything: true,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.directories.insert(path.into());
        self
    }
}

impl Filesystem for FakeFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.everything || self.files.contains(path) || self.directories.contains(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.everything || self.directories.contains(path)
    }
}

/// A target with one source file, so it lints clean on its own.
pub fn target(name: &str, destinations: Destinations, product: crate::domain::Product) -> Target {
    let mut target = Target::new(name, destinations, product, format!("dev.keel.{name}"));
    target.sources = vec![SourceFile::new(format!("/{name}/Sources/{name}.swift"))];
    target
}

pub fn ios_target(name: &str, product: crate::domain::Product) -> Target {
    target(name, Destination::ios(), product)
}

pub fn project(name: &str, path: &str, targets: Vec<Target>) -> Project {
    let mut project = Project::new(name, path);
    project.targets = targets;
    project
}
