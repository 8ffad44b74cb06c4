//! In-memory filesystem adapter for testing.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use keel_core::application::ports::Filesystem;

/// In-memory filesystem for testing.
///
/// Registering a path also registers every ancestor as a directory.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashSet<PathBuf>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(ancestor.to_path_buf());
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Builder form of [`MemoryFilesystem::add_file`].
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.add_file(path);
        self
    }

    /// Builder form of [`MemoryFilesystem::add_directory`].
    pub fn with_directory(self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            inner.add_ancestors(&path);
            inner.files.insert(path);
        }
    }

    pub fn add_directory(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            inner.add_ancestors(&path);
            inner.directories.insert(path);
        }
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains(path) || inner.directories.contains(path))
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_register_their_parents() {
        let fs = MemoryFilesystem::new().with_file("/ws/App/Info.plist");

        assert!(fs.exists(Path::new("/ws/App/Info.plist")));
        assert!(!fs.is_directory(Path::new("/ws/App/Info.plist")));
        assert!(fs.is_directory(Path::new("/ws/App")));
        assert!(fs.is_directory(Path::new("/ws")));
        assert!(!fs.exists(Path::new("/ws/Other")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let view = fs.clone();
        fs.add_directory("/ws/Resources");

        assert!(view.is_directory(Path::new("/ws/Resources")));
        fs.clear();
        assert!(!view.exists(Path::new("/ws/Resources")));
        assert!(view.list_files().is_empty());
    }
}
