//! Loads graph snapshots written as JSON.
//!
//! The snapshot is the output of graph resolution: projects, targets and
//! resolved edges. Structural validation is left to `LintService`.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use keel_core::application::ApplicationError;
use keel_core::domain::Graph;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGraphLoader;

impl JsonGraphLoader {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn load(&self, path: &Path) -> Result<Graph, ApplicationError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| load_error(path, e.to_string()))?;
        let graph = self.parse(path, &contents)?;
        debug!(
            graph = %graph.name,
            projects = graph.projects.len(),
            "Graph loaded"
        );
        Ok(graph)
    }

    /// Decode `contents`; `origin` only labels errors.
    pub fn parse(&self, origin: &Path, contents: &str) -> Result<Graph, ApplicationError> {
        serde_json::from_str(contents).map_err(|e| load_error(origin, e.to_string()))
    }
}

fn load_error(path: &Path, reason: String) -> ApplicationError {
    ApplicationError::GraphLoad {
        path: PathBuf::from(path),
        reason,
    }
}
