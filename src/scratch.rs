//! Request-scoped scratch files
//!
//! A [`ScratchScope`] hands out uniquely named paths under the scratch
//! directory and deletes every one of them when it is dropped, whichever way
//! the request ends. Deletion failures are logged and otherwise ignored.

use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Owner of the temporary files created for one request
#[derive(Debug)]
pub struct ScratchScope {
    root: PathBuf,
    prefix: String,
    id: Uuid,
    paths: Vec<PathBuf>,
}

impl ScratchScope {
    /// Open a scope under `root`; every file name starts with `<prefix>-<uuid>`
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            id: Uuid::new_v4(),
            paths: Vec::new(),
        }
    }

    /// Per-request random identifier shared by all files in this scope
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Reserve `<root>/<prefix>-<id>.<extension>` for cleanup without creating it.
    ///
    /// Used for renderer outputs, which the external process writes itself.
    pub fn reserve(&mut self, extension: &str) -> PathBuf {
        let path = self
            .root
            .join(format!("{}-{}.{}", self.prefix, self.id, extension));
        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }
        path
    }

    /// Reserve a path and write `content` into it
    pub async fn write(&mut self, extension: &str, content: &str) -> Result<PathBuf> {
        let path = self.reserve(extension);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write temporary file {}", path.display()))?;
        Ok(path)
    }

    /// Paths registered for cleanup so far
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for ScratchScope {
    // Blocking removal on the current thread: the files are small and must be
    // gone before the request's response is written.
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            remove_quietly(&path);
        }
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed scratch file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove scratch file")
        }
    }
}
