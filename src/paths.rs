//! Save path resolution for generated artifacts
//!
//! Directory precedence: explicit argument, then `MINDMAP_DEFAULT_SAVE_DIR`,
//! then the home directory. Filename precedence: explicit argument, then
//! `<prefix>-<epoch millis>.<format>`.

use crate::config::ServerConfig;
use crate::renderer::ArtifactStamp;
use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Default filename prefix for saved mind maps
pub const MINDMAP_PREFIX: &str = "markmap";
/// Default filename prefix for saved relationship graphs
pub const MERMAID_PREFIX: &str = "mermaid";
/// Default filename prefix for saved knowledge graphs
pub const KNOWLEDGE_GRAPH_PREFIX: &str = "knowledge-graph";

/// Resolved, absolute target for a saved artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePathSpec {
    pub directory: PathBuf,
    pub filename: String,
}

impl SavePathSpec {
    /// Full path of the artifact
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// Create the target directory (recursively) before anything writes into it.
    ///
    /// An existing file at the target is left for the renderer to overwrite;
    /// its stamp is returned so the render can be checked to have replaced it.
    pub async fn prepare(&self) -> Result<Option<ArtifactStamp>> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create directory {}", self.directory.display()))?;

        let path = self.path();
        let existing = ArtifactStamp::read(&path).await;
        if existing.is_some() {
            tracing::warn!(path = %path.display(), "overwriting existing file");
        }
        Ok(existing)
    }
}

/// Compute where an artifact should be saved.
///
/// No collision check happens here; an existing file at the resulting path is
/// overwritten by the renderer.
pub fn determine_save_path(
    config: &ServerConfig,
    dir_arg: Option<&str>,
    default_prefix: &str,
    format: &str,
    filename_arg: Option<&str>,
) -> Result<SavePathSpec> {
    let dir_arg = dir_arg.filter(|d| !d.is_empty());
    let filename_arg = filename_arg.filter(|f| !f.is_empty());

    let directory = match (dir_arg, &config.default_save_dir) {
        (Some(dir), _) => absolutize(Path::new(dir))?,
        (None, Some(default_dir)) => absolutize(default_dir)?,
        (None, None) => config.home_dir.clone(),
    };

    let filename = match filename_arg {
        Some(name) => name.to_string(),
        None => default_filename(default_prefix, format),
    };

    Ok(SavePathSpec {
        directory,
        filename,
    })
}

/// `<prefix>-<epoch millis>.<format>`
pub fn default_filename(prefix: &str, format: &str) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        format
    )
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}
