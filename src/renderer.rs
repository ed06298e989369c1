//! External renderer invocation
//!
//! Runs one renderer process per call and turns its exit into a
//! [`RenderOutcome`]. The invoker does not care which renderer it runs; the
//! binary and argument vector are the only things that vary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::SystemTime;
use tokio::process::Command;

/// Size and modification time of a file, used to tell a fresh artifact from
/// one left over by an earlier run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactStamp {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl ArtifactStamp {
    /// Stamp of the file at `path`, or `None` if nothing is there
    pub async fn read(path: &Path) -> Option<Self> {
        let meta = tokio::fs::metadata(path).await.ok()?;
        Some(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// One external process execution and the artifact it is expected to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInvocation {
    pub binary: String,
    pub args: Vec<String>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// State of a file already at `output_path` before the run. The renderer
    /// must replace it for the run to count as a success.
    pub previous: Option<ArtifactStamp>,
}

impl RenderInvocation {
    /// Mind-map renderer: `<bin> <input> --output <output>`
    pub fn markmap(binary: &str, input: &Path, output: &Path) -> Self {
        Self {
            binary: binary.to_string(),
            args: vec![
                input.to_string_lossy().into_owned(),
                "--output".to_string(),
                output.to_string_lossy().into_owned(),
            ],
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            previous: None,
        }
    }

    /// Diagram renderer: `<bin> -i <input> -o <output>`
    pub fn mermaid(binary: &str, input: &Path, output: &Path) -> Self {
        Self {
            binary: binary.to_string(),
            args: vec![
                "-i".to_string(),
                input.to_string_lossy().into_owned(),
                "-o".to_string(),
                output.to_string_lossy().into_owned(),
            ],
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            previous: None,
        }
    }

    /// Expect the renderer to replace an existing artifact with this stamp
    pub fn replacing(mut self, previous: Option<ArtifactStamp>) -> Self {
        self.previous = previous;
        self
    }
}

/// Why a render attempt failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.diagnostic())]
pub struct RenderFailure {
    /// Captured standard error of the renderer, if it wrote any
    pub stderr: Option<String>,
    /// What went wrong from our side (spawn error, exit code, missing artifact)
    pub message: String,
}

impl RenderFailure {
    /// A failure on our side of the render step (directory creation, scratch
    /// writes, reading the artifact back), with no process output attached
    pub fn local(err: anyhow::Error) -> Self {
        Self {
            stderr: None,
            message: format!("{:#}", err),
        }
    }

    /// Stderr text and error message joined into one line of diagnostics
    pub fn diagnostic(&self) -> String {
        match self.stderr.as_deref().map(str::trim) {
            Some(stderr) if !stderr.is_empty() => format!("{}: {}", stderr, self.message),
            _ => self.message.clone(),
        }
    }
}

/// Path of the produced artifact, or what went wrong
pub type RenderOutcome = std::result::Result<PathBuf, RenderFailure>;

/// Run the renderer once and wait for it.
///
/// Success means a zero exit status and an artifact present at the expected
/// output path. There are no retries.
pub async fn render(invocation: &RenderInvocation) -> RenderOutcome {
    tracing::debug!(
        binary = %invocation.binary,
        args = ?invocation.args,
        "running renderer"
    );

    let output = Command::new(&invocation.binary)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| RenderFailure {
            stderr: None,
            message: if e.kind() == std::io::ErrorKind::NotFound {
                format!(
                    "Command '{}' not found. Please ensure it is installed and in your PATH.",
                    invocation.binary
                )
            } else {
                format!("Failed to start '{}': {}", invocation.binary, e)
            },
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stderr = (!stderr.is_empty()).then_some(stderr);

    if !output.status.success() {
        return Err(RenderFailure {
            stderr,
            message: format!(
                "Command '{}' failed with exit code {:?}",
                invocation.binary,
                output.status.code()
            ),
        });
    }

    match ArtifactStamp::read(&invocation.output_path).await {
        None => {
            return Err(RenderFailure {
                stderr,
                message: format!(
                    "Command '{}' exited successfully but produced no output at {}",
                    invocation.binary,
                    invocation.output_path.display()
                ),
            });
        }
        Some(stamp) if invocation.previous == Some(stamp) => {
            return Err(RenderFailure {
                stderr,
                message: format!(
                    "Command '{}' exited successfully but produced no output at {} (existing file left unchanged)",
                    invocation.binary,
                    invocation.output_path.display()
                ),
            });
        }
        Some(_) => {}
    }

    Ok(invocation.output_path.clone())
}
