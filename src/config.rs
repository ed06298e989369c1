//! Server configuration
//!
//! A single snapshot of the environment taken at start-up. Requests only ever
//! read it; anything request-specific (save paths, LLM credentials) is
//! resolved from the call arguments first and falls back to these values.

use std::path::{Path, PathBuf};

/// Environment variable naming the default save directory
pub const ENV_DEFAULT_SAVE_DIR: &str = "MINDMAP_DEFAULT_SAVE_DIR";
/// Environment variable holding the default API key
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the default completion endpoint
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable holding the default model id
pub const ENV_DEFAULT_MODEL: &str = "OPENAI_DEFAULT_MODEL";
/// Environment variable overriding the mind-map renderer binary
pub const ENV_MARKMAP_BIN: &str = "MINDMAP_MARKMAP_BIN";
/// Environment variable overriding the diagram renderer binary
pub const ENV_MMDC_BIN: &str = "MINDMAP_MMDC_BIN";

/// Model used when neither the call nor the environment names one
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Endpoint used when neither the call nor the environment names one
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_MARKMAP_BIN: &str = "markmap";
const DEFAULT_MMDC_BIN: &str = "mmdc";

/// Read-only configuration shared by every request
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `MINDMAP_DEFAULT_SAVE_DIR`, if set
    pub default_save_dir: Option<PathBuf>,

    /// Fallback save directory when no other directory is configured
    pub home_dir: PathBuf,

    /// Where per-request scratch files are created
    pub scratch_dir: PathBuf,

    /// Defaults for the knowledge-graph completion call
    pub llm: LlmDefaults,

    /// External renderer binaries
    pub renderers: RendererConfig,
}

/// Environment-level defaults for the completion endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmDefaults {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Names (or paths) of the external rendering programs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Mind-map renderer, invoked as `<bin> <input> --output <output>`
    pub markmap: String,

    /// Diagram renderer, invoked as `<bin> -i <input> -o <output>`
    pub mmdc: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            markmap: DEFAULT_MARKMAP_BIN.to_string(),
            mmdc: DEFAULT_MMDC_BIN.to_string(),
        }
    }
}

impl RendererConfig {
    /// Resolve a renderer binary, preferring a project-local
    /// `node_modules/.bin/<name>` under `project_root` when one exists.
    ///
    /// Explicit paths (anything containing a separator) are returned as-is.
    pub fn resolve_binary(name: &str, project_root: &Path) -> String {
        if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
            return name.to_string();
        }

        let local = project_root.join("node_modules").join(".bin").join(name);
        if local.is_file() {
            return local.to_string_lossy().into_owned();
        }

        name.to_string()
    }
}

impl ServerConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let markmap = get(ENV_MARKMAP_BIN).unwrap_or_else(|| DEFAULT_MARKMAP_BIN.to_string());
        let mmdc = get(ENV_MMDC_BIN).unwrap_or_else(|| DEFAULT_MMDC_BIN.to_string());

        Self {
            default_save_dir: get(ENV_DEFAULT_SAVE_DIR).map(PathBuf::from),
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            scratch_dir: std::env::temp_dir(),
            llm: LlmDefaults {
                api_key: get(ENV_API_KEY),
                base_url: get(ENV_BASE_URL),
                model: get(ENV_DEFAULT_MODEL),
            },
            renderers: RendererConfig {
                markmap: RendererConfig::resolve_binary(&markmap, &project_root),
                mmdc: RendererConfig::resolve_binary(&mmdc, &project_root),
            },
        }
    }

    /// Override the mind-map renderer binary
    pub fn with_markmap_bin(mut self, bin: impl Into<String>) -> Self {
        self.renderers.markmap = bin.into();
        self
    }

    /// Override the diagram renderer binary
    pub fn with_mmdc_bin(mut self, bin: impl Into<String>) -> Self {
        self.renderers.mmdc = bin.into();
        self
    }
}
