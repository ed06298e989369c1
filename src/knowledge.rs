//! Knowledge-graph synthesis
//!
//! Markdown goes to a language model with instructions to answer with a single
//! Mermaid block; the block is extracted and rendered with the diagram
//! renderer. Stages run strictly one after the other:
//!
//! 1. credential resolution ([`LlmSettings::resolve`], before any I/O)
//! 2. prompt construction ([`system_prompt`])
//! 3. completion call
//! 4. extraction, then rendering through a fresh [`ScratchScope`]
//!
//! Each stage after the first fails with its own [`KnowledgeGraphError`]
//! variant carrying whatever is useful for diagnosis.

use crate::config::{LlmDefaults, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::ToolError;
use crate::llm::{
    extract_mermaid, CompletionClient, CompletionFailure, CompletionRequest,
    COMPLETION_TEMPERATURE,
};
use crate::paths::SavePathSpec;
use crate::renderer::{self, RenderFailure, RenderInvocation};
use crate::scratch::ScratchScope;
use std::path::{Path, PathBuf};

/// Instructions used when the caller does not supply a prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "Analyze the following Markdown text. Identify the key entities (people, software, concepts) and their relationships. Generate Mermaid code (using 'graph LR' or 'graph TD') to represent this as a knowledge graph.
Key requirements for the Mermaid code:
1.  Represent entities as nodes. Use appropriate node shapes (e.g., ((circle)) for people/concepts, [rectangle] for software/servers). Define node IDs clearly (e.g., Roo, mindmap_server).
2.  Represent relationships using arrows. **Crucially, relationship labels MUST be placed on the arrow using the format: -->|Relationship Label| -->**. Do NOT use --> \"Relationship Label\" -->.
3.  Ensure the output contains ONLY the Mermaid code block (starting with ```mermaid and ending with ```) and absolutely nothing else before or after it.";

/// Completion settings for one request, resolved argument > environment > default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmSettings {
    /// Resolve settings for a call. Fails with
    /// [`ToolError::MissingCredential`] when no key is available anywhere.
    pub fn resolve(
        api_key: Option<&str>,
        base_url: Option<&str>,
        model: Option<&str>,
        defaults: &LlmDefaults,
    ) -> Result<Self, ToolError> {
        fn pick(arg: Option<&str>, fallback: Option<&String>) -> Option<String> {
            arg.filter(|v| !v.is_empty())
                .map(str::to_string)
                .or_else(|| fallback.filter(|v| !v.is_empty()).cloned())
        }

        let api_key =
            pick(api_key, defaults.api_key.as_ref()).ok_or(ToolError::MissingCredential)?;

        Ok(Self {
            api_key,
            base_url: pick(base_url, defaults.base_url.as_ref())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: pick(model, defaults.model.as_ref())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

/// Caller prompt verbatim if given, else [`DEFAULT_SYSTEM_PROMPT`]
pub fn system_prompt(custom: Option<&str>) -> &str {
    custom
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

/// Everything one knowledge-graph run needs, already validated
#[derive(Debug, Clone)]
pub struct KnowledgeGraphJob {
    pub markdown: String,
    pub prompt: Option<String>,
    pub settings: LlmSettings,
    pub save: SavePathSpec,
}

/// Stage failures after credentials were resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnowledgeGraphError {
    #[error("Error generating knowledge graph using AI model {model}: {source}")]
    Completion {
        model: String,
        source: CompletionFailure,
    },

    #[error("Error generating knowledge graph using AI model {model}: Could not extract Mermaid code from AI response. Response was:\n{raw}")]
    Extraction { model: String, raw: String },

    #[error("Error rendering/saving generated knowledge graph to {}: {failure}\n\nGenerated Mermaid Code:\n{mermaid}", .path.display())]
    Render {
        path: PathBuf,
        failure: RenderFailure,
        mermaid: String,
    },
}

/// Runs [`KnowledgeGraphJob`]s against a completion backend and the diagram renderer
pub struct KnowledgeGraphPipeline<'a> {
    client: &'a dyn CompletionClient,
    mmdc: &'a str,
    scratch_dir: &'a Path,
}

impl<'a> KnowledgeGraphPipeline<'a> {
    pub fn new(client: &'a dyn CompletionClient, mmdc: &'a str, scratch_dir: &'a Path) -> Self {
        Self {
            client,
            mmdc,
            scratch_dir,
        }
    }

    /// Generate, extract and render. Returns the saved artifact path.
    pub async fn run(&self, job: &KnowledgeGraphJob) -> Result<PathBuf, KnowledgeGraphError> {
        let model = job.settings.model.clone();
        let request = CompletionRequest {
            system_prompt: system_prompt(job.prompt.as_deref()).to_string(),
            user_content: job.markdown.clone(),
            model: model.clone(),
            api_key: job.settings.api_key.clone(),
            base_url: job.settings.base_url.clone(),
            temperature: COMPLETION_TEMPERATURE,
        };

        tracing::info!(
            model = %request.model,
            base_url = %request.base_url,
            "calling AI API to generate Mermaid code"
        );
        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|source| KnowledgeGraphError::Completion {
                model: model.clone(),
                source,
            })?;
        tracing::info!("AI response received");

        let diagram = match extract_mermaid(&response) {
            Ok(Some(diagram)) => diagram,
            Ok(None) | Err(_) => {
                tracing::error!(response = %response, "could not extract Mermaid code from AI response");
                return Err(KnowledgeGraphError::Extraction {
                    model,
                    raw: response,
                });
            }
        };
        tracing::debug!(mermaid = %diagram.text, "extracted Mermaid code");

        let path = job.save.path();
        self.render(&diagram.text, &job.save)
            .await
            .map_err(|failure| KnowledgeGraphError::Render {
                path: path.clone(),
                failure,
                mermaid: diagram.text.clone(),
            })
    }

    async fn render(&self, mermaid: &str, save: &SavePathSpec) -> renderer::RenderOutcome {
        let mut scope = ScratchScope::new(self.scratch_dir, "kg-mermaid");

        let existing = save.prepare().await.map_err(RenderFailure::local)?;
        let input = scope.write("mmd", mermaid).await.map_err(RenderFailure::local)?;
        let invocation =
            RenderInvocation::mermaid(self.mmdc, &input, &save.path()).replacing(existing);
        renderer::render(&invocation).await
    }
}
