//! generate_knowledge_graph MCP Tool

use super::args::KnowledgeGraphArgs;
use super::{output_dir_schema, ToolContext, ToolDefinition, ToolResult};
use crate::config::DEFAULT_MODEL;
use crate::error::ToolError;
use crate::knowledge::{KnowledgeGraphJob, KnowledgeGraphPipeline, LlmSettings};
use crate::paths::{determine_save_path, KNOWLEDGE_GRAPH_PREFIX};
use serde_json::json;

/// Get the tool definition for generate_knowledge_graph
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_knowledge_graph".to_string(),
        description: "Analyzes Markdown text using an AI model to generate and save a knowledge graph (Mermaid format). Supports OpenAI-compatible APIs.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["markdown"],
            "properties": {
                "markdown": {
                    "type": "string",
                    "description": "The Markdown text to analyze."
                },
                "outputFormat": {
                    "type": "string",
                    "enum": ["svg", "png"],
                    "description": "Output format (svg/png). Defaults to svg.",
                    "default": "svg"
                },
                "outputDir": output_dir_schema(),
                "outputFilename": {
                    "type": "string",
                    "description": "Optional name for the output file. Defaults to knowledge-graph-<timestamp>.<format>."
                },
                "prompt": {
                    "type": "string",
                    "description": "Optional custom prompt for the AI model."
                },
                "model": {
                    "type": "string",
                    "description": format!("Optional AI model name. Defaults to {}.", DEFAULT_MODEL),
                    "default": DEFAULT_MODEL
                },
                "apiKey": {
                    "type": "string",
                    "description": "Optional API key. Overrides OPENAI_API_KEY env var."
                },
                "baseURL": {
                    "type": "string",
                    "description": "Optional API base URL. Overrides OPENAI_BASE_URL env var."
                }
            }
        }),
    }
}

/// Execute generate_knowledge_graph.
///
/// A missing API key is a protocol error raised before any network call;
/// every later failure becomes an `isError` result.
pub async fn execute(args: KnowledgeGraphArgs, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
    let settings = LlmSettings::resolve(
        args.api_key.as_deref(),
        args.base_url.as_deref(),
        args.model.as_deref(),
        &ctx.config.llm,
    )?;

    let save = match determine_save_path(
        &ctx.config,
        args.output_dir.as_deref(),
        KNOWLEDGE_GRAPH_PREFIX,
        args.output_format.as_str(),
        args.output_filename.as_deref(),
    ) {
        Ok(save) => save,
        Err(e) => {
            return Ok(ToolResult::error(format!(
                "Error generating knowledge graph using AI model {}: {:#}",
                settings.model, e
            )))
        }
    };

    let job = KnowledgeGraphJob {
        markdown: args.markdown,
        prompt: args.prompt,
        settings,
        save,
    };
    let pipeline = KnowledgeGraphPipeline::new(
        ctx.completions.as_ref(),
        &ctx.config.renderers.mmdc,
        &ctx.config.scratch_dir,
    );

    Ok(match pipeline.run(&job).await {
        Ok(path) => ToolResult::text(format!(
            "Knowledge graph successfully generated and saved to: {}",
            path.display()
        )),
        Err(e) => ToolResult::error(e.to_string()),
    })
}
