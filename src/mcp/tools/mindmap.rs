//! generate_mindmap / generate_and_save_mindmap MCP Tools
//!
//! Both write the Markdown to a scratch file and run the mind-map renderer.
//! The direct variant renders into a scratch output and returns its text; the
//! save variant renders straight into the resolved save path.

use super::args::{MindmapFormat, MindmapArgs, SaveMindmapArgs};
use super::{output_dir_schema, ToolContext, ToolDefinition, ToolResult};
use crate::paths::{determine_save_path, MINDMAP_PREFIX};
use crate::renderer::{self, RenderFailure, RenderInvocation};
use crate::scratch::ScratchScope;
use serde_json::json;

fn format_schema() -> serde_json::Value {
    json!({
        "type": "string",
        "enum": ["html", "svg"],
        "description": "The desired output format (html or svg). Defaults to html.",
        "default": "html"
    })
}

/// Get the tool definition for generate_mindmap
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_mindmap".to_string(),
        description: "Generate a mind map from Markdown text using markmap-cli and return the content.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["markdown"],
            "properties": {
                "markdown": {
                    "type": "string",
                    "description": "The Markdown content for the mind map."
                },
                "outputFormat": format_schema()
            }
        }),
    }
}

/// Get the tool definition for generate_and_save_mindmap
pub fn save_definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_and_save_mindmap".to_string(),
        description: "Generate a mind map from Markdown and save it to a specified directory.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["markdown"],
            "properties": {
                "markdown": {
                    "type": "string",
                    "description": "The Markdown content for the mind map."
                },
                "outputFormat": format_schema(),
                "outputDir": output_dir_schema(),
                "outputFilename": {
                    "type": "string",
                    "description": "Optional name for the output file. Defaults to markmap-<timestamp>.<format>."
                }
            }
        }),
    }
}

/// Execute generate_mindmap: render and return the rendered file's text
pub async fn execute(args: MindmapArgs, ctx: &ToolContext) -> ToolResult {
    let mut scope = ScratchScope::new(&ctx.config.scratch_dir, "markmap");

    match render_to_text(&mut scope, &args.markdown, args.output_format, ctx).await {
        Ok(content) => ToolResult::text(content),
        Err(failure) => ToolResult::error(format!("Error generating mind map: {}", failure)),
    }
}

async fn render_to_text(
    scope: &mut ScratchScope,
    markdown: &str,
    format: MindmapFormat,
    ctx: &ToolContext,
) -> Result<String, RenderFailure> {
    let input = scope.write("md", markdown).await.map_err(RenderFailure::local)?;
    let output = scope.reserve(format.as_str());

    let invocation = RenderInvocation::markmap(&ctx.config.renderers.markmap, &input, &output);
    let rendered = renderer::render(&invocation).await?;

    tokio::fs::read_to_string(&rendered).await.map_err(|e| RenderFailure {
        stderr: None,
        message: format!("Failed to read rendered output {}: {}", rendered.display(), e),
    })
}

/// Execute generate_and_save_mindmap: render into the resolved save path
pub async fn execute_save(args: SaveMindmapArgs, ctx: &ToolContext) -> ToolResult {
    let format = args.output_format.as_str();
    let save = match determine_save_path(
        &ctx.config,
        args.output_dir.as_deref(),
        MINDMAP_PREFIX,
        format,
        args.output_filename.as_deref(),
    ) {
        Ok(save) => save,
        Err(e) => return ToolResult::error(format!("Error saving mind map: {:#}", e)),
    };
    let target = save.path();

    let mut scope = ScratchScope::new(&ctx.config.scratch_dir, "markmap-save");
    let outcome = async {
        let existing = save.prepare().await.map_err(RenderFailure::local)?;
        let input = scope
            .write("md", &args.markdown)
            .await
            .map_err(RenderFailure::local)?;
        let invocation =
            RenderInvocation::markmap(&ctx.config.renderers.markmap, &input, &target)
                .replacing(existing);
        renderer::render(&invocation).await
    }
    .await;

    match outcome {
        Ok(path) => ToolResult::text(format!(
            "Mind map successfully saved to: {}",
            path.display()
        )),
        Err(failure) => ToolResult::error(format!(
            "Error saving mind map to {}: {}",
            target.display(),
            failure
        )),
    }
}
