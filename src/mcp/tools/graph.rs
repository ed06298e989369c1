//! generate_relationship_graph MCP Tool
//!
//! Renders caller-supplied Mermaid text with the diagram renderer and saves
//! the result.

use super::args::RelationshipGraphArgs;
use super::{output_dir_schema, ToolContext, ToolDefinition, ToolResult};
use crate::paths::{determine_save_path, MERMAID_PREFIX};
use crate::renderer::{self, RenderFailure, RenderInvocation};
use crate::scratch::ScratchScope;
use serde_json::json;

/// Get the tool definition for generate_relationship_graph
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_relationship_graph".to_string(),
        description: "Generate a relationship graph from Mermaid syntax text and save it.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["mermaid_text"],
            "properties": {
                "mermaid_text": {
                    "type": "string",
                    "description": "The Mermaid syntax text defining the graph."
                },
                "outputFormat": {
                    "type": "string",
                    "enum": ["svg", "png"],
                    "description": "The desired output format (svg or png). Defaults to svg.",
                    "default": "svg"
                },
                "outputDir": output_dir_schema(),
                "outputFilename": {
                    "type": "string",
                    "description": "Optional name for the output file. Defaults to mermaid-<timestamp>.<format>."
                }
            }
        }),
    }
}

/// Execute generate_relationship_graph
pub async fn execute(args: RelationshipGraphArgs, ctx: &ToolContext) -> ToolResult {
    let save = match determine_save_path(
        &ctx.config,
        args.output_dir.as_deref(),
        MERMAID_PREFIX,
        args.output_format.as_str(),
        args.output_filename.as_deref(),
    ) {
        Ok(save) => save,
        Err(e) => return ToolResult::error(format!("Error saving relationship graph: {:#}", e)),
    };
    let target = save.path();

    let mut scope = ScratchScope::new(&ctx.config.scratch_dir, "mermaid-save");
    let outcome = async {
        let existing = save.prepare().await.map_err(RenderFailure::local)?;
        let input = scope
            .write("mmd", &args.mermaid_text)
            .await
            .map_err(RenderFailure::local)?;
        let invocation = RenderInvocation::mermaid(&ctx.config.renderers.mmdc, &input, &target)
            .replacing(existing);
        renderer::render(&invocation).await
    }
    .await;

    match outcome {
        Ok(path) => ToolResult::text(format!(
            "Relationship graph successfully saved to: {}",
            path.display()
        )),
        Err(failure) => ToolResult::error(format!(
            "Error saving relationship graph to {}: {}",
            target.display(),
            failure
        )),
    }
}
