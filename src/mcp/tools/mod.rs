//! MCP Tool Registry and Implementations
//!
//! Four tools are advertised:
//! - `generate_mindmap` - render Markdown with the mind-map renderer and return the file content
//! - `generate_and_save_mindmap` - same, but save the file and return its path
//! - `generate_relationship_graph` - render Mermaid text to an SVG/PNG file
//! - `generate_knowledge_graph` - let a language model write the Mermaid, then render it
//!
//! A call is validated into a [`ToolRequest`] before anything touches disk or
//! network. Validation and credential problems come back as [`ToolError`];
//! every later failure is folded into a [`ToolResult`] with `isError` set.

pub mod args;
pub mod graph;
pub mod knowledge;
pub mod mindmap;

use crate::config::ServerConfig;
use crate::error::ToolError;
use crate::llm::CompletionClient;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub use args::ToolRequest;

/// Registry of available MCP tools
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

/// Tool definition for MCP protocol
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Shared, read-only collaborators handed to every tool call
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<ServerConfig>,
    pub completions: Arc<dyn CompletionClient>,
}

/// One text block of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Result returned to the host for every handled tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    /// Successful result carrying `text`
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: text.into(),
            }],
            is_error: None,
        }
    }

    /// Handled failure carrying a diagnostic
    pub fn error(text: impl Into<String>) -> Self {
        let text = text.into();
        tracing::error!("{}", text);
        Self {
            is_error: Some(true),
            ..Self::text(text)
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

impl ToolRegistry {
    /// Create a new tool registry with all available tools
    pub fn new() -> Self {
        Self {
            tools: vec![
                mindmap::definition(),
                mindmap::save_definition(),
                graph::definition(),
                knowledge::definition(),
            ],
        }
    }

    /// List all available tools in MCP format
    pub fn list_tools(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Validate and run a tool call
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: &Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let request = ToolRequest::parse(name, arguments)?;
        tracing::info!(tool = request.tool_name(), "tool call validated");

        match request {
            ToolRequest::GenerateMindmap(args) => Ok(mindmap::execute(args, ctx).await),
            ToolRequest::GenerateAndSaveMindmap(args) => Ok(mindmap::execute_save(args, ctx).await),
            ToolRequest::GenerateRelationshipGraph(args) => Ok(graph::execute(args, ctx).await),
            ToolRequest::GenerateKnowledgeGraph(args) => knowledge::execute(args, ctx).await,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema fragment shared by the save-to-disk tools
pub(crate) fn output_dir_schema() -> Value {
    json!({
        "type": "string",
        "description": "Optional directory to save the output file. Defaults based on env var or home dir."
    })
}
