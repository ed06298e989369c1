//! Argument validation for tool calls
//!
//! Turns the untyped `arguments` object of a `tools/call` into a
//! [`ToolRequest`]. Only shape is checked (field types and enum membership);
//! Markdown and Mermaid content is passed through untouched. Unknown fields
//! are ignored. An optional field may be left out but never set to `null`.

use crate::error::ToolError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub const GENERATE_MINDMAP: &str = "generate_mindmap";
pub const GENERATE_AND_SAVE_MINDMAP: &str = "generate_and_save_mindmap";
pub const GENERATE_RELATIONSHIP_GRAPH: &str = "generate_relationship_graph";
pub const GENERATE_KNOWLEDGE_GRAPH: &str = "generate_knowledge_graph";

/// Output formats of the mind-map renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MindmapFormat {
    #[default]
    Html,
    Svg,
}

impl MindmapFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MindmapFormat::Html => "html",
            MindmapFormat::Svg => "svg",
        }
    }
}

/// Output formats of the diagram renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Svg,
    Png,
}

impl GraphFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphFormat::Svg => "svg",
            GraphFormat::Png => "png",
        }
    }
}

/// `generate_mindmap`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapArgs {
    pub markdown: String,
    #[serde(default)]
    pub output_format: MindmapFormat,
}

/// `generate_and_save_mindmap`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMindmapArgs {
    pub markdown: String,
    #[serde(default)]
    pub output_format: MindmapFormat,
    #[serde(default, deserialize_with = "present")]
    pub output_dir: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub output_filename: Option<String>,
}

/// `generate_relationship_graph`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipGraphArgs {
    #[serde(rename = "mermaid_text")]
    pub mermaid_text: String,
    #[serde(default)]
    pub output_format: GraphFormat,
    #[serde(default, deserialize_with = "present")]
    pub output_dir: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub output_filename: Option<String>,
}

/// `generate_knowledge_graph`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGraphArgs {
    pub markdown: String,
    #[serde(default)]
    pub output_format: GraphFormat,
    #[serde(default, deserialize_with = "present")]
    pub output_dir: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub output_filename: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub api_key: Option<String>,
    #[serde(default, rename = "baseURL", deserialize_with = "present")]
    pub base_url: Option<String>,
}

/// A validated tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    GenerateMindmap(MindmapArgs),
    GenerateAndSaveMindmap(SaveMindmapArgs),
    GenerateRelationshipGraph(RelationshipGraphArgs),
    GenerateKnowledgeGraph(KnowledgeGraphArgs),
}

impl ToolRequest {
    /// Validate `arguments` for the tool called `name`
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolError> {
        match name {
            GENERATE_MINDMAP => parse_args(name, arguments).map(ToolRequest::GenerateMindmap),
            GENERATE_AND_SAVE_MINDMAP => {
                parse_args(name, arguments).map(ToolRequest::GenerateAndSaveMindmap)
            }
            GENERATE_RELATIONSHIP_GRAPH => {
                parse_args(name, arguments).map(ToolRequest::GenerateRelationshipGraph)
            }
            GENERATE_KNOWLEDGE_GRAPH => {
                parse_args(name, arguments).map(ToolRequest::GenerateKnowledgeGraph)
            }
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    /// Tool name this request was validated for
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::GenerateMindmap(_) => GENERATE_MINDMAP,
            ToolRequest::GenerateAndSaveMindmap(_) => GENERATE_AND_SAVE_MINDMAP,
            ToolRequest::GenerateRelationshipGraph(_) => GENERATE_RELATIONSHIP_GRAPH,
            ToolRequest::GenerateKnowledgeGraph(_) => GENERATE_KNOWLEDGE_GRAPH,
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: &Value) -> Result<T, ToolError> {
    if !arguments.is_object() {
        return Err(ToolError::invalid_params(tool, "arguments must be an object"));
    }
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolError::invalid_params(tool, e.to_string()))
}

/// Optional field that, when present, must hold a real value (`null` is rejected)
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid(name: &str, args: Value) -> String {
        match ToolRequest::parse(name, &args) {
            Err(ToolError::InvalidParams { tool, reason }) => {
                assert_eq!(tool, name);
                reason
            }
            other => panic!("expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_mindmap_defaults_to_html() {
        let req = ToolRequest::parse(GENERATE_MINDMAP, &json!({ "markdown": "# A\n- B" })).unwrap();
        assert_eq!(
            req,
            ToolRequest::GenerateMindmap(MindmapArgs {
                markdown: "# A\n- B".to_string(),
                output_format: MindmapFormat::Html,
            })
        );
    }

    #[test]
    fn test_mindmap_rejects_png() {
        let reason = invalid(
            GENERATE_MINDMAP,
            json!({ "markdown": "# A", "outputFormat": "png" }),
        );
        assert!(reason.contains("png"), "{}", reason);
    }

    #[test]
    fn test_markdown_is_required_and_must_be_string() {
        invalid(GENERATE_MINDMAP, json!({}));
        invalid(GENERATE_MINDMAP, json!({ "markdown": 42 }));
        invalid(GENERATE_KNOWLEDGE_GRAPH, json!({ "markdown": ["a"] }));
    }

    #[test]
    fn test_arguments_must_be_object() {
        let reason = invalid(GENERATE_MINDMAP, json!("# A"));
        assert_eq!(reason, "arguments must be an object");
        invalid(GENERATE_RELATIONSHIP_GRAPH, Value::Null);
    }

    #[test]
    fn test_save_mindmap_optional_fields() {
        let req = ToolRequest::parse(
            GENERATE_AND_SAVE_MINDMAP,
            &json!({
                "markdown": "# A",
                "outputFormat": "svg",
                "outputDir": "/tmp/maps",
                "outputFilename": "a.svg"
            }),
        )
        .unwrap();
        let ToolRequest::GenerateAndSaveMindmap(args) = req else {
            panic!("wrong variant");
        };
        assert_eq!(args.output_format, MindmapFormat::Svg);
        assert_eq!(args.output_dir.as_deref(), Some("/tmp/maps"));
        assert_eq!(args.output_filename.as_deref(), Some("a.svg"));

        invalid(
            GENERATE_AND_SAVE_MINDMAP,
            json!({ "markdown": "# A", "outputDir": 7 }),
        );
    }

    #[test]
    fn test_relationship_graph_shape() {
        let req = ToolRequest::parse(
            GENERATE_RELATIONSHIP_GRAPH,
            &json!({ "mermaid_text": "graph TD; A-->B" }),
        )
        .unwrap();
        let ToolRequest::GenerateRelationshipGraph(args) = req else {
            panic!("wrong variant");
        };
        assert_eq!(args.output_format, GraphFormat::Svg);
        assert!(args.output_dir.is_none());

        invalid(GENERATE_RELATIONSHIP_GRAPH, json!({ "mermaidText": "graph TD" }));
        invalid(
            GENERATE_RELATIONSHIP_GRAPH,
            json!({ "mermaid_text": "graph TD", "outputFormat": "html" }),
        );
    }

    #[test]
    fn test_knowledge_graph_all_fields() {
        let req = ToolRequest::parse(
            GENERATE_KNOWLEDGE_GRAPH,
            &json!({
                "markdown": "# Ada",
                "outputFormat": "png",
                "prompt": "p",
                "model": "gpt-4o",
                "apiKey": "sk-1",
                "baseURL": "http://localhost/v1"
            }),
        )
        .unwrap();
        let ToolRequest::GenerateKnowledgeGraph(args) = req else {
            panic!("wrong variant");
        };
        assert_eq!(args.output_format, GraphFormat::Png);
        assert_eq!(args.prompt.as_deref(), Some("p"));
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
        assert_eq!(args.api_key.as_deref(), Some("sk-1"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost/v1"));

        invalid(GENERATE_KNOWLEDGE_GRAPH, json!({ "markdown": "# A", "apiKey": true }));
    }

    #[test]
    fn test_null_optionals_are_rejected() {
        invalid(GENERATE_MINDMAP, json!({ "markdown": "# A", "outputFormat": null }));
        invalid(
            GENERATE_AND_SAVE_MINDMAP,
            json!({ "markdown": "# A", "outputDir": null }),
        );
        invalid(
            GENERATE_RELATIONSHIP_GRAPH,
            json!({ "mermaid_text": "graph TD", "outputFilename": null }),
        );
        for field in ["prompt", "model", "apiKey", "baseURL", "outputFormat"] {
            let mut args = json!({ "markdown": "# A" });
            args[field] = Value::Null;
            let reason = invalid(GENERATE_KNOWLEDGE_GRAPH, args);
            assert!(reason.contains("null"), "{}: {}", field, reason);
        }
    }

    #[test]
    fn test_absent_optionals_take_defaults() {
        let req = ToolRequest::parse(GENERATE_KNOWLEDGE_GRAPH, &json!({ "markdown": "# A" })).unwrap();
        let ToolRequest::GenerateKnowledgeGraph(args) = req else {
            panic!("wrong variant");
        };
        assert_eq!(args.output_format, GraphFormat::Svg);
        assert!(args.model.is_none());
        assert!(args.base_url.is_none());
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolRequest::parse("draw_cat", &json!({})).unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("draw_cat".to_string()));
    }
}
