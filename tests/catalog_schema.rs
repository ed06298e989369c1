//! The advertised input schemas must agree with argument validation
//!
//! Anything the validator accepts has to pass the catalog schema, otherwise a
//! host building calls from `tools/list` could never produce it.

use mindmap_mcp::mcp::tools::ToolRequest;
use mindmap_mcp::ToolRegistry;
use serde_json::{json, Value};

fn schema_for(name: &str) -> Value {
    ToolRegistry::new()
        .list_tools()
        .into_iter()
        .find(|t| t["name"] == name)
        .unwrap_or_else(|| panic!("tool {} not advertised", name))["inputSchema"]
        .clone()
}

fn assert_agree(name: &str, args: Value, expect_valid: bool) {
    let schema = schema_for(name);
    let validator = jsonschema::validator_for(&schema).unwrap();

    assert_eq!(
        validator.is_valid(&args),
        expect_valid,
        "schema disagreement for {} with {}",
        name,
        args
    );
    assert_eq!(
        ToolRequest::parse(name, &args).is_ok(),
        expect_valid,
        "validator disagreement for {} with {}",
        name,
        args
    );
}

#[test]
fn test_generate_mindmap_schema() {
    assert_agree("generate_mindmap", json!({ "markdown": "# A\n- B" }), true);
    assert_agree("generate_mindmap", json!({ "markdown": "# A", "outputFormat": "svg" }), true);
    assert_agree("generate_mindmap", json!({ "markdown": "# A", "outputFormat": "png" }), false);
    assert_agree("generate_mindmap", json!({ "outputFormat": "html" }), false);
}

#[test]
fn test_generate_and_save_mindmap_schema() {
    assert_agree(
        "generate_and_save_mindmap",
        json!({ "markdown": "# A", "outputDir": "/tmp", "outputFilename": "a.html" }),
        true,
    );
    assert_agree(
        "generate_and_save_mindmap",
        json!({ "markdown": "# A", "outputFilename": 3 }),
        false,
    );
}

#[test]
fn test_generate_relationship_graph_schema() {
    assert_agree(
        "generate_relationship_graph",
        json!({ "mermaid_text": "graph TD; A-->B", "outputFormat": "png" }),
        true,
    );
    assert_agree("generate_relationship_graph", json!({ "markdown": "# A" }), false);
    assert_agree(
        "generate_relationship_graph",
        json!({ "mermaid_text": "graph TD", "outputFormat": "html" }),
        false,
    );
}

#[test]
fn test_generate_knowledge_graph_schema() {
    assert_agree(
        "generate_knowledge_graph",
        json!({
            "markdown": "# Ada",
            "outputFormat": "svg",
            "prompt": "Only people",
            "model": "gpt-4o-mini",
            "apiKey": "sk-test",
            "baseURL": "http://localhost:11434/v1"
        }),
        true,
    );
    assert_agree(
        "generate_knowledge_graph",
        json!({ "markdown": "# Ada", "model": 4 }),
        false,
    );
}

#[test]
fn test_null_optionals_rejected_by_both() {
    assert_agree(
        "generate_mindmap",
        json!({ "markdown": "# A", "outputFormat": null }),
        false,
    );
    assert_agree(
        "generate_and_save_mindmap",
        json!({ "markdown": "# A", "outputFormat": null }),
        false,
    );
    assert_agree(
        "generate_and_save_mindmap",
        json!({ "markdown": "# A", "outputDir": null }),
        false,
    );
    assert_agree(
        "generate_relationship_graph",
        json!({ "mermaid_text": "graph TD", "outputFilename": null }),
        false,
    );
    for field in ["outputFormat", "outputDir", "outputFilename", "prompt", "model", "apiKey", "baseURL"] {
        let mut args = json!({ "markdown": "# Ada" });
        args[field] = Value::Null;
        assert_agree("generate_knowledge_graph", args, false);
    }
}
