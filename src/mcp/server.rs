//! MCP Server implementation using JSON-RPC 2.0 over stdio
//!
//! Implements the minimal MCP protocol:
//! - `initialize` - Return server info and capabilities
//! - `tools/list` - Return available tool definitions
//! - `tools/call` - Execute a tool and return result
//! - `ping` - Liveness check
//!
//! Every incoming line is handled on its own task so slow renders or model
//! calls never block other requests. Responses go through a single writer so
//! lines on stdout never interleave.

use crate::config::ServerConfig;
use crate::error::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::llm::{CompletionClient, OpenAiClient};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use super::tools::{ToolContext, ToolRegistry};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";
/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "mindmap-server";

/// MCP Server for handling JSON-RPC requests over stdio
pub struct McpServer {
    tool_registry: ToolRegistry,
    context: ToolContext,
}

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<i32> {
        self.error.as_ref().map(|e| e.code)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn id(&self) -> &Value {
        &self.id
    }
}

type HandlerResult = std::result::Result<Value, (i32, String)>;

impl McpServer {
    /// Create a server backed by the OpenAI-compatible HTTP client
    pub fn new(config: ServerConfig) -> Self {
        Self::with_client(config, Arc::new(OpenAiClient::new()))
    }

    /// Create a server with an explicit completion backend
    pub fn with_client(config: ServerConfig, completions: Arc<dyn CompletionClient>) -> Self {
        Self {
            tool_registry: ToolRegistry::new(),
            context: ToolContext {
                config: Arc::new(config),
                completions,
            },
        }
    }

    /// Tool catalog as advertised by `tools/list`
    pub fn list_tools(&self) -> Vec<Value> {
        self.tool_registry.list_tools()
    }

    /// Run the MCP server, reading from stdin and writing to stdout.
    ///
    /// Returns on end of input or Ctrl-C, after in-flight requests finish.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_vec(&response)?;
                line.push(b'\n');
                stdout.write_all(&line).await?;
                stdout.flush().await?;
            }
            Ok::<(), anyhow::Error>(())
        });

        tracing::info!("Mindmap MCP server running on stdio");

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let line = tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "read error");
                        break;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("interrupt received, shutting down");
                    break;
                }
            };

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    let _ = tx.send(response);
                }
            });
        }

        drop(tx);
        writer.await??;

        tracing::info!("server stopped");
        Ok(())
    }

    /// Handle a single JSON-RPC message.
    ///
    /// Notifications (no `id`) are processed but produce no response.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        // Valid JSON that is not a request object
        let request: JsonRpcRequest = match serde_json::from_value(message.clone()) {
            Ok(r) => r,
            Err(e) => {
                let id = message.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                ));
            }
        };

        // Validate jsonrpc version
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "Invalid JSON-RPC version".to_string(),
            ));
        }

        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&request.params).await,
            _ => Err((
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err((code, message)) => JsonRpcResponse::failure(id, code, message),
        })
    }

    /// Handle `initialize` request
    fn handle_initialize(&self, _params: &Option<Value>) -> HandlerResult {
        Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "resources": {},
                "tools": {}
            }
        }))
    }

    /// Handle `tools/list` request
    fn handle_tools_list(&self) -> HandlerResult {
        let tools = self.tool_registry.list_tools();
        Ok(json!({ "tools": tools }))
    }

    /// Handle `tools/call` request
    async fn handle_tools_call(&self, params: &Option<Value>) -> HandlerResult {
        let params = params
            .as_ref()
            .ok_or((INVALID_PARAMS, "Missing params".to_string()))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?;

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        tracing::info!(tool = name, "calling tool");

        match self
            .tool_registry
            .call_tool(name, &arguments, &self.context)
            .await
        {
            Ok(result) => serde_json::to_value(result)
                .map_err(|e| (crate::error::INTERNAL_ERROR, e.to_string())),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call rejected");
                Err((e.code(), e.to_string()))
            }
        }
    }
}
