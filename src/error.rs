//! Protocol-level tool errors
//!
//! These abort a `tools/call` with a JSON-RPC error instead of a normal
//! result. Everything that goes wrong after validation (renderer, network,
//! extraction) is reported as an `isError` result and never becomes a
//! `ToolError`.

/// JSON-RPC 2.0: invalid JSON was received
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC 2.0: the message is not a valid request object
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC 2.0: method (or tool) does not exist
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC 2.0: invalid method parameters
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC 2.0: internal error
pub const INTERNAL_ERROR: i32 = -32603;

/// A tool call rejected before any side effect
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid args for {tool}: {reason}")]
    InvalidParams { tool: String, reason: String },

    #[error(
        "API key is required but not found. Provide it via arguments or set OPENAI_API_KEY env var in MCP settings."
    )]
    MissingCredential,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn invalid_params(tool: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidParams {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    /// JSON-RPC error code reported to the host
    pub fn code(&self) -> i32 {
        match self {
            ToolError::InvalidParams { .. } => INVALID_PARAMS,
            ToolError::MissingCredential => INTERNAL_ERROR,
            ToolError::UnknownTool(_) => METHOD_NOT_FOUND,
        }
    }
}
