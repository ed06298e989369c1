// mindmap-mcp - Mind map and diagram generation for AI assistants
// An MCP tool server that drives markmap, mermaid-cli and an LLM completion API

pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod mcp;
pub mod paths;
pub mod renderer;
pub mod scratch;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::ToolError;
pub use mcp::tools::{ToolRegistry, ToolResult};
pub use mcp::McpServer;
