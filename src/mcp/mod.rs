//! MCP (Model Context Protocol) Server for mind maps and diagrams
//!
//! Exposes diagram generation to an AI-assistant host over stdio.
//!
//! ## Tools
//! - `generate_mindmap` - Render Markdown as a mind map and return it
//! - `generate_and_save_mindmap` - Render Markdown as a mind map and save it
//! - `generate_relationship_graph` - Render Mermaid text and save it
//! - `generate_knowledge_graph` - Derive a Mermaid graph with an LLM and save it

pub mod server;
pub mod tools;

pub use server::McpServer;
