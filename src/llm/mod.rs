//! Completion endpoint access
//!
//! The knowledge-graph pipeline talks to a language model through the
//! [`CompletionClient`] trait. [`openai::OpenAiClient`] is the production
//! implementation for any OpenAI-compatible `/chat/completions` endpoint.

pub mod extract;
pub mod openai;

use async_trait::async_trait;

pub use extract::{extract_mermaid, ExtractedDiagram};
pub use openai::OpenAiClient;

/// Sampling temperature for structural output
pub const COMPLETION_TEMPERATURE: f32 = 0.3;

/// One chat-style completion call, fully resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_content: String,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
}

/// Text of the primary choice, or the provider's reason for failing
pub type CompletionOutcome = std::result::Result<String, CompletionFailure>;

/// The completion call failed or returned nothing usable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionFailure {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse API response: {0}")]
    Malformed(String),

    #[error("AI model did not return a valid response.")]
    Empty,
}

/// A single-shot completion backend. Not retried, not cached.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionOutcome;
}
