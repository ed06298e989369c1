//! OpenAI-compatible chat completion client

use super::{CompletionClient, CompletionFailure, CompletionOutcome, CompletionRequest};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Client for `POST {base_url}/chat/completions`.
///
/// Holds only the connection pool; credentials, endpoint and model travel
/// with each [`CompletionRequest`].
#[derive(Debug, Clone, Default)]
pub struct OpenAiClient {
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> CompletionOutcome {
        let url = chat_completions_url(&request.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&request.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| CompletionFailure::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CompletionFailure::Malformed(e.to_string()))?;

        parse_response(&body)
    }
}

/// Join the base URL and the completions path, tolerating a trailing slash
pub fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Request payload: system message, user message, model, temperature
pub fn request_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "temperature": request.temperature,
        "messages": [
            { "role": "system", "content": request.system_prompt },
            { "role": "user", "content": request.user_content }
        ]
    })
}

/// Pull `choices[0].message.content` out of a response body
pub fn parse_response(body: &Value) -> CompletionOutcome {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.to_string())
        .ok_or(CompletionFailure::Empty)
}
