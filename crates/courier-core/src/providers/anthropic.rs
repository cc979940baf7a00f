//! Anthropic Messages API provider

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::types::LlmProvider;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Direct integration with the Anthropic Messages API via `reqwest`.
pub struct AnthropicProvider {
    http: Client,
    model: String,
    base_url: String,
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(model: &str, base_url: &str, api_key: String) -> Self {
        Self {
            http: Client::new(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!("Requesting completion from {} ({})", url, self.model);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach Anthropic API at {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Anthropic API error: HTTP {} — {}", status, detail));
        }

        let value: Value = resp
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;
        extract_reply_text(&value)
    }
}

/// Pull the first text block out of a Messages API response.
fn extract_reply_text(value: &Value) -> Result<String> {
    let blocks = value
        .get("content")
        .and_then(|content| content.as_array())
        .ok_or_else(|| anyhow!("Anthropic response has no content blocks"))?;

    blocks
        .iter()
        .find(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        .and_then(|block| block.get("text").and_then(|t| t.as_str()))
        .map(|text| text.to_string())
        .ok_or_else(|| anyhow!("Anthropic response contains no text block"))
}
