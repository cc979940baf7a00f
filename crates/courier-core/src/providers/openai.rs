//! OpenAI-compatible Chat Completions provider
//!
//! Works against the official API and any OpenAI-compatible endpoint, so the
//! API key is optional (local gateways often run without one).

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::types::LlmProvider;

/// Chat Completions client. `base_url` should include the API prefix,
/// e.g. `https://api.openai.com/v1`.
pub struct OpenAiProvider {
    http: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiProvider {
    pub fn new(model: &str, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Requesting completion from {} ({})", url, self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let mut req = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("Failed to reach chat completions API at {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Chat completions error: HTTP {} — {}", status, detail));
        }

        let value: Value = resp
            .json()
            .await
            .context("Failed to parse chat completions response")?;
        extract_reply_text(&value)
    }
}

/// Pull the first choice's message content out of a completions response.
fn extract_reply_text(value: &Value) -> Result<String> {
    value
        .get("choices")
        .and_then(|choices| choices.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|text| text.to_string())
        .ok_or_else(|| anyhow!("Completions response contains no message content"))
}
