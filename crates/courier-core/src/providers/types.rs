//! Provider-agnostic LLM interface

use anyhow::Result;
use async_trait::async_trait;

/// Trait that all LLM providers implement.
///
/// The rest of the workspace depends only on this trait, so executors are
/// testable with scripted providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic", "openai")
    fn provider_name(&self) -> &str;

    /// Model identifier (e.g. "claude-sonnet-4-5", "gpt-4o")
    fn model(&self) -> &str;

    /// Generate a single natural-language reply to `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
