//! LLM provider abstraction
//!
//! The agent consumes a "generate reply" capability as a black box. Providers
//! implement the [`LlmProvider`] trait; [`select_provider`] builds the one
//! named by the validated [`ProviderConfig`].

use std::sync::Arc;

use crate::config::{ProviderConfig, ProviderKind};

pub mod anthropic;
pub mod openai;
pub mod types;

pub use types::LlmProvider;

/// Build the configured provider.
pub fn select_provider(config: &ProviderConfig) -> Arc<dyn LlmProvider> {
    match config.provider {
        ProviderKind::OpenAi => Arc::new(openai::OpenAiProvider::new(
            &config.model,
            &config.base_url,
            config.api_key.clone(),
        )),
        ProviderKind::Anthropic => Arc::new(anthropic::AnthropicProvider::new(
            &config.model,
            &config.base_url,
            config.api_key.clone().unwrap_or_default(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_openai() {
        let config = ProviderConfig {
            provider: ProviderKind::OpenAi,
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
        };
        let provider = select_provider(&config);
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn test_select_anthropic() {
        let config = ProviderConfig {
            provider: ProviderKind::Anthropic,
            model: "claude-sonnet-4-5".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_key: Some("sk-test".to_string()),
        };
        let provider = select_provider(&config);
        assert_eq!(provider.provider_name(), "anthropic");
    }
}
