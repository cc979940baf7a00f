//! Task executor — routes inbound messages
//!
//! An inbound prompt is either an outreach trigger (relay envelope or a human
//! asking the node to contact its peers) handled by the engine, or ordinary
//! chat answered by the LLM provider. Failures become failed task responses
//! with a generic message; detail goes to the log, not to the peer.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use courier_a2a::outreach::OutreachEngine;
use courier_a2a::protocol::{TaskRequest, TaskResponse};
use courier_core::LlmProvider;

/// Upper bound on inbound prompt length, in characters.
pub const MAX_PROMPT_LENGTH: usize = 8_000;

/// Bridges the task endpoint to the outreach engine and the reply generator.
pub struct TaskExecutor {
    provider: Arc<dyn LlmProvider>,
    engine: OutreachEngine,
}

impl TaskExecutor {
    pub fn new(provider: Arc<dyn LlmProvider>, engine: OutreachEngine) -> Self {
        Self { provider, engine }
    }

    /// Execute one task synchronously and return a terminal response.
    pub async fn execute(&self, request: TaskRequest) -> TaskResponse {
        let task_id = format!("task-{}", Uuid::new_v4());
        let prompt = request.prompt.trim();

        if prompt.is_empty() {
            return TaskResponse::failed(task_id, "Input message must not be empty.");
        }
        if prompt.chars().count() > MAX_PROMPT_LENGTH {
            return TaskResponse::failed(
                task_id,
                format!(
                    "Input message is too long. Maximum length is {} characters.",
                    MAX_PROMPT_LENGTH
                ),
            );
        }

        if let Some(summary) = self.engine.handle_trigger(prompt).await {
            info!("Task {} handled by outreach engine", task_id);
            return TaskResponse::completed(task_id, summary);
        }

        match self.provider.generate(prompt).await {
            Ok(text) => TaskResponse::completed(task_id, text),
            Err(err) => {
                warn!("Agent execution failed for {}: {:#}", task_id, err);
                TaskResponse::failed(task_id, "Agent execution failed. Please try again later.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use courier_a2a::client::{PeerTransport, ProbeError};
    use courier_a2a::protocol::{AgentCard, TaskStatus};
    use courier_core::OutreachConfig;
    use std::time::Duration;

    struct ScriptedProvider {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(anyhow!("scripted provider failure")),
            }
        }
    }

    struct NoPeers;

    #[async_trait]
    impl PeerTransport for NoPeers {
        async fn fetch_agent_card(
            &self,
            base_url: &str,
            _timeout: Duration,
        ) -> Result<AgentCard, ProbeError> {
            Err(ProbeError::Unreachable {
                url: base_url.to_string(),
                reason: "connection refused".to_string(),
            })
        }

        async fn send_task(&self, _base_url: &str, _prompt: &str, _timeout: Duration) -> Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    fn executor(reply: Option<&'static str>, discovery: &[&str]) -> TaskExecutor {
        let config = OutreachConfig {
            agent_name: "Agent A".to_string(),
            self_url: Some("http://127.0.0.1:8001".to_string()),
            discovery_urls: discovery.iter().map(|s| s.to_string()).collect(),
            max_hops: 1,
            timeout: Duration::from_millis(200),
        };
        TaskExecutor::new(
            Arc::new(ScriptedProvider { reply }),
            OutreachEngine::new(Arc::new(NoPeers), config),
        )
    }

    fn request(prompt: &str) -> TaskRequest {
        TaskRequest {
            prompt: prompt.to_string(),
            context: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_plain_chat_goes_to_provider() {
        let executor = executor(Some("pong"), &[]);
        let response = executor.execute(request("ping")).await;
        assert_eq!(response.status, TaskStatus::Completed);
        assert_eq!(response.result.as_deref(), Some("pong"));
        assert!(response.task_id.starts_with("task-"));
    }

    #[tokio::test]
    async fn test_empty_prompt_fails() {
        let executor = executor(Some("pong"), &[]);
        let response = executor.execute(request("   ")).await;
        assert_eq!(response.status, TaskStatus::Failed);
        assert_eq!(response.result.as_deref(), Some("Input message must not be empty."));
    }

    #[tokio::test]
    async fn test_oversized_prompt_fails() {
        let executor = executor(Some("pong"), &[]);
        let long = "a".repeat(MAX_PROMPT_LENGTH + 1);
        let response = executor.execute(request(&long)).await;
        assert_eq!(response.status, TaskStatus::Failed);
        assert!(response.result.unwrap().contains("too long"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic() {
        let executor = executor(None, &[]);
        let response = executor.execute(request("ping")).await;
        assert_eq!(response.status, TaskStatus::Failed);
        let reason = response.result.unwrap();
        assert!(reason.contains("Agent execution failed"));
        assert!(!reason.contains("scripted"));
    }

    #[tokio::test]
    async fn test_trigger_without_discovery_urls() {
        let executor = executor(Some("should not be used"), &[]);
        let response = executor.execute(request("greet the other agents")).await;
        assert_eq!(response.status, TaskStatus::Completed);
        assert!(response.result.unwrap().contains("COURIER_DISCOVERY_URLS"));
    }

    #[tokio::test]
    async fn test_trigger_runs_outreach_round() {
        // All candidates unreachable: the round still completes with a summary.
        let executor = executor(Some("should not be used"), &["http://127.0.0.1:9"]);
        let response = executor.execute(request("greet the other agents")).await;
        assert_eq!(response.status, TaskStatus::Completed);
        let summary = response.result.unwrap();
        assert!(summary.contains("Autonomous outreach summary"));
        assert!(summary.contains("detected agents: 0"));
    }

    #[tokio::test]
    async fn test_relay_envelope_is_handled_by_engine() {
        let executor = executor(Some("should not be used"), &["http://127.0.0.1:9"]);
        let response = executor
            .execute(request(r#"A2A_RELAY::{"objective":"say hi","remaining_hops":1}"#))
            .await;
        assert_eq!(response.status, TaskStatus::Completed);
        assert!(response.result.unwrap().contains("Autonomous outreach summary"));
    }
}
