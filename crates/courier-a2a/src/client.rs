//! A2A client — probes peer cards and relays tasks
//!
//! One attempt per peer per round; retry policy, if any, belongs to whoever
//! starts a new outreach round.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::protocol::{AgentCard, TaskRequest, TaskResponse, TaskStatus};

/// Why a capability-card probe failed. Recorded per peer, never fatal to a
/// round.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("agent unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("agent card request failed: HTTP {status}")]
    HttpError { status: StatusCode },

    #[error("malformed agent card from {url}: {reason}")]
    MalformedCard { url: String, reason: String },
}

/// Network seam the outreach engine depends on, so it can run against
/// scripted peers in tests.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Fetch a peer's capability card. Single attempt, bounded by `timeout`.
    async fn fetch_agent_card(&self, base_url: &str, timeout: Duration)
    -> Result<AgentCard, ProbeError>;

    /// Send a task prompt to a peer and return its reply text.
    async fn send_task(&self, base_url: &str, prompt: &str, timeout: Duration) -> Result<String>;
}

/// A2A client for communicating with peer agents
#[derive(Clone)]
pub struct A2aClient {
    http: Client,
}

impl Default for A2aClient {
    fn default() -> Self {
        Self::new()
    }
}

impl A2aClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl PeerTransport for A2aClient {
    async fn fetch_agent_card(
        &self,
        base_url: &str,
        timeout: Duration,
    ) -> Result<AgentCard, ProbeError> {
        let url = format!("{}/.well-known/agent.json", base_url.trim_end_matches('/'));
        debug!("Fetching agent card from {}", url);

        let resp = self
            .http
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| ProbeError::Unreachable {
                url: url.clone(),
                reason: err.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(ProbeError::HttpError {
                status: resp.status(),
            });
        }

        let card: AgentCard = resp.json().await.map_err(|err| ProbeError::MalformedCard {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        if card.name.trim().is_empty() || card.url.trim().is_empty() {
            return Err(ProbeError::MalformedCard {
                url,
                reason: "name and url must be non-empty".to_string(),
            });
        }

        info!(
            "Fetched agent card: {} ({} capabilities)",
            card.name,
            card.capabilities.len()
        );
        Ok(card)
    }

    async fn send_task(&self, base_url: &str, prompt: &str, timeout: Duration) -> Result<String> {
        let url = format!("{}/a2a/tasks", base_url.trim_end_matches('/'));
        debug!("Submitting task to {}", url);

        let request = TaskRequest {
            prompt: prompt.to_string(),
            context: serde_json::json!({}),
        };

        let resp = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to submit task to {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Task submission failed: HTTP {} — {}", status, body));
        }

        let task: TaskResponse = resp.json().await.context("Failed to parse task response")?;
        info!("Task {} answered with status {}", task.task_id, task.status);

        match task.status {
            TaskStatus::Completed => Ok(task.result.unwrap_or_default()),
            TaskStatus::Failed | TaskStatus::Cancelled => match task.result {
                Some(text) if !text.trim().is_empty() => Err(anyhow!(text)),
                _ => Err(anyhow!("Remote task ended with status {}", task.status)),
            },
            other => Err(anyhow!(
                "Remote agent did not answer synchronously (status {})",
                other
            )),
        }
    }
}
