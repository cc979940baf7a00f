//! A2A wire types
//!
//! Agent cards, the synchronous task exchange, and the relay envelope that
//! carries outreach state from node to node.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::registry::normalize_url;

/// Prefix marking a task prompt as a machine-to-machine relay payload.
pub const RELAY_PREFIX: &str = "A2A_RELAY::";

const FALLBACK_OBJECTIVE: &str = "relay message";
const FALLBACK_ORIGIN_NAME: &str = "Unknown Agent";

/// Agent Card — advertises identity and capabilities at
/// `/.well-known/agent.json`.
///
/// `name` and `url` are required on the wire; a body missing either fails
/// deserialization instead of being patched up downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Task submission request — the message-exchange payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub prompt: String,
    #[serde(default)]
    pub context: Value,
}

/// Task response. This node answers synchronously, so the status it returns
/// is always terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskResponse {
    /// A completed task carrying the reply text.
    pub fn completed(task_id: impl Into<String>, result: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Completed,
            result: Some(result.into()),
            created_at: now,
            completed_at: Some(now),
        }
    }

    /// A failed task carrying a short reason.
    pub fn failed(task_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Failed,
            result: Some(reason.into()),
            created_at: now,
            completed_at: Some(now),
        }
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Submitted,
    Working,
    Completed,
    Failed,
    Cancelled,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Working => write!(f, "working"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Relay payload threaded through an outreach chain.
///
/// Encoded into a task prompt under [`RELAY_PREFIX`]; a receiving node
/// decodes it and decides independently whether to continue the chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayEnvelope {
    pub objective: String,
    pub origin_name: String,
    pub origin_url: String,
    pub remaining_hops: u32,
    pub visited_urls: Vec<String>,
    pub relay_id: String,
}

/// Tolerant decode target: every field optional, hops may be negative.
#[derive(Deserialize)]
struct EnvelopeWire {
    #[serde(default)]
    objective: String,
    #[serde(default)]
    origin_name: String,
    #[serde(default)]
    origin_url: String,
    #[serde(default)]
    remaining_hops: i64,
    #[serde(default)]
    visited_urls: Vec<String>,
    #[serde(default)]
    relay_id: String,
}

impl RelayEnvelope {
    /// Serialize to the prefixed compact-JSON relay form.
    pub fn encode(&self) -> String {
        // Serialization of plain strings/ints cannot fail.
        let payload = serde_json::to_string(self).unwrap_or_default();
        format!("{}{}", RELAY_PREFIX, payload)
    }

    /// Parse a relay payload out of message text.
    ///
    /// Returns None for ordinary text and for prefixed-but-malformed JSON —
    /// a broken envelope is treated as chat, never as an error.
    pub fn decode(text: &str) -> Option<Self> {
        let payload = text.trim().strip_prefix(RELAY_PREFIX)?;
        let wire: EnvelopeWire = serde_json::from_str(payload).ok()?;

        let objective = wire.objective.trim();
        let origin_name = wire.origin_name.trim();
        Some(Self {
            objective: if objective.is_empty() {
                FALLBACK_OBJECTIVE.to_string()
            } else {
                objective.to_string()
            },
            origin_name: if origin_name.is_empty() {
                FALLBACK_ORIGIN_NAME.to_string()
            } else {
                origin_name.to_string()
            },
            origin_url: wire.origin_url.trim().to_string(),
            remaining_hops: wire.remaining_hops.max(0).min(u32::MAX as i64) as u32,
            visited_urls: normalize_visited(&wire.visited_urls),
            relay_id: wire.relay_id.trim().to_string(),
        })
    }

    /// Fill in a fresh relay id when none is set.
    pub fn with_relay_id(mut self) -> Self {
        if self.relay_id.is_empty() {
            self.relay_id = new_relay_id();
        }
        self
    }
}

/// Short correlation id for one outreach chain.
pub fn new_relay_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("relay-{}", &id[..8])
}

/// Normalize and dedup a visited-URL list, preserving first occurrence.
fn normalize_visited(urls: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.iter()
        .filter_map(|url| normalize_url(url))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
