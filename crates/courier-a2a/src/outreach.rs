//! Autonomous discovery & outreach engine
//!
//! One trigger message drives one round: resolve candidates, probe their
//! capability cards concurrently, relay a derived message to every live peer
//! concurrently, and fold the outcomes into an [`OutreachSummary`]. Per-peer
//! failures are recorded outcomes; only contract violations are fatal. The
//! round deadline is a hard bound — stragglers are aborted, not awaited.
//!
//! This node performs exactly one hop of fan-out. When hop budget remains,
//! the relayed message carries a [`RelayEnvelope`] with a decremented budget
//! and the updated visited set; each receiving peer decides on its own
//! whether to continue the chain.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use courier_core::OutreachConfig;

use crate::client::PeerTransport;
use crate::protocol::{AgentCard, RELAY_PREFIX, RelayEnvelope, new_relay_id};
use crate::registry::{PeerCandidate, normalize_url, resolve_candidates};
use crate::summary::build_summary;

/// Per-call bound for one capability-card probe. The round deadline still
/// applies on top.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A peer whose card fetch succeeded this round.
#[derive(Debug, Clone)]
pub struct DiscoveredPeer {
    pub url: String,
    pub card: AgentCard,
}

/// Outcome of one relay attempt. Failures here are data, not errors.
#[derive(Debug, Clone)]
pub struct RelayResult {
    pub peer_url: String,
    pub peer_name: String,
    pub success: bool,
    /// Reply text on success, short failure reason otherwise.
    pub detail: String,
}

/// Terminal artifact of one outreach round. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct OutreachSummary {
    pub relay_id: String,
    pub agent_name: String,
    pub self_url: Option<String>,
    pub objective: String,
    pub origin_name: String,
    pub origin_url: String,
    pub remaining_hops: u32,
    pub discovered: Vec<DiscoveredPeer>,
    pub relayed: Vec<RelayResult>,
}

/// Loop-prevention state threaded through a round.
///
/// `visited` always contains this node's own URL before any dispatch, so a
/// node can never relay to itself; it is mutated only between phases, never
/// from inside a fan-out.
#[derive(Debug)]
pub struct HopContext {
    pub remaining_hops: u32,
    pub deadline: Instant,
    pub visited: HashSet<String>,
}

impl HopContext {
    fn new(request: &RelayEnvelope, self_url: Option<&str>, budget: Duration) -> Self {
        let mut visited: HashSet<String> = request
            .visited_urls
            .iter()
            .filter_map(|url| normalize_url(url))
            .collect();
        if let Some(url) = self_url {
            visited.insert(url.to_string());
        }
        Self {
            remaining_hops: request.remaining_hops,
            deadline: Instant::now() + budget,
            visited,
        }
    }
}

/// Discovery & outreach orchestrator.
pub struct OutreachEngine {
    transport: Arc<dyn PeerTransport>,
    config: OutreachConfig,
}

impl OutreachEngine {
    pub fn new(transport: Arc<dyn PeerTransport>, config: OutreachConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &OutreachConfig {
        &self.config
    }

    /// Decide whether `text` starts an outreach round.
    ///
    /// An inbound relay envelope always does; so does a human request that
    /// names the other agents and an action ("greet the other agents",
    /// "discover peer agents"). Everything else is ordinary chat.
    pub fn detect_trigger(&self, text: &str) -> Option<RelayEnvelope> {
        if let Some(envelope) = RelayEnvelope::decode(text) {
            return Some(envelope.with_relay_id());
        }
        if !is_human_trigger(text) {
            return None;
        }

        let self_url = self.config.self_url.as_deref().and_then(normalize_url);
        Some(RelayEnvelope {
            objective: text.trim().to_string(),
            origin_name: self.config.agent_name.clone(),
            origin_url: self_url.clone().unwrap_or_default(),
            remaining_hops: self.config.max_hops,
            visited_urls: self_url.into_iter().collect(),
            relay_id: new_relay_id(),
        })
    }

    /// Handle a trigger end-to-end, returning the formatted summary, or None
    /// when `text` is ordinary chat.
    pub async fn handle_trigger(&self, text: &str) -> Option<String> {
        let request = self.detect_trigger(text)?;
        if self.config.discovery_urls.is_empty() {
            return Some(
                "Autonomous outreach was requested, but no discovery candidates are configured. \
                 Set COURIER_DISCOVERY_URLS to a comma-separated list of agent URLs first."
                    .to_string(),
            );
        }
        let summary = self.run_outreach(request).await;
        Some(build_summary(&summary))
    }

    /// Run one discovery + relay round.
    pub async fn run_outreach(&self, request: RelayEnvelope) -> OutreachSummary {
        let request = request.with_relay_id();
        let self_url = self.config.self_url.as_deref().and_then(normalize_url);
        let mut ctx = HopContext::new(&request, self_url.as_deref(), self.config.timeout);

        let candidates: Vec<PeerCandidate> =
            resolve_candidates(&self.config.discovery_urls, self_url.as_deref())
                .into_iter()
                .filter(|candidate| !ctx.visited.contains(&candidate.url))
                .collect();

        info!(
            "[{}] outreach start agent={} self={:?} remaining_hops={} candidates={}",
            request.relay_id,
            self.config.agent_name,
            self_url,
            request.remaining_hops,
            candidates.len()
        );

        if ctx.remaining_hops == 0 || candidates.is_empty() {
            // Terminal case, not an error: hop budget spent or nobody left to ask.
            return self.empty_summary(request, self_url);
        }

        let discovered = self.probe_candidates(&candidates, &ctx).await;
        for peer in &discovered {
            ctx.visited.insert(peer.url.clone());
        }

        let relayed = self.relay_to_peers(&discovered, &request, &ctx).await;

        info!(
            "[{}] outreach done discovered={} contacted={}",
            request.relay_id,
            discovered.len(),
            relayed.len()
        );

        OutreachSummary {
            relay_id: request.relay_id.clone(),
            agent_name: self.config.agent_name.clone(),
            self_url,
            objective: request.objective,
            origin_name: request.origin_name,
            origin_url: request.origin_url,
            remaining_hops: request.remaining_hops,
            discovered,
            relayed,
        }
    }

    /// Probe every candidate concurrently. Results keep candidate order;
    /// failures and deadline stragglers are omissions.
    async fn probe_candidates(
        &self,
        candidates: &[PeerCandidate],
        ctx: &HopContext,
    ) -> Vec<DiscoveredPeer> {
        let per_call = PROBE_TIMEOUT.min(self.config.timeout);
        let mut probes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let transport = Arc::clone(&self.transport);
            let url = candidate.url.clone();
            probes.push(tokio::spawn(async move {
                transport.fetch_agent_card(&url, per_call).await
            }));
        }

        let mut discovered = Vec::new();
        for (candidate, mut probe) in candidates.iter().zip(probes) {
            match timeout_at(ctx.deadline, &mut probe).await {
                Ok(Ok(Ok(card))) => {
                    debug!("Discovered {} at {}", card.name, candidate.url);
                    discovered.push(DiscoveredPeer {
                        url: candidate.url.clone(),
                        card,
                    });
                }
                Ok(Ok(Err(err))) => {
                    debug!("Probe failed for {}: {}", candidate.url, err);
                }
                Ok(Err(err)) => {
                    warn!("Probe task for {} did not finish: {}", candidate.url, err);
                }
                Err(_) => {
                    warn!("Probe for {} missed the round deadline", candidate.url);
                    probe.abort();
                }
            }
        }
        discovered
    }

    /// Relay the derived message to every discovered peer concurrently.
    /// Every peer gets a result; one slow or failing peer never blocks the
    /// others past the deadline.
    async fn relay_to_peers(
        &self,
        discovered: &[DiscoveredPeer],
        request: &RelayEnvelope,
        ctx: &HopContext,
    ) -> Vec<RelayResult> {
        let message = outgoing_message(request, &ctx.visited);
        let per_call = self.config.timeout;

        let mut relays = Vec::with_capacity(discovered.len());
        for peer in discovered {
            let transport = Arc::clone(&self.transport);
            let url = peer.url.clone();
            let prompt = message.clone();
            relays.push(tokio::spawn(async move {
                transport.send_task(&url, &prompt, per_call).await
            }));
        }

        let mut relayed = Vec::with_capacity(discovered.len());
        for (peer, mut relay) in discovered.iter().zip(relays) {
            let result = match timeout_at(ctx.deadline, &mut relay).await {
                Ok(Ok(Ok(text))) => {
                    info!(
                        "[{}] contact done to={} response_chars={}",
                        request.relay_id,
                        peer.url,
                        text.len()
                    );
                    RelayResult {
                        peer_url: peer.url.clone(),
                        peer_name: peer.card.name.clone(),
                        success: true,
                        detail: text,
                    }
                }
                Ok(Ok(Err(err))) => {
                    warn!("[{}] contact failed to={} error={}", request.relay_id, peer.url, err);
                    RelayResult {
                        peer_url: peer.url.clone(),
                        peer_name: peer.card.name.clone(),
                        success: false,
                        detail: err.to_string(),
                    }
                }
                Ok(Err(err)) => {
                    warn!("[{}] contact task to={} did not finish: {}", request.relay_id, peer.url, err);
                    RelayResult {
                        peer_url: peer.url.clone(),
                        peer_name: peer.card.name.clone(),
                        success: false,
                        detail: format!("relay did not finish: {}", err),
                    }
                }
                Err(_) => {
                    warn!("[{}] contact to={} missed the round deadline", request.relay_id, peer.url);
                    relay.abort();
                    RelayResult {
                        peer_url: peer.url.clone(),
                        peer_name: peer.card.name.clone(),
                        success: false,
                        detail: "round deadline exceeded".to_string(),
                    }
                }
            };
            relayed.push(result);
        }
        relayed
    }

    fn empty_summary(&self, request: RelayEnvelope, self_url: Option<String>) -> OutreachSummary {
        OutreachSummary {
            relay_id: request.relay_id.clone(),
            agent_name: self.config.agent_name.clone(),
            self_url,
            objective: request.objective,
            origin_name: request.origin_name,
            origin_url: request.origin_url,
            remaining_hops: request.remaining_hops,
            discovered: Vec::new(),
            relayed: Vec::new(),
        }
    }
}

/// The message actually sent to each discovered peer.
///
/// With hop budget left after this round, the onward relay envelope (so the
/// peer can keep the chain going); otherwise plain conversation text.
fn outgoing_message(request: &RelayEnvelope, visited: &HashSet<String>) -> String {
    let next_hops = request.remaining_hops.saturating_sub(1);
    if next_hops == 0 {
        return conversation_message(request);
    }

    let mut visited_urls: Vec<String> = visited.iter().cloned().collect();
    visited_urls.sort();
    RelayEnvelope {
        objective: request.objective.clone(),
        origin_name: request.origin_name.clone(),
        origin_url: request.origin_url.clone(),
        remaining_hops: next_hops,
        visited_urls,
        relay_id: request.relay_id.clone(),
    }
    .encode()
}

/// Human-readable text for the terminal hop.
pub fn conversation_message(request: &RelayEnvelope) -> String {
    let lowered = request.objective.to_lowercase();
    let is_greeting = ["greet", "say hi", "hello", "talk"]
        .iter()
        .any(|keyword| lowered.contains(keyword));

    if is_greeting {
        format!(
            "Hello! This is a greeting from {}. Nice to meet you!",
            request.origin_name
        )
    } else {
        format!("Message from {}: {}", request.origin_name, request.objective)
    }
}

/// Does this chat message ask the node to reach out to its peers?
fn is_human_trigger(text: &str) -> bool {
    let normalized = text.trim();
    if normalized.is_empty() || normalized.starts_with(RELAY_PREFIX) {
        return false;
    }

    let lowered = normalized.to_lowercase();
    let targets_peers = ["other agent", "peer agent"]
        .iter()
        .any(|keyword| lowered.contains(keyword));
    let has_action = ["greet", "talk", "message", "say hi", "discover", "detect", "find"]
        .iter()
        .any(|keyword| lowered.contains(keyword));

    targets_peers && has_action
}
