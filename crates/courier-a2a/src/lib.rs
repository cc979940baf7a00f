//! A2A (Agent-to-Agent) protocol support for Courier
//!
//! Implements capability-card discovery and message relay between
//! independently-operated agent nodes: wire types, the HTTP client, the peer
//! registry, and the autonomous discovery & outreach engine.

pub mod client;
pub mod outreach;
pub mod protocol;
pub mod registry;
pub mod summary;

pub use client::{A2aClient, PeerTransport, ProbeError};
pub use outreach::{DiscoveredPeer, HopContext, OutreachEngine, OutreachSummary, RelayResult};
pub use protocol::{AgentCard, RelayEnvelope, TaskRequest, TaskResponse, TaskStatus};
pub use registry::{PeerCandidate, normalize_url, resolve_candidates};
pub use summary::build_summary;
