//! Peer registry — candidate URL resolution for one discovery round
//!
//! Normalization is the wire rule peers actually follow (trim, strip trailing
//! slashes); ordering is first occurrence so rounds are reproducible.

use tracing::debug;

/// A raw, unvalidated discovery candidate. Lives only for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerCandidate {
    pub url: String,
}

/// Normalize a candidate URL: trim whitespace, strip trailing slashes.
/// Returns None when nothing is left.
pub fn normalize_url(raw: &str) -> Option<String> {
    let normalized = raw.trim().trim_end_matches('/');
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Resolve raw candidate URLs into this round's working set.
///
/// Normalizes, dedups preserving first occurrence, and drops `self_url`
/// (compared after normalization). An empty result is a valid no-op.
pub fn resolve_candidates(raw_urls: &[String], self_url: Option<&str>) -> Vec<PeerCandidate> {
    let normalized_self = self_url.and_then(normalize_url);
    let mut seen = std::collections::HashSet::new();

    let candidates: Vec<PeerCandidate> = raw_urls
        .iter()
        .filter_map(|raw| normalize_url(raw))
        .filter(|url| Some(url) != normalized_self.as_ref())
        .filter(|url| seen.insert(url.clone()))
        .map(|url| PeerCandidate { url })
        .collect();

    debug!(
        "Resolved {} candidate(s) from {} raw URL(s)",
        candidates.len(),
        raw_urls.len()
    );
    candidates
}
