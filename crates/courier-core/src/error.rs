//! Fatal configuration errors
//!
//! Peer-level faults (unreachable hosts, malformed cards) are recorded, not
//! raised; this module covers the only error class that aborts an invocation.

use thiserror::Error;

/// Invalid or missing configuration. Surfaced to the caller, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is required")]
    MissingVar { name: &'static str },

    #[error("{name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error("unsupported provider '{value}' (expected one of: openai, anthropic)")]
    UnsupportedProvider { value: String },
}
