//! Runtime configuration from `COURIER_*` environment variables
//!
//! Every loader is a thin shell over pure parsing functions, and everything
//! downstream receives these structs explicitly — no hidden env reads inside
//! core logic, so engines are fully constructible in tests.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Default bind host when `COURIER_HOST` is unset.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port when `COURIER_PORT` is unset or malformed.
pub const DEFAULT_PORT: u16 = 8000;

/// Default hop budget for autonomous outreach.
pub const DEFAULT_MAX_HOPS: u32 = 1;

/// Default overall deadline for one discovery + relay round.
pub const DEFAULT_OUTREACH_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_AGENT_NAME: &str = "Courier Agent";
const DEFAULT_AGENT_DESCRIPTION: &str =
    "An A2A-compatible agent with autonomous peer discovery and relay";

/// Identity and bind settings for this node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub agent_name: String,
    pub agent_description: String,
    pub host: String,
    pub port: u16,
    /// Explicit public URL (`COURIER_PUBLIC_URL`), overriding the derived one.
    pub public_url_override: Option<String>,
}

impl NodeConfig {
    /// Load from `COURIER_HOST`, `COURIER_PORT`, `COURIER_AGENT_NAME`,
    /// `COURIER_AGENT_DESCRIPTION`, and `COURIER_PUBLIC_URL`.
    pub fn from_env() -> Self {
        Self {
            agent_name: env_trimmed("COURIER_AGENT_NAME")
                .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            agent_description: env_trimmed("COURIER_AGENT_DESCRIPTION")
                .unwrap_or_else(|| DEFAULT_AGENT_DESCRIPTION.to_string()),
            host: env_trimmed("COURIER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_port(env_trimmed("COURIER_PORT").as_deref(), DEFAULT_PORT),
            public_url_override: env_trimmed("COURIER_PUBLIC_URL"),
        }
    }

    /// The URL other nodes should use to reach this one.
    ///
    /// An explicit override wins; otherwise it is derived from host and port,
    /// with wildcard bind hosts rewritten to a loopback address that peers can
    /// actually dial.
    pub fn public_url(&self) -> String {
        if let Some(url) = &self.public_url_override {
            return url.clone();
        }
        resolve_public_url(&self.host, self.port)
    }
}

/// Inputs for one autonomous outreach round.
#[derive(Debug, Clone)]
pub struct OutreachConfig {
    pub agent_name: String,
    /// This node's own URL, excluded from every candidate set.
    pub self_url: Option<String>,
    /// Raw candidate URLs; the peer registry normalizes and dedups them.
    pub discovery_urls: Vec<String>,
    pub max_hops: u32,
    /// Overall deadline for one discovery + relay round.
    pub timeout: Duration,
}

impl OutreachConfig {
    /// Load from `COURIER_AGENT_NAME`, `COURIER_SELF_URL`,
    /// `COURIER_DISCOVERY_URLS`, `COURIER_MAX_HOPS`, and
    /// `COURIER_OUTREACH_TIMEOUT`. `default_self_url` (usually the node's
    /// public URL) is used when `COURIER_SELF_URL` is unset.
    pub fn from_env(default_self_url: Option<&str>) -> Self {
        Self {
            agent_name: env_trimmed("COURIER_AGENT_NAME")
                .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            self_url: env_trimmed("COURIER_SELF_URL")
                .or_else(|| default_self_url.map(|url| url.to_string())),
            discovery_urls: split_discovery_list(
                env_trimmed("COURIER_DISCOVERY_URLS").as_deref().unwrap_or(""),
            ),
            max_hops: parse_non_negative(env_trimmed("COURIER_MAX_HOPS").as_deref(), DEFAULT_MAX_HOPS),
            timeout: parse_positive_secs(
                env_trimmed("COURIER_OUTREACH_TIMEOUT").as_deref(),
                DEFAULT_OUTREACH_TIMEOUT,
            ),
        }
    }
}

/// Which LLM backend generates replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(ConfigError::UnsupportedProvider {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// LLM backend selection. Invalid combinations are fatal, not defaulted.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Load from `COURIER_PROVIDER`, `COURIER_MODEL`, `COURIER_BASE_URL`,
    /// and `COURIER_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            env_trimmed("COURIER_PROVIDER"),
            env_trimmed("COURIER_MODEL"),
            env_trimmed("COURIER_BASE_URL"),
            env_trimmed("COURIER_API_KEY"),
        )
    }

    /// Validate raw settings into a provider configuration.
    pub fn from_parts(
        provider: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let provider = provider
            .ok_or(ConfigError::MissingVar {
                name: "COURIER_PROVIDER",
            })?
            .parse::<ProviderKind>()?;
        let model = model.ok_or(ConfigError::MissingVar {
            name: "COURIER_MODEL",
        })?;
        let base_url = base_url.ok_or(ConfigError::MissingVar {
            name: "COURIER_BASE_URL",
        })?;

        if provider == ProviderKind::Anthropic && api_key.is_none() {
            return Err(ConfigError::MissingVar {
                name: "COURIER_API_KEY",
            });
        }

        Ok(Self {
            provider,
            model,
            base_url,
            api_key,
        })
    }
}

/// Read an env var, returning None when unset or blank after trimming.
fn env_trimmed(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Derive the dialable base URL for a bind host/port pair.
pub fn resolve_public_url(host: &str, port: u16) -> String {
    let reachable_host = match host {
        "0.0.0.0" | "::" => "127.0.0.1",
        other => other,
    };
    format!("http://{}:{}", reachable_host, port)
}

fn parse_port(raw: Option<&str>, default: u16) -> u16 {
    raw.and_then(|value| value.parse::<u16>().ok()).unwrap_or(default)
}

/// Parse a hop count: malformed values fall back to the default, negatives
/// clamp to zero.
pub fn parse_non_negative(raw: Option<&str>, default: u32) -> u32 {
    match raw {
        None => default,
        Some(value) => match value.trim().parse::<i64>() {
            Ok(parsed) => parsed.max(0).min(u32::MAX as i64) as u32,
            Err(_) => default,
        },
    }
}

/// Parse a timeout in seconds: malformed or non-positive values fall back.
pub fn parse_positive_secs(raw: Option<&str>, default: Duration) -> Duration {
    match raw.and_then(|value| value.trim().parse::<f64>().ok()) {
        Some(secs) if secs > 0.0 && secs.is_finite() => Duration::from_secs_f64(secs),
        _ => default,
    }
}

/// Split a comma-separated candidate list, dropping blank entries. Full
/// normalization and dedup happen in the peer registry.
pub fn split_discovery_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
