//! courier-core — shared foundations for the Courier agent node
//!
//! Provides the explicit configuration structs the rest of the workspace is
//! constructed from (no module reads the environment on its own), the fatal
//! `ConfigError` taxonomy, and the provider-agnostic LLM abstraction used to
//! generate natural-language replies.

pub mod config;
pub mod error;
pub mod providers;

pub use config::{NodeConfig, OutreachConfig, ProviderConfig, ProviderKind};
pub use error::ConfigError;
pub use providers::{LlmProvider, select_provider};
