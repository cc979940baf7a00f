//! courier-server — HTTP surface for the Courier agent node
//!
//! Serves this node's capability card at the well-known path and a
//! synchronous task-exchange endpoint that routes inbound messages either to
//! the autonomous outreach engine or to the configured LLM provider.

pub mod card;
pub mod executor;
pub mod routes;

pub use card::build_agent_card;
pub use executor::{MAX_PROMPT_LENGTH, TaskExecutor};
pub use routes::{AppState, app_router, serve};
