//! Axum routes for the agent node
//!
//! - `GET  /health`                   — liveness probe
//! - `GET  /.well-known/agent.json`   — this node's agent card
//! - `POST /a2a/tasks`                — synchronous task exchange

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use courier_a2a::protocol::{AgentCard, TaskRequest, TaskResponse};

use crate::executor::TaskExecutor;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub card: AgentCard,
    pub executor: Arc<TaskExecutor>,
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/.well-known/agent.json", get(agent_card_handler))
        .route("/a2a/tasks", post(submit_task_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and run the server until it is shut down.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Courier node listening on http://{}", addr);

    axum::serve(listener, app_router(state))
        .await
        .context("server error")
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn agent_card_handler(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.clone())
}

async fn submit_task_handler(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Json<TaskResponse> {
    info!("Task received ({} chars)", request.prompt.len());
    Json(state.executor.execute(request).await)
}
