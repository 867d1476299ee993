//! Shared test helpers.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::test_config;
use crate::entities::fixtures::memory_store;
use crate::state::AppState;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream stub server");
    });
    format!("http://{addr}")
}

/// Application state over an in-memory store, talking to `upstream_base`.
pub async fn test_state(upstream_base: &str) -> Arc<AppState> {
    let state = AppState::new(test_config(upstream_base), memory_store().await).expect("state");
    Arc::new(state)
}
