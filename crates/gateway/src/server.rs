//! HTTP server assembly.

use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        routing::{get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use vitro_sandbox::Playground;

use crate::{api, page, ws};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub playground: Arc<Playground>,
}

/// Assembles the playground app: page, JSON API, and live console stream.
pub fn build_app(playground: Arc<Playground>) -> Router {
    // Wildcard CORS matches the relay's trust posture: the sink's marker
    // check, not the transport, discriminates traffic.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState { playground };

    Router::new()
        .route("/", get(page::playground_page))
        .route("/api/run", post(api::run))
        .route("/api/reset", post(api::reset))
        .route("/api/source", get(api::source))
        .route("/api/console", get(api::console))
        .route("/api/console/clear", post(api::console_clear))
        .route("/api/preview", get(api::preview))
        .route("/health", get(api::health))
        .route("/ws", get(ws::ws_upgrade))
        .layer(cors)
        .with_state(state)
}

/// Binds and serves until the process is stopped.
pub async fn start_server(
    bind: &str,
    port: u16,
    playground: Arc<Playground>,
) -> anyhow::Result<()> {
    // First paint shows the default snippet already rendered.
    if let Err(e) = playground.render_current().await {
        warn!(error = %e, "initial render failed, preview starts empty");
    }

    let app = build_app(playground);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "vitro listening");
    axum::serve(listener, app).await?;
    Ok(())
}
