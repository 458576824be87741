//! JSON API handlers.
//!
//! Thin adapters between HTTP and the playground. Backend failures come
//! back as 500s with the error text; anything the sandbox absorbs by
//! design (malformed source, malformed relay payloads) never produces an
//! error here.

use {
    axum::{
        Json,
        extract::State,
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
    tracing::{debug, warn},
};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RunParams {
    /// Source text to render. No validation happens here: empty and
    /// malformed markup are for the isolated context to absorb.
    #[serde(default)]
    pub source: String,
}

/// `POST /api/run` — store the submitted source and render it.
pub async fn run(State(state): State<AppState>, Json(params): Json<RunParams>) -> Response {
    match state.playground.run(&params.source).await {
        Ok(()) => Json(serde_json::json!({
            "ok": true,
            "generation": state.playground.generation(),
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, "run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "ok": false, "error": e.to_string() })),
            )
                .into_response()
        },
    }
}

/// `POST /api/reset` — restore the default source and render it.
///
/// The response carries the default source either way: the text restore
/// happens before rendering, so the editor can reset even when the
/// backend cannot.
pub async fn reset(State(state): State<AppState>) -> Response {
    match state.playground.reset().await {
        Ok(source) => Json(serde_json::json!({ "ok": true, "source": source })).into_response(),
        Err(e) => {
            warn!(error = %e, "reset render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "ok": false,
                    "error": e.to_string(),
                    "source": state.playground.default_source(),
                })),
            )
                .into_response()
        },
    }
}

/// `GET /api/source` — the current source text.
pub async fn source(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({ "source": state.playground.source() })).into_response()
}

/// `GET /api/console` — current log entries plus visibility.
pub async fn console(State(state): State<AppState>) -> Response {
    let sink = state.playground.sink();
    Json(serde_json::json!({
        "entries": sink.entries(),
        "visible": sink.is_visible(),
    }))
    .into_response()
}

/// `POST /api/console/clear` — empty and hide the log.
pub async fn console_clear(State(state): State<AppState>) -> Response {
    state.playground.clear_console();
    Json(serde_json::json!({ "ok": true })).into_response()
}

/// `GET /api/preview` — PNG capture of the current generation.
///
/// No generation yet, or a capture failure, answers 204 rather than an
/// error: a missing picture is not a playground failure.
pub async fn preview(State(state): State<AppState>) -> Response {
    match state.playground.screenshot().await {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => {
            debug!(error = %e, "no preview capture available");
            StatusCode::NO_CONTENT.into_response()
        },
    }
}

/// `GET /health` — liveness probe.
pub async fn health(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "generation": state.playground.generation(),
    }))
    .into_response()
}
