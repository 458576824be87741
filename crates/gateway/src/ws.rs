//! WebSocket push channel for console sink events.
//!
//! One-way: the server streams [`vitro_sandbox::SinkEvent`]s as JSON
//! frames and ignores everything the client sends. Clients that fall behind the broadcast
//! buffer miss entries rather than stalling the sink.

use {
    axum::{
        extract::{
            State, WebSocketUpgrade,
            ws::{Message, WebSocket},
        },
        response::Response,
    },
    futures::{SinkExt, StreamExt},
    tokio::sync::broadcast::error::RecvError,
    tracing::debug,
};

use crate::server::AppState;

/// `GET /ws` — upgrade and start streaming sink events.
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut events = state.playground.sink().subscribe();
    debug!("console websocket connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "console websocket lagged");
                },
                Err(RecvError::Closed) => break,
            },
            incoming = ws_rx.next() => match incoming {
                // Inbound frames carry nothing; draining them keeps the
                // close handshake working.
                Some(Ok(_)) => {},
                _ => break,
            },
        }
    }

    debug!("console websocket disconnected");
}
