//! Gateway: HTTP/WebSocket surface for the sandbox playground.
//!
//! Lifecycle:
//! 1. Build the shared [`vitro_sandbox::Playground`]
//! 2. Bind address, render the stored source once so the preview is warm
//! 3. Serve the page, the JSON API, and the console event stream
//!
//! All sandbox logic (isolation, relay, sink) lives in `vitro-sandbox`;
//! this crate only adapts it to HTTP.

pub mod api;
pub mod page;
pub mod server;
pub mod ws;

pub use server::{AppState, build_app, start_server};
