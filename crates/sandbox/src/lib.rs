//! Sandboxed HTML/JS preview with console relay.
//!
//! Takes arbitrary user-supplied markup and script, executes it in a
//! freshly isolated headless-browser context, and relays its console output
//! one-way back to a host-side sink. Every run rebuilds the context from
//! scratch; nothing survives a replacement and nothing inside a context can
//! reach host state.
//!
//! # Components
//!
//! - **renderer**: owns at most one isolated context, replace-not-patch
//! - **relay**: the interception script injected ahead of user code
//! - **sink**: marker-validated, append-only host console log
//! - **headless**: Chromium backend over CDP (see [`backend`] for the seam)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use vitro_sandbox::{HeadlessBackend, Playground, SandboxConfig};
//!
//! let config = SandboxConfig::default();
//! let backend = Arc::new(HeadlessBackend::new(config.clone()));
//! let playground = Playground::new(backend, &config);
//!
//! playground.run("<h1>hi</h1><script>console.log(\"hi\")</script>").await?;
//! for entry in playground.sink().entries() {
//!     println!("{entry}");
//! }
//! ```

pub mod backend;
pub mod detect;
pub mod error;
pub mod headless;
pub mod playground;
pub mod relay;
pub mod renderer;
pub mod sink;
pub mod types;

pub use {
    backend::{IsolatedContext, NoopBackend, PreviewBackend},
    error::SandboxError,
    headless::HeadlessBackend,
    playground::Playground,
    renderer::PreviewRenderer,
    sink::{ConsoleSink, SinkEvent},
    types::{ConsoleEntry, DEFAULT_SOURCE, LogLevel, SandboxConfig},
};
