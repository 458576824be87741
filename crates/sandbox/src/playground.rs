//! Playground facade.
//!
//! [`Playground`] ties the pieces together: it owns the source text, the
//! renderer, and the console sink, and spawns the one ambient relay pump
//! that feeds every generation's payloads into the sink. The pump is
//! installed at construction and runs for the playground's whole life; it
//! filters nothing itself — marker validation is the sink's job.

use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::{
    backend::PreviewBackend,
    error::SandboxError,
    renderer::PreviewRenderer,
    sink::ConsoleSink,
    types::SandboxConfig,
};

/// The sandbox preview subsystem behind one handle.
///
/// Must be constructed inside a tokio runtime (it spawns the relay pump).
pub struct Playground {
    default_source: String,
    source: RwLock<String>,
    sink: ConsoleSink,
    renderer: PreviewRenderer,
}

impl Playground {
    pub fn new(backend: Arc<dyn PreviewBackend>, config: &SandboxConfig) -> Self {
        let (relay_tx, mut relay_rx) = mpsc::unbounded_channel::<String>();
        let sink = ConsoleSink::new();

        // The single persistent listener for relay traffic from any
        // generation, current or discarded. Ends only when the renderer
        // (the last sender) is dropped with the playground.
        let pump_sink = sink.clone();
        tokio::spawn(async move {
            while let Some(payload) = relay_rx.recv().await {
                pump_sink.accept(&payload);
            }
        });

        Self {
            default_source: config.default_source.clone(),
            source: RwLock::new(config.default_source.clone()),
            sink,
            renderer: PreviewRenderer::new(backend, relay_tx),
        }
    }

    /// Run: store `source` as the current text and render it.
    ///
    /// The store updates even when rendering fails — the editor already
    /// holds the text; a backend hiccup must not revert it.
    pub async fn run(&self, source: &str) -> Result<(), SandboxError> {
        if let Ok(mut current) = self.source.write() {
            *current = source.to_string();
        }
        self.renderer.render(source).await
    }

    /// Reset: restore the captured default text and render it.
    ///
    /// Returns the default source for the caller's editor. As with
    /// [`run`](Self::run), the restore happens before rendering, so the
    /// text is back to default even if the render errors.
    pub async fn reset(&self) -> Result<String, SandboxError> {
        if let Ok(mut current) = self.source.write() {
            *current = self.default_source.clone();
        }
        self.renderer.render(&self.default_source).await?;
        Ok(self.default_source.clone())
    }

    /// Renders whatever the current source text is. Used for the initial
    /// render at startup.
    pub async fn render_current(&self) -> Result<(), SandboxError> {
        let source = self.source();
        self.renderer.render(&source).await
    }

    /// Empties and hides the console log.
    pub fn clear_console(&self) {
        self.sink.clear();
    }

    /// Current source text.
    pub fn source(&self) -> String {
        match self.source.read() {
            Ok(current) => current.clone(),
            Err(_) => self.default_source.clone(),
        }
    }

    /// The default captured at construction, served by reset.
    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    pub fn sink(&self) -> &ConsoleSink {
        &self.sink
    }

    /// PNG capture of the current generation.
    pub async fn screenshot(&self) -> Result<Vec<u8>, SandboxError> {
        self.renderer.screenshot().await
    }

    /// Number of renders so far.
    pub fn generation(&self) -> u64 {
        self.renderer.generation()
    }
}
