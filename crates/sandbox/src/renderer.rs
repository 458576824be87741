//! Isolation renderer.
//!
//! [`PreviewRenderer`] owns at most one live isolated context. Every render
//! discards the previous generation outright and builds a new one from the
//! assembled preview document; there is no incremental update path and no
//! cancellation API beyond replacement itself.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use {
    tokio::sync::{Mutex, mpsc},
    tracing::debug,
};

use crate::{
    backend::{IsolatedContext, PreviewBackend},
    error::SandboxError,
    relay::build_preview_document,
};

/// Rebuilds the visible preview from source text, replace-not-patch.
pub struct PreviewRenderer {
    backend: Arc<dyn PreviewBackend>,
    relay_tx: mpsc::UnboundedSender<String>,
    /// The single active generation. The lock is held across context
    /// creation so rapid successive renders apply strictly in order.
    active: Mutex<Option<Box<dyn IsolatedContext>>>,
    generation: AtomicU64,
}

impl PreviewRenderer {
    pub fn new(backend: Arc<dyn PreviewBackend>, relay_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            backend,
            relay_tx,
            active: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the visible preview with a fresh context running `source`.
    ///
    /// The old generation is discarded first and torn down on a detached
    /// task — in-flight work inside it is abandoned, not awaited. Source
    /// text is taken as-is; malformed markup is the context's problem, not
    /// ours.
    pub async fn render(&self, source: &str) -> Result<(), SandboxError> {
        let document = build_preview_document(source);

        let mut active = self.active.lock().await;
        if let Some(old) = active.take() {
            tokio::spawn(old.close());
        }

        let context = self
            .backend
            .create_context(document, self.relay_tx.clone())
            .await?;
        *active = Some(context);

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(generation, bytes = source.len(), "preview rendered");
        Ok(())
    }

    /// PNG capture of the current generation's visual output.
    pub async fn screenshot(&self) -> Result<Vec<u8>, SandboxError> {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(context) => context.screenshot().await,
            None => Err(SandboxError::ScreenshotFailed(
                "no active preview generation".into(),
            )),
        }
    }

    /// Number of renders performed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}
