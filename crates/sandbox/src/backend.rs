//! Isolated-context backend seam.
//!
//! [`PreviewBackend`] is the factory for isolated execution contexts; the
//! renderer drives it without knowing whether a real browser sits behind
//! it. [`NoopBackend`] produces inert contexts so the gateway and tests can
//! run standalone before (or without) a browser being wired in.

use {async_trait::async_trait, tokio::sync::mpsc};

use crate::error::SandboxError;

/// Factory for isolated execution contexts.
#[async_trait]
pub trait PreviewBackend: Send + Sync {
    /// Creates a fresh context displaying `document`, with its relay
    /// traffic wired into `relay_tx`.
    ///
    /// The context must have the host channel installed before the
    /// document's scripts run, and must not be able to reach any host
    /// state through it.
    async fn create_context(
        &self,
        document: String,
        relay_tx: mpsc::UnboundedSender<String>,
    ) -> Result<Box<dyn IsolatedContext>, SandboxError>;
}

/// One live isolated-context generation.
///
/// Dropping the handle abandons the context; [`close`] tears it down
/// eagerly. Replacement is the normal lifecycle end — there is no other
/// cancellation path.
///
/// [`close`]: IsolatedContext::close
#[async_trait]
pub trait IsolatedContext: Send + Sync {
    /// PNG capture of the context's current visual output.
    async fn screenshot(&self) -> Result<Vec<u8>, SandboxError>;

    /// Best-effort teardown; never fails.
    async fn close(self: Box<Self>);
}

/// Backend with no execution environment behind it.
///
/// Contexts it creates render nothing and emit nothing; screenshot
/// requests report the backend as unavailable.
pub struct NoopBackend;

#[async_trait]
impl PreviewBackend for NoopBackend {
    async fn create_context(
        &self,
        _document: String,
        _relay_tx: mpsc::UnboundedSender<String>,
    ) -> Result<Box<dyn IsolatedContext>, SandboxError> {
        Ok(Box::new(NoopContext))
    }
}

struct NoopContext;

#[async_trait]
impl IsolatedContext for NoopContext {
    async fn screenshot(&self) -> Result<Vec<u8>, SandboxError> {
        Err(SandboxError::ScreenshotFailed(
            "no preview backend configured".into(),
        ))
    }

    async fn close(self: Box<Self>) {}
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_contexts_create_and_close() {
        let backend = NoopBackend;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let context = backend
            .create_context("<h1>hi</h1>".into(), tx)
            .await
            .unwrap();
        assert!(context.screenshot().await.is_err());
        context.close().await;

        // Inert: nothing was relayed.
        assert!(rx.try_recv().is_err());
    }
}
