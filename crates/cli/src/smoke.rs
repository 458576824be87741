//! End-to-end self-test against a real browser install.

use std::{sync::Arc, time::Duration};

use vitro_sandbox::{HeadlessBackend, Playground, SandboxConfig, SinkEvent};

const SMOKE_SOURCE: &str = r#"<h2>SMOKE TEST</h2><script>console.log("SMOKE_LOG");</script>"#;
const SMOKE_TIMEOUT: Duration = Duration::from_secs(15);

/// Render a known snippet, expect its console line back, then exercise
/// reset and capture. Prints PASS or FAIL; returns whether it passed.
pub async fn run(config: &SandboxConfig) -> bool {
    let backend = Arc::new(HeadlessBackend::new(config.clone()));
    let playground = Playground::new(backend, config);

    match try_smoke(&playground).await {
        Ok(()) => {
            println!("PASS: sandbox renders, relays console output, resets, and captures");
            true
        },
        Err(e) => {
            println!("FAIL: {e:#}");
            false
        },
    }
}

async fn try_smoke(playground: &Playground) -> anyhow::Result<()> {
    let mut events = playground.sink().subscribe();
    playground.run(SMOKE_SOURCE).await?;

    let found = tokio::time::timeout(SMOKE_TIMEOUT, async {
        while let Ok(event) = events.recv().await {
            if let SinkEvent::Entry(entry) = event {
                if entry.text.contains("SMOKE_LOG") {
                    return true;
                }
            }
        }
        false
    })
    .await
    .unwrap_or(false);
    anyhow::ensure!(
        found,
        "no SMOKE_LOG console entry within {}s",
        SMOKE_TIMEOUT.as_secs()
    );

    let restored = playground.reset().await?;
    anyhow::ensure!(
        restored == playground.default_source()
            && playground.source() == playground.default_source(),
        "reset did not restore the default source"
    );

    let png = playground.screenshot().await?;
    anyhow::ensure!(png.starts_with(b"\x89PNG"), "capture is not a PNG");

    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {async_trait::async_trait, tokio::sync::mpsc};

    use vitro_sandbox::{IsolatedContext, PreviewBackend, SandboxError};

    use super::*;

    const SMOKE_PAYLOAD: &str = r#"{"__vitroLog":true,"type":"log","args":["SMOKE_LOG"]}"#;

    /// Backend whose contexts relay the smoke line and capture as PNG.
    struct HealthyBackend;

    #[async_trait]
    impl PreviewBackend for HealthyBackend {
        async fn create_context(
            &self,
            document: String,
            relay_tx: mpsc::UnboundedSender<String>,
        ) -> Result<Box<dyn IsolatedContext>, SandboxError> {
            if document.contains("SMOKE_LOG") {
                let _ = relay_tx.send(SMOKE_PAYLOAD.to_string());
            }
            Ok(Box::new(PngContext))
        }
    }

    struct PngContext;

    #[async_trait]
    impl IsolatedContext for PngContext {
        async fn screenshot(&self) -> Result<Vec<u8>, SandboxError> {
            Ok(b"\x89PNG\r\n\x1a\nstub".to_vec())
        }

        async fn close(self: Box<Self>) {}
    }

    /// Same relay behavior, but captures come back as something else.
    struct BadCaptureBackend;

    #[async_trait]
    impl PreviewBackend for BadCaptureBackend {
        async fn create_context(
            &self,
            _document: String,
            relay_tx: mpsc::UnboundedSender<String>,
        ) -> Result<Box<dyn IsolatedContext>, SandboxError> {
            let _ = relay_tx.send(SMOKE_PAYLOAD.to_string());
            Ok(Box::new(TextContext))
        }
    }

    struct TextContext;

    #[async_trait]
    impl IsolatedContext for TextContext {
        async fn screenshot(&self) -> Result<Vec<u8>, SandboxError> {
            Ok(b"<html>".to_vec())
        }

        async fn close(self: Box<Self>) {}
    }

    fn smoke_playground(backend: Arc<dyn PreviewBackend>) -> Playground {
        let config = SandboxConfig {
            default_source: "<p>home</p>".to_string(),
            ..SandboxConfig::default()
        };
        Playground::new(backend, &config)
    }

    #[tokio::test]
    async fn passes_when_relay_reset_and_capture_all_work() {
        let playground = smoke_playground(Arc::new(HealthyBackend));
        try_smoke(&playground).await.unwrap();

        // The smoke snippet must be gone again after the built-in reset check.
        assert_eq!(playground.source(), "<p>home</p>");
    }

    #[tokio::test]
    async fn fails_when_capture_is_not_png() {
        let playground = smoke_playground(Arc::new(BadCaptureBackend));

        let err = try_smoke(&playground).await.unwrap_err();
        assert!(err.to_string().contains("not a PNG"));

        // The reset verification ran before the capture check tripped.
        assert_eq!(playground.source(), playground.default_source());
    }
}
