//! Headless Chromium preview backend.
//!
//! One shared browser process, launched lazily on the first render; every
//! generation gets its own page navigated to a `data:` URL built from the
//! preview document. Data-URL documents carry an opaque origin, so a
//! generation can reach no cookies, storage, or DOM beyond its own.
//!
//! Relay transport is a CDP binding: `Runtime.addBinding` is registered
//! before navigation, the injected relay calls it with one serialized
//! payload per console event, and a per-page pump task forwards the
//! resulting `Runtime.bindingCalled` events into the sink channel.

use std::time::Duration;

use {
    async_trait::async_trait,
    base64::{Engine, engine::general_purpose::STANDARD as BASE64},
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page,
        cdp::{
            browser_protocol::page::CaptureScreenshotFormat,
            js_protocol::runtime::{AddBindingParams, EnableParams, EventBindingCalled},
        },
    },
    futures::StreamExt,
    tokio::sync::{Mutex, mpsc},
    tracing::{debug, info, warn},
};

use crate::{
    backend::{IsolatedContext, PreviewBackend},
    error::SandboxError,
    relay::RELAY_BINDING,
    types::SandboxConfig,
};

// ── Backend ─────────────────────────────────────────────────────────────────

/// Preview backend driving headless Chrome/Chromium over CDP.
pub struct HeadlessBackend {
    config: SandboxConfig,
    browser: Mutex<Option<Browser>>,
}

impl HeadlessBackend {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            browser: Mutex::new(None),
        }
    }

    async fn launch(&self) -> Result<Browser, SandboxError> {
        let Some(executable) = crate::detect::find_executable(self.config.executable.as_deref())
        else {
            return Err(SandboxError::BrowserNotAvailable(
                crate::detect::install_instructions(),
            ));
        };

        let mut builder = CdpBrowserConfig::builder()
            .chrome_executable(&executable)
            .viewport(chromiumoxide::handler::viewport::Viewport {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(Duration::from_millis(self.config.request_timeout_ms))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        for arg in &self.config.extra_args {
            builder = builder.arg(arg);
        }

        let config = builder.build().map_err(|e| {
            SandboxError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        // Launch can hang on a half-dead browser process; bound it by the
        // CDP request timeout.
        let launched = tokio::time::timeout(
            Duration::from_millis(self.config.request_timeout_ms),
            Browser::launch(config),
        )
        .await
        .map_err(|_| {
            SandboxError::Timeout(format!(
                "browser launch exceeded {}ms",
                self.config.request_timeout_ms
            ))
        })?;
        let (browser, mut handler) = launched.map_err(|e| {
            let install_hint = crate::detect::install_instructions();
            SandboxError::LaunchFailed(format!("browser launch failed: {e}\n\n{install_hint}"))
        })?;

        // Drive CDP events for the life of the browser.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
            debug!("browser event handler exited");
        });

        info!(path = %executable.display(), "launched headless browser");
        Ok(browser)
    }

    /// Opens a fresh page, launching the browser on first use. A dead
    /// browser is dropped so the next render relaunches.
    async fn open_page(&self) -> Result<Page, SandboxError> {
        let mut guard = self.browser.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let Some(browser) = guard.as_ref() else {
            return Err(SandboxError::BrowserNotAvailable(
                "browser went away during launch".into(),
            ));
        };

        match browser.new_page("about:blank").await {
            Ok(page) => Ok(page),
            Err(e) => {
                warn!(error = %e, "new page failed, dropping browser for relaunch");
                *guard = None;
                Err(SandboxError::ContextFailed(e.to_string()))
            },
        }
    }
}

#[async_trait]
impl PreviewBackend for HeadlessBackend {
    async fn create_context(
        &self,
        document: String,
        relay_tx: mpsc::UnboundedSender<String>,
    ) -> Result<Box<dyn IsolatedContext>, SandboxError> {
        let page = self.open_page().await?;

        // Install the host channel before any document script can run.
        page.execute(EnableParams::default()).await?;
        let binding = AddBindingParams::builder()
            .name(RELAY_BINDING)
            .build()
            .map_err(SandboxError::Cdp)?;
        page.execute(binding).await?;

        // Subscribe before navigating so no early console call is lost.
        let mut events = page.event_listener::<EventBindingCalled>().await?;
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.name != RELAY_BINDING {
                    continue;
                }
                if relay_tx.send(event.payload.clone()).is_err() {
                    break;
                }
            }
            debug!("relay pump exited");
        });

        page.goto(data_url(&document))
            .await
            .map_err(|e| SandboxError::NavigationFailed(e.to_string()))?;
        let _ = page.wait_for_navigation().await;

        debug!(bytes = document.len(), "isolated context created");
        Ok(Box::new(HeadlessContext { page }))
    }
}

/// Encodes a preview document as a navigable opaque-origin URL.
fn data_url(document: &str) -> String {
    format!(
        "data:text/html;charset=utf-8;base64,{}",
        BASE64.encode(document.as_bytes())
    )
}

// ── Context ─────────────────────────────────────────────────────────────────

struct HeadlessContext {
    page: Page,
}

#[async_trait]
impl IsolatedContext for HeadlessContext {
    async fn screenshot(&self) -> Result<Vec<u8>, SandboxError> {
        self.page
            .screenshot(
                chromiumoxide::page::ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await
            .map_err(|e| SandboxError::ScreenshotFailed(e.to_string()))
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.page.close().await {
            debug!(error = %e, "page close failed");
        }
    }
}
