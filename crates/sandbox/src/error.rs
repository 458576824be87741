//! Sandbox error types.

use thiserror::Error;

/// Errors that can occur while driving the preview sandbox.
///
/// None of these ever originate from the snippet itself: malformed or
/// hostile source text is absorbed inside the isolated context and never
/// surfaces here. These cover the host-side machinery only (launching the
/// backend, creating a context, capturing output).
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("browser not available: {0}")]
    BrowserNotAvailable(String),

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("context creation failed: {0}")]
    ContextFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<chromiumoxide::error::CdpError> for SandboxError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        SandboxError::Cdp(err.to_string())
    }
}
