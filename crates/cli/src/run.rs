//! One-shot file rendering.

use std::{path::Path, sync::Arc, time::Duration};

use vitro_sandbox::{HeadlessBackend, Playground, SandboxConfig};

/// Render `path` in a fresh sandbox, wait for its console output to
/// settle, and print each entry as a `[level] text` line.
pub async fn run_file(path: &Path, wait_ms: u64, config: &SandboxConfig) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;

    let backend = Arc::new(HeadlessBackend::new(config.clone()));
    let playground = Playground::new(backend, config);

    playground.run(&source).await?;
    // No completion signal exists for user scripts; a settle window is
    // the best a one-shot run can do.
    tokio::time::sleep(Duration::from_millis(wait_ms)).await;

    for entry in playground.sink().entries() {
        println!("{entry}");
    }
    Ok(())
}
