//! Host console sink.
//!
//! [`ConsoleSink`] receives raw relay payloads from whatever isolated
//! context happens to emit them, validates the marker, and appends display
//! entries to an append-only log. New entries and clears are broadcast to a
//! `tokio::sync::broadcast` channel for real-time streaming to WebSocket
//! clients.
//!
//! The sink is deliberately generation-blind: a payload from a context that
//! has since been replaced is indistinguishable from a current one and is
//! accepted all the same. Nothing here throws — every malformed payload
//! path degrades to "ignore" or "empty text".

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use {
    serde::Serialize,
    serde_json::Value,
    tokio::sync::broadcast,
    tracing::trace,
};

use crate::{
    relay::RELAY_MARKER,
    types::{ConsoleEntry, LogLevel},
};

const DEFAULT_BROADCAST_CAPACITY: usize = 256;

// ── Sink events ─────────────────────────────────────────────────────────────

/// Change notification pushed to live subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SinkEvent {
    /// A new entry was appended.
    Entry(ConsoleEntry),
    /// The log was emptied and hidden.
    Cleared,
}

// ── ConsoleSink ─────────────────────────────────────────────────────────────

/// Append-only console log with a visibility flag.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ConsoleSink {
    entries: Arc<RwLock<Vec<ConsoleEntry>>>,
    visible: Arc<AtomicBool>,
    tx: broadcast::Sender<SinkEvent>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            visible: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    /// Handles one raw payload from the relay channel.
    ///
    /// Payloads that are not JSON objects carrying the marker are dropped
    /// without a trace in the log; well-marked payloads are appended even
    /// when every other field is missing or the wrong shape.
    pub fn accept(&self, payload: &str) {
        let Some(entry) = parse_payload(payload) else {
            trace!(len = payload.len(), "ignoring unmarked relay payload");
            return;
        };

        if let Ok(mut entries) = self.entries.write() {
            entries.push(entry.clone());
            // Same lock as clear: contents and visibility change together,
            // so a racing clear cannot leave a surviving entry hidden.
            self.visible.store(true, Ordering::Relaxed);
        }
        // Best-effort broadcast — receivers may be behind.
        let _ = self.tx.send(SinkEvent::Entry(entry));
    }

    /// Empties the log and hides the area until the next entry arrives.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
            self.visible.store(false, Ordering::Relaxed);
        }
        let _ = self.tx.send(SinkEvent::Cleared);
    }

    /// Snapshot of the current log, oldest first.
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        match self.entries.read() {
            Ok(entries) => entries.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Whether the log area is currently shown (at least one entry arrived
    /// since the last clear).
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SinkEvent> {
        self.tx.subscribe()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

// ── Payload parsing ─────────────────────────────────────────────────────────

/// Defensive relay-payload decode.
///
/// Returns `None` only when the payload is not a marked relay message;
/// every other irregularity degrades field by field: unknown `type` becomes
/// `log`, missing `args` becomes empty text, non-string parts are rendered
/// as compact JSON.
fn parse_payload(payload: &str) -> Option<ConsoleEntry> {
    let value: Value = serde_json::from_str(payload).ok()?;
    if value.get(RELAY_MARKER).and_then(Value::as_bool) != Some(true) {
        return None;
    }

    let level = value
        .get("type")
        .and_then(Value::as_str)
        .map(LogLevel::from_relay_type)
        .unwrap_or(LogLevel::Log);

    let parts: Vec<String> = value
        .get("args")
        .and_then(Value::as_array)
        .map(|args| {
            args.iter()
                .map(|arg| match arg.as_str() {
                    Some(s) => s.to_string(),
                    None => arg.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ConsoleEntry::new(level, parts.join(" ")))
}

// ── Tests ───────────────────────────────────────────────────────────────────
