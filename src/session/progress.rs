//! Progress listener driving the loading indicator from backend events

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::loading::{LoadingIndicator, ProgressOutcome};

/// Clamp a raw percentage into `0.0..=100.0`
pub fn clamp_percent(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}

/// Extract a percentage from an event payload
///
/// The backend emits bare numbers; numeric strings are accepted too.
pub fn parse_progress(payload: &Value) -> Option<f64> {
    match payload {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Consumes the backend's `progress` channel for the whole session
pub struct ProgressListener {
    indicator: Arc<LoadingIndicator>,
}

impl ProgressListener {
    pub fn new(indicator: Arc<LoadingIndicator>) -> Self {
        Self { indicator }
    }

    /// Handle one event payload
    pub fn handle(&self, payload: &Value) -> ProgressOutcome {
        let Some(raw) = parse_progress(payload) else {
            warn!(%payload, "ignoring non-numeric progress payload");
            return ProgressOutcome::Ignored;
        };

        let outcome = self.indicator.apply_progress(clamp_percent(raw));
        match outcome {
            ProgressOutcome::Completed { .. } => debug!("progress complete, loading torn down"),
            ProgressOutcome::Ignored => debug!(raw, "progress with no indicator shown"),
            ProgressOutcome::Updated { .. } => {}
        }
        outcome
    }

    /// Run until the event channel closes
    pub async fn run(self, mut events: mpsc::Receiver<Value>) {
        while let Some(payload) = events.recv().await {
            self.handle(&payload);
        }
        info!("progress channel closed");
    }

    /// Spawn the listener onto the current runtime
    pub fn spawn(self, events: mpsc::Receiver<Value>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }
}
