//! Channel type definitions for backend event delivery

use serde_json::Value;
use tokio::sync::mpsc;

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Event channel carrying backend progress percentages
pub const PROGRESS_EVENT: &str = "progress";

/// Create a new backend event channel with the default buffer size
pub fn create_event_channel() -> (mpsc::Sender<Value>, mpsc::Receiver<Value>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}
