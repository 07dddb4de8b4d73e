//! Backend event frames and fan-out to per-channel listeners

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::common::channels::create_event_channel;
use crate::common::errors::Result;

/// One pushed event as it arrives on the event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    /// Channel name, e.g. `progress`
    pub event: String,
    /// Event body
    #[serde(default)]
    pub payload: Value,
}

impl EventFrame {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Registry of listeners keyed by event name
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    listeners: Arc<RwLock<HashMap<String, Vec<mpsc::Sender<Value>>>>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener for `event`
    pub async fn subscribe(&self, event: &str) -> mpsc::Receiver<Value> {
        let (tx, rx) = create_event_channel();
        self.listeners
            .write()
            .await
            .entry(event.to_string())
            .or_default()
            .push(tx);
        debug!(event, "listener registered");
        rx
    }

    /// Deliver a frame to every live listener of its channel
    ///
    /// Returns the number of listeners that received it. Listeners whose
    /// receiver has been dropped are forgotten.
    pub async fn dispatch(&self, frame: EventFrame) -> usize {
        let senders = match self.listeners.read().await.get(&frame.event) {
            Some(senders) => senders.clone(),
            None => {
                debug!(event = %frame.event, "no listener for event");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = false;
        for tx in &senders {
            if tx.send(frame.payload.clone()).await.is_ok() {
                delivered += 1;
            } else {
                closed = true;
            }
        }

        if closed {
            warn!(event = %frame.event, "dropping closed listeners");
            self.prune(&frame.event).await;
        }

        delivered
    }

    /// Forget listeners of `event` whose receiver has been dropped
    pub async fn prune(&self, event: &str) {
        if let Some(list) = self.listeners.write().await.get_mut(event) {
            list.retain(|tx| !tx.is_closed());
        }
    }

    /// Close every listener channel
    pub async fn close_all(&self) {
        self.listeners.write().await.clear();
    }

    #[cfg(test)]
    pub(crate) async fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().await.get(event).map_or(0, Vec::len)
    }
}
