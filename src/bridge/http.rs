//! HTTP + WebSocket bridge to the backend process
//!
//! Commands are posted to `{base_url}/invoke/{command}` with the named
//! arguments as a JSON body. Events arrive over a single WebSocket at
//! `{ws_url}/events`, one JSON [`EventFrame`] per text message.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::events::{EventFrame, EventRouter};
use crate::common::errors::{AppError, Result};
use crate::common::traits::Bridge;
use crate::config::types::BridgeConfig;

type EventStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How the event stream recovers from a dropped connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Wait before each attempt
    pub delay: Duration,
    /// Consecutive failed attempts before giving up (0 = never)
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            max_attempts: 0,
        }
    }
}

/// Bridge talking to a backend over HTTP for commands and WebSocket for events
#[derive(Debug)]
pub struct HttpBridge {
    /// HTTP client
    client: Client,
    /// Base URL commands are posted under, always ending in `/`
    base_url: Url,
    /// Event stream endpoint
    events_url: Url,
    /// Listeners per event channel
    router: EventRouter,
    /// Whether the event stream task is running
    stream_started: Arc<AtomicBool>,
    /// Event stream recovery
    reconnect: ReconnectPolicy,
}

fn with_trailing_slash(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl HttpBridge {
    /// Create a bridge from configuration
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let bridge = Self::with_timeout(&config.base_url, &config.ws_url, config.request_timeout())?;
        Ok(bridge.with_reconnect(ReconnectPolicy {
            delay: config.reconnect_delay(),
            max_attempts: config.max_reconnect_attempts,
        }))
    }

    /// Replace the event stream reconnection policy
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Create a bridge with a custom request timeout
    pub fn with_timeout(base_url: &str, ws_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let base_url = with_trailing_slash(base_url)?;
        let events_url = with_trailing_slash(ws_url)?.join("events")?;

        Ok(Self {
            client,
            base_url,
            events_url,
            router: EventRouter::new(),
            stream_started: Arc::new(AtomicBool::new(false)),
            reconnect: ReconnectPolicy::default(),
        })
    }

    /// URL a command is posted to
    pub fn command_url(&self, command: &str) -> Result<Url> {
        Ok(self.base_url.join("invoke/")?.join(command)?)
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    /// Decode a successful response body
    ///
    /// An empty body means the command returns nothing. Bodies that are not
    /// JSON are passed through as a string.
    fn decode_body(text: &str) -> Value {
        if text.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    }

    /// Extract the backend's message from an error body
    fn error_message(status: reqwest::StatusCode, text: &str) -> String {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::String(message)) => message,
            Ok(Value::Object(map)) => match map.get("message").or_else(|| map.get("error")) {
                Some(Value::String(message)) => message.clone(),
                _ => Value::Object(map).to_string(),
            },
            _ if text.trim().is_empty() => format!("backend returned status {}", status),
            _ => text.trim().to_string(),
        }
    }

    /// Connect the event stream once and fan frames out to the router
    ///
    /// The reader task outlives dropped connections: it reconnects under the
    /// bridge's [`ReconnectPolicy`] and keeps every subscriber. Subscribers
    /// are closed only once the policy gives up.
    async fn ensure_event_stream(&self) -> Result<()> {
        if self
            .stream_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        info!("Connecting to backend event stream: {}", self.events_url);
        let (ws_stream, _response) = match connect_async(self.events_url.as_str()).await {
            Ok(conn) => conn,
            Err(e) => {
                self.stream_started.store(false, Ordering::SeqCst);
                return Err(AppError::WebSocket(e.to_string()));
            }
        };
        info!("Event stream connected");

        let url = self.events_url.clone();
        let policy = self.reconnect;
        let router = self.router.clone();
        let started = self.stream_started.clone();

        tokio::spawn(async move {
            let mut stream = ws_stream;
            loop {
                read_frames(stream, &router).await;
                match reconnect(&url, policy).await {
                    Some(next) => stream = next,
                    None => break,
                }
            }
            started.store(false, Ordering::SeqCst);
            router.close_all().await;
        });

        Ok(())
    }
}

/// Dispatch frames until the connection closes or fails
async fn read_frames(stream: EventStream, router: &EventRouter) {
    let (_write, mut read) = stream.split();
    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => match EventFrame::parse(&text) {
                Ok(frame) => {
                    router.dispatch(frame).await;
                }
                Err(e) => warn!("Failed to parse event frame: {} - {}", e, text),
            },
            Ok(Message::Close(frame)) => {
                info!("Event stream closed: {:?}", frame);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!("Event stream error: {}", e);
                return;
            }
        }
    }
}

/// Reconnect to `url`, giving up after the policy's attempt budget
async fn reconnect(url: &Url, policy: ReconnectPolicy) -> Option<EventStream> {
    let mut attempt: u32 = 0;
    loop {
        if policy.max_attempts > 0 && attempt >= policy.max_attempts {
            error!(attempts = attempt, "Giving up on event stream: {}", url);
            return None;
        }
        attempt += 1;
        tokio::time::sleep(policy.delay).await;

        match connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                info!(attempt, "Event stream reconnected");
                return Some(stream);
            }
            Err(e) => warn!(attempt, "Event stream reconnect failed: {}", e),
        }
    }
}

#[async_trait]
impl Bridge for HttpBridge {
    #[instrument(skip(self, args))]
    async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        let url = self.command_url(command)?;
        debug!("Posting command to: {}", url);

        let response = self.client.post(url).json(&args).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(Self::decode_body(&text))
        } else {
            let message = Self::error_message(status, &text);
            warn!(%status, "backend rejected command: {}", message);
            Err(AppError::RemoteCall(message))
        }
    }

    #[instrument(skip(self))]
    async fn listen(&self, event: &str) -> Result<mpsc::Receiver<Value>> {
        let rx = self.router.subscribe(event).await;
        if let Err(e) = self.ensure_event_stream().await {
            drop(rx);
            self.router.prune(event).await;
            return Err(e);
        }
        Ok(rx)
    }
}
