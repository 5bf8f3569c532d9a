//! Live subscription to the server's task change feed.
//!
//! [`TaskFeed`] connects to the `/api/events` WebSocket endpoint with the
//! caller's bearer token and delivers decoded [`TaskEvent`]s through a
//! channel. The subscription is an explicit, scoped resource: it is
//! created per consumer, and dropping it (or calling
//! [`shutdown`](TaskFeed::shutdown)) tears down the connection and the
//! background reader.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;

use taskhub_model::event::{self, TaskEvent};

/// Errors from establishing the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The URL or token could not form a valid upgrade request.
    #[error("invalid feed request: {0}")]
    Request(String),

    /// The WebSocket connection could not be established (unreachable
    /// host, refused upgrade, rejected credentials).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server did not accept the connection in time.
    #[error("connection timed out")]
    Timeout,
}

/// Timeout for connecting to the events endpoint.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the delivered-events channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A live subscription to the caller's task change feed.
pub struct TaskFeed {
    events: mpsc::Receiver<TaskEvent>,
    reader: tokio::task::JoinHandle<()>,
}

impl TaskFeed {
    /// Connects to the events endpoint (e.g.
    /// `ws://localhost:5000/api/events`), authenticating the upgrade
    /// request with the bearer token.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Request`] if the URL or token cannot form a valid
    ///   request.
    /// - [`FeedError::Timeout`] if the server does not accept in time.
    /// - [`FeedError::Connect`] if the connection or upgrade fails.
    pub async fn connect(ws_url: &str, token: &str) -> Result<Self, FeedError> {
        let mut request = ws_url
            .into_client_request()
            .map_err(|e| FeedError::Request(e.to_string()))?;
        let header = format!("Bearer {token}")
            .parse()
            .map_err(|_| FeedError::Request("token is not a valid header value".to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, header);

        let (ws, _response) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(request))
            .await
            .map_err(|_| {
                tracing::warn!(url = ws_url, "task feed connect timed out");
                FeedError::Timeout
            })?
            .map_err(|e| {
                tracing::warn!(url = ws_url, error = %e, "task feed connect failed");
                FeedError::Connect(e.to_string())
            })?;

        let (_write, mut read) = ws.split();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let reader = tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => match event::decode(text.as_str()) {
                        Ok(task_event) => {
                            if tx.send(task_event).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "undecodable feed event; skipping");
                        }
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {
                        // Ping/pong and binary frames carry nothing for us.
                    }
                }
            }
            tracing::debug!("task feed reader ended");
        });

        Ok(Self { events: rx, reader })
    }

    /// Waits for the next change event. Returns `None` once the feed has
    /// closed and all buffered events are drained.
    pub async fn next_event(&mut self) -> Option<TaskEvent> {
        self.events.recv().await
    }

    /// Non-blocking poll, for cooperative UI loops that drain events on
    /// each tick.
    pub fn try_next_event(&mut self) -> Option<TaskEvent> {
        self.events.try_recv().ok()
    }

    /// Ends the subscription: closes the channel and stops the reader.
    /// Dropping the feed has the same effect.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for TaskFeed {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
