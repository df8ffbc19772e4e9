//! Production transport: WebSocket duplex channel plus a REST client.
//!
//! The duplex side runs on its own task so the orchestration loop never
//! blocks on socket I/O. An unexpected drop triggers automatic reconnection
//! with a fixed backoff and a bounded attempt budget; exhausting the budget
//! leaves the channel down for good, which the engine surfaces as a
//! persistent disconnect rather than an error.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, info, warn};

use felt_proto::{ClientEvent, GameSnapshot, ServerEvent};

use crate::error::ClientError;
use crate::transport::{Transport, TransportEvent};

/// Endpoints and reconnection policy for the production transport.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:5001/ws`.
    pub ws_url: String,
    /// REST base, e.g. `http://127.0.0.1:5001`.
    pub api_url: String,
    /// Fixed delay between reconnection attempts.
    pub reconnect_backoff: Duration,
    /// Connection attempts before the duplex channel gives up for good.
    pub max_reconnect_attempts: u32,
}

impl NetConfig {
    /// Policy defaults for the given endpoints: one-second backoff, twenty
    /// attempts.
    pub fn new(ws_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            api_url: api_url.into(),
            reconnect_backoff: Duration::from_secs(1),
            max_reconnect_attempts: 20,
        }
    }
}

/// Production [`Transport`] over tokio-tungstenite and reqwest.
pub struct NetTransport {
    config: NetConfig,
    http: reqwest::Client,
    events: mpsc::Receiver<TransportEvent>,
    // Keeps the event channel open after the worker exits, so `next_event`
    // pends instead of ending the runtime when the retry budget runs out.
    events_tx: mpsc::Sender<TransportEvent>,
    outbound: mpsc::UnboundedSender<String>,
    outbound_rx: Option<mpsc::UnboundedReceiver<String>>,
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl NetTransport {
    /// Build a transport for the given endpoints. The duplex channel is not
    /// opened until [`Transport::connect`].
    pub fn new(config: NetConfig) -> Self {
        let (events_tx, events) = mpsc::channel(64);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        Self {
            config,
            http: reqwest::Client::new(),
            events,
            events_tx,
            outbound,
            outbound_rx: Some(outbound_rx),
            worker: None,
        }
    }

    async fn fetch_snapshot(
        &self,
        url: String,
        body: Option<serde_json::Value>,
        failure: fn(String) -> ClientError,
    ) -> Result<GameSnapshot, ClientError> {
        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|error| ClientError::TransportUnavailable(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!("server returned {status}")));
        }
        response.json::<GameSnapshot>().await.map_err(|error| failure(error.to_string()))
    }
}

#[async_trait]
impl Transport for NetTransport {
    async fn connect(&mut self) -> Result<(), ClientError> {
        // Idempotent: the duplex worker is spawned at most once.
        let Some(outbound_rx) = self.outbound_rx.take() else {
            return Ok(());
        };
        self.worker = Some(tokio::spawn(duplex_worker(
            self.config.clone(),
            self.events_tx.clone(),
            outbound_rx,
        )));
        Ok(())
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError> {
        let raw = event
            .encode()
            .map_err(|error| ClientError::TransportUnavailable(error.to_string()))?;
        self.outbound
            .send(raw)
            .map_err(|_| ClientError::TransportUnavailable("duplex channel closed".into()))
    }

    async fn create_game(&mut self, player_name: &str) -> Result<GameSnapshot, ClientError> {
        let url = format!("{}/api/game", self.config.api_url);
        let body = serde_json::json!({ "playerName": player_name });
        self.fetch_snapshot(url, Some(body), ClientError::CreateGameFailed).await
    }

    async fn advance_hand(&mut self, game_id: &str) -> Result<GameSnapshot, ClientError> {
        let url = format!("{}/api/game/{game_id}/next", self.config.api_url);
        self.fetch_snapshot(url, None, ClientError::AdvanceHandFailed).await
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }
}

impl Drop for NetTransport {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

/// Owns the WebSocket for its whole lifecycle: connect, pump frames both
/// ways, report drops, retry within the budget.
async fn duplex_worker(
    config: NetConfig,
    events: mpsc::Sender<TransportEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let mut attempts: u32 = 0;
    loop {
        match connect_async(config.ws_url.as_str()).await {
            Ok((stream, _)) => {
                attempts = 0;
                info!(url = %config.ws_url, "duplex channel up");
                if events.send(TransportEvent::Up).await.is_err() {
                    return;
                }

                let (mut sink, mut source) = stream.split();
                loop {
                    tokio::select! {
                        frame = outbound.recv() => match frame {
                            Some(raw) => {
                                if sink.send(Message::text(raw)).await.is_err() {
                                    break;
                                }
                            },
                            // Transport dropped; we are shutting down.
                            None => return,
                        },
                        inbound = source.next() => match inbound {
                            Some(Ok(Message::Text(raw))) => {
                                if pump_frame(raw.as_str(), &events).await.is_err() {
                                    return;
                                }
                            },
                            Some(Ok(Message::Close(_))) | None => break,
                            // Ping/pong are answered by tungstenite itself.
                            Some(Ok(_)) => {},
                            Some(Err(error)) => {
                                warn!(%error, "duplex read failed");
                                break;
                            },
                        },
                    }
                }

                if events.send(TransportEvent::Down).await.is_err() {
                    return;
                }
            },
            Err(error) => {
                debug!(%error, attempt = attempts, "connect attempt failed");
            },
        }

        attempts += 1;
        if attempts >= config.max_reconnect_attempts {
            warn!(attempts, "reconnection budget exhausted; duplex channel stays down");
            return;
        }
        tokio::time::sleep(config.reconnect_backoff).await;
    }
}

/// Decode one inbound frame and forward it. `Err` means the consumer is
/// gone and the worker should stop.
async fn pump_frame(raw: &str, events: &mpsc::Sender<TransportEvent>) -> Result<(), ()> {
    let event = match ServerEvent::decode(raw) {
        Ok(ServerEvent::Update(snapshot)) => TransportEvent::Snapshot(snapshot),
        Ok(ServerEvent::Error { message }) => TransportEvent::ServerError(message),
        Err(error) => {
            warn!(%error, "undecodable server frame dropped");
            return Ok(());
        },
    };
    events.send(event).await.map_err(|_| ())
}
