//! In-memory transport with a scripted server handle.
//!
//! [`sim_pair`] yields the two ends of a simulated session: the
//! [`SimTransport`] goes into the runtime under test, the [`SimServer`]
//! stays with the test. The server handle is the oracle — it records every
//! push the client makes and controls everything the real server would:
//! snapshot and error events, duplex drops, and the scripted outcomes of the
//! one-shot calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use felt_client::error::ClientError;
use felt_client::transport::{Transport, TransportEvent};
use felt_proto::{ClientEvent, GameSnapshot};

#[derive(Default)]
struct SimState {
    sent: Vec<ClientEvent>,
    create_responses: VecDeque<Result<GameSnapshot, ClientError>>,
    advance_responses: VecDeque<Result<GameSnapshot, ClientError>>,
    connected: bool,
    connect_count: u32,
}

/// Scripted server side of a simulated session.
#[derive(Clone)]
pub struct SimServer {
    state: Arc<Mutex<SimState>>,
    events: mpsc::UnboundedSender<TransportEvent>,
}

/// Client side of a simulated session; hand this to the runtime.
pub struct SimTransport {
    state: Arc<Mutex<SimState>>,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
}

/// Create a connected transport/server pair.
pub fn sim_pair() -> (SimTransport, SimServer) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let state = Arc::new(Mutex::new(SimState::default()));

    let transport =
        SimTransport { state: Arc::clone(&state), events: events_rx, events_tx: events_tx.clone() };
    let server = SimServer { state, events: events_tx };
    (transport, server)
}

impl SimServer {
    fn state(&self) -> std::sync::MutexGuard<'_, SimState> {
        // The harness is the only holder; a poisoned lock means a test
        // already panicked and is tearing down.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Push a replacement snapshot over the duplex channel.
    pub fn push_snapshot(&self, snapshot: GameSnapshot) {
        let _ = self.events.send(TransportEvent::Snapshot(snapshot));
    }

    /// Push a client-scoped error over the duplex channel.
    pub fn push_error(&self, message: impl Into<String>) {
        let _ = self.events.send(TransportEvent::ServerError(message.into()));
    }

    /// Drop the duplex link, as a network failure would.
    pub fn drop_link(&self) {
        self.state().connected = false;
        let _ = self.events.send(TransportEvent::Down);
    }

    /// Re-establish the duplex link, as the transport's reconnection would.
    pub fn restore_link(&self) {
        self.state().connected = true;
        let _ = self.events.send(TransportEvent::Up);
    }

    /// Script the outcome of the next create-game call.
    pub fn enqueue_create(&self, outcome: Result<GameSnapshot, ClientError>) {
        self.state().create_responses.push_back(outcome);
    }

    /// Script the outcome of the next next-hand call.
    pub fn enqueue_advance(&self, outcome: Result<GameSnapshot, ClientError>) {
        self.state().advance_responses.push_back(outcome);
    }

    /// Every event the client has pushed so far, in order.
    pub fn sent(&self) -> Vec<ClientEvent> {
        self.state().sent.clone()
    }

    /// Drain the recorded pushes.
    pub fn take_sent(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.state().sent)
    }

    /// Number of join pushes recorded so far.
    pub fn joins(&self) -> usize {
        self.state().sent.iter().filter(|e| matches!(e, ClientEvent::Join { .. })).count()
    }

    /// How many times the client attempted to bring the link up.
    pub fn connect_count(&self) -> u32 {
        self.state().connect_count
    }
}

#[async_trait]
impl Transport for SimTransport {
    async fn connect(&mut self) -> Result<(), ClientError> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.connected {
            return Ok(());
        }
        state.connected = true;
        state.connect_count += 1;
        drop(state);

        let _ = self.events_tx.send(TransportEvent::Up);
        Ok(())
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !state.connected {
            return Err(ClientError::TransportUnavailable("duplex link is down".into()));
        }
        debug!(?event, "client push recorded");
        state.sent.push(event);
        Ok(())
    }

    async fn create_game(&mut self, _player_name: &str) -> Result<GameSnapshot, ClientError> {
        let scripted = {
            let mut state = match self.state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            state.create_responses.pop_front()
        };
        scripted
            .unwrap_or_else(|| Err(ClientError::CreateGameFailed("no scripted response".into())))
    }

    async fn advance_hand(&mut self, _game_id: &str) -> Result<GameSnapshot, ClientError> {
        let scripted = {
            let mut state = match self.state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            state.advance_responses.pop_front()
        };
        scripted
            .unwrap_or_else(|| Err(ClientError::AdvanceHandFailed("no scripted response".into())))
    }

    async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }
}
