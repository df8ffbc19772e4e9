//! Orchestration loop and the presentation-facing handle.
//!
//! The runtime owns a [`Transport`] and a [`SyncEngine`], pumps events
//! between them, and publishes a [`SyncView`] after every dispatch.
//! Presentation holds a [`SyncHandle`]: a watch receiver for the view plus a
//! queue for the three intents. Everything runs on one task — each event is
//! dispatched to completion before the next is taken, so store mutations are
//! never observable half-applied.
//!
//! Teardown is deterministic: dropping the last handle closes the intent
//! queue, the loop exits, and the transport, its subscription, and the tick
//! timer all die with it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::warn;

use felt_proto::{ActionKind, GameSnapshot};

use crate::engine::{CallOutcome, EngineAction, EngineConfig, EngineEvent, Intent, SyncEngine};
use crate::error::ClientError;
use crate::link::ConnectionStatus;
use crate::transport::Transport;

/// Engine tick cadence; bounds how stale the grace-window and reply-deadline
/// checks can be.
const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Capacity of the intent queue. Intents are human-paced; a small buffer is
/// plenty.
const INTENT_QUEUE: usize = 16;

/// The runtime has shut down and no longer accepts intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sync runtime has shut down")]
pub struct RuntimeClosed;

/// Read model published to presentation after every dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncView {
    /// Latest authoritative snapshot, if any.
    pub snapshot: Option<GameSnapshot>,
    /// Derived connectivity classification.
    pub status: ConnectionStatus,
    /// Whether a request is in flight.
    pub busy: bool,
    /// Last error, rendered for display.
    pub error: Option<String>,
}

/// Cloneable handle presentation uses to observe state and issue intents.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    intents: mpsc::Sender<Intent>,
    view: watch::Receiver<SyncView>,
}

impl SyncHandle {
    /// Current published view.
    pub fn view(&self) -> SyncView {
        self.view.borrow().clone()
    }

    /// Wait until the published view changes. Returns `false` once the
    /// runtime has shut down.
    pub async fn changed(&mut self) -> bool {
        self.view.changed().await.is_ok()
    }

    /// Start a fresh game for the named player.
    pub async fn new_game(&self, name: impl Into<String>) -> Result<(), RuntimeClosed> {
        self.intent(Intent::NewGame { name: name.into() }).await
    }

    /// Submit a betting action for the human seat.
    pub async fn player_action(&self, action: ActionKind, amount: u32) -> Result<(), RuntimeClosed> {
        self.intent(Intent::PlayerAction { action, amount }).await
    }

    /// Ask the server to deal the next hand.
    pub async fn next_hand(&self) -> Result<(), RuntimeClosed> {
        self.intent(Intent::NextHand).await
    }

    async fn intent(&self, intent: Intent) -> Result<(), RuntimeClosed> {
        self.intents.send(intent).await.map_err(|_| RuntimeClosed)
    }
}

/// Drives a [`Transport`] and a [`SyncEngine`] until the last [`SyncHandle`]
/// is dropped or the transport shuts down for good.
pub struct Runtime<T: Transport> {
    engine: SyncEngine,
    transport: T,
    intents: mpsc::Receiver<Intent>,
    view: watch::Sender<SyncView>,
}

impl<T: Transport> Runtime<T> {
    /// Build a runtime around an owned transport. Returns the runtime and
    /// the handle presentation keeps.
    pub fn new(transport: T, config: EngineConfig) -> (Self, SyncHandle) {
        let engine = SyncEngine::new(config);
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_QUEUE);
        let (view_tx, view_rx) = watch::channel(render(&engine));

        let runtime = Runtime { engine, transport, intents: intent_rx, view: view_tx };
        let handle = SyncHandle { intents: intent_tx, view: view_rx };
        (runtime, handle)
    }

    /// Run the loop to completion.
    pub async fn run(mut self) -> Result<(), ClientError> {
        self.transport.connect().await?;

        let mut tick = tokio::time::interval(TICK_PERIOD);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            let actions = tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(intent) => self.engine.handle(EngineEvent::Intent(intent), Instant::now()),
                    None => break,
                },
                event = self.transport.next_event() => match event {
                    Some(event) => {
                        self.engine.handle(EngineEvent::Transport(event), Instant::now())
                    },
                    None => break,
                },
                _ = tick.tick() => self.engine.handle(EngineEvent::Tick, Instant::now()),
            };

            self.execute(actions).await;
            self.publish();
        }
        Ok(())
    }

    /// Execute directives, feeding one-shot call outcomes straight back into
    /// the engine until the queue drains.
    async fn execute(&mut self, actions: Vec<EngineAction>) {
        let mut queue: VecDeque<EngineAction> = actions.into();

        while let Some(action) = queue.pop_front() {
            match action {
                EngineAction::Send(event) => {
                    if let Err(error) = self.transport.send(event).await {
                        warn!(%error, "duplex push failed");
                    }
                },
                EngineAction::CreateGame { player_name } => {
                    let outcome = self.transport.create_game(&player_name).await;
                    queue.extend(self.engine.handle(
                        EngineEvent::Call(CallOutcome::Created(outcome)),
                        Instant::now(),
                    ));
                },
                EngineAction::AdvanceHand { game_id } => {
                    let outcome = self.transport.advance_hand(&game_id).await;
                    queue.extend(self.engine.handle(
                        EngineEvent::Call(CallOutcome::Advanced(outcome)),
                        Instant::now(),
                    ));
                },
            }
        }
    }

    fn publish(&mut self) {
        let next = render(&self.engine);
        self.view.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

fn render(engine: &SyncEngine) -> SyncView {
    SyncView {
        snapshot: engine.snapshot().cloned(),
        status: engine.status(),
        busy: engine.busy(),
        error: engine.error().map(ToString::to_string),
    }
}
