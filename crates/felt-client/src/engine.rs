//! Synchronization controller.
//!
//! The engine is the single dispatch point of the core: every transport
//! event, one-shot call outcome, UI intent, and timer tick flows through
//! [`SyncEngine::handle`], which updates the snapshot store and the link and
//! returns declarative [`EngineAction`]s for the runtime to execute. The
//! engine itself performs no I/O and reads no clocks — time arrives as a
//! parameter — so every scenario in its test suite runs without a runtime.

use std::time::{Duration, Instant};

use felt_proto::{ActionKind, ClientEvent, GameId, GameSnapshot};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::gate::{ActionGate, TableRules};
use crate::link::{ConnectionStatus, Link, LinkAction, LinkConfig};
use crate::store::SnapshotStore;
use crate::transport::TransportEvent;

/// Timing and rules configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Connectivity classification knobs.
    pub link: LinkConfig,
    /// House betting rules for the action gate.
    pub rules: TableRules,
    /// How long a pushed action may stay unanswered before the busy flag is
    /// released and a timeout error is surfaced.
    pub action_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            rules: TableRules::default(),
            action_timeout: Duration::from_secs(10),
        }
    }
}

/// Intents presentation may issue. These are the only entry points that
/// mutate session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Start a fresh game for the named player.
    NewGame {
        /// Display name for the human seat.
        name: String,
    },
    /// Submit a betting action for the human seat.
    PlayerAction {
        /// Requested action kind; the gate re-derives the real one.
        action: ActionKind,
        /// Proposed total contribution for the round.
        amount: u32,
    },
    /// Ask the server to deal the next hand of the current game.
    NextHand,
}

/// Outcome of a one-shot request/response call, fed back by the runtime.
#[derive(Debug)]
pub enum CallOutcome {
    /// Result of a create-game call.
    Created(Result<GameSnapshot, ClientError>),
    /// Result of a next-hand call.
    Advanced(Result<GameSnapshot, ClientError>),
}

/// Everything the engine reacts to.
#[derive(Debug)]
pub enum EngineEvent {
    /// An event from the duplex transport.
    Transport(TransportEvent),
    /// Outcome of a previously requested one-shot call.
    Call(CallOutcome),
    /// A UI intent.
    Intent(Intent),
    /// Periodic timer tick.
    Tick,
}

/// Directives for the runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    /// Push an event over the duplex channel.
    Send(ClientEvent),
    /// Issue the create-game call and feed the outcome back as
    /// [`CallOutcome::Created`].
    CreateGame {
        /// Display name for the human seat.
        player_name: String,
    },
    /// Issue the next-hand call and feed the outcome back as
    /// [`CallOutcome::Advanced`].
    AdvanceHand {
        /// Game to advance.
        game_id: GameId,
    },
}

/// The synchronization state machine.
pub struct SyncEngine {
    store: SnapshotStore,
    link: Link,
    gate: ActionGate,
    game_id: Option<GameId>,
    reply_deadline: Option<Instant>,
    action_timeout: Duration,
}

impl SyncEngine {
    /// Build an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: SnapshotStore::default(),
            link: Link::new(config.link),
            gate: ActionGate::new(config.rules),
            game_id: None,
            reply_deadline: None,
            action_timeout: config.action_timeout,
        }
    }

    /// Latest authoritative snapshot, if any.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.store.snapshot()
    }

    /// Derived connectivity classification.
    pub fn status(&self) -> ConnectionStatus {
        self.link.status()
    }

    /// Whether a request is in flight.
    pub fn busy(&self) -> bool {
        self.store.busy()
    }

    /// Last stored error, if any.
    pub fn error(&self) -> Option<&ClientError> {
        self.store.error()
    }

    /// Identifier of the current game, retained across snapshot churn so a
    /// reconnect can rejoin the room.
    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    /// Dispatch one event to completion and return the directives it
    /// produced.
    pub fn handle(&mut self, event: EngineEvent, now: Instant) -> Vec<EngineAction> {
        match event {
            EngineEvent::Transport(event) => self.on_transport(event, now),
            EngineEvent::Call(outcome) => self.on_call(outcome),
            EngineEvent::Intent(intent) => self.on_intent(intent, now),
            EngineEvent::Tick => self.on_tick(now),
        }
    }

    fn on_transport(&mut self, event: TransportEvent, now: Instant) -> Vec<EngineAction> {
        match event {
            TransportEvent::Up => {
                info!("duplex channel up");
                self.link
                    .up()
                    .into_iter()
                    .map(|LinkAction::Join(game_id)| {
                        debug!(%game_id, "rejoining game room");
                        EngineAction::Send(ClientEvent::Join { game_id })
                    })
                    .collect()
            },
            TransportEvent::Down => {
                debug!("duplex channel down, grace window armed");
                self.link.down(now);
                Vec::new()
            },
            TransportEvent::Snapshot(snapshot) => self.adopt(snapshot),
            TransportEvent::ServerError(message) => {
                warn!(%message, "server rejected");
                self.reply_deadline = None;
                self.store.apply_error(ClientError::ServerRejected(message));
                Vec::new()
            },
        }
    }

    /// Adopt a replacement snapshot, joining its event room when the game id
    /// is new. The join subscription is idempotent server-side, so a
    /// duplicate for an already-joined room is harmless.
    fn adopt(&mut self, snapshot: GameSnapshot) -> Vec<EngineAction> {
        self.reply_deadline = None;

        let mut actions = Vec::new();
        if self.game_id.as_deref() != Some(snapshot.game_id.as_str()) {
            info!(game_id = %snapshot.game_id, "joined new game");
            self.game_id = Some(snapshot.game_id.clone());
            self.link.set_room(snapshot.game_id.clone());
            actions.push(EngineAction::Send(ClientEvent::Join {
                game_id: snapshot.game_id.clone(),
            }));
        }

        debug!(stage = ?snapshot.stage, pot = snapshot.pot, "snapshot adopted");
        self.store.apply_update(snapshot);
        actions
    }

    fn on_call(&mut self, outcome: CallOutcome) -> Vec<EngineAction> {
        match outcome {
            CallOutcome::Created(Ok(snapshot)) | CallOutcome::Advanced(Ok(snapshot)) => {
                self.adopt(snapshot)
            },
            CallOutcome::Created(Err(error)) | CallOutcome::Advanced(Err(error)) => {
                warn!(%error, "one-shot call failed");
                self.store.apply_error(error);
                Vec::new()
            },
        }
    }

    fn on_intent(&mut self, intent: Intent, now: Instant) -> Vec<EngineAction> {
        match intent {
            Intent::NewGame { name } => {
                self.store.begin_request();
                vec![EngineAction::CreateGame { player_name: name }]
            },
            Intent::NextHand => {
                // Ignored while another request is in flight or before any
                // game exists.
                if self.store.busy() {
                    return Vec::new();
                }
                let Some(game_id) = self.game_id.clone() else {
                    return Vec::new();
                };
                self.store.begin_request();
                vec![EngineAction::AdvanceHand { game_id }]
            },
            Intent::PlayerAction { action, amount } => {
                let Some(plan) = self.gate.plan(self.store.snapshot(), action, amount) else {
                    debug!(?action, amount, "action gated off");
                    return Vec::new();
                };
                let Some(snapshot) = self.store.snapshot() else {
                    return Vec::new();
                };
                let Some(human) = snapshot.human() else {
                    return Vec::new();
                };

                let event = ClientEvent::Action {
                    game_id: snapshot.game_id.clone(),
                    player_id: human.id,
                    action: plan.action,
                    amount: plan.amount,
                };

                // Completion is asynchronous: busy stays set until the next
                // snapshot or error push, bounded by the reply deadline.
                self.store.begin_request();
                self.reply_deadline = Some(now + self.action_timeout);
                debug!(action = ?plan.action, amount = plan.amount, "action dispatched");
                vec![EngineAction::Send(event)]
            },
        }
    }

    fn on_tick(&mut self, now: Instant) -> Vec<EngineAction> {
        if self.link.tick(now) {
            warn!("connectivity lost: grace window elapsed without a reconnect");
        }

        if let Some(deadline) = self.reply_deadline {
            if now >= deadline {
                warn!("submitted action went unanswered");
                self.reply_deadline = None;
                self.store.apply_error(ClientError::ActionTimedOut);
            }
        }
        Vec::new()
    }
}
