//! Client-side session and game-state synchronization for a multiplayer
//! Texas hold'em table.
//!
//! The server owns the game — deck, betting rounds, hand resolution — and
//! publishes complete state snapshots over a duplex channel. This crate owns
//! everything between that channel and the screen: the single source of
//! truth for what the player currently sees, connectivity classification
//! with a disconnect grace window, automatic room rejoin after reconnects,
//! and pre-validation of the local player's actions.
//!
//! # Architecture
//!
//! Protocol logic is implemented as deterministic state machines isolated
//! from I/O, time, and scheduling. State transitions produce declarative
//! actions describing intended effects; the [`runtime`] interprets and
//! executes them against a [`transport::Transport`]. This keeps correctness
//! independent of execution concerns and lets the same code run against the
//! production WebSocket transport and the in-memory test harness.
//!
//! # Components
//!
//! - [`store`]: the one mutable cell presentation reads (snapshot, error,
//!   busy flag)
//! - [`link`]: connectivity state machine (grace window, rejoin bookkeeping)
//! - [`gate`]: client-side action pre-validation
//! - [`engine`]: single dispatch point wiring events into store and link
//! - [`runtime`]: orchestration loop and the presentation-facing handle
//! - [`transport`]: transport abstraction; [`net`] is the production
//!   implementation (feature `transport`)
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod gate;
pub mod link;
#[cfg(feature = "transport")]
pub mod net;
pub mod runtime;
pub mod store;
pub mod transport;

pub use engine::{CallOutcome, EngineAction, EngineConfig, EngineEvent, Intent, SyncEngine};
pub use error::ClientError;
pub use gate::{ActionGate, PlannedAction, TableRules};
pub use link::{ConnectionStatus, Link, LinkAction, LinkConfig};
#[cfg(feature = "transport")]
pub use net::{NetConfig, NetTransport};
pub use runtime::{Runtime, RuntimeClosed, SyncHandle, SyncView};
pub use store::SnapshotStore;
pub use transport::{Transport, TransportEvent};
