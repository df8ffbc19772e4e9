//! Wire format for the Felt table-sync protocol.
//!
//! The client talks to the game server over two channels: a duplex channel
//! carrying tagged JSON events in both directions, and a pair of one-shot
//! HTTP calls for creating a game and advancing to the next hand. Both speak
//! the same camelCase JSON shapes defined here.
//!
//! The server is the single authority over game state. It never sends
//! patches: every [`GameSnapshot`] is a complete replacement for whatever the
//! client held before. This crate therefore contains value types only — no
//! protocol logic, no I/O.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod card;
pub mod errors;
pub mod event;
pub mod snapshot;

pub use card::{Card, Rank, Suit};
pub use errors::{ProtocolError, Result};
pub use event::{ActionKind, ClientEvent, ServerEvent};
pub use snapshot::{GameId, GameSnapshot, Player, PlayerId, Stage};
