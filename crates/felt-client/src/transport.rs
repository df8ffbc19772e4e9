//! Transport abstraction for the game session.
//!
//! One trait covers both channels the client owns: the duplex channel that
//! delivers server pushes, and the two one-shot request/response calls. The
//! runtime receives a transport at construction and owns it outright, so
//! tests can hand in an isolated in-memory implementation instead of
//! touching process-wide state.

use async_trait::async_trait;
use felt_proto::{ClientEvent, GameSnapshot};

use crate::error::ClientError;

/// Events surfaced by the duplex channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The duplex channel came up (initial connection or any reconnection).
    Up,
    /// The duplex channel dropped.
    Down,
    /// The server pushed a replacement snapshot.
    Snapshot(GameSnapshot),
    /// The server pushed an error scoped to this client.
    ServerError(String),
}

/// A session transport: one duplex channel plus the one-shot calls.
///
/// Implementations own their reconnection policy; consumers only observe
/// [`TransportEvent::Up`]/[`TransportEvent::Down`] transitions.
#[async_trait]
pub trait Transport: Send {
    /// Bring up the duplex channel. Idempotent: calling while already up
    /// must not open a second connection.
    async fn connect(&mut self) -> Result<(), ClientError>;

    /// Fire-and-forget push over the duplex channel. The authoritative
    /// outcome arrives later as a [`TransportEvent`], never as a return
    /// value.
    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError>;

    /// One-shot create-game call.
    async fn create_game(&mut self, player_name: &str) -> Result<GameSnapshot, ClientError>;

    /// One-shot next-hand call for an existing game.
    async fn advance_hand(&mut self, game_id: &str) -> Result<GameSnapshot, ClientError>;

    /// Wait for the next duplex event. Returns `None` only when the
    /// transport has shut down for good.
    async fn next_event(&mut self) -> Option<TransportEvent>;
}
