//! Duplex-channel event envelopes.
//!
//! Every frame on the duplex channel is a tagged JSON object:
//! `{"event": <name>, "data": <payload>}`. The client pushes `join` and
//! `action`; the server pushes `update` and `error`. Unknown event names are
//! a decode error — the dispatch table in the client is exhaustive, so an
//! unrecognized tag means a protocol mismatch, not something to skip.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::snapshot::{GameId, GameSnapshot, PlayerId};

/// A betting action as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Discard the hand.
    Fold,
    /// Pass with nothing owed.
    Check,
    /// Match the outstanding bet.
    Call,
    /// Open the betting this round.
    Bet,
    /// Increase an outstanding bet.
    Raise,
}

impl ActionKind {
    /// Whether the action commits chips and therefore carries an amount.
    pub fn wagers(self) -> bool {
        matches!(self, Self::Call | Self::Bet | Self::Raise)
    }
}

/// Events the client pushes to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ClientEvent {
    /// Subscribe to a game's event room. Idempotent; re-sent after every
    /// reconnect so pushes resume for the same game.
    Join {
        /// Game to (re)subscribe to.
        #[serde(rename = "gameId")]
        game_id: GameId,
    },
    /// Submit a betting action. Fire-and-forget: the authoritative outcome
    /// arrives later as an `update` or `error` push.
    Action {
        /// Game the action belongs to.
        #[serde(rename = "gameId")]
        game_id: GameId,
        /// Acting seat.
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        /// The action taken.
        action: ActionKind,
        /// Total contribution for the round; zero for fold.
        amount: u32,
    },
}

/// Events the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerEvent {
    /// Full replacement snapshot.
    Update(GameSnapshot),
    /// A rule violation or server-side failure, scoped to this client.
    Error {
        /// Human-readable description.
        message: String,
    },
}

impl ClientEvent {
    /// Encode for the duplex channel.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ServerEvent {
    /// Decode a frame received on the duplex channel.
    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_envelope_shape() {
        let encoded = ClientEvent::Join { game_id: "g1".into() }.encode().unwrap();
        assert_eq!(encoded, r#"{"event":"join","data":{"gameId":"g1"}}"#);
    }

    #[test]
    fn action_envelope_shape() {
        let event = ClientEvent::Action {
            game_id: "g1".into(),
            player_id: 0,
            action: ActionKind::Raise,
            amount: 80,
        };
        assert_eq!(
            event.encode().unwrap(),
            r#"{"event":"action","data":{"gameId":"g1","playerId":0,"action":"raise","amount":80}}"#
        );
    }

    #[test]
    fn decodes_error_push() {
        let event = ServerEvent::decode(r#"{"event":"error","data":{"message":"Not this player's turn"}}"#)
            .unwrap();
        assert_eq!(event, ServerEvent::Error { message: "Not this player's turn".into() });
    }

    #[test]
    fn rejects_unknown_event_tag() {
        assert!(ServerEvent::decode(r#"{"event":"chat","data":{}}"#).is_err());
    }

    #[test]
    fn only_wagering_actions_carry_amounts() {
        assert!(!ActionKind::Fold.wagers());
        assert!(!ActionKind::Check.wagers());
        assert!(ActionKind::Raise.wagers());
    }
}
