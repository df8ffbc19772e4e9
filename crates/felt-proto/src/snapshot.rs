//! Authoritative game-state snapshots.
//!
//! A [`GameSnapshot`] is the server's complete description of one table at a
//! point in time. The protocol has no partial updates: whatever the client
//! holds is replaced wholesale by the next snapshot. Fields the server
//! omits for quiet streets (`winners`) or encodes with a sentinel
//! (`activePlayerId` of `-1` when nobody is to act) are normalized during
//! decode so the model carries no magic values.

use serde::{Deserialize, Deserializer, Serialize};

use crate::card::Card;

/// Opaque game session identifier, stable for the lifetime of one game.
pub type GameId = String;

/// Seat index assigned by the server.
pub type PlayerId = u32;

/// Betting-round progression for one hand.
///
/// Stages only move forward; the sole way back to [`Stage::PreFlop`] is an
/// explicit next-hand request after [`Stage::HandOver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Hole cards dealt, blinds posted, first betting round.
    #[serde(rename = "PRE_FLOP")]
    PreFlop,
    /// Three community cards on the board.
    #[serde(rename = "FLOP")]
    Flop,
    /// Fourth community card.
    #[serde(rename = "TURN")]
    Turn,
    /// Fifth community card, final betting round.
    #[serde(rename = "RIVER")]
    River,
    /// Remaining hands revealed, pot being resolved.
    #[serde(rename = "SHOWDOWN")]
    Showdown,
    /// Hand resolved; waiting for a next-hand request.
    #[serde(rename = "HAND_OVER")]
    HandOver,
}

/// One seat at the table as the server reports it to this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Seat index.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Chips behind (not yet committed to the pot).
    pub chips: u32,
    /// Hole cards; redacted for seats this client may not see, empty before
    /// the deal.
    #[serde(default)]
    pub hand: Vec<Card>,
    /// Amount this player has committed in the current betting round.
    pub current_bet: u32,
    /// Whether the player has folded this hand.
    pub is_folded: bool,
    /// Whether the player is all-in.
    pub is_all_in: bool,
    /// Whether this seat is driven by the local human.
    pub is_human: bool,
    /// Label of the player's most recent action, if any.
    #[serde(default)]
    pub last_action: Option<String>,
}

/// Complete table state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Session identifier, stable for the lifetime of one game.
    pub game_id: GameId,
    /// Current chip total in the pot.
    pub pot: u32,
    /// Board cards dealt so far.
    #[serde(default)]
    pub community_cards: Vec<Card>,
    /// Seat whose turn it is, if an action is pending. The wire may encode
    /// "nobody" as `-1`, `null`, or omission; all three decode to `None`.
    #[serde(default, deserialize_with = "seat_or_none")]
    pub active_player_id: Option<PlayerId>,
    /// All seats at the table, in seating order.
    pub players: Vec<Player>,
    /// Betting-round progression.
    pub stage: Stage,
    /// Seat holding the dealer button this hand.
    pub dealer_id: PlayerId,
    /// Seat that posted the small blind this hand.
    pub small_blind_player_id: PlayerId,
    /// Seat that posted the big blind this hand.
    pub big_blind_player_id: PlayerId,
    /// Highest committed bet this round; the minimum total a player must
    /// match to stay in the hand.
    pub bet_to_call: u32,
    /// Seats sharing the pot; populated only at [`Stage::HandOver`].
    #[serde(default)]
    pub winners: Vec<PlayerId>,
}

impl GameSnapshot {
    /// The locally controlled seat, if the table has one.
    pub fn human(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_human)
    }

    /// Look up a seat by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Whether the pending action belongs to the local human seat.
    pub fn is_humans_turn(&self) -> bool {
        match (self.human(), self.active_player_id) {
            (Some(human), Some(active)) => human.id == active,
            _ => false,
        }
    }
}

/// Accept `-1`, `null`, or a non-negative seat index.
fn seat_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PlayerId>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| PlayerId::try_from(v).ok()))
}
