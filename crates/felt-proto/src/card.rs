//! Playing cards as they appear on the wire.
//!
//! The server encodes a card as a two-character code: rank (`2`-`9`, `T`,
//! `J`, `Q`, `K`, `A`) followed by suit initial (`S`, `H`, `D`, `C`). Hole
//! cards the client is not allowed to see arrive redacted as the literal
//! `BACK`. Redaction is part of the wire contract, so a hidden card is a
//! first-class value here, not a decode failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ProtocolError;

/// Card rank, two through ace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// 2
    Two,
    /// 3
    Three,
    /// 4
    Four,
    /// 5
    Five,
    /// 6
    Six,
    /// 7
    Seven,
    /// 8
    Eight,
    /// 9
    Nine,
    /// 10, encoded as `T`
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace (high)
    Ace,
}

impl Rank {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '2' => Self::Two,
            '3' => Self::Three,
            '4' => Self::Four,
            '5' => Self::Five,
            '6' => Self::Six,
            '7' => Self::Seven,
            '8' => Self::Eight,
            '9' => Self::Nine,
            'T' => Self::Ten,
            'J' => Self::Jack,
            'Q' => Self::Queen,
            'K' => Self::King,
            'A' => Self::Ace,
            _ => return None,
        })
    }

    fn as_char(self) -> char {
        match self {
            Self::Two => '2',
            Self::Three => '3',
            Self::Four => '4',
            Self::Five => '5',
            Self::Six => '6',
            Self::Seven => '7',
            Self::Eight => '8',
            Self::Nine => '9',
            Self::Ten => 'T',
            Self::Jack => 'J',
            Self::Queen => 'Q',
            Self::King => 'K',
            Self::Ace => 'A',
        }
    }
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    /// Spades, encoded as `S`
    Spades,
    /// Hearts, encoded as `H`
    Hearts,
    /// Diamonds, encoded as `D`
    Diamonds,
    /// Clubs, encoded as `C`
    Clubs,
}

impl Suit {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'S' => Self::Spades,
            'H' => Self::Hearts,
            'D' => Self::Diamonds,
            'C' => Self::Clubs,
            _ => return None,
        })
    }

    fn as_char(self) -> char {
        match self {
            Self::Spades => 'S',
            Self::Hearts => 'H',
            Self::Diamonds => 'D',
            Self::Clubs => 'C',
        }
    }
}

/// A card slot as delivered by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    /// A redacted card (`BACK` on the wire). The seat holds a card, but this
    /// client is not allowed to see it.
    Hidden,
    /// A face-up card.
    Up {
        /// Card rank.
        rank: Rank,
        /// Card suit.
        suit: Suit,
    },
}

impl Card {
    /// Whether this card is redacted.
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl FromStr for Card {
    type Err = ProtocolError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code == "BACK" {
            return Ok(Self::Hidden);
        }

        let mut chars = code.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => {
                Rank::from_char(r).zip(Suit::from_char(s)).map(|(rank, suit)| Self::Up { rank, suit })
            },
            _ => None,
        };

        parsed.ok_or_else(|| ProtocolError::BadCard(code.to_string()))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("BACK"),
            Self::Up { rank, suit } => write!(f, "{}{}", rank.as_char(), suit.as_char()),
        }
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
