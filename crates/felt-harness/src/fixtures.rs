//! Canonical table states for tests.
//!
//! The standard table mirrors the server's default lobby: the human seat
//! ("You") plus three bots, 1000 chips each, blinds 10/20. `fresh_hand`
//! reproduces the first deal — dealer on seat 1, blinds posted by seats 2
//! and 3, action on the human.

use felt_proto::{Card, GameSnapshot, Player, PlayerId, Rank, Stage, Suit};

fn seat(id: PlayerId, name: &str, chips: u32, is_human: bool) -> Player {
    Player {
        id,
        name: name.into(),
        chips,
        hand: if is_human {
            vec![up(Rank::Ace, Suit::Spades), up(Rank::Ten, Suit::Hearts)]
        } else {
            vec![Card::Hidden, Card::Hidden]
        },
        current_bet: 0,
        is_folded: false,
        is_all_in: false,
        is_human,
        last_action: None,
    }
}

fn up(rank: Rank, suit: Suit) -> Card {
    Card::Up { rank, suit }
}

/// A freshly dealt pre-flop hand with blinds posted and action on the human.
pub fn fresh_hand(game_id: &str) -> GameSnapshot {
    let mut small_blind = seat(2, "Mountain", 990, false);
    small_blind.current_bet = 10;
    small_blind.last_action = Some("Blind".into());

    let mut big_blind = seat(3, "Shark", 980, false);
    big_blind.current_bet = 20;
    big_blind.last_action = Some("Blind".into());

    GameSnapshot {
        game_id: game_id.into(),
        pot: 30,
        community_cards: Vec::new(),
        active_player_id: Some(0),
        players: vec![seat(0, "You", 1000, true), seat(1, "Viper", 1000, false), small_blind, big_blind],
        stage: Stage::PreFlop,
        dealer_id: 1,
        small_blind_player_id: 2,
        big_blind_player_id: 3,
        bet_to_call: 20,
        winners: Vec::new(),
    }
}

/// `fresh_hand` with no outstanding bet — post-flop betting about to open.
pub fn open_street(game_id: &str) -> GameSnapshot {
    let mut snapshot = fresh_hand(game_id);
    snapshot.stage = Stage::Flop;
    snapshot.bet_to_call = 0;
    snapshot.community_cards =
        vec![up(Rank::Two, Suit::Clubs), up(Rank::Nine, Suit::Diamonds), up(Rank::King, Suit::Hearts)];
    for player in &mut snapshot.players {
        player.current_bet = 0;
        player.last_action = None;
    }
    snapshot
}

/// Move the pending action to another seat (or nobody).
pub fn with_active(mut snapshot: GameSnapshot, seat: Option<PlayerId>) -> GameSnapshot {
    snapshot.active_player_id = seat;
    snapshot
}

/// A resolved hand with the given winners splitting the pot.
pub fn hand_over(game_id: &str, winners: &[PlayerId]) -> GameSnapshot {
    let mut snapshot = fresh_hand(game_id);
    snapshot.stage = Stage::HandOver;
    snapshot.active_player_id = None;
    snapshot.winners = winners.to_vec();
    snapshot
}
