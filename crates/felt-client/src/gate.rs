//! Client-side pre-validation of betting actions.
//!
//! The server is the final authority and re-validates every action; the gate
//! exists so an out-of-turn click or a stale UI never spends a round-trip,
//! and so a second action cannot fire during the round-trip window of the
//! first. It also derives the concrete action kind from the table state
//! instead of trusting whatever label the caller chose.

use felt_proto::{ActionKind, GameSnapshot};

/// House betting rules the gate needs.
#[derive(Debug, Clone)]
pub struct TableRules {
    /// Minimum legal bet — the big blind.
    pub min_bet: u32,
}

impl Default for TableRules {
    fn default() -> Self {
        Self { min_bet: 20 }
    }
}

/// A validated action ready for dispatch.
///
/// `amount` is the total contribution for the round: zero for a fold, the
/// owed amount for check/call, the clamped wager for bet/raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAction {
    /// The derived action kind.
    pub action: ActionKind,
    /// Total contribution for the round.
    pub amount: u32,
}

/// Pre-validates and normalizes player intents before they reach the
/// network.
#[derive(Debug, Clone, Default)]
pub struct ActionGate {
    rules: TableRules,
}

impl ActionGate {
    /// Build a gate with the given house rules.
    pub fn new(rules: TableRules) -> Self {
        Self { rules }
    }

    /// Minimum legal total for a bet or raise given the outstanding bet.
    pub fn min_raise(&self, bet_to_call: u32) -> u32 {
        if bet_to_call > 0 { (bet_to_call * 2).max(self.rules.min_bet) } else { self.rules.min_bet }
    }

    /// Validate `requested` against the current table state.
    ///
    /// Returns `None` — and nothing reaches the transport — when no snapshot
    /// is loaded or the pending action does not belong to the human seat.
    ///
    /// Otherwise the action kind is derived from the proposed contribution:
    /// matching the owed amount is a check (nothing owed) or a call; any
    /// other amount is a bet (no outstanding bet) or a raise, clamped to
    /// `[min_raise, chips + current_bet]`.
    pub fn plan(
        &self,
        snapshot: Option<&GameSnapshot>,
        requested: ActionKind,
        amount: u32,
    ) -> Option<PlannedAction> {
        let snapshot = snapshot?;
        let human = snapshot.human()?;
        if snapshot.active_player_id != Some(human.id) {
            return None;
        }

        if requested == ActionKind::Fold {
            return Some(PlannedAction { action: ActionKind::Fold, amount: 0 });
        }

        let owed = snapshot.bet_to_call.saturating_sub(human.current_bet);

        // An explicit check/call intent always means "match what is owed";
        // wager intents are classified by the proposed amount.
        let proposed = match requested {
            ActionKind::Check | ActionKind::Call => owed,
            _ => amount,
        };

        if proposed == owed {
            let action = if owed == 0 { ActionKind::Check } else { ActionKind::Call };
            return Some(PlannedAction { action, amount: owed });
        }

        let table_max = human.chips + human.current_bet;
        let amount = proposed.min(table_max).max(self.min_raise(snapshot.bet_to_call));
        let action = if snapshot.bet_to_call == 0 { ActionKind::Bet } else { ActionKind::Raise };
        Some(PlannedAction { action, amount })
    }
}

#[cfg(test)]
mod tests {
    use felt_proto::{Player, Stage};
    use proptest::prelude::*;

    use super::*;

    fn seat(id: u32, chips: u32, current_bet: u32, is_human: bool) -> Player {
        Player {
            id,
            name: format!("Seat {id}"),
            chips,
            hand: Vec::new(),
            current_bet,
            is_folded: false,
            is_all_in: false,
            is_human,
            last_action: None,
        }
    }

    fn table(bet_to_call: u32, human_chips: u32, human_bet: u32, active: Option<u32>) -> GameSnapshot {
        GameSnapshot {
            game_id: "g1".into(),
            pot: 30,
            community_cards: Vec::new(),
            active_player_id: active,
            players: vec![seat(0, human_chips, human_bet, true), seat(1, 1000, bet_to_call, false)],
            stage: Stage::PreFlop,
            dealer_id: 1,
            small_blind_player_id: 0,
            big_blind_player_id: 1,
            bet_to_call,
            winners: Vec::new(),
        }
    }

    #[test]
    fn refuses_without_a_snapshot() {
        let gate = ActionGate::default();
        assert_eq!(gate.plan(None, ActionKind::Fold, 0), None);
    }

    #[test]
    fn refuses_out_of_turn_submission() {
        let gate = ActionGate::default();
        let snapshot = table(20, 1000, 0, Some(2));
        assert_eq!(gate.plan(Some(&snapshot), ActionKind::Fold, 0), None);
    }

    #[test]
    fn refuses_when_nobody_is_to_act() {
        let gate = ActionGate::default();
        let snapshot = table(0, 1000, 0, None);
        assert_eq!(gate.plan(Some(&snapshot), ActionKind::Check, 0), None);
    }

    #[test]
    fn fold_carries_no_amount() {
        let gate = ActionGate::default();
        let snapshot = table(20, 1000, 0, Some(0));
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Fold, 500),
            Some(PlannedAction { action: ActionKind::Fold, amount: 0 })
        );
    }

    #[test]
    fn nothing_owed_classifies_as_check() {
        let gate = ActionGate::default();
        let snapshot = table(0, 1000, 0, Some(0));
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Call, 0),
            Some(PlannedAction { action: ActionKind::Check, amount: 0 })
        );
    }

    #[test]
    fn owed_amount_classifies_as_call() {
        let gate = ActionGate::default();
        let snapshot = table(20, 1000, 0, Some(0));
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Call, 20),
            Some(PlannedAction { action: ActionKind::Call, amount: 20 })
        );
        // A wager intent proposing exactly the owed amount is also a call.
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Raise, 20),
            Some(PlannedAction { action: ActionKind::Call, amount: 20 })
        );
    }

    #[test]
    fn short_wager_is_clamped_up_to_the_minimum_raise() {
        let gate = ActionGate::default();
        let snapshot = table(40, 100, 0, Some(0));
        // min raise = max(40 * 2, 20) = 80
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Raise, 50),
            Some(PlannedAction { action: ActionKind::Raise, amount: 80 })
        );
    }

    #[test]
    fn oversized_wager_is_clamped_down_to_the_stack() {
        let gate = ActionGate::default();
        let snapshot = table(40, 100, 0, Some(0));
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Raise, 500),
            Some(PlannedAction { action: ActionKind::Raise, amount: 100 })
        );
    }

    #[test]
    fn opening_wager_classifies_as_bet() {
        let gate = ActionGate::default();
        let snapshot = table(0, 1000, 0, Some(0));
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Bet, 50),
            Some(PlannedAction { action: ActionKind::Bet, amount: 50 })
        );
        // Below the house minimum: clamped up to the big blind.
        assert_eq!(
            gate.plan(Some(&snapshot), ActionKind::Bet, 5),
            Some(PlannedAction { action: ActionKind::Bet, amount: 20 })
        );
    }

    proptest! {
        #[test]
        fn wagers_respect_minimum_and_stack(
            bet_to_call in 0u32..500,
            chips in 1u32..5_000,
            current_bet in 0u32..500,
            amount in 0u32..10_000,
        ) {
            let gate = ActionGate::default();
            let snapshot = table(bet_to_call, chips, current_bet, Some(0));
            let plan = gate.plan(Some(&snapshot), ActionKind::Raise, amount);
            prop_assert!(plan.is_some(), "human turn must always yield a plan");
            let plan = plan.unwrap();

            match plan.action {
                ActionKind::Fold => prop_assert!(false, "raise never plans a fold"),
                ActionKind::Check | ActionKind::Call => {
                    prop_assert_eq!(plan.amount, bet_to_call.saturating_sub(current_bet));
                },
                ActionKind::Bet | ActionKind::Raise => {
                    let min_raise = gate.min_raise(bet_to_call);
                    let table_max = chips + current_bet;
                    prop_assert!(plan.amount >= min_raise);
                    if min_raise <= table_max {
                        prop_assert!(plan.amount <= table_max);
                    }
                    // Kind follows the outstanding bet, not the caller's label.
                    prop_assert_eq!(
                        plan.action,
                        if bet_to_call == 0 { ActionKind::Bet } else { ActionKind::Raise }
                    );
                },
            }
        }
    }
}
