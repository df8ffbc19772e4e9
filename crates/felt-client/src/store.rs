//! The single mutable cell presentation reads.

use felt_proto::GameSnapshot;

use crate::error::ClientError;

/// Latest authoritative snapshot plus the last error and the busy flag.
///
/// Written only by the engine; everything else reads it. Snapshots are
/// replaced wholesale — the store never merges fields across updates — and
/// an error never evicts the last good snapshot, so the board stays
/// renderable while a banner is shown.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: Option<GameSnapshot>,
    error: Option<ClientError>,
    busy: bool,
}

impl SnapshotStore {
    /// Current snapshot, if any.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Last stored error, if any.
    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    /// Whether a request is in flight.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Mark a request in flight and clear any stale banner.
    pub(crate) fn begin_request(&mut self) {
        self.busy = true;
        self.error = None;
    }

    /// Adopt a replacement snapshot: clears the error and the busy flag.
    pub(crate) fn apply_update(&mut self, snapshot: GameSnapshot) {
        self.snapshot = Some(snapshot);
        self.error = None;
        self.busy = false;
    }

    /// Record a failure. The last good snapshot stays on the table.
    pub(crate) fn apply_error(&mut self, error: ClientError) {
        self.error = Some(error);
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use felt_proto::Stage;

    use super::*;

    fn snapshot(game_id: &str, pot: u32) -> GameSnapshot {
        GameSnapshot {
            game_id: game_id.into(),
            pot,
            community_cards: Vec::new(),
            active_player_id: Some(0),
            players: Vec::new(),
            stage: Stage::PreFlop,
            dealer_id: 1,
            small_blind_player_id: 2,
            big_blind_player_id: 3,
            bet_to_call: 20,
            winners: Vec::new(),
        }
    }

    #[test]
    fn updates_replace_wholesale() {
        let mut store = SnapshotStore::default();

        store.apply_update(snapshot("g1", 30));
        store.apply_update(snapshot("g1", 120));

        let held = store.snapshot().unwrap();
        assert_eq!(held, &snapshot("g1", 120));
    }

    #[test]
    fn update_clears_error_and_busy() {
        let mut store = SnapshotStore::default();
        store.begin_request();
        store.apply_error(ClientError::ServerRejected("out of turn".into()));

        store.apply_update(snapshot("g1", 30));

        assert!(store.error().is_none());
        assert!(!store.busy());
    }

    #[test]
    fn error_leaves_snapshot_untouched() {
        let mut store = SnapshotStore::default();
        store.apply_update(snapshot("g1", 30));
        let before = store.snapshot().cloned().unwrap();

        store.apply_error(ClientError::ServerRejected("Not this player's turn".into()));

        assert_eq!(store.snapshot().unwrap(), &before);
        assert_eq!(
            store.error(),
            Some(&ClientError::ServerRejected("Not this player's turn".into()))
        );
        assert!(!store.busy());
    }

    #[test]
    fn begin_request_sets_busy_and_clears_stale_banner() {
        let mut store = SnapshotStore::default();
        store.apply_error(ClientError::CreateGameFailed("server returned 500".into()));

        store.begin_request();

        assert!(store.busy());
        assert!(store.error().is_none());
    }
}
