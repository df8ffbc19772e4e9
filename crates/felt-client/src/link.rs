//! Connectivity classification and rejoin bookkeeping.
//!
//! Duplex transports routinely drop and silently re-establish within
//! sub-second windows; surfacing every blip as "disconnected" would be noise.
//! The link therefore debounces: a drop arms a grace deadline, and only when
//! the deadline passes without the channel coming back does the user-visible
//! status flip to [`ConnectionStatus::Disconnected`].
//!
//! This is a pure state machine in the style of the rest of the core: time
//! is passed in as [`Instant`] values, no timers are owned here, and state
//! transitions return directives for the runtime to execute. Holding the
//! deadline as a single `Option` makes "at most one pending grace timer" a
//! structural property rather than a discipline.

use std::time::{Duration, Instant};

use felt_proto::GameId;

/// User-visible connectivity classification. Derived client-side; the server
/// never sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The duplex channel is up.
    Connected,
    /// The channel dropped inside the grace window. Still presented as
    /// connected — most drops heal before the window elapses.
    ConnectedPendingLoss,
    /// The channel is down past the grace window, or was never up.
    Disconnected,
}

impl ConnectionStatus {
    /// How the status reads on the banner: anything inside the grace window
    /// still counts as connected.
    pub fn is_connected(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

/// Timing knobs for connectivity classification.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// How long a drop may persist before it is presented as a disconnect.
    pub grace_window: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { grace_window: Duration::from_millis(1500) }
    }
}

/// Directives the link asks the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Re-subscribe to the given game's event room.
    Join(GameId),
}

/// Connectivity state machine.
#[derive(Debug)]
pub struct Link {
    status: ConnectionStatus,
    grace_deadline: Option<Instant>,
    room: Option<GameId>,
    config: LinkConfig,
}

impl Link {
    /// Create a link in the [`ConnectionStatus::Disconnected`] state.
    pub fn new(config: LinkConfig) -> Self {
        Self { status: ConnectionStatus::Disconnected, grace_deadline: None, room: None, config }
    }

    /// Current classification.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Remember which game room to rejoin after a reconnect. Kept separately
    /// from the live snapshot so a rejoin works even while the snapshot is
    /// stale or cleared.
    pub(crate) fn set_room(&mut self, game_id: GameId) {
        self.room = Some(game_id);
    }

    /// The channel came up. Cancels any pending grace deadline and emits
    /// exactly one rejoin directive per up-transition when a game is known.
    /// A redundant `up` while already connected emits nothing.
    pub fn up(&mut self) -> Vec<LinkAction> {
        self.grace_deadline = None;

        let was_connected = self.status == ConnectionStatus::Connected;
        self.status = ConnectionStatus::Connected;

        if was_connected {
            return Vec::new();
        }
        self.room.clone().map(LinkAction::Join).into_iter().collect()
    }

    /// The channel dropped. Arms the grace deadline on a live connection;
    /// repeated drops while one is already pending do not re-arm it.
    pub fn down(&mut self, now: Instant) {
        if self.status == ConnectionStatus::Connected {
            self.grace_deadline = Some(now + self.config.grace_window);
            self.status = ConnectionStatus::ConnectedPendingLoss;
        }
    }

    /// Advance time. Returns `true` exactly when this call crossed the grace
    /// deadline and visible connectivity flipped to `Disconnected`.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.grace_deadline {
            Some(deadline) if now >= deadline => {
                self.grace_deadline = None;
                self.status = ConnectionStatus::Disconnected;
                true
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: Duration = Duration::from_millis(1500);

    fn link() -> Link {
        Link::new(LinkConfig { grace_window: GRACE })
    }

    #[test]
    fn starts_disconnected() {
        assert_eq!(link().status(), ConnectionStatus::Disconnected);
        assert!(!link().status().is_connected());
    }

    #[test]
    fn blip_inside_grace_window_is_invisible() {
        let t0 = Instant::now();
        let mut link = link();
        link.up();

        link.down(t0);
        assert!(link.status().is_connected(), "grace window hides the drop");
        assert!(!link.tick(t0 + Duration::from_millis(900)));

        link.up();
        assert_eq!(link.status(), ConnectionStatus::Connected);

        // Deadline was cancelled; time passing changes nothing.
        assert!(!link.tick(t0 + Duration::from_secs(60)));
        assert_eq!(link.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn unhealed_drop_yields_exactly_one_transition() {
        let t0 = Instant::now();
        let mut link = link();
        link.up();
        link.down(t0);

        assert!(!link.tick(t0 + Duration::from_millis(1499)));
        assert!(link.tick(t0 + GRACE));
        assert_eq!(link.status(), ConnectionStatus::Disconnected);

        // Further ticks report no new transition.
        assert!(!link.tick(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn second_drop_does_not_extend_the_deadline() {
        let t0 = Instant::now();
        let mut link = link();
        link.up();

        link.down(t0);
        link.down(t0 + Duration::from_millis(1000));

        // Deadline is still t0 + GRACE, not t0 + 1s + GRACE.
        assert!(link.tick(t0 + GRACE));
    }

    #[test]
    fn rejoins_known_room_once_per_up_transition() {
        let mut link = link();
        link.set_room("g1".into());

        assert_eq!(link.up(), vec![LinkAction::Join("g1".into())]);
        // Redundant up while connected: nothing.
        assert_eq!(link.up(), Vec::new());

        link.down(Instant::now());
        assert_eq!(link.up(), vec![LinkAction::Join("g1".into())]);
    }

    #[test]
    fn no_known_room_means_no_join() {
        let mut link = link();
        assert_eq!(link.up(), Vec::new());
    }

    #[test]
    fn drop_while_already_disconnected_is_a_no_op() {
        let t0 = Instant::now();
        let mut link = link();
        link.down(t0);

        assert_eq!(link.status(), ConnectionStatus::Disconnected);
        assert!(!link.tick(t0 + Duration::from_secs(10)));
    }
}
