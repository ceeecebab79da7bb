use std::time::Instant;

use crate::setting::MonitorConfig;

pub use channel::{AlertChannel, ChannelState};
pub use observation::{FaceLandmarks, FrameObservation, LookSignal};

pub mod channel;
pub mod observation;

/// Which confirmed condition asked for an evidentiary capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    LookingAway,
    MultiplePeople,
}

/// Snapshot of both channels, read by the display layer only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    pub looking_away: bool,
    pub multiple_people: bool,
}

impl AlertState {
    pub fn is_alert(&self) -> bool {
        self.looking_away || self.multiple_people
    }
}

/// Tick-driven proctoring core. Holds the two debounced alert channels and
/// no IO; the caller samples the feed, runs the detector, and acts on the
/// returned capture requests.
pub struct Monitor {
    config: MonitorConfig,
    looking_away: AlertChannel,
    multiple_people: AlertChannel,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            looking_away: AlertChannel::new("looking_away"),
            multiple_people: AlertChannel::new("multiple_people"),
        }
    }

    /// One evaluation cycle. `None` means the observation is unavailable
    /// this tick (feed not ready, detector failure): channel state is left
    /// untouched, but confirmation deadlines still run down.
    ///
    /// Due deadlines are polled before the fresh signals are applied, so a
    /// confirmation that comes due on the same tick that reverts its signal
    /// still fires, while a reversal on any earlier tick cancels it.
    pub fn tick(
        &mut self,
        observation: Option<&FrameObservation>,
        now: Instant,
    ) -> Vec<AlertKind> {
        let mut fired = Vec::new();
        if self.looking_away.poll(now) {
            fired.push(AlertKind::LookingAway);
        }
        if self.multiple_people.poll(now) {
            fired.push(AlertKind::MultiplePeople);
        }

        if let Some(observation) = observation {
            let look = observation.look_signal(self.config.head_turn_threshold);
            let confirm = match look {
                LookSignal::NoFace => self.config.no_face_confirm(),
                _ => self.config.turned_confirm(),
            };
            self.looking_away.observe(look.is_away(), confirm, now);
            self.multiple_people.observe(
                observation.multiple_people(),
                self.config.multiple_people_confirm(),
                now,
            );
        }

        fired
    }

    pub fn alert_state(&self) -> AlertState {
        AlertState {
            looking_away: self.looking_away.is_active(),
            multiple_people: self.multiple_people.is_active(),
        }
    }

    /// Cancels every outstanding confirmation. Called on teardown so nothing
    /// fires after the tick loop stops.
    pub fn reset(&mut self) {
        self.looking_away.reset();
        self.multiple_people.reset();
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use crate::setting::MonitorConfig;

    use super::{AlertKind, FaceLandmarks, FrameObservation, Monitor};

    fn face(nose_x: f32) -> FaceLandmarks {
        // eye midpoint sits at x = 100
        FaceLandmarks {
            nose_tip: [nose_x, 60.],
            left_eye: [80., 50.],
            right_eye: [120., 50.],
        }
    }

    fn centered() -> FrameObservation {
        FrameObservation {
            faces: vec![face(100.)],
        }
    }

    fn turned() -> FrameObservation {
        FrameObservation {
            faces: vec![face(120.)],
        }
    }

    fn empty() -> FrameObservation {
        FrameObservation::default()
    }

    fn crowd() -> FrameObservation {
        FrameObservation {
            faces: vec![face(100.), face(101.)],
        }
    }

    fn monitor() -> Monitor {
        Monitor::new(MonitorConfig::default())
    }

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn turned_head_confirms_after_three_seconds() {
        let base = Instant::now();
        let mut monitor = monitor();

        assert!(monitor.tick(Some(&turned()), base).is_empty());
        assert!(monitor.alert_state().looking_away);
        assert!(monitor.tick(Some(&turned()), at(base, 1)).is_empty());
        assert!(monitor.tick(Some(&turned()), at(base, 2)).is_empty());
        assert_eq!(
            monitor.tick(Some(&turned()), at(base, 3)),
            vec![AlertKind::LookingAway]
        );
    }

    #[test]
    fn no_face_needs_five_seconds() {
        let base = Instant::now();
        let mut monitor = monitor();

        for s in 0..5 {
            assert!(
                monitor.tick(Some(&empty()), at(base, s)).is_empty(),
                "fired early at {}s",
                s
            );
        }
        assert_eq!(
            monitor.tick(Some(&empty()), at(base, 5)),
            vec![AlertKind::LookingAway]
        );
    }

    #[test]
    fn no_duplicate_capture_while_condition_persists() {
        let base = Instant::now();
        let mut monitor = monitor();

        for s in 0..3 {
            monitor.tick(Some(&turned()), at(base, s));
        }
        assert_eq!(monitor.tick(Some(&turned()), at(base, 3)).len(), 1);
        for s in 4..20 {
            assert!(monitor.tick(Some(&turned()), at(base, s)).is_empty());
        }
        assert!(monitor.alert_state().looking_away);
    }

    #[test]
    fn early_reversal_produces_no_capture() {
        let base = Instant::now();
        let mut monitor = monitor();

        monitor.tick(Some(&turned()), base);
        monitor.tick(Some(&turned()), at(base, 1));
        assert!(monitor.tick(Some(&centered()), at(base, 2)).is_empty());
        assert!(!monitor.alert_state().looking_away);
        // nothing left to come due
        for s in 3..10 {
            assert!(monitor.tick(Some(&centered()), at(base, s)).is_empty());
        }
    }

    #[test]
    fn reactivation_after_clear_fires_again() {
        let base = Instant::now();
        let mut monitor = monitor();

        for s in 0..4 {
            monitor.tick(Some(&turned()), at(base, s));
        }
        monitor.tick(Some(&centered()), at(base, 4));
        assert!(!monitor.alert_state().looking_away);

        for s in 5..8 {
            assert!(monitor.tick(Some(&turned()), at(base, s)).is_empty());
        }
        assert_eq!(
            monitor.tick(Some(&turned()), at(base, 8)),
            vec![AlertKind::LookingAway]
        );
    }

    #[test]
    fn multiple_people_scenario() {
        // two faces for ticks 0-2, one face at tick 3: exactly one capture,
        // emitted at the 3s tick, and the channel clears on that same tick
        let base = Instant::now();
        let mut monitor = monitor();

        for s in 0..3 {
            assert!(monitor.tick(Some(&crowd()), at(base, s)).is_empty());
            assert!(monitor.alert_state().multiple_people);
        }
        assert_eq!(
            monitor.tick(Some(&centered()), at(base, 3)),
            vec![AlertKind::MultiplePeople]
        );
        assert!(!monitor.alert_state().multiple_people);
        for s in 4..10 {
            assert!(monitor.tick(Some(&centered()), at(base, s)).is_empty());
        }
    }

    #[test]
    fn channels_are_independent() {
        let base = Instant::now();
        let mut monitor = monitor();

        // crowd with a turned primary face arms both channels
        let both = FrameObservation {
            faces: vec![face(120.), face(40.)],
        };
        monitor.tick(Some(&both), base);
        assert!(monitor.alert_state().looking_away);
        assert!(monitor.alert_state().multiple_people);

        // crowd thins out but the primary stays turned: only the
        // multiple-people channel cancels
        monitor.tick(Some(&turned()), at(base, 1));
        assert!(monitor.alert_state().looking_away);
        assert!(!monitor.alert_state().multiple_people);

        monitor.tick(Some(&turned()), at(base, 2));
        assert_eq!(
            monitor.tick(Some(&turned()), at(base, 3)),
            vec![AlertKind::LookingAway]
        );
    }

    #[test]
    fn both_channels_can_fire_on_one_tick() {
        let base = Instant::now();
        let mut monitor = monitor();

        let both = FrameObservation {
            faces: vec![face(120.), face(40.)],
        };
        for s in 0..3 {
            monitor.tick(Some(&both), at(base, s));
        }
        let fired = monitor.tick(Some(&both), at(base, 3));
        assert!(fired.contains(&AlertKind::LookingAway));
        assert!(fired.contains(&AlertKind::MultiplePeople));
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn unavailable_observation_preserves_state_but_deadlines_run() {
        let base = Instant::now();
        let mut monitor = monitor();

        monitor.tick(Some(&turned()), base);
        // detector outage for the next ticks; the armed confirmation still
        // comes due
        assert!(monitor.tick(None, at(base, 1)).is_empty());
        assert!(monitor.tick(None, at(base, 2)).is_empty());
        assert_eq!(monitor.tick(None, at(base, 3)), vec![AlertKind::LookingAway]);
        assert!(monitor.alert_state().looking_away);
    }

    #[test]
    fn unavailable_observation_never_arms() {
        let base = Instant::now();
        let mut monitor = monitor();

        for s in 0..10 {
            assert!(monitor.tick(None, at(base, s)).is_empty());
        }
        assert_eq!(monitor.alert_state(), Default::default());
    }

    #[test]
    fn no_face_and_turned_share_one_confirmation() {
        // armed by a turned head, then the face disappears: the original 3s
        // deadline keeps running, no re-arm to the 5s window
        let base = Instant::now();
        let mut monitor = monitor();

        monitor.tick(Some(&turned()), base);
        monitor.tick(Some(&empty()), at(base, 1));
        monitor.tick(Some(&empty()), at(base, 2));
        assert_eq!(
            monitor.tick(Some(&empty()), at(base, 3)),
            vec![AlertKind::LookingAway]
        );
    }

    #[test]
    fn reset_cancels_everything() {
        let base = Instant::now();
        let mut monitor = monitor();

        let both = FrameObservation {
            faces: vec![face(120.), face(40.)],
        };
        monitor.tick(Some(&both), base);
        monitor.reset();
        assert_eq!(monitor.alert_state(), Default::default());
        // well past both windows: nothing fires
        assert!(monitor.tick(None, at(base, 30)).is_empty());
    }

    #[test]
    fn overall_alert_is_the_or_of_both_channels() {
        let base = Instant::now();
        let mut monitor = monitor();

        monitor.tick(Some(&crowd()), base);
        let state = monitor.alert_state();
        assert!(state.multiple_people);
        assert!(!state.looking_away);
        assert!(state.is_alert());

        monitor.tick(Some(&centered()), at(base, 1));
        assert!(!monitor.alert_state().is_alert());
    }
}
