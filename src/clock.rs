use std::time::Duration;

/// Simulation Clock: one armed wait on the session's virtual time axis.
///
/// The wait length is captured when the clock is armed. Changing the tick
/// interval afterwards only affects the next arming, never the wait that is
/// already running.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SimulationClock {
    due: Option<Duration>,
}

impl SimulationClock {
    /// Arms the clock to fire `interval` after `now`, replacing any pending wait.
    pub fn arm(&mut self, now: Duration, interval: Duration) {
        self.due = Some(now + interval);
    }

    pub fn disarm(&mut self) {
        self.due = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    #[must_use]
    pub fn due_at(&self) -> Option<Duration> {
        self.due
    }

    /// Consumes the pending wait when it is due by `now`.
    ///
    /// Returns the instant the tick was scheduled for, so the caller can
    /// re-arm from there rather than from `now`.
    pub fn take_due(&mut self, now: Duration) -> Option<Duration> {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                Some(due)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SimulationClock;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_once_when_due() {
        let mut clock = SimulationClock::default();
        clock.arm(ms(0), ms(120));

        assert_eq!(clock.take_due(ms(119)), None);
        assert_eq!(clock.take_due(ms(130)), Some(ms(120)));
        assert_eq!(clock.take_due(ms(500)), None);
        assert!(!clock.is_armed());
    }

    #[test]
    fn rearming_replaces_pending_wait() {
        let mut clock = SimulationClock::default();
        clock.arm(ms(0), ms(120));
        clock.arm(ms(50), ms(100));

        assert_eq!(clock.due_at(), Some(ms(150)));
    }

    #[test]
    fn disarmed_clock_never_fires() {
        let mut clock = SimulationClock::default();
        clock.arm(ms(0), ms(10));
        clock.disarm();

        assert_eq!(clock.take_due(ms(1000)), None);
    }
}
