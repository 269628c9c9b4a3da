use std::collections::BTreeSet;
use std::time::Duration;

use log::debug;

use crate::config::{
    NOTIFICATION_LIFETIME, POWER_UP_BONUS_POINTS, SHIELD_BLINK_DURATION, SLOW_DOWN_FACTOR,
    SPEED_BOOST_FACTOR,
};
use crate::power_up::PowerUpKind;

/// Status effects that persist as set members while active.
///
/// Only `Shield` lives here; speed changes act on the tick interval instead.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ActiveEffects(BTreeSet<PowerUpKind>);

impl ActiveEffects {
    #[must_use]
    pub fn contains(&self, kind: PowerUpKind) -> bool {
        self.0.contains(&kind)
    }

    #[must_use]
    pub fn has_shield(&self) -> bool {
        self.contains(PowerUpKind::Shield)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        self.0.iter().copied()
    }

    fn insert(&mut self, kind: PowerUpKind) {
        self.0.insert(kind);
    }

    fn remove(&mut self, kind: PowerUpKind) {
        self.0.remove(&kind);
    }
}

/// Deferred work owned by one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerAction {
    /// Speed or Slow ran out: the interval snaps back to the difficulty's base speed.
    RestoreBaseSpeed,
    RemoveShield,
    ClearNotification { id: u64 },
    EndBlink { id: u64 },
}

/// One scheduled action on the session's virtual time axis.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Timer {
    pub due: Duration,
    pub action: TimerAction,
    seq: u64,
}

/// Pending timers, fired earliest first and in scheduling order on ties.
///
/// The queue lives inside the session, so dropping the session cancels
/// every timer it still holds.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, due: Duration, action: TimerAction) {
        self.timers.push(Timer {
            due,
            action,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Returns the earliest due time, if any timer is pending.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Timer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;

        Some(self.timers.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// A pickup message shown to the player for a fixed lifetime.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: PowerUpKind,
    pub message: &'static str,
    pub expires_at: Duration,
}

/// Session values a power-up can change immediately.
#[derive(Debug)]
pub struct EffectTarget<'a> {
    pub tick_interval: &'a mut Duration,
    pub score: &'a mut u32,
}

/// Effect Manager: active status effects, pickup notifications, the shield
/// blink signal and the timers that expire them.
#[derive(Debug, Clone, Default)]
pub struct EffectState {
    active: ActiveEffects,
    notification: Option<Notification>,
    blink: Option<u64>,
    timers: TimerQueue,
    next_id: u64,
}

impl EffectState {
    #[must_use]
    pub fn active(&self) -> &ActiveEffects {
        &self.active
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    #[must_use]
    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    #[must_use]
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Applies a collected power-up at virtual time `now`.
    ///
    /// Each timed pickup schedules its own expiry. Overlapping pickups of
    /// the same kind therefore do not extend anything: the first expiry to
    /// fire ends the effect.
    pub fn apply(&mut self, kind: PowerUpKind, now: Duration, target: EffectTarget<'_>) {
        self.notify(kind, now);

        match kind {
            PowerUpKind::Speed => {
                *target.tick_interval = scaled(*target.tick_interval, SPEED_BOOST_FACTOR);
                self.timers
                    .schedule(now + kind.duration(), TimerAction::RestoreBaseSpeed);
            }
            PowerUpKind::Slow => {
                *target.tick_interval = scaled(*target.tick_interval, SLOW_DOWN_FACTOR);
                self.timers
                    .schedule(now + kind.duration(), TimerAction::RestoreBaseSpeed);
            }
            PowerUpKind::Points => {
                *target.score += POWER_UP_BONUS_POINTS;
            }
            PowerUpKind::Shield => {
                self.active.insert(PowerUpKind::Shield);
                self.timers
                    .schedule(now + kind.duration(), TimerAction::RemoveShield);
            }
        }

        debug!(
            "applied {kind} at {}ms, interval now {}ms",
            now.as_millis(),
            target.tick_interval.as_millis()
        );
    }

    /// Raises the blink signal after a shield absorbed a collision.
    pub fn start_blink(&mut self, now: Duration) {
        let id = self.allocate_id();
        self.blink = Some(id);
        self.timers
            .schedule(now + SHIELD_BLINK_DURATION, TimerAction::EndBlink { id });
    }

    /// Removes the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Timer> {
        self.timers.pop_due(now)
    }

    /// Runs the expiry side of a fired timer.
    pub fn expire(&mut self, action: TimerAction, tick_interval: &mut Duration, base_speed: Duration) {
        match action {
            TimerAction::RestoreBaseSpeed => {
                *tick_interval = base_speed;
                debug!("speed effect expired, interval reset to {}ms", base_speed.as_millis());
            }
            TimerAction::RemoveShield => {
                self.active.remove(PowerUpKind::Shield);
                debug!("shield expired");
            }
            TimerAction::ClearNotification { id } => {
                if self.notification.is_some_and(|notification| notification.id == id) {
                    self.notification = None;
                }
            }
            TimerAction::EndBlink { id } => {
                if self.blink == Some(id) {
                    self.blink = None;
                }
            }
        }
    }

    fn notify(&mut self, kind: PowerUpKind, now: Duration) {
        let id = self.allocate_id();
        let expires_at = now + NOTIFICATION_LIFETIME;
        self.notification = Some(Notification {
            id,
            kind,
            message: kind.message(),
            expires_at,
        });
        self.timers
            .schedule(expires_at, TimerAction::ClearNotification { id });
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn scaled(interval: Duration, (numerator, denominator): (u32, u32)) -> Duration {
    interval * numerator / denominator
}
