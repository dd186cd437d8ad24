//! Cancellable timers driven by an external clock.
//!
//! The scheduler never sleeps and never reads the time itself. The engine
//! asks it for the next timer due at or before "now" and runs the matching
//! handler, repeating until nothing is due. That keeps every firing in
//! due-time order and lets tests step time by hand.

use std::collections::BTreeMap;

use super::catalog::AbilityKind;

/// Identity of a pending timer. At most one timer exists per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKey {
    PassiveIncome,
    AutoSave,
    AbilityExpiry(AbilityKind),
    ContinuousTap,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Timer {
    due_at: u64,
    /// None for one-shot timers.
    period: Option<u64>,
    /// Arm order; breaks ties between timers due at the same instant.
    seq: u64,
}

#[derive(Debug)]
pub struct Scheduler {
    timers: BTreeMap<TimerKey, Timer>,
    next_seq: u64,
    max_catch_up: u32,
}

impl Scheduler {
    /// `max_catch_up` bounds how many missed periods a periodic timer replays
    /// in one go. Anything older is dropped and the phase restarts from "now".
    pub fn new(max_catch_up: u32) -> Self {
        Self {
            timers: BTreeMap::new(),
            next_seq: 0,
            max_catch_up: max_catch_up.max(1),
        }
    }

    fn insert(&mut self, key: TimerKey, due_at: u64, period: Option<u64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(
            key,
            Timer {
                due_at,
                period,
                seq,
            },
        );
    }

    /// Fire once at `due_at`, replacing any timer under the same key.
    pub fn schedule_once(&mut self, key: TimerKey, due_at: u64) {
        self.insert(key, due_at, None);
    }

    /// Fire every `period_ms`, first at `now_ms + period_ms`. Replaces any
    /// timer under the same key.
    pub fn schedule_every(&mut self, key: TimerKey, now_ms: u64, period_ms: u64) {
        let period = period_ms.max(1);
        self.insert(key, now_ms.saturating_add(period), Some(period));
    }

    /// Like `schedule_every`, but leaves an already armed timer (and its
    /// phase) untouched. Returns true if a new timer was armed.
    pub fn ensure_every(&mut self, key: TimerKey, now_ms: u64, period_ms: u64) -> bool {
        if self.timers.contains_key(&key) {
            return false;
        }
        self.schedule_every(key, now_ms, period_ms);
        true
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.timers.remove(&key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.timers.contains_key(&key)
    }

    pub fn due_at(&self, key: TimerKey) -> Option<u64> {
        self.timers.get(&key).map(|t| t.due_at)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest due time of any pending timer.
    pub fn next_due(&self) -> Option<u64> {
        self.timers.values().map(|t| t.due_at).min()
    }

    /// Take the earliest timer due at or before `now_ms`. One-shot timers are
    /// removed; periodic ones are pushed to their next period. Returns the key
    /// and the instant it was due.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerKey, u64)> {
        let (&key, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_at <= now_ms)
            .min_by_key(|(_, t)| (t.due_at, t.seq))?;

        let timer = self.timers.remove(&key)?;
        let Some(period) = timer.period else {
            return Some((key, timer.due_at));
        };

        let mut due_at = timer.due_at;
        let owed = (now_ms - due_at) / period + 1;
        if owed > u64::from(self.max_catch_up) {
            due_at = now_ms - period * u64::from(self.max_catch_up - 1);
        }
        self.insert(key, due_at.saturating_add(period), Some(period));
        Some((key, due_at))
    }
}
