use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of "now" for anything time based.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Expiry timestamps keyed by opaque strings. Expired entries are dropped the
/// first time they are read.
pub struct CooldownTracker {
    clock: Arc<dyn Clock>,
    expiries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl CooldownTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            expiries: Mutex::new(HashMap::new()),
        }
    }

    /// Whole seconds left, rounded up. Never negative.
    pub fn remaining_seconds(&self, key: &str) -> u64 {
        let now = self.clock.now();
        Self::remaining_locked(&mut self.expiries.lock(), key, now)
    }

    pub fn apply(&self, key: impl Into<String>, seconds: u64) {
        let expiry = Self::expiry(self.clock.now(), seconds);
        self.expiries.lock().insert(key.into(), expiry);
    }

    /// Starts the cooldown unless one is already running, in one step. Returns
    /// the seconds still left on a running cooldown, or 0 once it was started.
    pub fn try_apply(&self, key: impl Into<String>, seconds: u64) -> u64 {
        let key = key.into();
        let mut expiries = self.expiries.lock();
        let now = self.clock.now();

        let remaining = Self::remaining_locked(&mut expiries, &key, now);
        if remaining > 0 {
            return remaining;
        }

        expiries.insert(key, Self::expiry(now, seconds));
        0
    }

    fn remaining_locked(expiries: &mut HashMap<String, DateTime<Utc>>, key: &str, now: DateTime<Utc>) -> u64 {
        let Some(expiry) = expiries.get(key) else {
            return 0;
        };

        let millis = (*expiry - now).num_milliseconds();
        if millis <= 0 {
            expiries.remove(key);
            return 0;
        }

        ((millis + 999) / 1000) as u64
    }

    fn expiry(now: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
        now + Duration::seconds(seconds.min(i32::MAX as u64) as i64)
    }

    pub fn len(&self) -> usize {
        self.expiries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (Arc<ManualClock>, CooldownTracker) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let tracker = CooldownTracker::new(clock.clone());
        (clock, tracker)
    }

    #[test]
    fn unknown_key_has_no_cooldown() {
        let (_, tracker) = tracker();
        assert_eq!(tracker.remaining_seconds("play|U:1"), 0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn apply_then_read_reports_full_duration() {
        let (_, tracker) = tracker();
        tracker.apply("play|U:1", 10);
        assert_eq!(tracker.remaining_seconds("play|U:1"), 10);
    }

    #[test]
    fn partial_seconds_round_up() {
        let (clock, tracker) = tracker();
        tracker.apply("play|U:1", 10);
        clock.advance(Duration::milliseconds(8_500));
        assert_eq!(tracker.remaining_seconds("play|U:1"), 2);
    }

    #[test]
    fn expired_entries_read_zero_and_are_purged() {
        let (clock, tracker) = tracker();
        tracker.apply("play|U:1", 5);
        clock.advance(Duration::seconds(5));
        assert_eq!(tracker.remaining_seconds("play|U:1"), 0);
        assert!(tracker.is_empty());
        assert_eq!(tracker.remaining_seconds("play|U:1"), 0);
    }

    #[test]
    fn apply_overwrites_previous_expiry() {
        let (clock, tracker) = tracker();
        tracker.apply("skip|G:9", 60);
        clock.advance(Duration::seconds(30));
        tracker.apply("skip|G:9", 5);
        assert_eq!(tracker.remaining_seconds("skip|G:9"), 5);
    }

    #[test]
    fn try_apply_starts_once_then_reports_remaining() {
        let (clock, tracker) = tracker();
        assert_eq!(tracker.try_apply("roll|U:1", 10), 0);
        clock.advance(Duration::seconds(3));
        assert_eq!(tracker.try_apply("roll|U:1", 10), 7);
        assert_eq!(tracker.remaining_seconds("roll|U:1"), 7);

        clock.advance(Duration::seconds(7));
        assert_eq!(tracker.try_apply("roll|U:1", 10), 0);
        assert_eq!(tracker.remaining_seconds("roll|U:1"), 10);
    }

    #[test]
    fn try_apply_lets_one_of_many_threads_through() {
        let tracker = Arc::new(CooldownTracker::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || tracker.try_apply("roll|global", 60) == 0)
            })
            .collect();

        let started = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
        assert_eq!(started, 1);
    }

    #[test]
    fn keys_are_independent() {
        let (_, tracker) = tracker();
        tracker.apply("play|U:1", 3);
        assert_eq!(tracker.remaining_seconds("play|U:2"), 0);
        assert_eq!(tracker.remaining_seconds("play|U:1"), 3);
    }
}
