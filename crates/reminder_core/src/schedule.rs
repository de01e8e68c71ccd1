use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::ItemId;

pub const MIN_INTERVAL: Duration = Duration::from_secs(60);
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Durable scheduling record: when the next reminder fires and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    pub next_fire_at: DateTime<Utc>,
    pub interval: Duration,
    pub last_shown_id: Option<ItemId>,
    pub paused: bool,
}

impl ScheduleState {
    /// Fresh schedule whose first reminder is one interval from `now`.
    pub fn new(now: DateTime<Utc>, interval: Duration) -> Self {
        let interval = clamp_interval(interval);
        Self {
            next_fire_at: next_after(now, interval),
            interval,
            last_shown_id: None,
            paused: false,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_fire_at <= now
    }

    pub(crate) fn reschedule_from(&mut self, now: DateTime<Utc>) {
        self.next_fire_at = next_after(now, self.interval);
    }
}

pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// `now + interval`, saturating at the largest representable instant.
pub fn next_after(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    i64::try_from(interval.as_secs())
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
