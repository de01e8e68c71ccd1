use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{ItemId, ScheduleState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Process start. `restored` is the schedule loaded from durable storage.
    Started {
        now: DateTime<Utc>,
        restored: Option<ScheduleState>,
        default_interval: Duration,
        auto_start: bool,
    },
    /// The armed timer elapsed.
    TimerElapsed { now: DateTime<Utc> },
    /// A `Fire` effect finished, successfully or not.
    FireCompleted {
        now: DateTime<Utc>,
        outcome: FireOutcome,
    },
    /// User changed the reminder interval.
    IntervalChanged {
        now: DateTime<Utc>,
        interval: Duration,
    },
    /// User asked for a reminder right away.
    ShowNowRequested,
    PauseRequested,
    ResumeRequested { now: DateTime<Utc> },
    /// Process is about to exit; flush state.
    ShutdownRequested,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    Shown(ItemId),
    Failed(String),
}
