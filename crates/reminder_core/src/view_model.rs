use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{ItemId, SchedulerPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulerView {
    pub phase: SchedulerPhase,
    pub next_fire_at: Option<DateTime<Utc>>,
    pub interval: Option<Duration>,
    pub last_shown_id: Option<ItemId>,
    pub paused: bool,
    pub dirty: bool,
}
