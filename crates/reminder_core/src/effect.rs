use chrono::{DateTime, Utc};

use crate::ScheduleState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the single reminder timer, replacing any armed one.
    ArmTimer { at: DateTime<Utc> },
    CancelTimer,
    /// Select an item and hand it to the presentation sink.
    Fire,
    PersistSchedule(ScheduleState),
    /// Non-fatal notice for the user.
    Notify { message: String },
}
