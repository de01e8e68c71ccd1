//! Reminder core: data model, selection rule and the pure scheduler state machine.
mod content;
mod effect;
mod msg;
mod schedule;
mod select;
mod sink;
mod state;
mod update;
mod view_model;

pub use content::{ContentItem, Corpus, CorpusError, ItemId, SeenSet};
pub use effect::Effect;
pub use msg::{FireOutcome, Msg};
pub use schedule::{
    clamp_interval, next_after, ScheduleState, DEFAULT_INTERVAL, MAX_INTERVAL, MIN_INTERVAL,
};
pub use select::{pick_unseen, InOrder, Picker, RandomPicker, SelectError};
pub use sink::PresentationSink;
pub use state::{SchedulerPhase, SchedulerState};
pub use update::{update, TIMER_SLACK};
pub use view_model::SchedulerView;
