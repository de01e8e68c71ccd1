use crate::view_model::SchedulerView;
use crate::ScheduleState;

/// Scheduler phases. Only one timer is armed while `Waiting`; none otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerPhase {
    /// No timer armed: not started yet, or paused.
    #[default]
    Idle,
    /// Timer armed for `next_fire_at`.
    Waiting,
    /// A reminder is being selected and delivered.
    Firing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulerState {
    phase: SchedulerPhase,
    schedule: Option<ScheduleState>,
    dirty: bool,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// `None` until the scheduler has been started.
    pub fn schedule(&self) -> Option<&ScheduleState> {
        self.schedule.as_ref()
    }

    pub fn view(&self) -> SchedulerView {
        SchedulerView {
            phase: self.phase,
            next_fire_at: self.schedule.as_ref().map(|s| s.next_fire_at),
            interval: self.schedule.as_ref().map(|s| s.interval),
            last_shown_id: self.schedule.as_ref().and_then(|s| s.last_shown_id.clone()),
            paused: self.schedule.as_ref().is_some_and(|s| s.paused),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_phase(&mut self, phase: SchedulerPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }

    pub(crate) fn set_schedule(&mut self, schedule: ScheduleState) {
        self.schedule = Some(schedule);
        self.dirty = true;
    }

    pub(crate) fn schedule_mut(&mut self) -> Option<&mut ScheduleState> {
        self.dirty = true;
        self.schedule.as_mut()
    }
}
