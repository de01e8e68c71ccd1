use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    clamp_interval, next_after, Effect, FireOutcome, Msg, ScheduleState, SchedulerPhase,
    SchedulerState,
};

/// Timer events this close to `next_fire_at` count as due.
pub const TIMER_SLACK: Duration = Duration::from_secs(1);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SchedulerState, msg: Msg) -> (SchedulerState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started {
            now,
            restored,
            default_interval,
            auto_start,
        } => {
            if state.schedule().is_some() {
                return (state, Vec::new());
            }
            start(&mut state, now, restored, default_interval, auto_start)
        }
        Msg::TimerElapsed { now } => {
            let slack = TimeDelta::seconds(TIMER_SLACK.as_secs() as i64);
            let due = state.schedule().is_some_and(|s| s.is_due(now + slack));
            // A timer that was replaced after it elapsed can still deliver its event.
            if state.phase() != SchedulerPhase::Waiting || !due {
                return (state, Vec::new());
            }
            state.set_phase(SchedulerPhase::Firing);
            vec![Effect::Fire]
        }
        Msg::FireCompleted { now, outcome } => {
            if state.phase() != SchedulerPhase::Firing {
                return (state, Vec::new());
            }
            complete_fire(&mut state, now, outcome)
        }
        Msg::IntervalChanged { now, interval } => {
            if state.schedule().is_none() {
                return (state, Vec::new());
            }
            let phase = state.phase();
            let Some(schedule) = state.schedule_mut() else {
                return (state, Vec::new());
            };
            schedule.interval = clamp_interval(interval);
            schedule.reschedule_from(now);
            let snapshot = schedule.clone();
            let mut effects = vec![Effect::PersistSchedule(snapshot.clone())];
            // Firing re-arms on completion; Idle stays idle.
            if phase == SchedulerPhase::Waiting {
                effects.push(Effect::ArmTimer {
                    at: snapshot.next_fire_at,
                });
            }
            effects
        }
        Msg::ShowNowRequested => match state.phase() {
            SchedulerPhase::Waiting | SchedulerPhase::Idle if state.schedule().is_some() => {
                state.set_phase(SchedulerPhase::Firing);
                vec![Effect::CancelTimer, Effect::Fire]
            }
            _ => Vec::new(),
        },
        Msg::PauseRequested => {
            if state.schedule().map_or(true, |s| s.paused) {
                return (state, Vec::new());
            }
            let phase = state.phase();
            let Some(schedule) = state.schedule_mut() else {
                return (state, Vec::new());
            };
            schedule.paused = true;
            let snapshot = schedule.clone();
            let mut effects = Vec::with_capacity(2);
            if phase == SchedulerPhase::Waiting {
                state.set_phase(SchedulerPhase::Idle);
                effects.push(Effect::CancelTimer);
            }
            effects.push(Effect::PersistSchedule(snapshot));
            effects
        }
        Msg::ResumeRequested { now } => {
            if !state.schedule().is_some_and(|s| s.paused) {
                return (state, Vec::new());
            }
            let phase = state.phase();
            let Some(schedule) = state.schedule_mut() else {
                return (state, Vec::new());
            };
            schedule.paused = false;
            schedule.reschedule_from(now);
            let snapshot = schedule.clone();
            let mut effects = vec![Effect::PersistSchedule(snapshot.clone())];
            if phase == SchedulerPhase::Idle {
                state.set_phase(SchedulerPhase::Waiting);
                effects.push(Effect::ArmTimer {
                    at: snapshot.next_fire_at,
                });
            }
            effects
        }
        Msg::ShutdownRequested => {
            let Some(snapshot) = state.schedule().cloned() else {
                return (state, Vec::new());
            };
            state.set_phase(SchedulerPhase::Idle);
            vec![Effect::CancelTimer, Effect::PersistSchedule(snapshot)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start(
    state: &mut SchedulerState,
    now: DateTime<Utc>,
    restored: Option<ScheduleState>,
    default_interval: Duration,
    auto_start: bool,
) -> Vec<Effect> {
    let Some(mut schedule) = restored else {
        let mut schedule = ScheduleState::new(now, default_interval);
        schedule.paused = !auto_start;
        state.set_schedule(schedule.clone());
        if schedule.paused {
            state.set_phase(SchedulerPhase::Idle);
            return vec![Effect::PersistSchedule(schedule)];
        }
        state.set_phase(SchedulerPhase::Waiting);
        let at = schedule.next_fire_at;
        return vec![Effect::PersistSchedule(schedule), Effect::ArmTimer { at }];
    };

    let mut effects = Vec::with_capacity(2);
    let configured = clamp_interval(default_interval);
    if clamp_interval(schedule.interval) != configured {
        // The configured interval wins; never push the next reminder further out.
        schedule.interval = configured;
        schedule.next_fire_at = schedule.next_fire_at.min(next_after(now, configured));
        effects.push(Effect::PersistSchedule(schedule.clone()));
    } else {
        schedule.interval = configured;
    }
    let paused = schedule.paused;
    let due = schedule.is_due(now);
    let at = schedule.next_fire_at;
    state.set_schedule(schedule);

    if paused {
        state.set_phase(SchedulerPhase::Idle);
    } else if due {
        // At most one catch-up reminder, however many intervals were missed.
        state.set_phase(SchedulerPhase::Firing);
        effects.push(Effect::Fire);
    } else {
        state.set_phase(SchedulerPhase::Waiting);
        effects.push(Effect::ArmTimer { at });
    }
    effects
}

fn complete_fire(
    state: &mut SchedulerState,
    now: DateTime<Utc>,
    outcome: FireOutcome,
) -> Vec<Effect> {
    let Some(schedule) = state.schedule_mut() else {
        return Vec::new();
    };
    let mut effects = Vec::with_capacity(3);
    match outcome {
        FireOutcome::Shown(id) => schedule.last_shown_id = Some(id),
        FireOutcome::Failed(message) => effects.push(Effect::Notify { message }),
    }
    schedule.reschedule_from(now);
    let snapshot = schedule.clone();
    effects.push(Effect::PersistSchedule(snapshot.clone()));

    if snapshot.paused {
        state.set_phase(SchedulerPhase::Idle);
    } else {
        state.set_phase(SchedulerPhase::Waiting);
        effects.push(Effect::ArmTimer {
            at: snapshot.next_fire_at,
        });
    }
    effects
}
