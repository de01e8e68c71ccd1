use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use reminder_core::{
    update, Effect, ItemId, Msg, ScheduleState, SchedulerPhase, SchedulerState, MAX_INTERVAL,
};

const HOUR: Duration = Duration::from_secs(60 * 60);

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
}

fn start(now: DateTime<Utc>, restored: Option<ScheduleState>) -> (SchedulerState, Vec<Effect>) {
    update(
        SchedulerState::new(),
        Msg::Started {
            now,
            restored,
            default_interval: HOUR,
            auto_start: true,
        },
    )
}

fn persisted(next_fire_at: DateTime<Utc>) -> ScheduleState {
    ScheduleState {
        next_fire_at,
        interval: HOUR,
        last_shown_id: Some(ItemId::new("quran:94:5")),
        paused: false,
    }
}

#[test]
fn first_run_creates_schedule_and_arms_timer() {
    let (mut state, effects) = start(at(9, 0), None);

    let schedule = state.schedule().cloned().expect("schedule created");
    assert_eq!(schedule.next_fire_at, at(10, 0));
    assert_eq!(schedule.interval, HOUR);
    assert_eq!(schedule.last_shown_id, None);
    assert_eq!(state.phase(), SchedulerPhase::Waiting);
    assert_eq!(
        effects,
        vec![
            Effect::PersistSchedule(schedule),
            Effect::ArmTimer { at: at(10, 0) },
        ]
    );
    assert!(state.consume_dirty());
}

#[test]
fn first_run_without_auto_start_stays_idle() {
    let (state, effects) = update(
        SchedulerState::new(),
        Msg::Started {
            now: at(9, 0),
            restored: None,
            default_interval: HOUR,
            auto_start: false,
        },
    );

    assert_eq!(state.phase(), SchedulerPhase::Idle);
    assert!(state.view().paused);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::PersistSchedule(ref s) if s.paused));
}

#[test]
fn reload_before_due_arms_for_exactly_the_persisted_time() {
    let target = at(10, 0);
    let (state, effects) = start(at(9, 17), Some(persisted(target)));

    assert_eq!(state.phase(), SchedulerPhase::Waiting);
    assert_eq!(effects, vec![Effect::ArmTimer { at: target }]);
    assert_eq!(state.view().next_fire_at, Some(target));
}

#[test]
fn reload_after_due_fires_exactly_once() {
    let target = at(10, 0);
    for late_by in [
        TimeDelta::seconds(0),
        TimeDelta::minutes(5),
        TimeDelta::hours(7),
        TimeDelta::days(40),
    ] {
        let (state, effects) = start(target + late_by, Some(persisted(target)));
        assert_eq!(state.phase(), SchedulerPhase::Firing);
        assert_eq!(effects, vec![Effect::Fire], "late by {late_by}");
    }
}

#[test]
fn catch_up_fire_rearms_one_interval_after_completion() {
    let target = at(10, 0);
    let (state, _) = start(at(18, 30), Some(persisted(target)));

    let (state, effects) = update(
        state,
        Msg::FireCompleted {
            now: at(18, 31),
            outcome: reminder_core::FireOutcome::Shown(ItemId::new("quran:2:152")),
        },
    );

    assert_eq!(state.phase(), SchedulerPhase::Waiting);
    let arms: Vec<_> = effects
        .iter()
        .filter(|e| matches!(e, Effect::ArmTimer { .. }))
        .collect();
    assert_eq!(arms, vec![&Effect::ArmTimer { at: at(19, 31) }]);
    assert!(!effects.contains(&Effect::Fire));
}

#[test]
fn reload_while_paused_stays_idle() {
    let mut schedule = persisted(at(10, 0));
    schedule.paused = true;
    let (state, effects) = start(at(11, 0), Some(schedule));

    assert_eq!(state.phase(), SchedulerPhase::Idle);
    assert!(effects.is_empty());
}

fn start_with_config(
    now: DateTime<Utc>,
    restored: ScheduleState,
    configured: Duration,
) -> (SchedulerState, Vec<Effect>) {
    update(
        SchedulerState::new(),
        Msg::Started {
            now,
            restored: Some(restored),
            default_interval: configured,
            auto_start: true,
        },
    )
}

#[test]
fn restored_interval_is_clamped() {
    let mut schedule = persisted(at(10, 0));
    let month = Duration::from_secs(30 * 24 * 60 * 60);
    schedule.interval = month;
    let (state, effects) = start_with_config(at(9, 0), schedule, month);

    assert_eq!(state.view().interval, Some(MAX_INTERVAL));
    assert_eq!(effects, vec![Effect::ArmTimer { at: at(10, 0) }]);
}

#[test]
fn shorter_configured_interval_pulls_next_reminder_in() {
    // Stored: hourly, next at 11:00. Config now says every 10 minutes.
    let (state, effects) =
        start_with_config(at(10, 0), persisted(at(11, 0)), Duration::from_secs(600));

    let schedule = state.schedule().cloned().unwrap();
    assert_eq!(schedule.interval, Duration::from_secs(600));
    assert_eq!(schedule.next_fire_at, at(10, 10));
    assert_eq!(state.phase(), SchedulerPhase::Waiting);
    assert_eq!(
        effects,
        vec![
            Effect::PersistSchedule(schedule),
            Effect::ArmTimer { at: at(10, 10) },
        ]
    );
}

#[test]
fn longer_configured_interval_keeps_pending_reminder() {
    let (state, effects) =
        start_with_config(at(10, 30), persisted(at(11, 0)), 2 * HOUR);

    let schedule = state.schedule().cloned().unwrap();
    assert_eq!(schedule.interval, 2 * HOUR);
    assert_eq!(schedule.next_fire_at, at(11, 0));
    assert_eq!(
        effects,
        vec![
            Effect::PersistSchedule(schedule),
            Effect::ArmTimer { at: at(11, 0) },
        ]
    );
}

#[test]
fn configured_interval_change_while_late_still_fires_once() {
    let (state, effects) =
        start_with_config(at(15, 0), persisted(at(11, 0)), Duration::from_secs(600));

    assert_eq!(state.phase(), SchedulerPhase::Firing);
    let schedule = state.schedule().cloned().unwrap();
    assert_eq!(schedule.interval, Duration::from_secs(600));
    assert_eq!(
        effects,
        vec![Effect::PersistSchedule(schedule), Effect::Fire]
    );
}

#[test]
fn unchanged_config_restart_does_not_persist() {
    let (_, effects) = start_with_config(at(10, 0), persisted(at(11, 0)), HOUR);
    assert_eq!(effects, vec![Effect::ArmTimer { at: at(11, 0) }]);
}

#[test]
fn second_start_is_ignored() {
    let (state, _) = start(at(9, 0), None);
    let (next, effects) = update(
        state.clone(),
        Msg::Started {
            now: at(12, 0),
            restored: None,
            default_interval: HOUR,
            auto_start: true,
        },
    );
    assert_eq!(next, state);
    assert!(effects.is_empty());
}
