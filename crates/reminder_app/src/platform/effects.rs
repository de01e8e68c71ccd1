use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Utc;
use engine_logging::{engine_error, engine_info};
use reminder_core::{Effect, FireOutcome, Msg, PresentationSink};
use reminder_engine::{EngineEvent, EngineHandle, ScheduleStore};

use super::app::LoopEvent;

/// Executes scheduler effects against the engine, the schedule store and the
/// presentation sink.
pub struct EffectRunner {
    engine: EngineHandle,
    store: ScheduleStore,
    sink: Arc<dyn PresentationSink>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: ScheduleStore, sink: Arc<dyn PresentationSink>) -> Self {
        Self {
            engine,
            store,
            sink,
        }
    }

    pub fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmTimer { at } => self.engine.arm_timer(at),
                Effect::CancelTimer => self.engine.cancel_timer(),
                Effect::Fire => self.engine.fire(),
                Effect::PersistSchedule(schedule) => {
                    if let Err(err) = self.store.save(&schedule) {
                        engine_error!("Failed to persist schedule: {}", err);
                    }
                }
                Effect::Notify { message } => self.sink.notice(&message),
            }
        }
    }

    pub fn refresh(&self) {
        self.engine.refresh();
    }

    /// Forwards engine events to the main loop as scheduler messages. Items are
    /// handed to the sink here, before the scheduler learns the fire completed.
    pub fn spawn_event_forwarder(
        &self,
        event_rx: mpsc::Receiver<EngineEvent>,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> io::Result<()> {
        let sink = self.sink.clone();
        thread::Builder::new()
            .name("reminder-events".to_string())
            .spawn(move || {
                while let Ok(event) = event_rx.recv() {
                    let msg = match event {
                        EngineEvent::TimerElapsed => Msg::TimerElapsed { now: Utc::now() },
                        EngineEvent::ItemReady(item) => {
                            engine_info!("Showing {}", item.id());
                            sink.show(item.text(), item.reference());
                            Msg::FireCompleted {
                                now: Utc::now(),
                                outcome: FireOutcome::Shown(item.id().clone()),
                            }
                        }
                        EngineEvent::FireFailed(reason) => Msg::FireCompleted {
                            now: Utc::now(),
                            outcome: FireOutcome::Failed(reason),
                        },
                        EngineEvent::Refreshed { changed } => {
                            sink.notice(if changed {
                                "new reminders downloaded"
                            } else {
                                "no new reminders"
                            });
                            continue;
                        }
                    };
                    if loop_tx.send(LoopEvent::Core(msg)).is_err() {
                        break;
                    }
                }
            })?;
        Ok(())
    }
}
