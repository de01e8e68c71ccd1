use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::selector::Selector;
use crate::EngineEvent;

/// Longest single sleep of the timer task. The wall clock is re-read after
/// each slice so that a suspended machine fires promptly after wake-up.
const MAX_TIMER_SLICE: Duration = Duration::from_secs(30);

enum EngineCommand {
    ArmTimer { at: DateTime<Utc> },
    CancelTimer,
    Fire,
    Refresh,
}

/// Owns the background runtime that runs the reminder timer, selection and
/// network refreshes. Results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(selector: Selector, event_tx: mpsc::Sender<EngineEvent>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("reminder-worker")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let selector = Arc::new(Mutex::new(selector));

        thread::Builder::new()
            .name("reminder-engine".to_string())
            .spawn(move || {
                let mut timer: Option<CancellationToken> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::ArmTimer { at } => {
                            if let Some(previous) = timer.take() {
                                previous.cancel();
                            }
                            let token = CancellationToken::new();
                            timer = Some(token.clone());
                            engine_debug!("Timer armed for {}", at);
                            runtime.spawn(run_timer(at, token, event_tx.clone()));
                        }
                        EngineCommand::CancelTimer => {
                            if let Some(previous) = timer.take() {
                                engine_debug!("Timer cancelled");
                                previous.cancel();
                            }
                        }
                        EngineCommand::Fire => {
                            runtime.spawn(fire(selector.clone(), event_tx.clone()));
                        }
                        EngineCommand::Refresh => {
                            runtime.spawn(refresh(selector.clone(), event_tx.clone()));
                        }
                    }
                }
                if let Some(previous) = timer.take() {
                    previous.cancel();
                }
                runtime.shutdown_timeout(Duration::from_secs(2));
                engine_info!("Engine stopped");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Arm the reminder timer, replacing any armed one.
    pub fn arm_timer(&self, at: DateTime<Utc>) {
        self.send(EngineCommand::ArmTimer { at });
    }

    pub fn cancel_timer(&self) {
        self.send(EngineCommand::CancelTimer);
    }

    pub fn fire(&self) {
        self.send(EngineCommand::Fire);
    }

    pub fn refresh(&self) {
        self.send(EngineCommand::Refresh);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn run_timer(
    at: DateTime<Utc>,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    loop {
        let remaining = match (at - Utc::now()).to_std() {
            Ok(remaining) if !remaining.is_zero() => remaining,
            // Negative or zero: due now.
            _ => break,
        };
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(remaining.min(MAX_TIMER_SLICE)) => {}
        }
    }
    if !token.is_cancelled() {
        let _ = event_tx.send(EngineEvent::TimerElapsed);
    }
}

async fn fire(selector: Arc<Mutex<Selector>>, event_tx: mpsc::Sender<EngineEvent>) {
    // Selection runs in its own task so that a panic still ends in an event.
    let selection = tokio::spawn(async move { selector.lock().await.next().await });
    let event = match selection.await {
        Ok(Ok(item)) => EngineEvent::ItemReady(item),
        Ok(Err(err)) => {
            engine_warn!("Reminder could not be produced: {}", err);
            EngineEvent::FireFailed(err.to_string())
        }
        Err(join_err) => {
            engine_error!("Reminder selection aborted: {}", join_err);
            EngineEvent::FireFailed("reminder selection aborted".to_string())
        }
    };
    let _ = event_tx.send(event);
}

async fn refresh(selector: Arc<Mutex<Selector>>, event_tx: mpsc::Sender<EngineEvent>) {
    let changed = selector.lock().await.refresh().await;
    let _ = event_tx.send(EngineEvent::Refreshed { changed });
}
