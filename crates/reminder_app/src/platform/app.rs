use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Utc;
use engine_logging::{engine_debug, engine_info, engine_warn, LogDestination};
use log::LevelFilter;
use reminder_core::{
    update, InOrder, Msg, Picker, PresentationSink, RandomPicker, SchedulerState,
};
use reminder_engine::{
    bundled_corpus, ensure_data_dir, AyahSource, CacheStore, ContentCache, ContentSource,
    CorpusEndpointSource, EngineHandle, HttpClient, ScheduleStore, Selector, DEFAULT_MAX_AGE,
};

use super::commands::{parse_command, Command, HELP};
use super::config::AppConfig;
use super::console::{render_status, ConsoleSink};
use super::effects::EffectRunner;

/// Input of the main loop: scheduler messages from the engine, or console
/// commands.
pub enum LoopEvent {
    Core(Msg),
    Command(Command),
    InputClosed,
}

/// Runs the reminder until `quit` is typed. `config_path` overrides the
/// default configuration file location.
pub fn run_app(config_path: Option<String>) -> anyhow::Result<()> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    let (config, config_error) = match AppConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    let data_dir = config.data_dir();
    ensure_data_dir(&data_dir)
        .with_context(|| format!("preparing data directory {}", data_dir.display()))?;
    engine_logging::initialize(LogDestination::File, Some(&data_dir), LevelFilter::Info);
    engine_info!("Starting with config {:?}, data in {:?}", config_path, data_dir);
    if let Some(err) = config_error {
        engine_warn!("Using default settings: {:#}", err);
    }
    engine_debug!(
        "Presentation: language {:?}, theme {}, duration {:?}",
        config.language(),
        config.theme,
        config.notification_duration()
    );

    let http = HttpClient::new(config.fetch_settings()).context("building HTTP client")?;
    let source: Arc<dyn ContentSource> = match config.endpoint() {
        Some(url) => {
            engine_info!("Content from corpus endpoint {}", url);
            Arc::new(CorpusEndpointSource::new(http, url))
        }
        None => Arc::new(AyahSource::new(http, config.ayah_settings())),
    };
    let cache = ContentCache::open(
        CacheStore::new(data_dir.clone()),
        source,
        bundled_corpus(),
        DEFAULT_MAX_AGE,
    );
    let picker: Box<dyn Picker> = if config.shuffle {
        Box::new(RandomPicker::from_os_rng())
    } else {
        Box::new(InOrder)
    };

    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::new(Selector::new(cache, picker), event_tx)
        .context("starting reminder engine")?;
    let schedule_store = ScheduleStore::new(data_dir);
    let restored = match schedule_store.load() {
        Ok(restored) => restored,
        Err(err) => {
            engine_warn!("Stored schedule unusable, starting fresh: {}", err);
            None
        }
    };

    let sink: Arc<dyn PresentationSink> = Arc::new(ConsoleSink::stdout(config.language()));
    let runner = EffectRunner::new(engine, schedule_store, sink.clone());
    let (loop_tx, loop_rx) = mpsc::channel();
    runner
        .spawn_event_forwarder(event_rx, loop_tx.clone())
        .context("starting event forwarder")?;
    spawn_console_reader(loop_tx).context("starting console reader")?;

    let mut state = SchedulerState::new();
    dispatch(
        &mut state,
        &runner,
        Msg::Started {
            now: Utc::now(),
            restored,
            default_interval: config.interval(),
            auto_start: config.auto_start,
        },
    );
    sink.notice(&render_status(&state.view()));

    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Core(msg) => dispatch(&mut state, &runner, msg),
            LoopEvent::Command(command) => {
                if !handle_command(&mut state, &runner, sink.as_ref(), command) {
                    break;
                }
            }
            LoopEvent::InputClosed => {
                engine_info!("Console input closed; running until stopped");
            }
        }
    }

    engine_info!("Shutting down");
    Ok(())
}

/// Returns false once the loop should stop.
fn handle_command(
    state: &mut SchedulerState,
    runner: &EffectRunner,
    sink: &dyn PresentationSink,
    command: Command,
) -> bool {
    match command {
        Command::Now => dispatch(state, runner, Msg::ShowNowRequested),
        Command::Pause => dispatch(state, runner, Msg::PauseRequested),
        Command::Resume => dispatch(state, runner, Msg::ResumeRequested { now: Utc::now() }),
        Command::Interval(minutes) => dispatch(
            state,
            runner,
            Msg::IntervalChanged {
                now: Utc::now(),
                interval: std::time::Duration::from_secs(minutes.saturating_mul(60)),
            },
        ),
        Command::Status => sink.notice(&render_status(&state.view())),
        Command::Refresh => runner.refresh(),
        Command::Help => sink.notice(HELP),
        Command::Quit => {
            dispatch(state, runner, Msg::ShutdownRequested);
            return false;
        }
    }
    true
}

fn dispatch(state: &mut SchedulerState, runner: &EffectRunner, msg: Msg) {
    let (mut next, effects) = update(std::mem::take(state), msg);
    if next.consume_dirty() {
        engine_debug!("Scheduler now {:?}", next.view());
    }
    *state = next;
    runner.apply(effects);
}

fn spawn_console_reader(loop_tx: mpsc::Sender<LoopEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("reminder-console".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let event = match parse_command(&line) {
                    Ok(Some(command)) => LoopEvent::Command(command),
                    Ok(None) => continue,
                    Err(err) => {
                        eprintln!("{err}; {HELP}");
                        continue;
                    }
                };
                if loop_tx.send(event).is_err() {
                    return;
                }
            }
            let _ = loop_tx.send(LoopEvent::InputClosed);
        })?;
    Ok(())
}
