use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;
use engine_logging::engine_warn;
use reminder_core::{PresentationSink, SchedulerPhase, SchedulerView};
use reminder_engine::REFERENCE_SEPARATOR;

use super::config::Language;

/// Prints reminders and notices to a writer, stdout by default.
pub struct ConsoleSink {
    language: Language,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stdout(language: Language) -> Self {
        Self::new(language, Box::new(io::stdout()))
    }

    pub fn new(language: Language, out: Box<dyn Write + Send>) -> Self {
        Self {
            language,
            out: Mutex::new(out),
        }
    }

    fn write_block(&self, block: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(out, "{block}").and_then(|()| out.flush()) {
            engine_warn!("Console output failed: {}", err);
        }
    }
}

impl PresentationSink for ConsoleSink {
    fn show(&self, text: &str, reference: Option<&str>) {
        self.write_block(&render_reminder(text, reference, self.language));
    }

    fn notice(&self, message: &str) {
        self.write_block(&format!("[notice] {message}"));
    }
}

/// Reminder as printed: the selected paragraphs, then the reference.
///
/// Multi-edition texts separate editions by a blank line; `Arabic` keeps the
/// first paragraph and `Persian` the last.
pub fn render_reminder(text: &str, reference: Option<&str>, language: Language) -> String {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let body = match (language, paragraphs.first(), paragraphs.last()) {
        (Language::Arabic, Some(first), _) => (*first).to_string(),
        (Language::Persian, _, Some(last)) => (*last).to_string(),
        _ => paragraphs.join("\n\n"),
    };
    match reference {
        Some(reference) => format!("{body}{REFERENCE_SEPARATOR}{reference}"),
        None => body,
    }
}

/// One-line summary for the `status` command.
pub fn render_status(view: &SchedulerView) -> String {
    let phase = match (view.phase, view.paused) {
        (_, true) => "paused",
        (SchedulerPhase::Waiting, false) => "waiting",
        (SchedulerPhase::Firing, false) => "showing",
        (SchedulerPhase::Idle, false) => "idle",
    };
    let mut line = format!("status: {phase}");
    if let Some(interval) = view.interval {
        line.push_str(&format!(", every {} min", interval.as_secs() / 60));
    }
    if let (Some(next), false) = (view.next_fire_at, view.paused) {
        line.push_str(&format!(
            ", next at {}",
            next.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    if let Some(last) = &view.last_shown_id {
        line.push_str(&format!(", last shown {last}"));
    }
    line
}
