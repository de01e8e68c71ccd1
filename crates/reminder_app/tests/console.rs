use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reminder_app::platform::commands::{parse_command, Command};
use reminder_app::platform::config::Language;
use reminder_app::platform::console::{render_reminder, render_status, ConsoleSink};
use reminder_core::{ItemId, PresentationSink, SchedulerPhase, SchedulerView};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

const TWO_EDITIONS: &str = "إِنَّ مَعَ الْعُسْرِ يُسْرًا\n\nهمانا با سختی آسانی است";

#[test]
fn both_languages_print_every_paragraph() {
    assert_eq!(
        render_reminder(TWO_EDITIONS, Some("Quran 94:6"), Language::Both),
        "إِنَّ مَعَ الْعُسْرِ يُسْرًا\n\nهمانا با سختی آسانی است\n— Quran 94:6"
    );
}

#[test]
fn single_language_picks_its_paragraph() {
    assert_eq!(
        render_reminder(TWO_EDITIONS, None, Language::Arabic),
        "إِنَّ مَعَ الْعُسْرِ يُسْرًا"
    );
    assert_eq!(
        render_reminder(TWO_EDITIONS, None, Language::Persian),
        "همانا با سختی آسانی است"
    );
}

#[test]
fn single_paragraph_text_is_printed_whole() {
    let text = "Indeed, with hardship will be ease.";
    assert_eq!(render_reminder(text, None, Language::Persian), text);
}

#[test]
fn sink_writes_reminders_and_notices() {
    let buffer = SharedBuffer::default();
    let sink = ConsoleSink::new(Language::Both, Box::new(buffer.clone()));

    sink.show("Be patient.", Some("Quran 2:153"));
    sink.notice("no new reminders");

    assert_eq!(
        buffer.contents(),
        "Be patient.\n— Quran 2:153\n[notice] no new reminders\n"
    );
}

#[test]
fn status_line_describes_schedule() {
    let view = SchedulerView {
        phase: SchedulerPhase::Idle,
        interval: Some(Duration::from_secs(30 * 60)),
        last_shown_id: Some(ItemId::new("quran:94:5")),
        paused: true,
        ..SchedulerView::default()
    };
    assert_eq!(
        render_status(&view),
        "status: paused, every 30 min, last shown quran:94:5"
    );

    let view = SchedulerView {
        phase: SchedulerPhase::Waiting,
        next_fire_at: Some(chrono::Utc::now()),
        interval: Some(Duration::from_secs(3600)),
        ..SchedulerView::default()
    };
    let line = render_status(&view);
    assert!(line.starts_with("status: waiting, every 60 min, next at "));
}

#[test]
fn commands_are_parsed() {
    assert_eq!(parse_command("now").unwrap(), Some(Command::Now));
    assert_eq!(parse_command("  PAUSE ").unwrap(), Some(Command::Pause));
    assert_eq!(parse_command("resume").unwrap(), Some(Command::Resume));
    assert_eq!(parse_command("interval 45").unwrap(), Some(Command::Interval(45)));
    assert_eq!(parse_command("status").unwrap(), Some(Command::Status));
    assert_eq!(parse_command("refresh").unwrap(), Some(Command::Refresh));
    assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
    assert_eq!(parse_command("").unwrap(), None);
}

#[test]
fn malformed_commands_are_rejected() {
    assert!(parse_command("interval").is_err());
    assert!(parse_command("interval soon").is_err());
    assert!(parse_command("interval 0").is_err());
    assert!(parse_command("pause now").is_err());
    assert!(parse_command("dance").is_err());
}
