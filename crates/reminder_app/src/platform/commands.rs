use anyhow::{anyhow, bail};

/// One line typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show a reminder right away.
    Now,
    Pause,
    Resume,
    /// New interval in minutes.
    Interval(u64),
    Status,
    /// Fetch new content off-cycle.
    Refresh,
    Quit,
    Help,
}

pub const HELP: &str = "commands: now, pause, resume, interval <minutes>, status, refresh, quit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "now" | "show" => Command::Now,
        "pause" => Command::Pause,
        "resume" | "start" => Command::Resume,
        "status" => Command::Status,
        "refresh" => Command::Refresh,
        "quit" | "exit" => Command::Quit,
        "help" | "?" => Command::Help,
        "interval" => {
            let value = words
                .next()
                .ok_or_else(|| anyhow!("interval needs a number of minutes"))?;
            let minutes: u64 = value
                .parse()
                .map_err(|_| anyhow!("'{value}' is not a number of minutes"))?;
            if minutes == 0 {
                bail!("interval must be at least one minute");
            }
            Command::Interval(minutes)
        }
        other => bail!("unknown command '{other}'"),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected argument '{extra}'");
    }
    Ok(Some(command))
}
