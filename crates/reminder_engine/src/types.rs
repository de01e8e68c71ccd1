use std::fmt;

use reminder_core::ContentItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The armed timer reached its deadline.
    TimerElapsed,
    /// A fire produced an item, already marked seen.
    ItemReady(ContentItem),
    /// A fire could not produce an item; carries the reason shown to the user.
    FireFailed(String),
    /// An off-cycle refresh finished.
    Refreshed { changed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Format, message)
    }

    /// Malformed payload, as opposed to a transport failure.
    pub fn is_format(&self) -> bool {
        self.kind == FailureKind::Format
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Format,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Format => write!(f, "malformed payload"),
        }
    }
}
