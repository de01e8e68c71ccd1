//! Durable records for the schedule, the corpus and the seen set.
//!
//! Each record is one RON file written atomically. Loading ignores unknown
//! fields and defaults missing optional ones, so files written by a newer or
//! older build still load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_info};
use reminder_core::{ContentItem, Corpus, ItemId, ScheduleState, SeenSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub const FORMAT_VERSION: u32 = 1;
pub const SCHEDULE_FILENAME: &str = "schedule.ron";
pub const CORPUS_FILENAME: &str = "corpus.ron";
pub const SEEN_FILENAME: &str = "seen.ron";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize {what}: {message}")]
    Serialize { what: &'static str, message: String },
    #[error("invalid record in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSchedule {
    #[serde(default)]
    format_version: u32,
    next_fire_at: DateTime<Utc>,
    interval_secs: u64,
    #[serde(default)]
    last_shown_id: Option<String>,
    #[serde(default)]
    paused: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCorpus {
    #[serde(default)]
    format_version: u32,
    revision: String,
    #[serde(default)]
    fetched_at: Option<DateTime<Utc>>,
    items: Vec<PersistedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedItem {
    id: String,
    text: String,
    #[serde(default)]
    reference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSeen {
    #[serde(default)]
    format_version: u32,
    revision: String,
    #[serde(default)]
    ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduleStore {
    writer: AtomicFileWriter,
}

impl ScheduleStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    /// `Ok(None)` when no schedule has been written yet.
    pub fn load(&self) -> Result<Option<ScheduleState>, StoreError> {
        let Some(record) = read_record::<PersistedSchedule>(self.writer.dir(), SCHEDULE_FILENAME)?
        else {
            return Ok(None);
        };
        Ok(Some(ScheduleState {
            next_fire_at: record.next_fire_at,
            interval: Duration::from_secs(record.interval_secs),
            last_shown_id: record.last_shown_id.map(ItemId::new),
            paused: record.paused,
        }))
    }

    pub fn save(&self, schedule: &ScheduleState) -> Result<(), StoreError> {
        let record = PersistedSchedule {
            format_version: FORMAT_VERSION,
            next_fire_at: schedule.next_fire_at,
            interval_secs: schedule.interval.as_secs(),
            last_shown_id: schedule
                .last_shown_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            paused: schedule.paused,
        };
        write_record(&self.writer, SCHEDULE_FILENAME, "schedule", &record)?;
        engine_debug!("Saved schedule, next fire at {}", schedule.next_fire_at);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    writer: AtomicFileWriter,
}

impl CacheStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    /// `Ok(None)` when no corpus has been written yet.
    pub fn load_corpus(&self) -> Result<Option<Corpus>, StoreError> {
        let Some(record) = read_record::<PersistedCorpus>(self.dir(), CORPUS_FILENAME)? else {
            return Ok(None);
        };
        let items = record
            .items
            .into_iter()
            .map(|item| ContentItem::new(ItemId::new(item.id), item.text, item.reference))
            .collect();
        let corpus = Corpus::new(record.revision, record.fetched_at, items).map_err(|err| {
            StoreError::Invalid {
                path: self.dir().join(CORPUS_FILENAME),
                message: err.to_string(),
            }
        })?;
        Ok(Some(corpus))
    }

    pub fn save_corpus(&self, corpus: &Corpus) -> Result<(), StoreError> {
        let record = PersistedCorpus {
            format_version: FORMAT_VERSION,
            revision: corpus.revision().to_string(),
            fetched_at: corpus.fetched_at(),
            items: corpus
                .items()
                .iter()
                .map(|item| PersistedItem {
                    id: item.id().as_str().to_string(),
                    text: item.text().to_string(),
                    reference: item.reference().map(ToOwned::to_owned),
                })
                .collect(),
        };
        write_record(&self.writer, CORPUS_FILENAME, "corpus", &record)
    }

    /// Seen ids recorded for `corpus`. A record written for another revision
    /// is discarded, and ids not present in `corpus` are dropped.
    pub fn load_seen(&self, corpus: &Corpus) -> Result<SeenSet, StoreError> {
        let Some(record) = read_record::<PersistedSeen>(self.dir(), SEEN_FILENAME)? else {
            return Ok(SeenSet::new());
        };
        if record.revision != corpus.revision() {
            engine_info!(
                "Discarding seen set for revision {} (corpus is {})",
                record.revision,
                corpus.revision()
            );
            return Ok(SeenSet::new());
        }
        let mut seen: SeenSet = record.ids.into_iter().map(ItemId::new).collect();
        let dropped = seen.retain_within(corpus);
        if dropped > 0 {
            engine_info!("Dropped {} seen ids not in the corpus", dropped);
        }
        Ok(seen)
    }

    pub fn save_seen(&self, corpus: &Corpus, seen: &SeenSet) -> Result<(), StoreError> {
        let record = PersistedSeen {
            format_version: FORMAT_VERSION,
            revision: corpus.revision().to_string(),
            ids: seen.iter().map(|id| id.as_str().to_string()).collect(),
        };
        write_record(&self.writer, SEEN_FILENAME, "seen set", &record)
    }
}

fn read_record<T: DeserializeOwned>(dir: &Path, filename: &str) -> Result<Option<T>, StoreError> {
    let path = dir.join(filename);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StoreError::Read { path, source }),
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|err| StoreError::Parse {
            path,
            message: err.to_string(),
        })
}

fn write_record<T: Serialize>(
    writer: &AtomicFileWriter,
    filename: &str,
    what: &'static str,
    record: &T,
) -> Result<(), StoreError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(record, pretty).map_err(|err| StoreError::Serialize {
            what,
            message: err.to_string(),
        })?;
    writer.write(filename, &content)?;
    Ok(())
}
