//! Reminder engine: content sources, cache, durable state and the background
//! runtime that executes scheduler effects.
mod bundled;
mod cache;
mod decode;
mod engine;
mod fetch;
mod hash;
mod persist;
mod selector;
mod source;
mod store;
mod types;

pub use bundled::{bundled_corpus, fallback_corpus, FALLBACK_CORPUS_JSON, NO_CONTENT_REVISION};
pub use cache::{ContentCache, DEFAULT_MAX_AGE};
pub use decode::{
    decode_ayah_editions, decode_corpus_document, display_len, REFERENCE_SEPARATOR,
};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, HttpClient};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use selector::Selector;
pub use source::{
    AyahSettings, AyahSource, ContentSource, CorpusEndpointSource, DEFAULT_AYAH_API, MAX_BATCH_SIZE,
    TOTAL_AYAHS,
};
pub use store::{
    CacheStore, ScheduleStore, StoreError, CORPUS_FILENAME, FORMAT_VERSION, SCHEDULE_FILENAME,
    SEEN_FILENAME,
};
pub use types::{EngineEvent, FailureKind, FetchError};
