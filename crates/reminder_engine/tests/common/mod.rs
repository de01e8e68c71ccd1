#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use reminder_core::{ContentItem, Corpus, ItemId};
use reminder_engine::{ContentSource, FailureKind, FetchError};

pub fn item(id: &str) -> ContentItem {
    ContentItem::new(ItemId::new(id), format!("text of {id}"), Some(format!("Ref {id}")))
}

/// Corpus that counts as freshly fetched, so no staleness refresh kicks in.
pub fn fresh_corpus(revision: &str, ids: &[&str]) -> Corpus {
    Corpus::new(revision, Some(Utc::now()), ids.iter().map(|id| item(id)).collect()).unwrap()
}

/// Corpus without a fetch time, like the bundled one.
pub fn bundled_like(revision: &str, ids: &[&str]) -> Corpus {
    Corpus::new(revision, None, ids.iter().map(|id| item(id)).collect()).unwrap()
}

/// Source that replays a scripted sequence of results, then keeps failing.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    results: Arc<Mutex<Vec<Result<Corpus, FetchError>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn returning(results: Vec<Result<Corpus, FetchError>>) -> Self {
        let mut results = results;
        results.reverse();
        Self {
            results: Arc::new(Mutex::new(results)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentSource for ScriptedSource {
    async fn fetch(&self) -> Result<Corpus, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.results.lock().unwrap().pop();
        next.unwrap_or_else(|| Err(offline()))
    }
}

pub fn offline() -> FetchError {
    FetchError {
        kind: FailureKind::Network,
        message: "offline".to_string(),
    }
}
