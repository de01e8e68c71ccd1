use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use engine_logging::{engine_error, engine_info, engine_warn};
use reminder_core::{pick_unseen, ContentItem, Corpus, ItemId, Picker, SeenSet, SelectError};

use crate::source::ContentSource;
use crate::store::CacheStore;

pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Current corpus and seen set, mirrored to durable storage after every change.
///
/// This is the only place where a failed fetch turns into "keep what we have".
pub struct ContentCache {
    corpus: Corpus,
    seen: SeenSet,
    store: CacheStore,
    source: Arc<dyn ContentSource>,
    max_age: TimeDelta,
    last_attempt: Option<DateTime<Utc>>,
}

impl ContentCache {
    /// Load the cache from `store`, seeding it from `fallback` when nothing
    /// usable has been stored yet. No network access happens here.
    pub fn open(
        store: CacheStore,
        source: Arc<dyn ContentSource>,
        fallback: Corpus,
        max_age: Duration,
    ) -> Self {
        let stored = match store.load_corpus() {
            Ok(Some(corpus)) if !corpus.is_empty() => Some(corpus),
            Ok(_) => None,
            Err(err) => {
                engine_warn!("Stored corpus unusable, reseeding: {}", err);
                None
            }
        };

        let (corpus, seeded) = match stored {
            Some(corpus) => (corpus, false),
            None => {
                engine_info!(
                    "Seeding cache from fallback corpus {} ({} items)",
                    fallback.revision(),
                    fallback.len()
                );
                (fallback, true)
            }
        };

        let seen = if seeded {
            SeenSet::new()
        } else {
            store.load_seen(&corpus).unwrap_or_else(|err| {
                engine_warn!("Stored seen set unusable, starting a new cycle: {}", err);
                SeenSet::new()
            })
        };

        let cache = Self {
            corpus,
            seen,
            store,
            source,
            max_age: TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX),
            last_attempt: None,
        };
        if seeded {
            cache.persist_corpus();
            cache.persist_seen();
        }
        engine_info!(
            "Cache ready: revision {}, {} items, {} seen",
            cache.corpus.revision(),
            cache.corpus.len(),
            cache.seen.len()
        );
        cache
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// One item not yet shown in this cycle.
    pub fn get_unseen(&self, picker: &mut dyn Picker) -> Result<ContentItem, SelectError> {
        pick_unseen(&self.corpus, &self.seen, picker).cloned()
    }

    /// Records `id` as shown. Ids outside the corpus are ignored.
    pub fn mark_seen(&mut self, id: &ItemId) -> bool {
        if !self.corpus.contains(id) {
            engine_warn!("Ignoring seen mark for unknown id {}", id);
            return false;
        }
        if self.seen.insert(id.clone()) {
            self.persist_seen();
        }
        true
    }

    pub fn reset_seen(&mut self) {
        self.seen.clear();
        self.persist_seen();
    }

    /// True when neither the corpus fetch time nor the last refresh attempt is
    /// younger than the maximum age.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let freshest = match (self.corpus.fetched_at(), self.last_attempt) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        match freshest {
            Some(at) => now.signed_duration_since(at) >= self.max_age,
            None => true,
        }
    }

    /// Replace the corpus with freshly fetched content.
    ///
    /// Returns true only when the items changed; the seen set is cleared in that
    /// case. On any failure the current corpus stays in place.
    /// Unchanged items adopt the new revision but keep the seen set.
    pub async fn refresh(&mut self) -> bool {
        self.last_attempt = Some(Utc::now());
        let fetched = match self.source.fetch().await {
            Ok(corpus) => corpus,
            Err(err) => {
                engine_warn!(
                    "Refresh failed ({}), keeping revision {}: {}",
                    err.kind,
                    self.corpus.revision(),
                    err.message
                );
                return false;
            }
        };

        if fetched.is_empty() {
            engine_warn!("Refresh returned no items, keeping revision {}", self.corpus.revision());
            return false;
        }

        if fetched.same_items(&self.corpus) {
            engine_info!("Refresh returned unchanged content");
            // Keep the cycle but adopt the new revision and fetch time.
            self.corpus = fetched;
            self.persist_corpus();
            self.persist_seen();
            return false;
        }

        engine_info!(
            "Corpus replaced: {} ({} items) -> {} ({} items)",
            self.corpus.revision(),
            self.corpus.len(),
            fetched.revision(),
            fetched.len()
        );
        self.corpus = fetched;
        self.seen.clear();
        self.persist_corpus();
        self.persist_seen();
        true
    }

    fn persist_corpus(&self) {
        if let Err(err) = self.store.save_corpus(&self.corpus) {
            engine_error!(
                "Failed to persist corpus to {:?}: {}",
                self.store.dir(),
                err
            );
        }
    }

    fn persist_seen(&self) {
        if let Err(err) = self.store.save_seen(&self.corpus, &self.seen) {
            engine_error!(
                "Failed to persist seen set to {:?}: {}",
                self.store.dir(),
                err
            );
        }
    }
}
