use chrono::Utc;
use engine_logging::{engine_debug, engine_info};
use reminder_core::{ContentItem, Picker, SelectError};

use crate::cache::ContentCache;

/// Picks the next reminder: no repeats until the corpus is exhausted, then a
/// new cycle over whatever corpus is current.
pub struct Selector {
    cache: ContentCache,
    picker: Box<dyn Picker>,
}

impl Selector {
    pub fn new(cache: ContentCache, picker: Box<dyn Picker>) -> Self {
        Self { cache, picker }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Off-cycle refresh; see [`ContentCache::refresh`].
    pub async fn refresh(&mut self) -> bool {
        self.cache.refresh().await
    }

    /// Next item to show, marked seen before it is returned.
    ///
    /// Only fails with [`SelectError::EmptyCorpus`], when neither the cache nor
    /// the source has any content.
    pub async fn next(&mut self) -> Result<ContentItem, SelectError> {
        if self.cache.corpus().is_empty() || self.cache.is_stale(Utc::now()) {
            engine_debug!(
                "Corpus {} is empty or stale, refreshing",
                self.cache.corpus().revision()
            );
            self.cache.refresh().await;
        }

        let item = match self.cache.get_unseen(self.picker.as_mut()) {
            Ok(item) => item,
            Err(SelectError::Exhausted) => {
                engine_info!(
                    "All {} items shown, starting a new cycle",
                    self.cache.corpus().len()
                );
                self.cache.refresh().await;
                // A new cycle starts even when the refresh failed.
                self.cache.reset_seen();
                self.cache.get_unseen(self.picker.as_mut())?
            }
            Err(err) => return Err(err),
        };

        self.cache.mark_seen(item.id());
        Ok(item)
    }
}
