use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

/// Stable identifier of a content item within a corpus.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One displayable excerpt. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    id: ItemId,
    text: String,
    reference: Option<String>,
}

impl ContentItem {
    pub fn new(id: ItemId, text: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            id,
            text: text.into(),
            reference,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorpusError {
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
    #[error("item {0} has no text")]
    EmptyText(ItemId),
}

/// Ordered snapshot of content items, tagged with a revision.
///
/// A corpus is replaced as a whole and never edited in place. `fetched_at` is
/// `None` for content that did not come from the network (the bundled set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    revision: String,
    fetched_at: Option<DateTime<Utc>>,
    items: Vec<ContentItem>,
}

impl Corpus {
    pub fn new(
        revision: impl Into<String>,
        fetched_at: Option<DateTime<Utc>>,
        items: Vec<ContentItem>,
    ) -> Result<Self, CorpusError> {
        let mut ids = HashSet::with_capacity(items.len());
        for item in &items {
            if item.text.trim().is_empty() {
                return Err(CorpusError::EmptyText(item.id.clone()));
            }
            if !ids.insert(&item.id) {
                return Err(CorpusError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self {
            revision: revision.into(),
            fetched_at,
            items,
        })
    }

    /// Corpus without items, used when no content is available at all.
    pub fn empty(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            fetched_at: None,
            items: Vec::new(),
        }
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&ContentItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// True when both snapshots hold the same items in the same order,
    /// regardless of revision tag or fetch time.
    pub fn same_items(&self, other: &Corpus) -> bool {
        self.items == other.items
    }
}

/// Ids already shown in the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeenSet {
    ids: BTreeSet<ItemId>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    /// Every item of `corpus` has been seen. An empty corpus is never covered.
    pub fn covers(&self, corpus: &Corpus) -> bool {
        !corpus.is_empty() && corpus.items().iter().all(|item| self.contains(item.id()))
    }

    /// Drops ids that are not part of `corpus` and returns how many were removed.
    pub fn retain_within(&mut self, corpus: &Corpus) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| corpus.contains(id));
        before - self.ids.len()
    }
}

impl FromIterator<ItemId> for SeenSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
