use chrono::{DateTime, Utc};
use reminder_core::{ContentItem, Corpus, ItemId};
use serde::Deserialize;

use crate::hash::{derived_item_id, derived_revision};
use crate::FetchError;

/// Separator placed between the text and the reference when displayed.
pub const REFERENCE_SEPARATOR: &str = "\n— ";

#[derive(Debug, Deserialize)]
struct CorpusDocument {
    #[serde(default)]
    revision: Option<String>,
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    reference: Option<String>,
}

/// Parse a corpus document:
/// `{ "revision"?: str, "items": [{ "id"?: str, "text": str, "reference"?: str }] }`.
///
/// Unknown fields are ignored. An empty item list is a format error.
pub fn decode_corpus_document(
    bytes: &[u8],
    fetched_at: Option<DateTime<Utc>>,
) -> Result<Corpus, FetchError> {
    let document: CorpusDocument = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::format(format!("invalid corpus document: {err}")))?;
    if document.items.is_empty() {
        return Err(FetchError::format("corpus document has no items"));
    }

    let items: Vec<ContentItem> = document
        .items
        .into_iter()
        .map(|record| {
            let reference = non_blank(record.reference);
            let id = non_blank(record.id)
                .unwrap_or_else(|| derived_item_id(&record.text, reference.as_deref()));
            ContentItem::new(ItemId::new(id), record.text, reference)
        })
        .collect();

    let revision = non_blank(document.revision).unwrap_or_else(|| derived_revision(&items));
    Corpus::new(revision, fetched_at, items).map_err(|err| FetchError::format(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct AyahEnvelope {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    data: Vec<AyahEdition>,
}

#[derive(Debug, Deserialize)]
struct AyahEdition {
    text: String,
    #[serde(rename = "numberInSurah")]
    number_in_surah: u32,
    surah: SurahRef,
}

#[derive(Debug, Deserialize)]
struct SurahRef {
    number: u32,
}

/// Parse an alquran.cloud `ayah/{n}/editions/{...}` response into one item.
///
/// Edition texts are joined by a blank line in response order. All editions
/// must refer to the same surah and ayah.
pub fn decode_ayah_editions(bytes: &[u8]) -> Result<ContentItem, FetchError> {
    let envelope: AyahEnvelope = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::format(format!("invalid ayah response: {err}")))?;
    if let Some(code) = envelope.code.filter(|code| *code != 200) {
        return Err(FetchError::format(format!("ayah response code {code}")));
    }
    let Some(first) = envelope.data.first() else {
        return Err(FetchError::format("ayah response has no editions"));
    };
    let (surah, ayah) = (first.surah.number, first.number_in_surah);

    let mut texts = Vec::with_capacity(envelope.data.len());
    for edition in &envelope.data {
        if edition.surah.number != surah || edition.number_in_surah != ayah {
            return Err(FetchError::format(format!(
                "editions disagree: {surah}:{ayah} vs {}:{}",
                edition.surah.number, edition.number_in_surah
            )));
        }
        let text = edition.text.trim();
        if text.is_empty() {
            return Err(FetchError::format(format!(
                "empty edition text for {surah}:{ayah}"
            )));
        }
        texts.push(text);
    }

    Ok(ContentItem::new(
        ItemId::new(format!("quran:{surah}:{ayah}")),
        texts.join("\n\n"),
        Some(format!("Quran {surah}:{ayah}")),
    ))
}

/// Length in chars of the item as displayed: text, separator, reference.
pub fn display_len(item: &ContentItem) -> usize {
    let reference = item
        .reference()
        .map(|r| REFERENCE_SEPARATOR.chars().count() + r.chars().count())
        .unwrap_or(0);
    item.text().chars().count() + reference
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
