use engine_logging::engine_error;
use reminder_core::Corpus;

use crate::decode::decode_corpus_document;

/// Corpus compiled into the binary so the first launch works offline.
pub const FALLBACK_CORPUS_JSON: &str = include_str!("../assets/fallback_corpus.json");

/// Revision of the empty corpus used when the fallback document is unusable.
pub const NO_CONTENT_REVISION: &str = "none";

/// The bundled corpus. It carries no fetch time, so it counts as stale until
/// the first refresh attempt.
pub fn bundled_corpus() -> Corpus {
    fallback_corpus(FALLBACK_CORPUS_JSON)
}

/// Decodes a fallback document. An unusable document yields an empty corpus,
/// which fails each fire with a notice until the source delivers content.
pub fn fallback_corpus(json: &str) -> Corpus {
    decode_corpus_document(json.as_bytes(), None).unwrap_or_else(|err| {
        engine_error!("Fallback corpus unusable, starting without content: {}", err);
        Corpus::empty(NO_CONTENT_REVISION)
    })
}
