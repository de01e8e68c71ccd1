use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use engine_logging::engine_debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reminder_core::Corpus;

use crate::decode::{decode_ayah_editions, decode_corpus_document, display_len};
use crate::fetch::HttpClient;
use crate::hash::derived_revision;
use crate::{FailureKind, FetchError};

/// Number of ayahs in the Quran; ayah numbers run `1..=TOTAL_AYAHS`.
pub const TOTAL_AYAHS: u32 = 6236;
pub const DEFAULT_AYAH_API: &str = "https://api.alquran.cloud/v1";
/// Upper bound on [`AyahSettings::batch_size`].
pub const MAX_BATCH_SIZE: usize = 100;

/// Produces a complete corpus or fails. Never returns partial data and never
/// falls back to local content on its own.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> Result<Corpus, FetchError>;
}

/// Fetches a ready-made corpus document from a single URL.
#[derive(Debug, Clone)]
pub struct CorpusEndpointSource {
    http: HttpClient,
    url: String,
}

impl CorpusEndpointSource {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl ContentSource for CorpusEndpointSource {
    async fn fetch(&self) -> Result<Corpus, FetchError> {
        let bytes = self.http.get_bytes(&self.url).await?;
        engine_debug!("Corpus endpoint {} returned {} bytes", self.url, bytes.len());
        decode_corpus_document(&bytes, Some(Utc::now()))
    }
}

#[derive(Debug, Clone)]
pub struct AyahSettings {
    pub base_url: String,
    pub editions: Vec<String>,
    pub batch_size: usize,
    /// Upper bound on the displayed length (text plus reference) in chars.
    pub max_length: usize,
    /// Deadline for the whole batch, on top of the per-request timeout.
    pub batch_timeout: Duration,
}

impl Default for AyahSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AYAH_API.to_string(),
            editions: vec!["quran-simple".to_string(), "fa.ansarian".to_string()],
            batch_size: 20,
            max_length: 250,
            batch_timeout: Duration::from_secs(60),
        }
    }
}

/// Builds a corpus from randomly drawn ayahs of the alquran.cloud API.
pub struct AyahSource {
    http: HttpClient,
    settings: AyahSettings,
    rng: Mutex<StdRng>,
}

impl AyahSource {
    pub fn new(http: HttpClient, settings: AyahSettings) -> Self {
        Self::with_rng(http, settings, StdRng::from_os_rng())
    }

    pub fn with_seed(http: HttpClient, settings: AyahSettings, seed: u64) -> Self {
        Self::with_rng(http, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(http: HttpClient, mut settings: AyahSettings, rng: StdRng) -> Self {
        settings.batch_size = settings.batch_size.clamp(1, MAX_BATCH_SIZE);
        Self {
            http,
            settings,
            rng: Mutex::new(rng),
        }
    }

    fn draw_ayah_number(&self) -> u32 {
        match self.rng.lock() {
            Ok(mut rng) => rng.random_range(1..=TOTAL_AYAHS),
            Err(poisoned) => poisoned.into_inner().random_range(1..=TOTAL_AYAHS),
        }
    }

    fn ayah_url(&self, number: u32) -> String {
        format!(
            "{}/ayah/{}/editions/{}",
            self.settings.base_url.trim_end_matches('/'),
            number,
            self.settings.editions.join(",")
        )
    }

    async fn fetch_batch(&self) -> Result<Corpus, FetchError> {
        let wanted = self.settings.batch_size;
        let mut items = Vec::with_capacity(wanted);
        let mut ids = HashSet::with_capacity(wanted);

        for _ in 0..wanted.saturating_mul(3) {
            if items.len() >= wanted {
                break;
            }
            let url = self.ayah_url(self.draw_ayah_number());
            let bytes = self.http.get_bytes(&url).await?;
            let item = decode_ayah_editions(&bytes)?;
            if display_len(&item) > self.settings.max_length {
                engine_debug!("Skipping {}: longer than {}", item.id(), self.settings.max_length);
                continue;
            }
            if ids.insert(item.id().clone()) {
                items.push(item);
            }
        }

        if items.is_empty() {
            return Err(FetchError::format(format!(
                "no ayah within {} characters",
                self.settings.max_length
            )));
        }
        let revision = derived_revision(&items);
        Corpus::new(revision, Some(Utc::now()), items)
            .map_err(|err| FetchError::format(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ContentSource for AyahSource {
    async fn fetch(&self) -> Result<Corpus, FetchError> {
        match tokio::time::timeout(self.settings.batch_timeout, self.fetch_batch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::new(
                FailureKind::Timeout,
                format!("batch not complete within {:?}", self.settings.batch_timeout),
            )),
        }
    }
}
