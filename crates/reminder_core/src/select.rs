use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{ContentItem, Corpus, SeenSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("every item in the corpus has been shown this cycle")]
    Exhausted,
    #[error("no content available: the corpus is empty")]
    EmptyCorpus,
}

/// Chooses one index among `candidates` unseen items.
pub trait Picker: Send {
    fn pick(&mut self, candidates: usize) -> usize;
}

/// Always takes the first unseen item in corpus order.
#[derive(Debug, Default, Clone, Copy)]
pub struct InOrder;

impl Picker for InOrder {
    fn pick(&mut self, _candidates: usize) -> usize {
        0
    }
}

/// Uniform choice among unseen items.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Picker for RandomPicker {
    fn pick(&mut self, candidates: usize) -> usize {
        if candidates <= 1 {
            return 0;
        }
        self.rng.random_range(0..candidates)
    }
}

/// Pick one item of `corpus` that is not in `seen`.
pub fn pick_unseen<'a>(
    corpus: &'a Corpus,
    seen: &SeenSet,
    picker: &mut dyn Picker,
) -> Result<&'a ContentItem, SelectError> {
    if corpus.is_empty() {
        return Err(SelectError::EmptyCorpus);
    }
    let unseen: Vec<&ContentItem> = corpus
        .items()
        .iter()
        .filter(|item| !seen.contains(item.id()))
        .collect();
    if unseen.is_empty() {
        return Err(SelectError::Exhausted);
    }
    // A misbehaving picker must not index out of range.
    let index = picker.pick(unseen.len()).min(unseen.len() - 1);
    Ok(unseen[index])
}
