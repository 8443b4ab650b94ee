use opinion_core::{KeywordExtractor, RankedKeyword, Record};
use std::cmp::Ordering;
use std::sync::Arc;

pub mod stopwords;

pub use stopwords::StopWords;

/// Candidates requested per requested keyword
const DEFAULT_POOL_FACTOR: usize = 10;

/// Largest `top_k` the ranker serves; larger requests are clamped
pub const MAX_TOP_K: usize = 200;

/// Upper bound on the candidate pool handed to the extractor
pub const MAX_POOL_SIZE: usize = 2_000;

/// Picks the most distinctive keywords for a subset of records.
///
/// The extractor is asked for a pool much larger than `top_k` so that
/// stop words, single characters and numbers can be dropped without
/// starving the final list.
pub struct KeywordRanker {
    extractor: Arc<dyn KeywordExtractor>,
    pool_factor: usize,
}

impl KeywordRanker {
    pub fn new(extractor: Arc<dyn KeywordExtractor>) -> Self {
        Self {
            extractor,
            pool_factor: DEFAULT_POOL_FACTOR,
        }
    }

    pub fn with_pool_factor(mut self, pool_factor: usize) -> Self {
        self.pool_factor = pool_factor;
        self
    }

    /// Candidate pool size, always strictly greater than `top_k` and never
    /// above [`MAX_POOL_SIZE`]
    pub fn pool_size(&self, top_k: usize) -> usize {
        let top_k = top_k.min(MAX_TOP_K);
        top_k
            .saturating_mul(self.pool_factor)
            .max(top_k + 1)
            .min(MAX_POOL_SIZE)
    }

    pub fn rank<'a, I>(&self, records: I, stopwords: &StopWords, top_k: usize) -> Vec<RankedKeyword>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        if top_k == 0 {
            return Vec::new();
        }
        let top_k = top_k.min(MAX_TOP_K);

        let blob = records
            .into_iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if blob.trim().is_empty() {
            return Vec::new();
        }

        let pool = self.pool_size(top_k);
        let candidates = self.extractor.extract(&blob, pool);
        let pooled = candidates.len();

        let mut survivors: Vec<RankedKeyword> = candidates
            .into_iter()
            .filter(|k| is_distinctive(&k.keyword, stopwords))
            .collect();
        survivors.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        survivors.truncate(top_k);

        tracing::debug!(
            "Ranked {} keywords from {} candidates (pool {})",
            survivors.len(),
            pooled,
            pool
        );
        survivors
    }
}

/// Not a stop word, longer than one character, and not purely numeric
pub fn is_distinctive(word: &str, stopwords: &StopWords) -> bool {
    let word = word.trim();
    if word.chars().count() <= 1 || stopwords.contains(word) {
        return false;
    }
    !word.chars().all(|c| c.is_numeric())
}
