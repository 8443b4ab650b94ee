use async_trait::async_trait;

use crate::{OpinionResult, RankedKeyword, RawRecord};

/// Splits text into an ordered sequence of tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Statistical keyword extractor over a block of text.
///
/// Returns at most `pool_size` candidates ordered by descending weight.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str, pool_size: usize) -> Vec<RankedKeyword>;
}

/// Collaborator that acquires raw records from outside systems.
///
/// Implementations own any heavyweight resource they need (browser sessions,
/// HTTP pools) and must release it before `crawl` returns, on success and on
/// failure alike.
#[async_trait]
pub trait DataSource: Send {
    fn name(&self) -> &str;

    async fn crawl(&mut self) -> OpinionResult<Vec<RawRecord>>;
}
