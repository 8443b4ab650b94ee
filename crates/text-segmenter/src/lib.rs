//! Tokenizer and keyword-extractor implementations.
//!
//! [`JiebaSegmenter`] handles Chinese forum text (dictionary + HMM cut, TF-IDF
//! keywords). [`WhitespaceTokenizer`] is for text that is already segmented.

use jieba_rs::{Jieba, KeywordExtract, TfIdf};
use opinion_core::{KeywordExtractor, RankedKeyword, Tokenizer};

pub struct JiebaSegmenter {
    jieba: Jieba,
    tfidf: TfIdf,
}

impl JiebaSegmenter {
    /// Loads the bundled dictionary and IDF table. Build once and share.
    pub fn new() -> Self {
        let jieba = Jieba::new();
        let tfidf = TfIdf::default();
        tracing::debug!("jieba dictionary loaded");
        Self { jieba, tfidf }
    }

    /// Register an extra dictionary word (e.g. a venue or restaurant name)
    /// so it is kept as one token.
    pub fn add_word(&mut self, word: &str) {
        self.jieba.add_word(word, None, None);
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for JiebaSegmenter {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .map(|w| w.to_string())
            .collect()
    }
}

impl KeywordExtractor for JiebaSegmenter {
    fn extract(&self, text: &str, pool_size: usize) -> Vec<RankedKeyword> {
        if text.trim().is_empty() || pool_size == 0 {
            return Vec::new();
        }
        // There are never more keywords than tokens
        let pool_size = pool_size.min(self.jieba.cut(text, true).len());
        self.tfidf
            .extract_keywords(&self.jieba, text, pool_size, vec![])
            .into_iter()
            .map(|k| RankedKeyword {
                keyword: k.keyword,
                weight: k.weight,
            })
            .collect()
    }
}

/// Splits on Unicode whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(|s| s.to_string()).collect()
    }
}
