use opinion_core::{Sentiment, Tokenizer};
use std::sync::Arc;

pub mod lexicon;
pub mod rules;

pub use lexicon::{Lexicon, PlatformMarker};
pub use rules::{
    default_chain, score_tokens, RuleOutcome, ScoringContext, SentimentRule, ThresholdRule,
};

/// Outcome of classifying one text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub sentiment: Sentiment,
    /// Score accumulated up to the deciding rule
    pub score: i32,
    /// Name of the rule that decided the label
    pub decided_by: &'static str,
}

/// Rule-cascade sentiment classifier for short, noisy forum text.
///
/// Pure and deterministic: the lexicon and tokenizer are shared read-only,
/// and no state survives between calls.
pub struct SentimentEngine {
    lexicon: Arc<Lexicon>,
    tokenizer: Arc<dyn Tokenizer>,
    rules: Vec<Box<dyn SentimentRule>>,
}

impl SentimentEngine {
    pub fn new(lexicon: Arc<Lexicon>, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self::with_rules(lexicon, tokenizer, default_chain())
    }

    /// Build an engine with a custom rule chain. A chain that never decides
    /// falls back to the default score thresholds.
    pub fn with_rules(
        lexicon: Arc<Lexicon>,
        tokenizer: Arc<dyn Tokenizer>,
        rules: Vec<Box<dyn SentimentRule>>,
    ) -> Self {
        Self {
            lexicon,
            tokenizer,
            rules,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.evaluate(text).sentiment
    }

    /// Missing content (e.g. an empty CSV cell) is neutral.
    pub fn classify_opt(&self, text: Option<&str>) -> Sentiment {
        match text {
            Some(text) => self.classify(text),
            None => Sentiment::Neutral,
        }
    }

    pub fn evaluate(&self, text: &str) -> Verdict {
        let mut ctx = ScoringContext {
            text: text.trim().to_string(),
            score: 0,
            lexicon: &self.lexicon,
            tokenizer: self.tokenizer.as_ref(),
        };

        for rule in &self.rules {
            if let RuleOutcome::Decided(sentiment) = rule.evaluate(&mut ctx) {
                tracing::trace!(rule = rule.name(), score = ctx.score, %sentiment, "classified");
                return Verdict {
                    sentiment,
                    score: ctx.score,
                    decided_by: rule.name(),
                };
            }
        }

        Verdict {
            sentiment: ThresholdRule::default().label(ctx.score),
            score: ctx.score,
            decided_by: "fallback",
        }
    }
}
