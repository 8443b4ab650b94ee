//! Ordered rule chain used by the classifier.
//!
//! Each rule either decides the label outright or updates the running
//! context and hands over to the next one.

use opinion_core::{Sentiment, Tokenizer};

use crate::lexicon::Lexicon;

/// Working state threaded through the chain for one text
pub struct ScoringContext<'a> {
    pub text: String,
    pub score: i32,
    pub lexicon: &'a Lexicon,
    pub tokenizer: &'a dyn Tokenizer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Decided(Sentiment),
    Continue,
}

pub trait SentimentRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &mut ScoringContext<'_>) -> RuleOutcome;
}

/// Any absolute-negative phrase decides negative. Runs before the positive
/// overrides so negatives win on conflict.
pub struct AbsoluteNegativeRule;

impl SentimentRule for AbsoluteNegativeRule {
    fn name(&self) -> &'static str {
        "absolute_negative"
    }

    fn evaluate(&self, ctx: &mut ScoringContext<'_>) -> RuleOutcome {
        if ctx.lexicon.absolute_negative.iter().any(|p| ctx.text.contains(p.as_str())) {
            RuleOutcome::Decided(Sentiment::Negative)
        } else {
            RuleOutcome::Continue
        }
    }
}

pub struct AbsolutePositiveRule;

impl SentimentRule for AbsolutePositiveRule {
    fn name(&self) -> &'static str {
        "absolute_positive"
    }

    fn evaluate(&self, ctx: &mut ScoringContext<'_>) -> RuleOutcome {
        if ctx.lexicon.absolute_positive.iter().any(|p| ctx.text.contains(p.as_str())) {
            RuleOutcome::Decided(Sentiment::Positive)
        } else {
            RuleOutcome::Continue
        }
    }
}

/// Seeds the baseline from platform markers and strips every marker
pub struct PlatformMarkerRule;

impl SentimentRule for PlatformMarkerRule {
    fn name(&self) -> &'static str {
        "platform_marker"
    }

    fn evaluate(&self, ctx: &mut ScoringContext<'_>) -> RuleOutcome {
        for marker in &ctx.lexicon.platform_markers {
            if ctx.text.contains(marker.marker.as_str()) {
                ctx.score += marker.weight;
            }
        }
        for marker in &ctx.lexicon.platform_markers {
            if ctx.text.contains(marker.marker.as_str()) {
                ctx.text = ctx.text.replace(marker.marker.as_str(), "");
            }
        }
        RuleOutcome::Continue
    }
}

/// Additive lexicon scoring over the token sequence
pub struct LexiconScoreRule;

impl SentimentRule for LexiconScoreRule {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn evaluate(&self, ctx: &mut ScoringContext<'_>) -> RuleOutcome {
        let tokens = ctx.tokenizer.tokenize(&ctx.text);
        ctx.score += score_tokens(ctx.lexicon, &tokens);
        RuleOutcome::Continue
    }
}

/// Maps the accumulated score to a label. Always decides.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdRule {
    /// Scores at or below this are negative
    pub negative_at_most: i32,
    /// Scores at or above this are positive
    pub positive_at_least: i32,
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self {
            negative_at_most: -1,
            positive_at_least: 2,
        }
    }
}

impl ThresholdRule {
    pub fn label(&self, score: i32) -> Sentiment {
        if score <= self.negative_at_most {
            Sentiment::Negative
        } else if score >= self.positive_at_least {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }
}

impl SentimentRule for ThresholdRule {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn evaluate(&self, ctx: &mut ScoringContext<'_>) -> RuleOutcome {
        RuleOutcome::Decided(self.label(ctx.score))
    }
}

/// Single left-to-right pass. A token right after a negation word has its
/// weight sign flipped; unknown tokens contribute nothing.
pub fn score_tokens<S: AsRef<str>>(lexicon: &Lexicon, tokens: &[S]) -> i32 {
    let mut score = 0;
    for (i, token) in tokens.iter().enumerate() {
        let mut weight = lexicon.weight(token.as_ref());
        if i > 0 && lexicon.is_negation(tokens[i - 1].as_ref()) {
            weight = -weight;
        }
        score += weight;
    }
    score
}

/// The standard cascade: overrides, marker baseline, lexicon, threshold.
pub fn default_chain() -> Vec<Box<dyn SentimentRule>> {
    vec![
        Box::new(AbsoluteNegativeRule),
        Box::new(AbsolutePositiveRule),
        Box::new(PlatformMarkerRule),
        Box::new(LexiconScoreRule),
        Box::new(ThresholdRule::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_tokens_negation_flips_sign() {
        let lexicon = Lexicon::default();
        assert_eq!(score_tokens(&lexicon, &["排隊"]), -3);
        assert_eq!(score_tokens(&lexicon, &["不", "排隊"]), 3);
        // Negation only reaches the immediately following token
        assert_eq!(score_tokens(&lexicon, &["不", "的", "排隊"]), -3);
    }

    #[test]
    fn test_score_tokens_ignores_unknown() {
        let lexicon = Lexicon::default();
        let empty: [&str; 0] = [];
        assert_eq!(score_tokens(&lexicon, &["今天", "下雨"]), 0);
        assert_eq!(score_tokens(&lexicon, &empty), 0);
    }

    #[test]
    fn test_threshold_boundaries() {
        let rule = ThresholdRule::default();
        assert_eq!(rule.label(-1), Sentiment::Negative);
        assert_eq!(rule.label(0), Sentiment::Neutral);
        assert_eq!(rule.label(1), Sentiment::Neutral);
        assert_eq!(rule.label(2), Sentiment::Positive);
    }
}
