//! Scoring configuration for the rule-based classifier.
//!
//! A [`Lexicon`] is built once at startup (from the built-in tables or a JSON
//! override file) and shared immutably by every classifier instance.

use opinion_core::{OpinionError, OpinionResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Phrases whose presence alone makes a text negative
const ABSOLUTE_NEGATIVE: &[&str] = &[
    "不會再來", "一次店", "再也不", "勸退", "不想再", "絕不",
    "爛死", "爛透", "氣死", "拒絕", "黑名單", "浪費錢",
    "浪費時間", "最爛", "真的很糟", "無法接受", "沒下次",
    "不予置評", "不推", "不優", "不如去", "還不如", "寧願去",
    "輸給", "慘輸", "被屌打", "笑死", "笑爛", "傻眼", "無言", "誇張", "悲劇",
];

/// Phrases whose presence alone makes a text positive
const ABSOLUTE_POSITIVE: &[&str] = &[
    "必回訪", "一定會再", "一定再", "唯一推薦", "神店",
    "最愛", "超愛", "很頂", "沒對手", "第一名", "滿分",
    "一定會再去", "舒服", "很好逛", "好逛", "超好逛",
];

const NEGATIVE_WORDS: &[(&str, i32)] = &[
    // Facility / operations
    ("B4", -2), ("B5", -4), ("B6", -4), ("B7", -5),
    ("停車", -3), ("出口", -3), ("動線", -4), ("塞車", -4), ("塞爆", -5),
    ("排隊", -3), ("等很久", -3), ("卡住", -3), ("迷宮", -4),
    // Emotional intensity
    ("爛", -5), ("差", -4), ("失望", -4), ("難吃", -4), ("髒", -4), ("噁心", -5),
    ("盤子", -5), ("智障", -5), ("廢", -4), ("抵制", -5), ("火大", -4),
    ("雷", -5), ("糟糕", -4), ("後悔", -4), ("不行", -3), ("普通", -2),
    // Competitors: a mention is almost always a comparison against the venue
    ("巨蛋", -3), ("漢神", -3), ("夢時代", -3), ("好市多", -3), ("Costco", -3),
    ("遠百", -3), ("新光", -3), ("三越", -3), ("草衙道", -2), ("高鐵", -1),
];

const POSITIVE_WORDS: &[(&str, i32)] = &[
    ("好吃", 5), ("寬敞", 4), ("喜歡", 4), ("推薦", 5), ("必吃", 5),
    ("漂亮", 3), ("質感", 3), ("開心", 3), ("棒", 4), ("優", 4),
    ("讚", 5), ("推", 3), ("不錯", 3), ("愛", 4), ("勝", 3), ("贏", 3),
    ("優惠", 2), ("折抵", 2), ("方便", 3), ("大", 2), ("新", 2),
    ("旭集", 4), ("饗泰多", 4), ("問鼎", 3), ("京翠", 3),
];

const NEGATION_WORDS: &[&str] = &["不", "沒", "無", "非", "別", "不會", "不用", "不太"];

/// Forum markers prefixed to scraped text. Weighted ones seed the score,
/// all of them are stripped before tokenizing.
const PLATFORM_MARKERS: &[(&str, i32)] = &[("[推]", 1), ("[噓]", -4), ("[→]", 0), ("[標題]", 0)];

/// Marker embedded in text by the collector, e.g. an upvote tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMarker {
    pub marker: String,
    /// Contribution to the baseline score when present (counted once)
    #[serde(default)]
    pub weight: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    pub absolute_negative: Vec<String>,
    pub absolute_positive: Vec<String>,
    pub negative_words: HashMap<String, i32>,
    pub positive_words: HashMap<String, i32>,
    pub negation_words: HashSet<String>,
    /// Falls back to the built-in markers when a lexicon file omits them
    #[serde(default = "default_platform_markers")]
    pub platform_markers: Vec<PlatformMarker>,
}

impl Lexicon {
    /// Load a lexicon from a JSON file and check it is consistent.
    pub fn from_json_file(path: impl AsRef<Path>) -> OpinionResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let lexicon: Lexicon = serde_json::from_str(&raw)
            .map_err(|e| OpinionError::Config(format!("{}: {}", path.display(), e)))?;
        lexicon.validate()?;
        tracing::info!(
            "Loaded lexicon from {} ({} negative, {} positive words)",
            path.display(),
            lexicon.negative_words.len(),
            lexicon.positive_words.len()
        );
        Ok(lexicon)
    }

    /// The two weighted mappings must not share tokens and override phrases
    /// must be non-empty (an empty phrase would match every text).
    pub fn validate(&self) -> OpinionResult<()> {
        if let Some(token) = self
            .negative_words
            .keys()
            .find(|t| self.positive_words.contains_key(*t))
        {
            return Err(OpinionError::Config(format!(
                "token '{}' appears in both negative and positive lexicons",
                token
            )));
        }

        let empty_phrase = self
            .absolute_negative
            .iter()
            .chain(self.absolute_positive.iter())
            .chain(self.platform_markers.iter().map(|m| &m.marker))
            .any(|p| p.is_empty());
        if empty_phrase {
            return Err(OpinionError::Config("empty override phrase or marker".to_string()));
        }

        Ok(())
    }

    /// Weight of a token: negative lexicon first, then positive, else 0.
    pub fn weight(&self, token: &str) -> i32 {
        self.negative_words
            .get(token)
            .or_else(|| self.positive_words.get(token))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_negation(&self, token: &str) -> bool {
        self.negation_words.contains(token)
    }
}

fn owned<C: FromIterator<String>>(items: &[&str]) -> C {
    items.iter().map(|s| s.to_string()).collect()
}

fn weighted(items: &[(&str, i32)]) -> HashMap<String, i32> {
    items.iter().map(|(t, w)| (t.to_string(), *w)).collect()
}

fn default_platform_markers() -> Vec<PlatformMarker> {
    PLATFORM_MARKERS
        .iter()
        .map(|(marker, weight)| PlatformMarker {
            marker: marker.to_string(),
            weight: *weight,
        })
        .collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            absolute_negative: owned(ABSOLUTE_NEGATIVE),
            absolute_positive: owned(ABSOLUTE_POSITIVE),
            negative_words: weighted(NEGATIVE_WORDS),
            positive_words: weighted(POSITIVE_WORDS),
            negation_words: owned(NEGATION_WORDS),
            platform_markers: default_platform_markers(),
        }
    }
}
