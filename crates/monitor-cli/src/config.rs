use chrono::NaiveDate;
use keyword_ranker::MAX_TOP_K;
use opinion_core::{Granularity, OpinionError, OpinionResult};
use std::path::PathBuf;

const DEFAULT_DATA_PATH: &str = "my_data.csv";
const DEFAULT_STOP_WORDS_PATH: &str = "stop_words.txt";
const DEFAULT_TOP_K: usize = 8;
const DEFAULT_POOL_FACTOR: usize = 10;

/// Runtime settings. Command-line flags win over `MONITOR_*` environment
/// variables, which win over the built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub stop_words_path: PathBuf,
    pub lexicon_path: Option<PathBuf>,
    pub import_path: Option<PathBuf>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub granularity: Option<Granularity>,
    pub top_k: usize,
    pub pool_factor: usize,
}

impl Config {
    pub fn from_env(args: &[String]) -> OpinionResult<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(args: &[String], env: F) -> OpinionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let setting = |flag: &str, var: &str| -> Option<String> {
            flag_value(args, flag)
                .map(str::to_string)
                .or_else(|| env(var))
                .filter(|v| !v.trim().is_empty())
        };

        let data_path = setting("--data", "MONITOR_DATA_PATH")
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
        let stop_words_path = setting("--stop-words", "MONITOR_STOP_WORDS")
            .unwrap_or_else(|| DEFAULT_STOP_WORDS_PATH.to_string());
        let lexicon_path = setting("--lexicon", "MONITOR_LEXICON").map(PathBuf::from);

        let top_k = match setting("--top-k", "MONITOR_TOP_K") {
            Some(v) => parse_count("top-k", &v)?,
            None => DEFAULT_TOP_K,
        };
        if top_k > MAX_TOP_K {
            return Err(OpinionError::Config(format!(
                "top-k must be at most {}, got {}",
                MAX_TOP_K, top_k
            )));
        }
        let pool_factor = match env("MONITOR_POOL_FACTOR") {
            Some(v) => parse_count("MONITOR_POOL_FACTOR", &v)?.max(1),
            None => DEFAULT_POOL_FACTOR,
        };

        let from = flag_value(args, "--from").map(parse_day).transpose()?;
        let to = flag_value(args, "--to").map(parse_day).transpose()?;
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(OpinionError::InvalidRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }

        let granularity = flag_value(args, "--granularity")
            .map(str::parse::<Granularity>)
            .transpose()?;

        Ok(Self {
            data_path: PathBuf::from(data_path),
            stop_words_path: PathBuf::from(stop_words_path),
            lexicon_path,
            import_path: flag_value(args, "--import").map(PathBuf::from),
            from,
            to,
            granularity,
            top_k,
            pool_factor,
        })
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|v| !v.starts_with("--"))
        .map(|v| v.as_str())
}

fn parse_day(raw: &str) -> OpinionResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| OpinionError::Config(format!("invalid date '{}': {}", raw, e)))
}

fn parse_count(name: &str, raw: &str) -> OpinionResult<usize> {
    raw.trim()
        .parse()
        .map_err(|_| OpinionError::Config(format!("{} must be a non-negative integer, got '{}'", name, raw)))
}
