//! monitor-cli: label the stored forum batch and print the monitoring view as JSON.
//!
//! Usage:
//!   cargo run -p monitor-cli -- --data my_data.csv --from 2024-01-01 --to 2024-06-30
//!   cargo run -p monitor-cli -- --granularity week --top-k 10
//!   cargo run -p monitor-cli -- --import scraped.csv     # merge new rows first

mod config;
mod report;

use anyhow::Context;
use data_store::{AcquisitionPipeline, CsvImportSource, RecordStore};
use keyword_ranker::{KeywordRanker, StopWords};
use opinion_core::DataSource;
use sentiment_analysis::{Lexicon, SentimentEngine};
use std::sync::Arc;
use text_segmenter::JiebaSegmenter;
use trend_analysis::DateNormalizer;

use crate::config::Config;
use crate::report::{build_output, ViewRequest};

/// Venue names the dictionary would otherwise split apart
const VENUE_WORDS: &[&str] = &["義享天地", "義享時尚廣場"];

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  monitor-cli [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data PATH            Record store CSV (default: my_data.csv, env MONITOR_DATA_PATH)");
    eprintln!("  --from YYYY-MM-DD      First day of the view (default: 2021-01-01 or earliest record)");
    eprintln!("  --to YYYY-MM-DD        Last day of the view (default: latest record)");
    eprintln!("  --granularity G        day|week|month (default: picked from the range length)");
    eprintln!("  --top-k N              Keywords per sentiment (default: 8, env MONITOR_TOP_K)");
    eprintln!("  --stop-words PATH      Extra stop words, one per line (default: stop_words.txt)");
    eprintln!("  --lexicon PATH         JSON lexicon replacing the built-in one (env MONITOR_LEXICON)");
    eprintln!("  --import PATH          Merge rows from another CSV into the store before reporting");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monitor_cli=info,data_store=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let config = Config::from_env(&args).context("invalid configuration")?;

    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::from_json_file(path)
            .with_context(|| format!("failed to load lexicon {}", path.display()))?,
        None => Lexicon::default(),
    };
    let mut segmenter = JiebaSegmenter::new();
    for word in VENUE_WORDS {
        segmenter.add_word(word);
    }
    let segmenter = Arc::new(segmenter);
    let engine = SentimentEngine::new(Arc::new(lexicon), segmenter.clone());
    tracing::info!(
        "Lexicon ready: {} negative, {} positive words, {} override phrases",
        engine.lexicon().negative_words.len(),
        engine.lexicon().positive_words.len(),
        engine.lexicon().absolute_negative.len() + engine.lexicon().absolute_positive.len()
    );

    let mut stopwords = StopWords::builtin();
    if let Err(e) = stopwords.merge_file(&config.stop_words_path) {
        tracing::warn!(
            "Ignoring stop-word file {}: {}",
            config.stop_words_path.display(),
            e
        );
    }

    let store = RecordStore::new(&config.data_path);

    if let Some(import) = &config.import_path {
        let pipeline = AcquisitionPipeline::new(store.clone());
        let mut sources: Vec<Box<dyn DataSource>> = vec![Box::new(CsvImportSource::new(import))];
        let report = pipeline
            .run(&mut sources)
            .await
            .context("acquisition failed")?;
        if !report.is_complete() {
            tracing::warn!("Sources failed: {}", report.failed_sources().join(", "));
        }
        tracing::info!(
            "Imported {} rows, {} new, {} stored",
            report.collected,
            report.added,
            report.stored_total
        );
    }

    let records = store
        .load(&engine, &DateNormalizer::at_now())
        .with_context(|| format!("failed to load {}", store.path().display()))?;

    let ranker = KeywordRanker::new(segmenter).with_pool_factor(config.pool_factor);
    let request = ViewRequest {
        from: config.from,
        to: config.to,
        granularity: config.granularity,
        top_k: config.top_k,
    };
    let output = build_output(&records, &request, &ranker, &stopwords)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
