#[cfg(test)]
mod store_tests {
    use crate::store::{merge, RecordStore};
    use chrono::NaiveDate;
    use opinion_core::{OpinionError, RawRecord, Sentiment, Source};
    use sentiment_analysis::{Lexicon, SentimentEngine};
    use std::sync::Arc;
    use text_segmenter::WhitespaceTokenizer;
    use trend_analysis::DateNormalizer;

    fn engine() -> SentimentEngine {
        SentimentEngine::new(Arc::new(Lexicon::default()), Arc::new(WhitespaceTokenizer))
    }

    fn normalizer() -> DateNormalizer {
        DateNormalizer::new(
            NaiveDate::from_ymd_opt(2026, 1, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    fn raw(date: &str, content: &str) -> RawRecord {
        RawRecord {
            date: date.to_string(),
            source: Source::PttComment,
            content: content.to_string(),
            link: "https://www.ptt.cc/bbs/Kaohsiung/M.1.A.html".to_string(),
        }
    }

    #[test]
    fn stored_sentiment_column_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_data.csv");
        std::fs::write(
            &path,
            "\u{feff}date,source,content,link,sentiment\n\
             2025-12-01,PTT_Comment,好吃 推薦,https://a,負面\n\
             2025-12-02,Dcard,排隊 排隊,https://b,正面\n",
        )
        .unwrap();

        let records = RecordStore::new(&path).load(&engine(), &normalizer()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sentiment, Sentiment::Positive);
        assert_eq!(records[1].sentiment, Sentiment::Negative);
        assert_eq!(records[1].source, Source::Dcard);
    }

    #[test]
    fn undated_rows_are_kept_and_future_dates_corrected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_data.csv");
        std::fs::write(
            &path,
            "date,source,content,link\n\
             ,Dcard,沒有日期,https://a\n\
             12/24,Mobile01,聖誕節 人 好多,https://b\n",
        )
        .unwrap();

        let records = crate::load(&path, &engine(), &normalizer()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].date.is_none());
        assert_eq!(records[1].day(), NaiveDate::from_ymd_opt(2025, 12, 24));
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("my_data.csv"));
        assert!(store.load(&engine(), &normalizer()).unwrap().is_empty());
    }

    #[test]
    fn uninitializable_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let nested = RecordStore::new(dir.path().join("no_such_dir").join("my_data.csv"));
        assert!(matches!(
            nested.load(&engine(), &normalizer()),
            Err(OpinionError::StoreUnavailable(_))
        ));

        let directory = RecordStore::new(dir.path());
        assert!(matches!(
            directory.read_raw(),
            Err(OpinionError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn malformed_row_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_data.csv");
        std::fs::write(&path, "date,source,content,link\n2025-01-01\n").unwrap();

        let err = RecordStore::new(&path).read_raw().unwrap_err();
        match err {
            OpinionError::Store(msg) => assert!(msg.contains("line 2"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn write_then_read_keeps_columns_and_drops_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_data.csv");
        let store = RecordStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        let rows = vec![
            raw("2025-01-01", "[推] 好吃"),
            RawRecord {
                source: Source::Other("Threads".to_string()),
                ..raw("", "含有，逗號")
            },
        ];

        store.write_raw(&rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(header, "date,source,content,link");
        assert_eq!(store.read_raw().unwrap(), rows);
        assert!(!dir.path().join(".my_data.csv.tmp").exists());
    }

    #[test]
    fn merge_keeps_last_occurrence_by_content() {
        let existing = vec![raw("2025-01-01", "a"), raw("2025-01-01", "b")];
        let incoming = vec![raw("2025-02-01", "a"), raw("2025-02-01", "c"), raw("2025-02-02", "c")];

        let merged = merge(existing, incoming);
        let view: Vec<(&str, &str)> = merged
            .iter()
            .map(|r| (r.content.as_str(), r.date.as_str()))
            .collect();
        assert_eq!(view, vec![("b", "2025-01-01"), ("a", "2025-02-01"), ("c", "2025-02-02")]);
    }

    #[test]
    fn merge_and_save_counts_added() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("my_data.csv"));
        store.write_raw(&[raw("2025-01-01", "a")]).unwrap();

        let stats = store
            .merge_and_save(vec![raw("2025-01-02", "a"), raw("2025-01-02", "b")])
            .unwrap();
        assert_eq!(stats.incoming, 2);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.stored_total, 2);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use crate::{AcquisitionPipeline, RecordStore};
    use async_trait::async_trait;
    use opinion_core::{DataSource, OpinionError, OpinionResult, RawRecord, Source};

    enum Outcome {
        Rows(Vec<RawRecord>),
        Fail(&'static str),
    }

    struct StaticSource {
        name: &'static str,
        outcome: Outcome,
    }

    #[async_trait]
    impl DataSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn crawl(&mut self) -> OpinionResult<Vec<RawRecord>> {
            match &self.outcome {
                Outcome::Rows(rows) => Ok(rows.clone()),
                Outcome::Fail(msg) => Err(OpinionError::Acquisition {
                    source_name: self.name.to_string(),
                    message: msg.to_string(),
                }),
            }
        }
    }

    fn raw(content: &str) -> RawRecord {
        RawRecord {
            date: "2025-05-01".to_string(),
            source: Source::Mobile01,
            content: content.to_string(),
            link: String::new(),
        }
    }

    fn boxed(name: &'static str, outcome: Outcome) -> Box<dyn DataSource> {
        Box::new(StaticSource { name, outcome })
    }

    #[tokio::test]
    async fn partial_failure_keeps_successful_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("my_data.csv"));
        store.write_raw(&[raw("舊資料")]).unwrap();

        let pipeline = AcquisitionPipeline::new(store);
        let mut sources = vec![
            boxed("ptt", Outcome::Rows(vec![raw("停車 很 麻煩"), raw("舊資料")])),
            boxed("mobile01", Outcome::Fail("cloudflare challenge")),
            boxed("dcard", Outcome::Rows(vec![raw("美食街 好吃")])),
        ];

        let report = pipeline.run(&mut sources).await.unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.failed_sources(), vec!["mobile01"]);
        assert_eq!(report.collected, 3);
        assert_eq!(report.added, 2);
        assert_eq!(report.stored_total, 3);

        let stored = pipeline.store().read_raw().unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn nothing_collected_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_data.csv");
        let pipeline = AcquisitionPipeline::new(RecordStore::new(&path));
        let mut sources = vec![boxed("ptt", Outcome::Fail("timeout"))];

        let report = pipeline.run(&mut sources).await.unwrap();
        assert_eq!(report.stored_total, 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unreadable_store_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_data.csv");
        let broken = "date,source,content,link\n2025-01-01\n";
        std::fs::write(&path, broken).unwrap();

        let pipeline = AcquisitionPipeline::new(RecordStore::new(&path));
        let mut sources = vec![boxed("ptt", Outcome::Rows(vec![raw("新資料")]))];

        assert!(pipeline.run(&mut sources).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use crate::RecordStore;
    use chrono::NaiveDate;
    use opinion_core::{Granularity, RawRecord, Sentiment, Source};
    use sentiment_analysis::{Lexicon, SentimentEngine};
    use std::sync::Arc;
    use text_segmenter::WhitespaceTokenizer;
    use trend_analysis::{aggregate, DateNormalizer};

    #[test]
    fn three_records_one_day_one_per_sentiment() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("my_data.csv"));
        let row = |date: &str, content: &str| RawRecord {
            date: date.to_string(),
            source: Source::PttComment,
            content: content.to_string(),
            link: String::new(),
        };
        store
            .write_raw(&[
                row("2025-03-01 09:00:00", "我 不會再來 了"),
                row("2025-03-01 13:30:00", "好吃 推薦"),
                row("2025-03-01 20:15:00", "今天 下午 去 看看"),
            ])
            .unwrap();

        let engine = SentimentEngine::new(Arc::new(Lexicon::default()), Arc::new(WhitespaceTokenizer));
        let now = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let records = store.load(&engine, &DateNormalizer::new(now)).unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let series = aggregate(&records, Granularity::Day, start, end).unwrap();
        assert_eq!(series.len(), 6);

        for point in &series {
            let expected = if point.period_start == start { 1 } else { 0 };
            assert_eq!(point.count, expected, "{:?}", point);
        }
        let first_day: Vec<Sentiment> = series
            .iter()
            .filter(|p| p.period_start == start)
            .map(|p| p.sentiment)
            .collect();
        assert_eq!(first_day, Sentiment::ALL.to_vec());
    }
}
