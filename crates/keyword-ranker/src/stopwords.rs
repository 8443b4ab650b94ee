use opinion_core::OpinionResult;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

/// Venue names and conversational filler that carry no signal on their own
const BUILTIN_STOP_WORDS: &[&str] = &[
    "高雄", "義享", "天地", "義享天地", "義享時尚廣場", "百貨", "巨蛋",
    "感覺", "比較", "真的", "現在", "今天", "時候", "知道", "看到",
    "有的", "沒有", "什麼", "可以", "一個", "就是", "還是", "我們", "你們", "因為", "可能", "其實", "覺得",
    "不過", "這個", "那個", "去過", "大家", "請問", "問題", "閒聊", "新聞", "分享", "文章", "作者", "標題",
    "時間", "原本", "以為", "結果", "部分", "目前", "已經", "怎麼", "這樣", "最近", "這家", "這種", "那種",
    "一樣", "一點", "一下", "一直", "只是", "但是", "然後", "還有", "甚至", "而且", "不如", "如果",
];

#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn builtin() -> Self {
        Self::from_words(BUILTIN_STOP_WORDS.iter().copied())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Merge a UTF-8 file with one word per line. A missing file adds
    /// nothing; other I/O failures are returned.
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> OpinionResult<usize> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No stop-word file at {}", path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let before = self.words.len();
        for line in contents.lines() {
            let word = line.trim().trim_start_matches('\u{feff}');
            if !word.is_empty() {
                self.words.insert(word.to_string());
            }
        }
        let added = self.words.len() - before;
        tracing::info!("Merged {} stop words from {}", added, path.display());
        Ok(added)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
