//! Article sources. A source positions a cursor over dictionary articles;
//! the pipeline seeks to a query, then steps backward and forward to gather
//! the whole run of articles for that entry.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::SourceError;

/// One entry from the input word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Dictionary form, usually with kanji.
    pub word: String,
    /// Katakana reading.
    pub kata: String,
}

pub trait ArticleSource {
    /// Position the cursor on an article for the query. False when the
    /// source has no article for it.
    fn seek(&mut self, query: &Query) -> Result<bool, SourceError>;

    /// The article text under the cursor.
    fn current(&self) -> Option<String>;

    /// Move one article back. False at the first article.
    fn step_back(&mut self) -> Result<bool, SourceError>;

    /// Move one article forward. False at the last article.
    fn step_forward(&mut self) -> Result<bool, SourceError>;
}

/// Source backed by a pre-exported article dump: a JSON array of article
/// strings in dictionary order.
pub struct DumpSource {
    articles: Vec<String>,
    pos: Option<usize>,
}

impl DumpSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading article dump {}", path.display()))?;
        let articles: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing article dump {}", path.display()))?;
        Ok(Self::from_articles(articles))
    }

    pub fn from_articles(articles: Vec<String>) -> Self {
        let articles = articles
            .into_iter()
            .map(|a| a.replace('\r', "").trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        Self {
            articles,
            pos: None,
        }
    }

    fn find(&self, query: &Query) -> Option<usize> {
        // する-verbs are listed under their nominal stem.
        let stem = query.word.strip_suffix("する").unwrap_or(&query.word);
        self.articles.iter().position(|article| {
            article
                .lines()
                .take(2)
                .any(|l| l.contains(stem) || l.contains(&query.kata))
        })
    }
}

impl ArticleSource for DumpSource {
    fn seek(&mut self, query: &Query) -> Result<bool, SourceError> {
        match self.find(query) {
            Some(i) => {
                self.pos = Some(i);
                Ok(true)
            }
            None => {
                self.pos = None;
                Ok(false)
            }
        }
    }

    fn current(&self) -> Option<String> {
        self.pos.map(|i| self.articles[i].clone())
    }

    fn step_back(&mut self) -> Result<bool, SourceError> {
        match self.pos {
            Some(i) if i > 0 => {
                self.pos = Some(i - 1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn step_forward(&mut self) -> Result<bool, SourceError> {
        match self.pos {
            Some(i) if i + 1 < self.articles.len() => {
                self.pos = Some(i + 1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn dump() -> DumpSource {
        DumpSource::from_articles(vec![
            "はんえい\n繁栄\nпроцветание".to_string(),
            "はんい\n範囲\nсфера, область".to_string(),
            "はんい\n範囲II\nдиапазон".to_string(),
            "はんおん\n半音\nполутон".to_string(),
        ])
    }

    #[test]
    fn seek_finds_by_written_form() {
        let mut src = dump();
        let q = Query {
            word: "範囲".to_string(),
            kata: "ハンイ".to_string(),
        };
        assert!(src.seek(&q).unwrap());
        assert!(src.current().unwrap().contains("сфера"));
    }

    #[test]
    fn seek_strips_suru_suffix() {
        let mut src = DumpSource::from_articles(vec![
            "こうちく\n構築\nстроительство".to_string(),
        ]);
        let q = Query {
            word: "構築する".to_string(),
            kata: "コウチクスル".to_string(),
        };
        assert!(src.seek(&q).unwrap());
    }

    #[test]
    fn seek_miss_clears_cursor() {
        let mut src = dump();
        let q = Query {
            word: "朧げ".to_string(),
            kata: "オボロゲ".to_string(),
        };
        assert!(!src.seek(&q).unwrap());
        assert!(src.current().is_none());
    }

    #[test]
    fn stepping_stops_at_the_edges() {
        let mut src = dump();
        let q = Query {
            word: "繁栄".to_string(),
            kata: "ハンエイ".to_string(),
        };
        assert!(src.seek(&q).unwrap());
        assert!(!src.step_back().unwrap());
        assert!(src.step_forward().unwrap());
        assert!(src.current().unwrap().contains("範囲"));
    }

    #[test]
    fn blank_and_cr_articles_normalized_away() {
        let src = DumpSource::from_articles(vec![
            "  ".to_string(),
            "はんい\r\n範囲\r\nсфера".to_string(),
        ]);
        assert_eq!(src.articles.len(), 1);
        assert_eq!(src.articles[0], "はんい\n範囲\nсфера");
    }
}
