//! Input word list: a headerless CSV of (surface, part-of-speech, katakana)
//! rows produced by a morphological analyzer.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::source::Query;

/// Parts of speech that never make dictionary entries.
const POS_FILTER: &[&str] = &["助動詞", "記号", "動詞-接尾", "助詞"];

pub fn load(path: &Path) -> Result<Vec<Query>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening word list {}", path.display()))?;
    parse(file)
}

fn parse<R: Read>(input: R) -> Result<Vec<Query>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut queries = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("word list row {}", i + 1))?;
        if row.len() < 3 {
            warn!(row = i + 1, fields = row.len(), "short word list row, skipping");
            continue;
        }
        let word = row[0].trim();
        let pos = row[1].trim();
        let kata = row[2].trim();
        // Lemma fields carrying a reading gloss are analyzer noise.
        if POS_FILTER.contains(&pos) || word.contains('【') {
            continue;
        }
        queries.push(Query {
            word: word.to_string(),
            kata: kata.to_string(),
        });
    }
    Ok(queries)
}

// ── Tests ──
