//! The batch loop: for each word from the input list, gather its run of
//! articles from the source, extract translations, dedupe, and persist in
//! fixed-size batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::db::{self, Translation};
use crate::dedup::SeenSet;
use crate::error::{ExtractError, SourceError};
use crate::kana::KanaService;
use crate::parser::{self, matcher, script};
use crate::source::{ArticleSource, Query};

/// Records are flushed to the database in batches of this size.
const BATCH_SIZE: usize = 50;

pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub errored: usize,
    pub records: usize,
}

impl RunSummary {
    pub fn print(&self) {
        println!(
            "Processed {} words ({} skipped, {} not found, {} errors), saved {} records.",
            self.processed, self.skipped, self.not_found, self.errored, self.records,
        );
    }
}

pub struct Pipeline<'a, S: ArticleSource> {
    conn: &'a Connection,
    source: S,
    kana: &'a dyn KanaService,
    cancel: Arc<AtomicBool>,
}

impl<'a, S: ArticleSource> Pipeline<'a, S> {
    pub fn new(conn: &'a Connection, source: S, kana: &'a dyn KanaService) -> Self {
        Self {
            conn,
            source,
            kana,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag observed between words; setting it stops the run after the
    /// current word and flushes what is already buffered.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn run(&mut self, words: &[Query], progress: bool) -> Result<RunSummary> {
        let parsed = db::parsed_indexes(self.conn)?;
        let mut seen = SeenSet::new();
        let mut buffer: Vec<Translation> = Vec::new();
        let mut summary = RunSummary {
            processed: 0,
            skipped: 0,
            not_found: 0,
            errored: 0,
            records: 0,
        };

        let pb = if progress {
            let pb = ProgressBar::new(words.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for (index, query) in words.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                info!("Cancelled, flushing {} buffered records", buffer.len());
                break;
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }

            if parsed.contains(&(index as i64)) || self.already_known(query)? {
                summary.skipped += 1;
                continue;
            }

            let run = match self.collect_run(query) {
                Ok(run) => run,
                Err(e @ SourceError::Desynced(_)) => {
                    error!("{e}; stopping the run");
                    summary.records += flush(self.conn, &mut buffer, &mut seen)?;
                    summary.print();
                    return Err(e.into());
                }
                Err(e) => {
                    warn!("{}: {e}", query.word);
                    summary.errored += 1;
                    continue;
                }
            };

            let word_records = match extract_records(&run, self.kana) {
                Ok(records) => records,
                Err(e) => {
                    warn!("{}: {e}", query.word);
                    summary.errored += 1;
                    continue;
                }
            };

            if word_records.is_empty() {
                db::insert_not_found(self.conn, &query.word, &query.kata)?;
                summary.not_found += 1;
            } else {
                summary.processed += 1;
            }

            for mut record in word_records {
                if seen.is_duplicate(&record) {
                    warn!("Duplicate in batch: {} [{}]", record.word, record.reading);
                    continue;
                }
                record.source_index = Some(index as i64);
                seen.mark(&record);
                buffer.push(record);
            }

            if buffer.len() >= BATCH_SIZE {
                summary.records += flush(self.conn, &mut buffer, &mut seen)?;
            }
        }

        summary.records += flush(self.conn, &mut buffer, &mut seen)?;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        Ok(summary)
    }

    /// Already persisted under any written variant, or recorded as missing.
    fn already_known(&self, query: &Query) -> Result<bool> {
        let reading = self.kana.kata_to_hira(&query.kata);
        let known = if script::has_kanji(&query.word) {
            db::exists_by_word_and_reading(self.conn, &query.word, &reading)?
        } else {
            db::exists_by_reading(self.conn, &reading)?
        };
        Ok(known || db::exists_as_not_found(self.conn, &query.word, &query.kata)?)
    }

    /// Gather the contiguous run of articles whose headers match the query:
    /// rewind to the run's first article, then collect forward.
    fn collect_run(&mut self, query: &Query) -> Result<Vec<String>, SourceError> {
        if !self.source.seek(query)? {
            return Ok(Vec::new());
        }

        let mut moved = false;
        loop {
            let Some(cur) = self.source.current() else {
                break;
            };
            if !matcher::matches(&cur, &query.word, &query.kata, self.kana) {
                if moved {
                    self.source.step_forward()?;
                }
                break;
            }
            if !self.source.step_back()? {
                break;
            }
            moved = true;
        }

        let mut run = Vec::new();
        while let Some(cur) = self.source.current() {
            if !matcher::matches(&cur, &query.word, &query.kata, self.kana) {
                break;
            }
            run.push(cur);
            if !self.source.step_forward()? {
                break;
            }
        }
        Ok(run)
    }
}

/// Extract translation records from a run. Cross-reference stubs drop out;
/// a malformed article discards the whole word.
fn extract_records(
    run: &[String],
    kana: &dyn KanaService,
) -> Result<Vec<Translation>, ExtractError> {
    let mut records = Vec::new();
    for raw in run {
        if let Some(record) = parser::process_article(raw, kana)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn flush(conn: &Connection, buffer: &mut Vec<Translation>, seen: &mut SeenSet) -> Result<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }
    let count = db::insert_batch(conn, buffer)?;
    buffer.clear();
    seen.clear();
    Ok(count)
}

// ── Tests ──
