use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_PATH: &str = "data/jrlex.sqlite";

/// One dictionary entry headed for the translations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub word: String,
    pub reading: String,
    pub main_sense: String,
    pub senses: String,
    /// Position of the source word in the input list, when known.
    pub source_index: Option<i64>,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// A usage example attached to a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub ja: String,
    pub re: String,
    pub tr: String,
}

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS translations (
            id         INTEGER PRIMARY KEY,
            word       TEXT NOT NULL,
            reading    TEXT NOT NULL,
            mainsense  TEXT,
            senses     TEXT,
            index_csv  INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(word, reading)
        );
        CREATE INDEX IF NOT EXISTS idx_translations_reading ON translations(reading);
        CREATE INDEX IF NOT EXISTS idx_translations_index_csv ON translations(index_csv);

        CREATE TABLE IF NOT EXISTS examples (
            id             INTEGER PRIMARY KEY,
            translation_id INTEGER NOT NULL REFERENCES translations(id),
            ja             TEXT NOT NULL,
            re             TEXT,
            tr             TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_examples_translation ON examples(translation_id);

        CREATE TABLE IF NOT EXISTS not_found (
            id         INTEGER PRIMARY KEY,
            word       TEXT NOT NULL,
            reading    TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(word, reading)
        );
        ",
    )?;
    Ok(())
}

// ── Writing ──

pub fn insert_batch(conn: &Connection, records: &[Translation]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut t_stmt = tx.prepare(
            "INSERT OR IGNORE INTO translations (word, reading, mainsense, senses, index_csv)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let mut e_stmt = tx.prepare(
            "INSERT INTO examples (translation_id, ja, re, tr) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for t in records {
            let changed = t_stmt.execute(rusqlite::params![
                t.word,
                t.reading,
                t.main_sense,
                t.senses,
                t.source_index,
            ])?;
            if changed > 0 {
                count += 1;
                let id = tx.last_insert_rowid();
                for ex in &t.examples {
                    e_stmt.execute(rusqlite::params![id, ex.ja, ex.re, ex.tr])?;
                }
            }
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn insert_not_found(conn: &Connection, word: &str, reading: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO not_found (word, reading) VALUES (?1, ?2)",
        rusqlite::params![word, reading],
    )?;
    Ok(())
}

// ── Lookups ──

fn exists(conn: &Connection, sql: &str, params: &[&dyn rusqlite::types::ToSql]) -> Result<bool> {
    let row: Option<i64> = conn.query_row(sql, params, |r| r.get(0)).optional()?;
    Ok(row.is_some())
}

/// True when a stored word contains the given form under the same reading.
/// Substring match because headers often list several written variants.
pub fn exists_by_word_and_reading(conn: &Connection, word: &str, reading: &str) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM translations WHERE instr(word, ?1) > 0 AND reading = ?2 LIMIT 1",
        &[&word, &reading],
    )
}

/// True when the reading is stored, either alone or as one alternative in a
/// dotted variant list.
pub fn exists_by_reading(conn: &Connection, reading: &str) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM translations
         WHERE reading = ?1
            OR reading LIKE ?1 || '・%'
            OR reading LIKE '%・' || ?1
            OR reading LIKE '%・' || ?1 || '・%'
            OR reading LIKE ?1 || ' ・%'
            OR reading LIKE '%・ ' || ?1
            OR reading LIKE '%・ ' || ?1 || ' ・%'
         LIMIT 1",
        &[&reading],
    )
}

pub fn exists_as_not_found(conn: &Connection, word: &str, reading: &str) -> Result<bool> {
    exists(
        conn,
        "SELECT 1 FROM not_found WHERE word = ?1 AND reading = ?2 LIMIT 1",
        &[&word, &reading],
    )
}

/// Input-list positions already persisted, for resuming an interrupted run.
pub fn parsed_indexes(conn: &Connection) -> Result<HashSet<i64>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT index_csv FROM translations WHERE index_csv IS NOT NULL")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<HashSet<i64>, _>>()?;
    Ok(rows)
}

pub fn fetch_translations(
    conn: &Connection,
    reading: Option<&str>,
    limit: usize,
) -> Result<Vec<Translation>> {
    let (filter, params): (&str, Vec<&dyn rusqlite::types::ToSql>) = match reading {
        Some(ref r) => (" WHERE reading = ?1", vec![r as &dyn rusqlite::types::ToSql]),
        None => ("", Vec::new()),
    };
    let sql = format!(
        "SELECT word, reading, COALESCE(mainsense,''), COALESCE(senses,''), index_csv
         FROM translations{filter} ORDER BY id LIMIT {limit}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(Translation {
                word: row.get(0)?,
                reading: row.get(1)?,
                main_sense: row.get(2)?,
                senses: row.get(3)?,
                source_index: row.get(4)?,
                examples: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub translations: usize,
    pub examples: usize,
    pub not_found: usize,
    pub words_indexed: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let translations: usize =
        conn.query_row("SELECT COUNT(*) FROM translations", [], |r| r.get(0))?;
    let examples: usize = conn.query_row("SELECT COUNT(*) FROM examples", [], |r| r.get(0))?;
    let not_found: usize = conn.query_row("SELECT COUNT(*) FROM not_found", [], |r| r.get(0))?;
    let words_indexed: usize = conn.query_row(
        "SELECT COUNT(DISTINCT index_csv) FROM translations WHERE index_csv IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        translations,
        examples,
        not_found,
        words_indexed,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn record(word: &str, reading: &str, index: Option<i64>) -> Translation {
        Translation {
            word: word.to_string(),
            reading: reading.to_string(),
            main_sense: "смысл".to_string(),
            senses: "смысл; ещё смысл".to_string(),
            source_index: index,
            examples: Vec::new(),
        }
    }

    #[test]
    fn batch_insert_ignores_duplicates() {
        let conn = mem_conn();
        let records = vec![
            record("範囲", "はんい", Some(1)),
            record("範囲", "はんい", Some(1)),
            record("野", "の", Some(2)),
        ];
        assert_eq!(insert_batch(&conn, &records).unwrap(), 2);
        assert_eq!(get_stats(&conn).unwrap().translations, 2);
    }

    #[test]
    fn examples_stored_with_their_translation() {
        let conn = mem_conn();
        let mut t = record("範囲", "はんい", Some(1));
        t.examples.push(Example {
            ja: "我々の範囲では".to_string(),
            re: "われわれのはんいでは".to_string(),
            tr: "в нашем кругу".to_string(),
        });
        insert_batch(&conn, &[t]).unwrap();
        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.translations, 1);
        assert_eq!(stats.examples, 1);
    }

    #[test]
    fn word_lookup_matches_variant_lists() {
        let conn = mem_conn();
        insert_batch(&conn, &[record("所I･処", "ところ", None)]).unwrap();
        assert!(exists_by_word_and_reading(&conn, "処", "ところ").unwrap());
        assert!(!exists_by_word_and_reading(&conn, "処", "とこ").unwrap());
        assert!(!exists_by_word_and_reading(&conn, "床", "ところ").unwrap());
    }

    #[test]
    fn reading_lookup_matches_variant_lists() {
        let conn = mem_conn();
        insert_batch(&conn, &[record("等しい", "ひとしい・ひとしき", None)]).unwrap();
        assert!(exists_by_reading(&conn, "ひとしい").unwrap());
        assert!(exists_by_reading(&conn, "ひとしき").unwrap());
        assert!(exists_by_reading(&conn, "ひとしい・ひとしき").unwrap());
        assert!(!exists_by_reading(&conn, "ひとし").unwrap());
    }

    #[test]
    fn not_found_roundtrip() {
        let conn = mem_conn();
        insert_not_found(&conn, "朧げ", "オボロゲ").unwrap();
        insert_not_found(&conn, "朧げ", "オボロゲ").unwrap();
        assert!(exists_as_not_found(&conn, "朧げ", "オボロゲ").unwrap());
        assert!(!exists_as_not_found(&conn, "朧げ", "おぼろげ").unwrap());
        assert_eq!(get_stats(&conn).unwrap().not_found, 1);
    }

    #[test]
    fn parsed_indexes_resume_set() {
        let conn = mem_conn();
        let records = vec![
            record("範囲", "はんい", Some(3)),
            record("野", "の", Some(7)),
            record("純", "じゅん", None),
        ];
        insert_batch(&conn, &records).unwrap();
        let idx = parsed_indexes(&conn).unwrap();
        assert_eq!(idx, HashSet::from([3, 7]));
    }

    #[test]
    fn fetch_filters_by_reading() {
        let conn = mem_conn();
        insert_batch(
            &conn,
            &[record("範囲", "はんい", Some(1)), record("野", "の", Some(2))],
        )
        .unwrap();
        let all = fetch_translations(&conn, None, 50).unwrap();
        assert_eq!(all.len(), 2);
        let one = fetch_translations(&conn, Some("の"), 50).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].word, "野");
        assert_eq!(one[0].source_index, Some(2));
    }
}
