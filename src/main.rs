mod db;
mod dedup;
mod error;
mod kana;
mod parser;
mod pipeline;
mod source;
mod wordlist;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::kana::WanaKana;
use crate::source::DumpSource;

#[derive(Parser)]
#[command(name = "jrlex", about = "Japanese-Russian lexicon builder")]
struct Cli {
    /// SQLite database path
    #[arg(long, default_value = db::DEFAULT_DB_PATH)]
    db: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Build the lexicon from a word list and an article dump
    Run {
        /// Word list CSV (default: $CSV_FILE)
        #[arg(short, long)]
        words: Option<PathBuf>,
        /// Article dump JSON (default: $ARTICLE_DUMP)
        #[arg(short, long)]
        dump: Option<PathBuf>,
        /// Max words to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show database statistics
    Stats,
    /// List stored translations
    List {
        /// Filter by reading
        #[arg(short, long)]
        reading: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Emit JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            println!("Initialized {}", cli.db.display());
            Ok(())
        }
        Commands::Run { words, dump, limit } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;

            let words_path = resolve_path(words, "CSV_FILE")?;
            let dump_path = resolve_path(dump, "ARTICLE_DUMP")?;

            let mut queries = wordlist::load(&words_path)?;
            if let Some(n) = limit {
                queries.truncate(n);
            }
            if queries.is_empty() {
                println!("Word list is empty after filtering.");
                return Ok(());
            }
            info!("Loaded {} words from {}", queries.len(), words_path.display());

            let source = DumpSource::from_path(&dump_path)?;
            let kana = WanaKana;
            let mut pipeline = pipeline::Pipeline::new(&conn, source, &kana);

            let cancel = pipeline.cancel_flag();
            ctrlc::set_handler(move || {
                cancel.store(true, Ordering::Relaxed);
            })?;

            println!("Processing {} words...", queries.len());
            let summary = pipeline.run(&queries, true)?;
            summary.print();
            Ok(())
        }
        Commands::List { reading, limit, json } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_translations(&conn, reading.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No translations found.");
                return Ok(());
            }

            if json {
                for row in &rows {
                    println!("{}", serde_json::to_string(row)?);
                }
            } else {
                println!(
                    "{:>3} | {:<12} | {:<12} | {:<40}",
                    "#", "Word", "Reading", "Main sense"
                );
                println!("{}", "-".repeat(76));
                for (i, row) in rows.iter().enumerate() {
                    println!(
                        "{:>3} | {:<12} | {:<12} | {:<40}",
                        i + 1,
                        truncate(&row.word, 12),
                        truncate(&row.reading, 12),
                        truncate(&row.main_sense, 40),
                    );
                }
                println!("\n{} translations", rows.len());
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Translations:  {}", s.translations);
            println!("Examples:      {}", s.examples);
            println!("Not found:     {}", s.not_found);
            println!("Words indexed: {}", s.words_indexed);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn resolve_path(arg: Option<PathBuf>, env: &str) -> anyhow::Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }
    match std::env::var(env) {
        Ok(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => bail!("no path given and ${env} is not set"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
