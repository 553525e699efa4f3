use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use greek_srs::export::json;
use greek_srs::models::{MasteryStatus, StatsSummary};
use greek_srs::{Catalogue, EngineConfig, ItemStore, ItemType, SqliteStore, SrsEngine, Timestamp};

/// Spaced repetition scheduler for Greek letters and endings
#[derive(Parser)]
#[command(name = "greek-srs", version, about)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "srs.sqlite3")]
    db: PathBuf,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretend the current time is this RFC 3339 timestamp
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default records for every item if the database is empty
    Init,
    /// Show stats for one item type, or for all of them
    Stats {
        #[arg(long = "type")]
        item_type: Option<ItemTypeArg>,
    },
    /// Show mastery per type and which types are unlocked
    Progress,
    /// Build a shuffled review batch
    Queue {
        #[arg(long = "type")]
        item_type: Option<ItemTypeArg>,
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        ratio: Option<f64>,
    },
    /// Grade one answer
    Grade {
        item_id: String,
        #[arg(long, conflicts_with = "incorrect")]
        correct: bool,
        #[arg(long)]
        incorrect: bool,
        /// Response time in milliseconds
        #[arg(long)]
        ms: u64,
    },
    /// Show recent reviews, newest first, or one item's most recent reviews oldest first
    History {
        #[arg(long)]
        item: Option<String>,
        /// Number of reviews to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Write items and history to a JSON file
    Export { path: PathBuf },
    /// Load items and history from a JSON file
    Import { path: PathBuf },
    /// Delete all progress and recreate default records
    Reset,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ItemTypeArg {
    Letter,
    NounEnding,
    VerbEnding,
}

impl From<ItemTypeArg> for ItemType {
    fn from(arg: ItemTypeArg) -> Self {
        match arg {
            ItemTypeArg::Letter => ItemType::Letter,
            ItemTypeArg::NounEnding => ItemType::NounEnding,
            ItemTypeArg::VerbEnding => ItemType::VerbEnding,
        }
    }
}

fn print_stats(item_type: ItemType, stats: &StatsSummary) {
    println!(
        "{:<12} total {:>3}  mastered {:>3}  learning {:>3}  new {:>3}  due {:>3}  acc {:>5.1}%",
        item_type.as_str(),
        stats.total,
        stats.mastered,
        stats.learning,
        stats.not_started,
        stats.due_now,
        stats.overall_accuracy
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("Failed to open database {}", cli.db.display()))?;
    let mut engine = SrsEngine::new(store, config, Catalogue::greek())?;

    let now: Timestamp = cli.now.unwrap_or_else(Utc::now).timestamp_millis();
    info!(db = %cli.db.display(), now, "Opened database");

    match cli.command {
        Commands::Init => {
            let created = engine.initialize(now)?;
            println!("Created {created} review items");
        }
        Commands::Stats { item_type } => {
            engine.initialize(now)?;
            let types = match item_type {
                Some(item_type) => vec![item_type.into()],
                None => ItemType::ALL.to_vec(),
            };
            for item_type in types {
                print_stats(item_type, &engine.get_stats(item_type, now)?);
            }
        }
        Commands::Progress => {
            engine.initialize(now)?;
            let report = engine.progress(now)?;
            for item_type in ItemType::ALL {
                let stats = report.stats(item_type);
                let lock = if report.is_unlocked(item_type) {
                    "unlocked"
                } else {
                    "locked"
                };
                println!(
                    "{:<12} {:>5.1}% mastered  {}",
                    item_type.as_str(),
                    stats.mastery_percent(),
                    lock
                );
            }
        }
        Commands::Queue {
            item_type,
            size,
            ratio,
        } => {
            engine.initialize(now)?;
            let size = size.unwrap_or(engine.config().queue.quiz_size);
            let ratio = ratio.unwrap_or(engine.config().queue.new_item_ratio);
            let batch = engine.get_queue(item_type.map(Into::into), size, ratio, now)?;
            if batch.is_empty() {
                println!("Nothing to review");
            }
            for item in &batch {
                let status = match engine.mastery_status(item) {
                    MasteryStatus::NotStarted => "new",
                    MasteryStatus::Learning => "learning",
                    MasteryStatus::Mastered => "mastered",
                };
                println!(
                    "{:<28} {:<9} reps {:>2}  interval {:>4}d",
                    item.id, status, item.repetitions, item.interval
                );
            }
        }
        Commands::Grade {
            item_id,
            correct,
            incorrect,
            ms,
        } => {
            if correct == incorrect {
                anyhow::bail!("Pass exactly one of --correct or --incorrect");
            }
            let item = engine.grade_review(&item_id, correct, ms, now)?;
            let next = DateTime::<Utc>::from_timestamp_millis(item.next_review_date)
                .map(|date| date.to_rfc3339())
                .unwrap_or_else(|| item.next_review_date.to_string());
            println!(
                "{}: interval {}d, repetitions {}, ease {:.2}, next review {}",
                item.id, item.interval, item.repetitions, item.ease_factor, next
            );
        }
        Commands::History { item, limit } => {
            let store = engine.store();
            let logs = match item {
                Some(item_id) => store.review_history_for_item(&item_id, Some(limit))?,
                None => store.review_history(Some(limit))?,
            };
            for log in logs {
                println!(
                    "{} {:<28} {:<9} {:>6}ms  quality {}",
                    log.reviewed_at,
                    log.item_id,
                    if log.correct { "correct" } else { "incorrect" },
                    log.response_time_ms,
                    log.quality
                );
            }
        }
        Commands::Export { path } => {
            json::export_to_path(engine.store(), &path, now)?;
            println!("Exported to {}", path.display());
        }
        Commands::Import { path } => {
            let summary = json::import_from_path(engine.store_mut(), &path)?;
            println!(
                "Imported {} items and {} reviews ({} already present)",
                summary.items, summary.history, summary.skipped_history
            );
        }
        Commands::Reset => {
            let created = engine.reset(now)?;
            println!("Progress reset, {created} review items recreated");
        }
    }

    Ok(())
}
