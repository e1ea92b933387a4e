//! Blockscan CLI — inspect block-index snapshots from the command line.
//!
//! # Commands
//! ```
//! blockscan summary <store>
//! blockscan block   <store> <height>
//! blockscan day     <store> <number>
//! blockscan days    <store> [--limit N]
//! blockscan dump    <store>
//! ```
//!
//! `<store>` is a snapshot dump file, or a SQLite database when invoked
//! with `--sqlite` (requires the `sqlite` build feature).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blockscan_core::{decode_entry, format_timestamp, render_record};
use blockscan_index::{ChainView, IngestOptions, KeyValueStore};
use blockscan_store::MemoryStore;

#[cfg(feature = "sqlite")]
use blockscan_store::SqliteStore;

#[derive(Parser)]
#[command(
    name = "blockscan",
    about = "Block-index snapshot inspector — decode records, aggregate days, query heights",
    long_about = "
Blockscan reads a block-index snapshot (a text dump, or a SQLite database
with --sqlite), decodes every record under the key prefix, and answers
questions about blocks and calendar days from the result.

ENVIRONMENT VARIABLES:
  RUST_LOG    tracing filter, overrides -v (e.g. 'blockscan_index=debug')
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Key prefix tag the scan filters on
    #[arg(long, global = true, default_value_t = 'b')]
    prefix: char,

    /// Do not warn when height 0 is absent from the snapshot
    #[arg(long, global = true)]
    no_genesis_check: bool,

    /// Treat the store argument as a SQLite database
    #[arg(long, global = true)]
    sqlite: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a store and print index-wide totals
    Summary {
        /// Path to the snapshot store
        store: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one decoded block record by height
    Block {
        /// Path to the snapshot store
        store: PathBuf,
        /// Block height to look up
        height: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one aggregated calendar day by its dense day number
    Day {
        /// Path to the snapshot store
        store: PathBuf,
        /// Day number, 0-based in chronological order
        number: u32,
    },

    /// List every aggregated day in chronological order
    Days {
        /// Path to the snapshot store
        store: PathBuf,
        /// Show at most this many days
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Re-emit the whole store as dump text on stdout
    Dump {
        /// Path to the snapshot store
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.prefix.is_ascii() {
        bail!("--prefix must be a single ASCII character, got '{}'", cli.prefix);
    }
    let options = IngestOptions {
        key_prefix: cli.prefix as u8,
        expect_genesis: !cli.no_genesis_check,
        ..IngestOptions::default()
    };

    match cli.command {
        Commands::Summary { store, json } => {
            let view = ingest(&store, cli.sqlite, &options)?;
            cmd_summary(&view, json)
        }

        Commands::Block { store, height, json } => {
            let view = ingest(&store, cli.sqlite, &options)?;
            cmd_block(&view, height, json)
        }

        Commands::Day { store, number } => {
            let view = ingest(&store, cli.sqlite, &options)?;
            cmd_day(&view, number)
        }

        Commands::Days { store, limit } => {
            let view = ingest(&store, cli.sqlite, &options)?;
            cmd_days(&view, limit)
        }

        Commands::Dump { store } => {
            let store = open_store(&store, cli.sqlite)?;
            cmd_dump(store.as_ref(), cli.prefix as u8)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,blockscan_index=debug,blockscan_store=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn open_store(path: &Path, sqlite: bool) -> Result<Box<dyn KeyValueStore>> {
    if sqlite {
        #[cfg(feature = "sqlite")]
        {
            let store = SqliteStore::open(path)
                .with_context(|| format!("open SQLite store '{}'", path.display()))?;
            return Ok(Box::new(store));
        }
        #[cfg(not(feature = "sqlite"))]
        bail!("this build has no SQLite support (rebuild with --features sqlite)");
    }
    let store = MemoryStore::from_dump_path(path)
        .with_context(|| format!("load snapshot dump '{}'", path.display()))?;
    Ok(Box::new(store))
}

fn ingest(path: &Path, sqlite: bool, options: &IngestOptions) -> Result<ChainView> {
    let store = open_store(path, sqlite)?;
    let view = ChainView::ingest(store.as_ref(), options)
        .with_context(|| format!("ingest '{}'", path.display()))?;
    Ok(view)
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_summary(view: &ChainView, as_json: bool) -> Result<()> {
    let report = view.report();
    let total_txs: u64 = view.index().records().map(|r| r.tx_count).sum();

    if as_json {
        let out = serde_json::json!({
            "report": report,
            "day_count": view.day_count(),
            "total_transactions": total_txs,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Blocks:        {} decoded, {} undecodable", report.decoded, report.failed);
    match report.height_range {
        Some((min, max)) => println!("Height range:  {min} ..= {max}"),
        None => println!("Height range:  (empty)"),
    }
    if report.missing_count > 0 {
        println!(
            "Missing:       {} heights ({})",
            report.missing_count,
            preview(&report.missing_heights)
        );
    }
    match (view.day_by_number(0), view.day_count().checked_sub(1)) {
        (Some(first), Some(last_idx)) => {
            let last = view.day_by_number(last_idx).map_or(first.date, |b| b.date);
            println!("Days:          {} ({} .. {})", view.day_count(), first.date, last);
        }
        _ => println!("Days:          0"),
    }
    println!("Transactions:  {total_txs}");

    if !report.diagnostics.is_empty() {
        println!("Skipped entries:");
        for diag in report.diagnostics.iter().take(4) {
            println!("  {}  {}", diag.key, diag.reason);
        }
        let shown = report.diagnostics.len().min(4) as u64;
        if report.failed > shown {
            println!("  ... and {} more", report.failed - shown);
        }
    }
    Ok(())
}

fn cmd_block(view: &ChainView, height: u64, as_json: bool) -> Result<()> {
    let record = view
        .block_by_height(height)
        .ok_or_else(|| anyhow!("no block at height {height}"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print!("{}", render_record(record));
    }
    Ok(())
}

fn cmd_day(view: &ChainView, number: u32) -> Result<()> {
    let bucket = view.day_by_number(number).ok_or_else(|| {
        anyhow!("no day number {number} (the ledger has {} days)", view.day_count())
    })?;

    println!("Date:          {}", bucket.date);
    println!("Day number:    {}", bucket.day_number);
    println!("Blocks:        {}", bucket.block_count);
    println!("Transactions:  {}", bucket.tx_count);
    println!("Heights:       {} ..= {}", bucket.min_height, bucket.max_height);
    println!("First seen:    {}", format_timestamp(bucket.representative_timestamp));
    Ok(())
}

fn cmd_days(view: &ChainView, limit: Option<usize>) -> Result<()> {
    println!("{:>6}  {:10}  {:>7}  {:>9}  heights", "day", "date", "blocks", "txs");
    for bucket in view.days().buckets().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:>6}  {}  {:>7}  {:>9}  {} ..= {}",
            bucket.day_number,
            bucket.date,
            bucket.block_count,
            bucket.tx_count,
            bucket.min_height,
            bucket.max_height
        );
    }
    Ok(())
}

fn cmd_dump(store: &dyn KeyValueStore, block_prefix: u8) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for entry in store.scan_prefix(&[])? {
        let (key, value) = entry?;
        // Comment lines are skipped on reload, so annotations keep the
        // dump round-trippable.
        if key.first() == Some(&block_prefix) {
            if let Err(err) = decode_entry(&key, &value) {
                writeln!(out, "# undecodable: {err}")?;
            }
        }
        writeln!(out, "{} {}", hex::encode(&key), hex::encode(&value))?;
    }
    Ok(())
}

fn preview(heights: &[u64]) -> String {
    const SHOWN: usize = 8;
    let shown: Vec<String> = heights.iter().take(SHOWN).map(u64::to_string).collect();
    if heights.len() > SHOWN {
        format!("{}, ...", shown.join(", "))
    } else {
        shown.join(", ")
    }
}
