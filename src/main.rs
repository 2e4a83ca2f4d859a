//! MirDB CLI - Command-line tool for MMORPG server databases.
//!
//! This is the main entry point for the `mirdb` command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mirdb::prelude::*;

/// MirDB - inspect, convert and upgrade server databases
#[derive(Parser)]
#[command(name = "mirdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header, record counts and any skipped records
    Info {
        /// Path to the database file
        #[arg(short, long, env = "MIRDB_INPUT")]
        input: PathBuf,
    },

    /// Export a database to per-entity JSON files
    ExportJson {
        /// Path to the database file
        #[arg(short, long, env = "MIRDB_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "MIRDB_OUTPUT")]
        output: PathBuf,

        /// Attach quest text and dragon drops from Quests/ and Drops/
        #[arg(short, long)]
        enrich: bool,

        /// Directory holding Quests/ and Drops/ (defaults to the database's directory)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Build a database from per-entity JSON files
    ImportJson {
        /// Directory written by export-json
        #[arg(short, long, env = "MIRDB_INPUT")]
        input: PathBuf,

        /// Output database file
        #[arg(short, long, env = "MIRDB_OUTPUT")]
        output: PathBuf,
    },

    /// Rewrite a database in the latest layout
    Resave {
        /// Path to the database file
        #[arg(short, long, env = "MIRDB_INPUT")]
        input: PathBuf,

        /// Output database file
        #[arg(short, long, env = "MIRDB_OUTPUT")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::ExportJson {
            input,
            output,
            enrich,
            data_dir,
        } => {
            let options = LoadOptions { enrich, data_dir };
            cmd_export_json(&input, &output, &options)?;
        }
        Commands::ImportJson { input, output } => {
            cmd_import_json(&input, &output)?;
        }
        Commands::Resave { input, output } => {
            cmd_resave(&input, &output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load(input: &Path, options: &LoadOptions) -> Result<LoadReport> {
    let start = Instant::now();
    let report = DatabaseImage::open(input, options)
        .with_context(|| format!("Failed to load database {}", input.display()))?;
    info!(
        elapsed = ?start.elapsed(),
        records = report.image.record_count(),
        skipped = report.errors.len(),
        "loaded {}",
        input.display()
    );
    for error in &report.errors {
        warn!("{error}");
    }
    Ok(report)
}

fn cmd_info(input: &Path) -> Result<()> {
    let report = load(input, &LoadOptions::default())?;
    let image = &report.image;
    let header = &image.header;

    println!("Version:        {} (custom {})", header.version, header.custom_version);
    println!(
        "Index counters: map {}, item {}, monster {}, npc {}, quest {}, gameshop {}, conquest {}, respawn {}",
        header.map_index,
        header.item_index,
        header.monster_index,
        header.npc_index,
        header.quest_index,
        header.gameshop_index,
        header.conquest_index,
        header.respawn_timer_index
    );
    println!();
    println!("{:>16} {:>8}", "Section", "Records");
    for (name, count) in [
        ("maps", image.maps.len()),
        ("items", image.items.len()),
        ("monsters", image.monsters.len()),
        ("npcs", image.npcs.len()),
        ("quests", image.quests.len()),
        ("dragon", usize::from(image.dragon.is_some())),
        ("magics", image.magics.len()),
        ("gameshop items", image.gameshop_items.len()),
        ("conquests", image.conquests.len()),
        ("respawn timer", usize::from(image.respawn_timer.is_some())),
    ] {
        println!("{:>16} {:>8}", name, count);
    }

    if !report.is_clean() {
        println!("\nSkipped {} record(s):", report.errors.len());
        for error in &report.errors {
            println!("  {error}");
        }
    }

    Ok(())
}

fn cmd_export_json(input: &Path, output: &Path, options: &LoadOptions) -> Result<()> {
    let report = load(input, options)?;

    println!("Exporting to {}...", output.display());
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let stats = JsonExporter::new(&report.image)
        .export_dir(output, |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .context("Failed to export JSON")?;
    pb.finish_with_message("Done");

    println!(
        "Exported {} records to {} files in {:?}",
        stats.records,
        stats.files,
        start.elapsed()
    );

    Ok(())
}

fn cmd_import_json(input: &Path, output: &Path) -> Result<()> {
    let image = import_json_dir(input).with_context(|| format!("Failed to import {}", input.display()))?;
    image.save(output).context("Failed to write database")?;

    println!(
        "Wrote {} records to {} (version {})",
        image.record_count(),
        output.display(),
        LATEST_VERSION
    );

    Ok(())
}

fn cmd_resave(input: &Path, output: &Path) -> Result<()> {
    let report = load(input, &LoadOptions::default())?;
    let from = report.image.version();
    let bytes = report.image.to_bytes().context("Failed to encode database")?;
    fs::write(output, &bytes).context("Failed to write output file")?;

    println!(
        "Resaved version {} -> {}: {} bytes, {} record(s) skipped",
        from,
        LATEST_VERSION,
        bytes.len(),
        report.errors.len()
    );

    Ok(())
}
