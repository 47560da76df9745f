// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use skucheck::app_config::{Config, LogLevel};
use skucheck::{ProductSession, Repository, SessionBoard, SessionError, VerificationStatus};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the verification store, creating it if needed
    Init,

    /// Commit finished checklist sessions read from a JSON file
    Record {
        /// JSON file with one session or an array of sessions
        #[arg(value_name = "SESSION_FILE")]
        session_file: PathBuf,
    },

    /// List recorded verifications, newest first
    History {
        /// Only show verifications for this SKU
        #[arg(long)]
        sku: Option<String>,
    },

    /// Show one verification and its photos
    Show {
        /// Verification id
        id: i64,
    },

    /// Show verification statistics and storage usage
    Stats,

    /// Delete every verification and photo
    Clear {
        /// Confirm the deletion; nothing is deleted without it
        #[arg(long)]
        yes: bool,
    },

    /// List products from the catalog
    Products {
        /// Filter by SKU or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Look up the product printed on a scanned label
    Scan {
        /// Decoded label text, e.g. "SKU: 1001"
        text: String,
    },

    /// Generate shell completions for skucheck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// skucheck - quality verification checklists for warehouse SKUs
#[derive(Parser, Debug)]
#[command(name = "skucheck")]
#[command(version)]
#[command(about = "Record and review SKU quality verifications")]
#[command(long_about = "skucheck records quality-verification checklists for warehouse products
in a local SQLite database, together with the photos taken during the check.

EXAMPLES:
    skucheck init                          # Create the database
    skucheck scan \"SKU: 1001\"            # Product and checklist for a label
    skucheck record sessions.json          # Commit finished checklists
    skucheck history --sku 1001            # Verifications for one SKU
    skucheck show 12                       # One verification with photos
    skucheck stats                         # Totals and storage usage
    skucheck clear --yes                   # Delete all verifications

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't
    exist, a default one with the built-in catalog and checklist is created.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Sessions file: a single session or an array of them
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionFile {
    Many(Vec<ProductSession>),
    One(Box<ProductSession>),
}

impl SessionFile {
    fn into_sessions(self) -> Vec<ProductSession> {
        match self {
            SessionFile::Many(sessions) => sessions,
            SessionFile::One(session) => vec![*session],
        }
    }
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is set via max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "skucheck", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let config = Config::load_or_create(&cli.config_path)?;
    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if let Commands::Products { search } = &cli.command {
        list_products(&config, search.as_deref());
        return Ok(());
    }

    if let Commands::Scan { text } = &cli.command {
        scan_label(&config, text)?;
        return Ok(());
    }

    let repo = Repository::new(config.store_location()?);
    repo.initialize()
        .await
        .with_context(|| format!("Failed to open verification store at {}", repo.location()))?;

    match cli.command {
        Commands::Init => {
            println!("Verification store ready at {}", repo.location());
        }
        Commands::Record { session_file } => record_sessions(&config, &repo, &session_file).await?,
        Commands::History { sku } => print_history(&repo, sku.as_deref()).await?,
        Commands::Show { id } => show_verification(&config, &repo, id).await?,
        Commands::Stats => print_stats(&repo).await?,
        Commands::Clear { yes } => {
            if !yes {
                warn!("Refusing to delete all verifications without --yes");
                return Ok(());
            }
            repo.clear_all().await?;
            println!("All verifications and photos deleted.");
        }
        Commands::Products { .. } | Commands::Scan { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}

fn list_products(config: &Config, search: Option<&str>) {
    let board = SessionBoard::new(config.reference.clone());
    let sessions = board.search(search.unwrap_or(""));

    for session in sessions {
        println!(
            "{:<10} {:<40} factor {}",
            session.sku, session.description, session.stacking_factor
        );
    }
}

fn scan_label(config: &Config, text: &str) -> Result<()> {
    let board = SessionBoard::new(config.reference.clone());
    let session = board
        .find_scanned(text)
        .ok_or_else(|| anyhow!("No known SKU found in scanned text: {}", text))?;

    println!("{} - {} (factor {})", session.sku, session.description, session.stacking_factor);
    for item in &config.reference.checklist {
        println!("  [{}] {}", item.name, item.question);
    }

    Ok(())
}

async fn record_sessions(config: &Config, repo: &Repository, session_file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(session_file)
        .with_context(|| format!("Failed to read session file: {}", session_file.display()))?;
    let sessions = serde_json::from_str::<SessionFile>(&content)
        .with_context(|| format!("Failed to parse session file: {}", session_file.display()))?
        .into_sessions();

    let mut board = SessionBoard::new(config.reference.clone());
    for session in sessions {
        board.save_checklist(session)?;
    }

    let pending = board.sessions().len() - board.committable().len();
    info!(
        "{} session(s) ready to commit, {} still pending",
        board.committable().len(),
        pending
    );

    match board.commit(repo).await {
        Ok(summary) if summary.is_empty() => {
            println!("No completed verifications to save.");
        }
        Ok(summary) => {
            for committed in &summary.committed {
                println!("Saved SKU {} as verification {}", committed.sku, committed.verification_id);
            }
            println!("{} verification(s) saved.", summary.count());
        }
        Err(SessionError::CommitFailed { committed, sku, source }) => {
            return Err(anyhow!(
                "Saved {} verification(s), then failed on SKU {}: {}",
                committed,
                sku,
                source
            ));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn print_history(repo: &Repository, sku: Option<&str>) -> Result<()> {
    let history = repo.history(sku).await?;

    if history.is_empty() {
        println!("No verifications recorded.");
        return Ok(());
    }

    for v in history {
        let status = match v.status {
            VerificationStatus::Ok => "OK",
            VerificationStatus::Error => "Incidencia",
        };
        println!(
            "#{:<5} {}  {:<8} {:<30} {:<10} {:<12} {} foto(s)",
            v.id, v.created_at, v.sku, v.description, status, v.inspector, v.total_photos
        );
    }

    Ok(())
}

async fn show_verification(config: &Config, repo: &Repository, id: i64) -> Result<()> {
    let Some(v) = repo.get_verification(id).await? else {
        println!("Verification {} not found.", id);
        return Ok(());
    };

    println!("Verification #{} ({})", v.id, v.status);
    println!("  SKU:          {} - {}", v.sku, v.description);
    println!("  Stacking:     {}", v.stacking_factor);
    println!("  Date:         {}", v.created_at);
    println!("  Inspector:    {}", v.inspector);
    println!("  Shift:        {}", v.shift);
    println!("  Location:     {}", v.location);
    println!("  Observations: {}", v.observations);
    println!("  Answers:");
    for (item, answer) in &v.answers {
        // Items removed from the checklist since the check still print by name
        let question = config
            .reference
            .checklist_item(item)
            .map_or(item.as_str(), |i| i.question.as_str());
        println!("    {:<40} {}", question, answer);
    }

    let photos = repo.list_photos_for_verification(id).await?;
    println!("  Photos ({}):", photos.len());
    for photo in photos {
        println!(
            "    #{} {:<20} {} bytes, {}",
            photo.id,
            photo.parameter,
            photo.payload.len(),
            photo.created_at
        );
    }

    Ok(())
}

async fn print_stats(repo: &Repository) -> Result<()> {
    let stats = repo.statistics().await?;
    let usage = repo.storage_usage().await?;

    println!("Total verifications: {}", stats.total);
    println!("OK:                  {}", stats.ok);
    println!("With issues:         {}", stats.error);
    println!("Photos taken:        {}", stats.photos);
    println!("Storage:             {}", usage);

    Ok(())
}
