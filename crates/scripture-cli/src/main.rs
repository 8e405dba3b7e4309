use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scripture_acquire::{FetchConfig, HttpTransport};
use scripture_model::{Book, Reference, StoredPayload};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scripture")]
#[command(about = "Fetch Bible chapters and verses as cleaned JSON files")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Root of the bible-api mirror (without translation)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Translation identifier, e.g. "en-lsv" or "en-kjv"
    #[arg(long, global = true)]
    translation: Option<String>,

    /// Directory that per-book output directories are written under
    #[arg(long, global = true)]
    output_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one chapter, or one verse, and store it as JSON
    Fetch {
        /// Book slug or name (e.g., "genesis", "1 Samuel")
        book: Book,

        /// Chapter number
        chapter: u32,

        /// Verse number; omit to fetch the whole chapter
        #[arg(short, long)]
        verse: Option<u32>,
    },

    /// Fetch every chapter of a book, one request at a time
    FetchBook {
        /// Book slug or name
        book: Book,
    },

    /// List the books with their slugs and chapter counts
    Books,

    /// Print a stored chapter or verse (e.g., "Genesis 1" or "John 3:16")
    Show {
        reference: Reference,
    },

    /// Validate every stored file for a book
    Validate {
        /// Book slug or name
        book: Book,
    },
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(translation) = &self.translation {
            config.translation = translation.clone();
        }
        if let Some(root) = &self.output_root {
            config.output_root = root.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, keeping the HTTP stack quiet at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,hyper_util=info,reqwest=info,rustls=info",
        LogLevel::Trace => "trace,hyper_util=info,rustls=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let config = cli.fetch_config();

    match cli.command {
        Commands::Fetch { book, chapter, verse } => {
            let reference = Reference { book, chapter, verse };
            tracing::info!(reference = %reference, translation = %config.translation, "Fetching");
            let transport = HttpTransport::new(&config.user_agent)?;
            let stored = scripture_acquire::fetch_and_store(&transport, &config, reference)
                .await
                .with_context(|| format!("Failed to fetch {reference}"))?;
            tracing::info!(path = %stored.path.display(), "Done");
        }
        Commands::FetchBook { book } => {
            tracing::info!(book = %book, chapters = book.chapter_count(), "Fetching book");
            let transport = HttpTransport::new(&config.user_agent)?;
            let summary = scripture_acquire::fetch_book(&transport, &config, book).await;
            if !summary.is_complete() {
                for (reference, e) in &summary.failed {
                    tracing::error!(reference = %reference, "{e}");
                }
                anyhow::bail!(
                    "{} of {} chapters of {book} failed",
                    summary.failed.len(),
                    book.chapter_count()
                );
            }
        }
        Commands::Books => {
            for book in Book::iter() {
                println!("{:<16} {:<18} {:>3}", book.slug(), book.name(), book.chapter_count());
            }
        }
        Commands::Show { reference } => {
            let value = scripture_acquire::load_stored(&config, reference)
                .with_context(|| format!("{reference} has not been fetched"))?;
            let payload = StoredPayload::from_value(value)?;
            if let StoredPayload::Other(value) = &payload {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            for verse in payload.verses() {
                let number = verse.verse.map(|n| n.to_string()).unwrap_or_default();
                println!("{number:>3} {}", verse.text.as_deref().unwrap_or(""));
            }
        }
        Commands::Validate { book } => {
            tracing::info!(book = %book, root = %config.output_root.display(), "Validating");
            let results = scripture_validate::validate_book_dir(&config.output_root, book)?;
            let bad: usize = results.iter().filter(|(_, errors)| !errors.is_empty()).count();
            for (path, errors) in &results {
                for e in errors {
                    tracing::error!(path = %path.display(), "{e}");
                }
            }
            if bad > 0 {
                anyhow::bail!("{bad} of {} files have validation errors", results.len());
            }
            tracing::info!(files = results.len(), "All stored files are valid");
        }
    }

    Ok(())
}
