//! Prospector binary entry point.

use clap::{Parser, Subcommand};
use prospector::cli::output::Styled;
use prospector::cli::scan_cmd::OutputFormat;
use prospector::cli::{doctor, scan_cmd};
use prospector::config::DEFAULT_MAX_PAGES;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prospector",
    version,
    about = "Accessibility lead scanner — discover, audit, grade"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a site's pages and grade the lead.
    Scan {
        /// Root URL of the site to audit (e.g. https://example.com).
        url: String,
        /// Maximum number of pages to scan.
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: usize,
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Write the report to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Skip the run journal entry.
        #[arg(long)]
        no_journal: bool,
    },
    /// Check that the browser and rule script are available.
    Doctor,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prospector=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            url,
            max_pages,
            format,
            output,
            no_journal,
        } => scan_cmd::run(&url, max_pages, format, output, no_journal).await,
        Commands::Doctor => doctor::run(),
    };

    if let Err(e) = result {
        eprintln!("  {} {e:#}", Styled::new().fail_sym());
        std::process::exit(1);
    }
}
