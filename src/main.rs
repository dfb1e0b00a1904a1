//! Server monitor binary: probe cataloged HTTP servers and report
//! per-server reachability plus aggregate statistics.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server_monitor::checker::{self, CheckSelection};
use server_monitor::config::{self, CheckerConfig, DEFAULT_WORKERS, MAX_WORKERS, MIN_WORKERS};
use server_monitor::{CheckStats, HttpProbe, Probe, Reporter};

const DEFAULT_CATALOG_PATH: &str = "data/servers.json";

#[derive(Parser)]
#[command(name = "server-monitor")]
#[command(about = "Check cataloged FTP, TV and other HTTP servers", version)]
struct Options {
    /// Catalog file with server lists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of check workers
    #[arg(short = 't', long, default_value_t = DEFAULT_WORKERS)]
    threads: usize,

    /// Check only FTP servers
    #[arg(short, long)]
    ftp: bool,

    /// Check only TV servers
    #[arg(short = 'v', long)]
    tv: bool,

    /// Check only other servers
    #[arg(short, long)]
    others: bool,

    /// Check all servers (default)
    #[arg(short, long)]
    all: bool,

    /// Show only successful checks
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(short, long)]
    no_color: bool,

    /// Show catalog composition without checking
    #[arg(short, long)]
    stats: bool,
}

impl Options {
    fn selection(&self) -> CheckSelection {
        if self.all || (!self.ftp && !self.tv && !self.others) {
            CheckSelection::all()
        } else {
            CheckSelection {
                ftp: self.ftp,
                tv: self.tv,
                others: self.others,
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !(MIN_WORKERS..=MAX_WORKERS).contains(&options.threads) {
        return Err(
            format!("worker count must be between {MIN_WORKERS} and {MAX_WORKERS}").into(),
        );
    }

    let catalog_path = options
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

    // First run against the default path: write a starter catalog and let
    // the user fill it in.
    if options.config.is_none() && !config::validate_file(&catalog_path) {
        config::write_sample(&catalog_path)?;
        tracing::warn!(
            path = %catalog_path.display(),
            "No catalog found; wrote a sample, edit it and rerun"
        );
        return Ok(());
    }

    let catalog = config::load_catalog(&catalog_path)?;

    let reporter = Reporter::new(!options.no_color, options.quiet);

    if options.stats {
        reporter.print_catalog(&catalog);
        return Ok(());
    }

    let probe: Arc<dyn Probe> = Arc::new(HttpProbe::new(&CheckerConfig::default())?);
    let stats = Arc::new(CheckStats::new());
    let report = reporter.clone().into_report_fn();

    checker::check_catalog(
        &catalog,
        probe,
        options.threads,
        options.selection(),
        &stats,
        &report,
    )
    .await?;

    reporter.print_summary(&stats.snapshot());
    Ok(())
}
