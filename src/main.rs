use clap::Parser;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tvdb_janitor::{
    CleanupOptions, CleanupSummary, Config, JanitorError, JellyfinClient, ProgressEvent,
    clean_catalog,
};

/// Clear TVDB ids that hold an IMDb id and lock the affected series.
///
/// The server is read from JELLYCTL_URL (default http://127.0.0.1:8096),
/// the access token from JELLYCTL_TOKEN.
#[derive(Parser, Debug)]
#[command(name = "tvdb_janitor", version, about, long_about)]
struct Cli {
    /// Log every request and response
    #[arg(long)]
    debug: bool,

    /// Do not lock the seasons of single-season series
    #[arg(long)]
    no_season_lock: bool,
}

/// Sets up stderr logging; `--debug` raises this crate and reqwest to trace
fn init_logging(debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if debug {
        for directive in ["tvdb_janitor=trace", "reqwest=trace"] {
            if let Ok(directive) = directive.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Handles progress events: flagged series go to stdout, the rest to the log
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::AdminResolved { user_id } => {
            debug!(%user_id, "using administrator as user context");
        }
        ProgressEvent::ScanComplete { count } => {
            info!("Found {} series with a TVDB id", count);
        }
        ProgressEvent::SeriesSkipped { item_id, tvdb_id } => {
            debug!(%item_id, %tvdb_id, "TVDB id looks fine, skipping");
        }
        ProgressEvent::SeriesFlagged { name, tvdb_id, .. } => {
            println!("{} {}", name, tvdb_id);
        }
        ProgressEvent::SeriesRemediated {
            item_id,
            seasons_locked,
        } => {
            debug!(%item_id, seasons_locked, "series cleared and locked");
        }
        ProgressEvent::StepFailed { error } => {
            warn!(operation = %error.operation, item_id = %error.item_id, "{}", error);
        }
        ProgressEvent::Complete {
            flagged,
            remediated,
            failures,
        } => {
            info!(
                "Cleanup complete: {} flagged, {} remediated, {} failed step(s)",
                flagged, remediated, failures
            );
        }
    }
}

fn run(cli: &Cli) -> Result<CleanupSummary, JanitorError> {
    let config = Config::from_env(cli.debug)?;
    debug!(server = %config.server_url, "configuration loaded");

    let client = JellyfinClient::new(&config).map_err(JanitorError::Client)?;

    let options = CleanupOptions {
        lock_seasons: !cli.no_season_lock,
    };

    clean_catalog(&client, &options, handle_progress_event)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Per-item failures were already logged; only fatal errors change the exit code
    if let Err(e) = run(&cli) {
        error!("{}", e);
        process::exit(1);
    }
}
