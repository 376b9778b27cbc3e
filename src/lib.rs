//! tvdb_janitor - Repair series whose TVDB id was filled with an IMDb id
//!
//! This library scans a Jellyfin catalog for series whose TVDB provider id
//! starts with `tt`, clears that id and locks the series (and, for
//! single-child series, their seasons) against automatic metadata refresh.

mod admin;
mod catalog;
mod config;
mod remediation;
mod scanner;

use admin::resolve_admin_user;
use remediation::remediate_series;
use scanner::scan_series_with_tvdb_id;
use tracing::debug;

// Re-export catalog types
pub use catalog::{
    CatalogClient, CatalogError, CatalogItem, ItemField, ItemKind, ItemQuery, JellyfinClient,
    TVDB_PROVIDER, User, UserPolicy,
};

// Re-export configuration and remediation types
pub use config::{Config, ConfigError, DEFAULT_SERVER_URL, TOKEN_VAR, URL_VAR};
pub use remediation::{Operation, RemediationError, SeriesOutcome};
pub use scanner::{BAD_TVDB_PREFIX, is_bad_tvdb_id};

use thiserror::Error;

/// Options controlling the cleanup run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Also lock the seasons of series that have exactly one child
    pub lock_seasons: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self { lock_seasons: true }
    }
}

/// Progress event emitted during a cleanup run
///
/// These events allow library users to report progress, print flagged
/// series and log recoverable failures.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The administrator used as user context was found
    AdminResolved { user_id: String },

    /// The catalog scan returned
    ScanComplete { count: usize },

    /// A scanned series has a valid TVDB id and is left alone
    SeriesSkipped { item_id: String, tvdb_id: String },

    /// A scanned series has a bad TVDB id and is about to be remediated
    SeriesFlagged {
        item_id: String,
        name: String,
        tvdb_id: String,
    },

    /// A series was cleared and locked
    SeriesRemediated {
        item_id: String,
        seasons_locked: usize,
    },

    /// A recoverable step failed; the run continues
    StepFailed { error: RemediationError },

    /// Cleanup finished
    Complete {
        flagged: usize,
        remediated: usize,
        failures: usize,
    },
}

/// Summary of a finished cleanup run
#[derive(Debug, Clone, Default)]
pub struct CleanupSummary {
    /// Series returned by the scan
    pub scanned: usize,
    /// Series with a bad TVDB id
    pub flagged: usize,
    /// Series whose own update succeeded
    pub remediated: usize,
    /// Seasons locked across all series
    pub seasons_locked: usize,
    /// Every recoverable failure, in the order it happened
    pub failures: Vec<RemediationError>,
}

/// Top-level error type for fatal cleanup failures
#[derive(Debug, Error)]
pub enum JanitorError {
    /// Listing users failed
    #[error("Failed to list users: {0}")]
    ListUsers(#[source] CatalogError),

    /// No enabled administrator exists
    #[error("No administrator found")]
    NoAdministrator,

    /// Listing catalog items failed
    #[error("Failed to list items: {0}")]
    ScanItems(#[source] CatalogError),

    /// Configuration could not be built
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog client could not be built
    #[error("Failed to create catalog client: {0}")]
    Client(#[source] CatalogError),
}

/// Clears bad TVDB ids across the whole catalog
///
/// Resolves an administrator, scans every series with a TVDB id and
/// remediates those whose id starts with `tt`, strictly one after another
/// in the order the server returned them.
///
/// Failures to fetch or update a single series or season are reported
/// through `ProgressEvent::StepFailed`, collected in the summary and do not
/// stop the run. Failures to list users or items, or a missing
/// administrator, abort the run before any item is touched.
///
/// # Examples
///
/// ```no_run
/// use tvdb_janitor::{CleanupOptions, Config, JellyfinClient, ProgressEvent, clean_catalog};
///
/// let config = Config::from_env(false)?;
/// let client = JellyfinClient::new(&config)?;
///
/// let summary = clean_catalog(&client, &CleanupOptions::default(), |event| {
///     if let ProgressEvent::SeriesFlagged { name, tvdb_id, .. } = event {
///         println!("{} {}", name, tvdb_id);
///     }
/// })?;
/// println!("Remediated {} series", summary.remediated);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn clean_catalog<C, F>(
    client: &C,
    options: &CleanupOptions,
    mut progress_callback: F,
) -> Result<CleanupSummary, JanitorError>
where
    C: CatalogClient + ?Sized,
    F: FnMut(ProgressEvent),
{
    let admin_id = resolve_admin_user(client)?;
    progress_callback(ProgressEvent::AdminResolved {
        user_id: admin_id.clone(),
    });

    let series = scan_series_with_tvdb_id(client)?;
    progress_callback(ProgressEvent::ScanComplete {
        count: series.len(),
    });

    let mut summary = CleanupSummary {
        scanned: series.len(),
        ..CleanupSummary::default()
    };

    for item in &series {
        let tvdb_id = item.tvdb_id().unwrap_or_default();

        if !is_bad_tvdb_id(tvdb_id) {
            progress_callback(ProgressEvent::SeriesSkipped {
                item_id: item.id.clone(),
                tvdb_id: tvdb_id.to_string(),
            });
            continue;
        }

        summary.flagged += 1;
        progress_callback(ProgressEvent::SeriesFlagged {
            item_id: item.id.clone(),
            name: item.display_name().to_string(),
            tvdb_id: tvdb_id.to_string(),
        });

        match remediate_series(client, &item.id, &admin_id, options) {
            Ok(outcome) => {
                summary.remediated += 1;
                summary.seasons_locked += outcome.seasons_locked;
                progress_callback(ProgressEvent::SeriesRemediated {
                    item_id: item.id.clone(),
                    seasons_locked: outcome.seasons_locked,
                });

                for error in outcome.season_failures {
                    progress_callback(ProgressEvent::StepFailed {
                        error: error.clone(),
                    });
                    summary.failures.push(error);
                }
            }
            Err(error) => {
                progress_callback(ProgressEvent::StepFailed {
                    error: error.clone(),
                });
                summary.failures.push(error);
            }
        }
    }

    debug!(?summary, "cleanup finished");
    progress_callback(ProgressEvent::Complete {
        flagged: summary.flagged,
        remediated: summary.remediated,
        failures: summary.failures.len(),
    });

    Ok(summary)
}
