//! Remediation of series with a bad TVDB identifier
//!
//! A flagged series has its TVDB id cleared and its metadata locked. When
//! season locking is enabled and the series has exactly one child, every
//! season is locked as well. Failures here only ever affect the item they
//! happened on.

use crate::CleanupOptions;
use crate::catalog::{CatalogClient, CatalogError, TVDB_PROVIDER};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Remote operation that failed during remediation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchItem,
    UpdateItem,
    ListSeasons,
    FetchSeason,
    UpdateSeason,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::FetchItem => "fetch item",
            Operation::UpdateItem => "update item",
            Operation::ListSeasons => "list seasons",
            Operation::FetchSeason => "fetch season",
            Operation::UpdateSeason => "update season",
        };
        f.write_str(name)
    }
}

/// A recoverable failure, isolated to one series or season
#[derive(Debug, Clone, Error)]
#[error("Failed to {operation} {item_id}: {source}")]
pub struct RemediationError {
    /// The operation that failed
    pub operation: Operation,
    /// The item the operation was applied to
    pub item_id: String,
    /// The underlying catalog error
    pub source: CatalogError,
}

impl RemediationError {
    fn new(operation: Operation, item_id: &str, source: CatalogError) -> Self {
        Self {
            operation,
            item_id: item_id.to_string(),
            source,
        }
    }
}

/// Result of remediating one series whose own update succeeded
#[derive(Debug, Clone, Default)]
pub struct SeriesOutcome {
    /// Number of seasons that were locked
    pub seasons_locked: usize,
    /// Season-level failures; they did not stop the other seasons
    pub season_failures: Vec<RemediationError>,
}

/// Clears the TVDB id of a series, locks it and, if enabled, its seasons
///
/// # Arguments
///
/// * `client` - The catalog client
/// * `series_id` - Id of the series to remediate
/// * `user_id` - Administrator used as user context for item calls
/// * `options` - Cleanup options (season locking)
///
/// # Errors
///
/// Returns an error if the series could not be fetched or updated. In
/// that case no season is touched.
pub(crate) fn remediate_series<C>(
    client: &C,
    series_id: &str,
    user_id: &str,
    options: &CleanupOptions,
) -> Result<SeriesOutcome, RemediationError>
where
    C: CatalogClient + ?Sized,
{
    let mut series = client
        .get_item(series_id, user_id)
        .map_err(|e| RemediationError::new(Operation::FetchItem, series_id, e))?;

    series
        .provider_ids
        .insert(TVDB_PROVIDER.to_string(), Some(String::new()));
    series.lock_data = true;

    client
        .update_item(&series)
        .map_err(|e| RemediationError::new(Operation::UpdateItem, series_id, e))?;

    debug!(series_id, child_count = ?series.child_count, "series locked");

    let mut outcome = SeriesOutcome::default();

    // Only single-child series get their seasons locked
    if options.lock_seasons && series.child_count == Some(1) {
        lock_seasons(client, series_id, user_id, &mut outcome);
    }

    Ok(outcome)
}

/// Locks every season of a series, recording failures per season
fn lock_seasons<C>(client: &C, series_id: &str, user_id: &str, outcome: &mut SeriesOutcome)
where
    C: CatalogClient + ?Sized,
{
    let seasons = match client.list_seasons(series_id, user_id) {
        Ok(seasons) => seasons,
        Err(e) => {
            outcome
                .season_failures
                .push(RemediationError::new(Operation::ListSeasons, series_id, e));
            return;
        }
    };

    for summary in seasons {
        let mut season = match client.get_item(&summary.id, user_id) {
            Ok(season) => season,
            Err(e) => {
                outcome
                    .season_failures
                    .push(RemediationError::new(Operation::FetchSeason, &summary.id, e));
                continue;
            }
        };

        season.lock_data = true;

        match client.update_item(&season) {
            Ok(()) => {
                debug!(series_id, season_id = %season.id, "season locked");
                outcome.seasons_locked += 1;
            }
            Err(e) => outcome
                .season_failures
                .push(RemediationError::new(Operation::UpdateSeason, &season.id, e)),
        }
    }
}
