//! Catalog scanner
//!
//! Lists the series that carry a TVDB identifier and decides which of
//! those identifiers are bad.

use crate::JanitorError;
use crate::catalog::{CatalogClient, CatalogItem, ItemQuery};

/// Prefix of IMDb identifiers, which must never appear in a TVDB field
pub const BAD_TVDB_PREFIX: &str = "tt";

/// Lists every series with a TVDB id, exactly as the server returns them
pub(crate) fn scan_series_with_tvdb_id<C>(client: &C) -> Result<Vec<CatalogItem>, JanitorError>
where
    C: CatalogClient + ?Sized,
{
    client
        .list_items(&ItemQuery::series_with_tvdb_id())
        .map_err(JanitorError::ScanItems)
}

/// Returns true if a TVDB value was actually filled with an IMDb id
pub fn is_bad_tvdb_id(value: &str) -> bool {
    value.starts_with(BAD_TVDB_PREFIX)
}
