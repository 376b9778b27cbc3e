/// Jellyfin API response types for deserialization.
///
/// These structures mirror the envelope format of Jellyfin list endpoints.
use super::CatalogItem;
use serde::Deserialize;

/// Envelope returned by `/Items` and `/Shows/{id}/Seasons`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ItemsResult {
    /// The items of this page
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    /// Total number of matches (0 when the count is disabled)
    #[serde(default)]
    pub total_record_count: u64,
}
