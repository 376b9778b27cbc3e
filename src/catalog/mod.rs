//! Catalog data structures and the client trait for the media server API.
//!
//! This module provides the records the cleanup workflow reads and writes
//! (items, users) and the `CatalogClient` trait that abstracts the remote
//! server, so the workflow can run against Jellyfin or a test double.

mod jellyfin;
mod jellyfin_types;

#[cfg(test)]
pub(crate) mod fake;

pub use jellyfin::JellyfinClient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Provider key under which the TVDB identifier is stored
pub const TVDB_PROVIDER: &str = "Tvdb";

/// Errors that can occur while talking to the catalog server.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The HTTP client could not be constructed
    #[error("Failed to set up HTTP client: {0}")]
    ClientSetup(String),

    /// Request to the catalog server failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The server answered with a non-success status code
    #[error("HTTP {status} {reason}: {body}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    /// Failed to parse the server's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// Kind of a catalog item, as understood by the items endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Series,
    Season,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Series => "Series",
            ItemKind::Season => "Season",
        }
    }
}

/// Optional fields the server should include in item listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    ProviderIds,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::ProviderIds => "ProviderIds",
        }
    }
}

/// Parameters for a catalog item listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    /// Traverse the whole library tree instead of a single folder
    pub recursive: bool,
    /// Restrict results to these item kinds
    pub include_item_types: Vec<ItemKind>,
    /// Extra fields to project into each result
    pub fields: Vec<ItemField>,
    /// Only return items that have (or lack) a TVDB identifier
    pub has_tvdb_id: Option<bool>,
    /// Ask the server to compute the total record count
    pub enable_total_record_count: bool,
    /// Ask the server to include image information
    pub enable_images: bool,
}

impl ItemQuery {
    /// Query for every series in the library that carries a TVDB id.
    ///
    /// Only provider ids are projected, and both total-count computation
    /// and image data are disabled to keep the response small.
    pub fn series_with_tvdb_id() -> Self {
        Self {
            recursive: true,
            include_item_types: vec![ItemKind::Series],
            fields: vec![ItemField::ProviderIds],
            has_tvdb_id: Some(true),
            enable_total_record_count: false,
            enable_images: false,
        }
    }

    /// Renders the query as URL parameters in the server's naming.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("recursive", self.recursive.to_string())];

        if !self.include_item_types.is_empty() {
            pairs.push((
                "includeItemTypes",
                self.include_item_types
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ));
        }

        if !self.fields.is_empty() {
            pairs.push((
                "fields",
                self.fields
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ));
        }

        if let Some(has_tvdb_id) = self.has_tvdb_id {
            pairs.push(("hasTvdbId", has_tvdb_id.to_string()));
        }

        pairs.push((
            "enableTotalRecordCount",
            self.enable_total_record_count.to_string(),
        ));
        pairs.push(("enableImages", self.enable_images.to_string()));

        pairs
    }
}

/// A catalog item (series or season) as returned by the server.
///
/// Only the fields the cleanup cares about are typed. Everything else the
/// server sends is kept in `extra` so that an update posts back the same
/// record that was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogItem {
    /// Server-assigned identifier
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Provider name to provider-specific identifier
    #[serde(default)]
    pub provider_ids: HashMap<String, Option<String>>,

    /// When true, the server skips automatic metadata refresh for this item
    #[serde(default)]
    pub lock_data: bool,

    /// Number of direct children (seasons for a series)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,

    /// Fields not modelled above, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    /// Returns the current TVDB identifier, if any
    pub fn tvdb_id(&self) -> Option<&str> {
        self.provider_ids
            .get(TVDB_PROVIDER)
            .and_then(|value| value.as_deref())
    }

    /// Returns the display name or an empty string
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Access policy attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPolicy {
    #[serde(default)]
    pub is_administrator: bool,
    #[serde(default)]
    pub is_disabled: bool,
}

/// A server user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub policy: Option<UserPolicy>,
}

impl User {
    pub fn is_administrator(&self) -> bool {
        self.policy
            .as_ref()
            .is_some_and(|policy| policy.is_administrator)
    }
}

/// Trait for clients of the catalog server API.
///
/// Every call is a single blocking request. Implementors must not retry;
/// retry policy (there is none) belongs to the caller.
pub trait CatalogClient {
    /// Lists all users whose account is not disabled, in server order.
    fn list_enabled_users(&self) -> Result<Vec<User>, CatalogError>;

    /// Lists catalog items matching the query, in server order.
    fn list_items(&self, query: &ItemQuery) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Fetches the full record of a single item in the context of a user.
    fn get_item(&self, item_id: &str, user_id: &str) -> Result<CatalogItem, CatalogError>;

    /// Persists a modified item record.
    fn update_item(&self, item: &CatalogItem) -> Result<(), CatalogError>;

    /// Lists the seasons of a series in the context of a user.
    fn list_seasons(
        &self,
        series_id: &str,
        user_id: &str,
    ) -> Result<Vec<CatalogItem>, CatalogError>;
}
