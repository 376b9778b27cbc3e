/// Jellyfin catalog client implementation.
use super::jellyfin_types::ItemsResult;
use super::{CatalogClient, CatalogError, CatalogItem, ItemQuery, User};
use crate::config::Config;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Catalog client for the Jellyfin REST API.
///
/// Every request carries the `MediaBrowser Token` authorization header of
/// the session configuration. Requests are blocking and never retried.
pub struct JellyfinClient {
    client: Client,
    base_url: String,
}

impl JellyfinClient {
    /// Creates a client for the server described by `config`.
    ///
    /// When `config.debug` is set, reqwest's connection-level verbose
    /// logging is enabled in addition to the request/response events this
    /// client emits at debug level.
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let mut auth = HeaderValue::from_str(&config.authorization_header())
            .map_err(|e| CatalogError::ClientSetup(format!("Invalid token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .connection_verbose(config.debug)
            .build()
            .map_err(|e| CatalogError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the raw response body.
    ///
    /// Non-success status codes are turned into `CatalogError::HttpStatus`
    /// carrying the body the server sent.
    fn send(&self, request: RequestBuilder) -> Result<String, CatalogError> {
        let request = request
            .build()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .client
            .execute(request)
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        debug!(status = status.as_u16(), body = %body, "received response");

        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        Ok(body)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CatalogError> {
        let body = self.send(request)?;
        serde_json::from_str(&body).map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}

impl CatalogClient for JellyfinClient {
    fn list_enabled_users(&self) -> Result<Vec<User>, CatalogError> {
        let request = self
            .client
            .get(self.url("/Users"))
            .query(&[("isDisabled", "false")]);

        self.send_json(request)
    }

    fn list_items(&self, query: &ItemQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        let request = self
            .client
            .get(self.url("/Items"))
            .query(&query.to_query_pairs());

        let result: ItemsResult = self.send_json(request)?;
        debug!(
            returned = result.items.len(),
            total = result.total_record_count,
            "listed items"
        );

        Ok(result.items)
    }

    fn get_item(&self, item_id: &str, user_id: &str) -> Result<CatalogItem, CatalogError> {
        let request = self
            .client
            .get(self.url(&format!("/Items/{}", item_id)))
            .query(&[("userId", user_id)]);

        self.send_json(request)
    }

    fn update_item(&self, item: &CatalogItem) -> Result<(), CatalogError> {
        let request = self
            .client
            .post(self.url(&format!("/Items/{}", item.id)))
            .json(item);

        // Jellyfin answers 204 No Content
        self.send(request).map(|_| ())
    }

    fn list_seasons(
        &self,
        series_id: &str,
        user_id: &str,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let request = self
            .client
            .get(self.url(&format!("/Shows/{}/Seasons", series_id)))
            .query(&[("userId", user_id)]);

        let result: ItemsResult = self.send_json(request)?;
        Ok(result.items)
    }
}
