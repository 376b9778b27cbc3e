//! In-memory catalog used by the workflow tests.
//!
//! Holds canned users and items, applies updates to its own item map and
//! records every call so tests can assert on what reached the server.

use super::{
    CatalogClient, CatalogError, CatalogItem, ItemQuery, TVDB_PROVIDER, User, UserPolicy,
};
use serde_json::Map;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// A call received by the fake catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListUsers,
    ListItems,
    GetItem(String),
    UpdateItem(String),
    ListSeasons(String),
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    users: Vec<User>,
    scan: Vec<String>,
    items: RefCell<HashMap<String, CatalogItem>>,
    seasons: HashMap<String, Vec<String>>,
    fail_users: bool,
    fail_scan: bool,
    fail_get: HashSet<String>,
    fail_update: HashSet<String>,
    fail_seasons: HashSet<String>,
    calls: RefCell<Vec<Call>>,
    user_contexts: RefCell<Vec<String>>,
}

pub(crate) fn user(id: &str, is_administrator: bool) -> User {
    User {
        id: id.to_string(),
        name: None,
        policy: Some(UserPolicy {
            is_administrator,
            is_disabled: false,
        }),
    }
}

pub(crate) fn item(
    id: &str,
    name: &str,
    tvdb: Option<&str>,
    child_count: Option<u32>,
) -> CatalogItem {
    let mut provider_ids = HashMap::new();
    if let Some(tvdb) = tvdb {
        provider_ids.insert(TVDB_PROVIDER.to_string(), Some(tvdb.to_string()));
    }

    CatalogItem {
        id: id.to_string(),
        name: Some(name.to_string()),
        provider_ids,
        lock_data: false,
        child_count,
        extra: Map::new(),
    }
}

fn injected(operation: &str, id: &str) -> CatalogError {
    CatalogError::RequestError(format!("injected {} failure for {}", operation, id))
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Adds a series that the scan returns, in insertion order
    pub fn with_series(mut self, series: CatalogItem) -> Self {
        self.scan.push(series.id.clone());
        self.items.get_mut().insert(series.id.clone(), series);
        self
    }

    pub fn with_season(mut self, series_id: &str, season: CatalogItem) -> Self {
        self.seasons
            .entry(series_id.to_string())
            .or_default()
            .push(season.id.clone());
        self.items.get_mut().insert(season.id.clone(), season);
        self
    }

    pub fn failing_users(mut self) -> Self {
        self.fail_users = true;
        self
    }

    pub fn failing_scan(mut self) -> Self {
        self.fail_scan = true;
        self
    }

    pub fn failing_get(mut self, id: &str) -> Self {
        self.fail_get.insert(id.to_string());
        self
    }

    pub fn failing_update(mut self, id: &str) -> Self {
        self.fail_update.insert(id.to_string());
        self
    }

    pub fn failing_seasons(mut self, series_id: &str) -> Self {
        self.fail_seasons.insert(series_id.to_string());
        self
    }

    /// Current server-side state of an item
    pub fn stored(&self, id: &str) -> CatalogItem {
        self.items.borrow()[id].clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Ids of all items that received an update
    pub fn updated(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::UpdateItem(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Ids of all items that were fetched individually
    pub fn fetched(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::GetItem(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// User ids passed to user-scoped calls
    pub fn user_contexts(&self) -> Vec<String> {
        self.user_contexts.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl CatalogClient for FakeCatalog {
    fn list_enabled_users(&self) -> Result<Vec<User>, CatalogError> {
        self.record(Call::ListUsers);
        if self.fail_users {
            return Err(injected("list users", "-"));
        }
        Ok(self.users.clone())
    }

    fn list_items(&self, query: &ItemQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(Call::ListItems);
        assert_eq!(query, &ItemQuery::series_with_tvdb_id());
        if self.fail_scan {
            return Err(injected("list items", "-"));
        }

        let items = self.items.borrow();
        Ok(self.scan.iter().map(|id| items[id].clone()).collect())
    }

    fn get_item(&self, item_id: &str, user_id: &str) -> Result<CatalogItem, CatalogError> {
        self.record(Call::GetItem(item_id.to_string()));
        self.user_contexts.borrow_mut().push(user_id.to_string());
        if self.fail_get.contains(item_id) {
            return Err(injected("get item", item_id));
        }

        self.items
            .borrow()
            .get(item_id)
            .cloned()
            .ok_or_else(|| CatalogError::HttpStatus {
                status: 404,
                reason: "Not Found".to_string(),
                body: String::new(),
            })
    }

    fn update_item(&self, item: &CatalogItem) -> Result<(), CatalogError> {
        self.record(Call::UpdateItem(item.id.clone()));
        if self.fail_update.contains(&item.id) {
            return Err(injected("update item", &item.id));
        }

        self.items
            .borrow_mut()
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn list_seasons(
        &self,
        series_id: &str,
        user_id: &str,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(Call::ListSeasons(series_id.to_string()));
        self.user_contexts.borrow_mut().push(user_id.to_string());
        if self.fail_seasons.contains(series_id) {
            return Err(injected("list seasons", series_id));
        }

        let items = self.items.borrow();
        Ok(self
            .seasons
            .get(series_id)
            .map(|ids| ids.iter().map(|id| items[id].clone()).collect())
            .unwrap_or_default())
    }
}
