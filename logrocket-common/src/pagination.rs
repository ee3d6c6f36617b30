//! Cursor pagination over LogRocket list endpoints.
//!
//! List responses carry their page under a resource key (`sessions`, `users`, ...) or, on
//! older endpoints, under `data`. A page is followed by another while
//! `pagination.next_cursor` is set; the cursor is opaque and forwarded untouched.
use serde_json::Value;
use tracing::debug;

use crate::client::{HttpMethod, LogRocketClient};
use crate::error::ApiError;
use crate::JsonMap;

pub const DEFAULT_PAGE_SIZE: u64 = 100;

impl LogRocketClient {
    /// Request every page of a list endpoint and return the concatenated items in order.
    ///
    /// `query.limit` is set to `DEFAULT_PAGE_SIZE` unless the caller picked a page size.
    /// Fails with `ApiError::PaginationLimitExceeded` once more than `max_pages` pages
    /// would be needed.
    pub async fn fetch_all(
        &self,
        property: &str,
        method: HttpMethod,
        path: &str,
        body: &JsonMap,
        mut query: JsonMap,
    ) -> Result<Vec<Value>, ApiError> {
        if !has_page_size(&query) {
            query.insert("limit".to_owned(), Value::from(DEFAULT_PAGE_SIZE));
        }

        let mut items = Vec::new();
        let mut pages = 0;

        loop {
            if pages == self.max_pages.get() {
                return Err(ApiError::PaginationLimitExceeded { pages });
            }

            let response = self.execute(method, path, body, &query).await?;
            pages += 1;

            let page = page_items(&response, property);
            debug!(path, page = pages, items = page.len(), "fetched page");
            items.extend(page);

            match next_cursor(&response) {
                Some(cursor) => {
                    query.insert("cursor".to_owned(), Value::String(cursor));
                }
                None => break,
            }
        }

        Ok(items)
    }
}

fn has_page_size(query: &JsonMap) -> bool {
    match query.get("limit") {
        None | Some(Value::Null) => false,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

/// Items of one page: the array under `property`, else the array under `data`.
pub fn page_items(response: &Value, property: &str) -> Vec<Value> {
    response
        .get(property)
        .and_then(Value::as_array)
        .or_else(|| response.get("data").and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// The cursor for the following page, if there is one.
pub fn next_cursor(response: &Value) -> Option<String> {
    match response.pointer("/pagination/next_cursor")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
