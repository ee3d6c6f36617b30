//! One handler module per resource.
//!
//! Handlers read every parameter they need before issuing a request, so invalid input
//! never reaches the API.
use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::response::{items_under, record_under};
use logrocket_common::simplify::{simplify_all, RecordShape};
use logrocket_common::JsonMap;
use serde_json::{json, Value};

use crate::error::NodeError;
use crate::params::Parameters;

pub mod alert;
pub mod error;
pub mod event;
pub mod funnel;
pub mod highlight;
pub mod issue;
pub mod metric;
pub mod project;
pub mod segment;
pub mod session;
pub mod team;
pub mod user;

/// Run a list request: every page when `returnAll` is set, otherwise one page of `limit`
/// items.
///
/// `keys` lists where the items may sit in a single page response. Its first entry is
/// also the property followed across pages.
pub(crate) async fn list(
    client: &LogRocketClient,
    params: &Parameters,
    path: &str,
    mut query: JsonMap,
    keys: &[&str],
) -> Result<Vec<Value>, NodeError> {
    let property = keys.first().copied().unwrap_or("data");

    if params.return_all()? {
        let items = client
            .fetch_all(property, HttpMethod::GET, path, &JsonMap::new(), query)
            .await?;
        return Ok(items);
    }

    query.insert("limit".to_owned(), Value::from(params.limit()?));
    let response = client
        .execute(HttpMethod::GET, path, &JsonMap::new(), &query)
        .await?;

    Ok(items_under(&response, keys))
}

/// Run a request and unwrap the record from the first matching envelope key.
pub(crate) async fn record(
    client: &LogRocketClient,
    method: HttpMethod,
    path: &str,
    body: &JsonMap,
    query: &JsonMap,
    keys: &[&str],
) -> Result<Value, NodeError> {
    let response = client.execute(method, path, body, query).await?;
    Ok(record_under(response, keys))
}

/// Run a request and return the items of the first matching list key.
pub(crate) async fn items(
    client: &LogRocketClient,
    path: &str,
    query: &JsonMap,
    keys: &[&str],
) -> Result<Vec<Value>, NodeError> {
    let response = client
        .execute(HttpMethod::GET, path, &JsonMap::new(), query)
        .await?;
    Ok(items_under(&response, keys))
}

/// Issue a DELETE and acknowledge it with `{"success": true, <id_key>: <id>}`.
pub(crate) async fn delete(
    client: &LogRocketClient,
    path: &str,
    id_key: &str,
    id: &str,
) -> Result<Value, NodeError> {
    client
        .execute(HttpMethod::DELETE, path, &JsonMap::new(), &JsonMap::new())
        .await?;

    let mut acknowledgement = JsonMap::new();
    acknowledgement.insert("success".to_owned(), json!(true));
    acknowledgement.insert(id_key.to_owned(), json!(id));
    Ok(Value::Object(acknowledgement))
}

pub(crate) fn simplify_records(
    client: &LogRocketClient,
    shape: RecordShape,
    records: Vec<Value>,
    simplify: bool,
) -> Vec<Value> {
    if simplify {
        simplify_all(shape, &records, client.app_id())
    } else {
        records
    }
}

pub(crate) fn simplify_record(
    client: &LogRocketClient,
    shape: RecordShape,
    record: Value,
    simplify: bool,
) -> Value {
    if simplify {
        logrocket_common::simplify::simplify(shape, &record, client.app_id())
    } else {
        record
    }
}

/// Percent-encode a free-form name used as a path segment.
pub(crate) fn path_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Keep only the listed fields of each entry; absent fields are left out.
pub(crate) fn project_entries(entries: &[Parameters], fields: &[&str]) -> Vec<Value> {
    entries
        .iter()
        .map(|entry| {
            let projected: JsonMap = fields
                .iter()
                .filter_map(|field| {
                    entry
                        .defined(field)
                        .map(|value| ((*field).to_owned(), value.clone()))
                })
                .collect();
            Value::Object(projected)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use httpmock::MockServer;
    use logrocket_common::client::LogRocketClient;
    use logrocket_common::credentials::Credentials;
    use serde_json::Value;

    use crate::params::Parameters;

    pub const APP_ID: &str = "org/app";

    pub fn client_for(server: &MockServer) -> LogRocketClient {
        LogRocketClient::builder(Credentials::new("secret-key", APP_ID))
            .api_base(&server.url("/v1/orgs"))
            .build()
            .expect("failed to build client")
    }

    /// A client pointing at a closed port, for checks that must fail before any request.
    pub fn unreachable_client() -> LogRocketClient {
        LogRocketClient::builder(Credentials::new("secret-key", APP_ID))
            .api_base("http://127.0.0.1:9/v1/orgs")
            .build()
            .expect("failed to build client")
    }

    pub fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => Parameters::from(map),
            _ => panic!("expected a JSON object"),
        }
    }

    pub fn path(endpoint: &str) -> String {
        format!("/v1/orgs/{}{}", APP_ID, endpoint)
    }
}
