use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::links::build_session_url;
use logrocket_common::simplify::RecordShape;
use logrocket_common::JsonMap;
use serde_json::{json, Value};

use super::{items, list, record, simplify_record, simplify_records};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::SessionOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: SessionOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        SessionOperation::GetAll => get_all(client, params).await.map(Output::Many),
        SessionOperation::Get => get(client, params).await.map(Output::One),
        SessionOperation::GetEvents => {
            detail_list(client, params, "events", &["events", "data"]).await.map(Output::Many)
        }
        SessionOperation::GetErrors => {
            detail_list(client, params, "errors", &["errors", "data"]).await.map(Output::Many)
        }
        SessionOperation::GetNetworkRequests => {
            detail_list(client, params, "network", &["requests", "network", "data"])
                .await
                .map(Output::Many)
        }
        SessionOperation::GetConsoleLogs => {
            detail_list(client, params, "console", &["logs", "console", "data"])
                .await
                .map(Output::Many)
        }
        SessionOperation::GetPerformance => get_performance(client, params).await.map(Output::One),
        SessionOperation::GetSessionUrl => get_session_url(client, params).map(Output::One),
    }
}

/// Query for listing sessions out of the `filters` collection.
pub fn session_query(filters: &Parameters) -> Result<JsonMap, NodeError> {
    let mut query = JsonMap::new();

    filters.copy_set("userId", "user_id", &mut query);
    filters.copy_set("email", "email", &mut query);
    filters.insert_date_range(&mut query)?;
    filters.copy_defined("hasError", "has_error", &mut query);
    filters.copy_set("minDuration", "min_duration", &mut query);
    filters.copy_set("url", "url", &mut query);
    filters.copy_set("browser", "browser", &mut query);
    filters.copy_set("os", "os", &mut query);
    filters.copy_set("device", "device", &mut query);
    filters.copy_set("limit", "limit", &mut query);

    Ok(query)
}

async fn get_all(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let query = session_query(&params.collection("filters")?)?;
    let simplify = params.simplify()?;

    let sessions = list(client, params, "/sessions", query, &["sessions", "data"]).await?;
    Ok(simplify_records(client, RecordShape::Session, sessions, simplify))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let session_id = params.required_string("sessionId")?;
    let simplify = params.simplify()?;

    let session = record(
        client,
        HttpMethod::GET,
        &format!("/sessions/{}", session_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["session"],
    )
    .await?;
    Ok(simplify_record(client, RecordShape::Session, session, simplify))
}

async fn detail_list(
    client: &LogRocketClient,
    params: &Parameters,
    endpoint: &str,
    keys: &[&str],
) -> Result<Vec<Value>, NodeError> {
    let session_id = params.required_string("sessionId")?;
    let path = format!("/sessions/{}/{}", session_id, endpoint);

    items(client, &path, &JsonMap::new(), keys).await
}

async fn get_performance(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let session_id = params.required_string("sessionId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/sessions/{}/performance", session_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["performance"],
    )
    .await
}

/// Build a replay link without calling the API. A zero timestamp means "from the start".
fn get_session_url(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let session_id = params.required_string("sessionId")?;
    let timestamp = params
        .number("timestamp")?
        .and_then(|timestamp| timestamp.as_i64())
        .filter(|timestamp| *timestamp != 0);

    let url = build_session_url(client.app_id(), &session_id, timestamp);

    Ok(json!({
        "sessionId": session_id,
        "url": url,
        "timestamp": timestamp,
    }))
}
