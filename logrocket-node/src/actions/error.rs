use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::simplify::RecordShape;
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{items, list, record, simplify_record, simplify_records};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::ErrorOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: ErrorOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        ErrorOperation::GetAll => get_all(client, params).await.map(Output::Many),
        ErrorOperation::Get => get(client, params).await.map(Output::One),
        ErrorOperation::GetSessions => get_sessions(client, params).await.map(Output::Many),
        ErrorOperation::GetStackTrace => get_stack_trace(client, params).await.map(Output::One),
        ErrorOperation::GetOccurrences => get_occurrences(client, params).await.map(Output::Many),
    }
}

async fn get_all(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let filters = params.collection("filters")?;
    let simplify = params.simplify()?;

    let mut query = JsonMap::new();
    filters.copy_set("errorMessage", "message", &mut query);
    filters.copy_set("errorType", "type", &mut query);
    filters.copy_set("url", "url", &mut query);
    filters.copy_set("browser", "browser", &mut query);
    filters.copy_defined("resolved", "resolved", &mut query);
    filters.insert_date_range(&mut query)?;

    let errors = list(client, params, "/errors", query, &["errors", "data"]).await?;
    Ok(simplify_records(client, RecordShape::Error, errors, simplify))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let error_id = params.required_string("errorId")?;
    let simplify = params.simplify()?;

    let error = record(
        client,
        HttpMethod::GET,
        &format!("/errors/{}", error_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["error"],
    )
    .await?;
    Ok(simplify_record(client, RecordShape::Error, error, simplify))
}

async fn get_sessions(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let error_id = params.required_string("errorId")?;
    let path = format!("/errors/{}/sessions", error_id);

    list(client, params, &path, JsonMap::new(), &["sessions", "data"]).await
}

async fn get_stack_trace(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let error_id = params.required_string("errorId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/errors/{}/stacktrace", error_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["stacktrace"],
    )
    .await
}

async fn get_occurrences(
    client: &LogRocketClient,
    params: &Parameters,
) -> Result<Vec<Value>, NodeError> {
    let error_id = params.required_string("errorId")?;
    let options = params.collection("options")?;

    let mut query = JsonMap::new();
    options.insert_date_range(&mut query)?;
    options.copy_set("interval", "interval", &mut query);

    let path = format!("/errors/{}/occurrences", error_id);
    items(client, &path, &query, &["occurrences", "data"]).await
}
