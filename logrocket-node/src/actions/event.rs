use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::simplify::RecordShape;
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{items, list, path_segment, record, simplify_record, simplify_records};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::EventOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: EventOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        EventOperation::GetAll => get_all(client, params).await.map(Output::Many),
        EventOperation::Get => get(client, params).await.map(Output::One),
        EventOperation::GetSessions => get_sessions(client, params).await.map(Output::Many),
        EventOperation::GetMetrics => get_metrics(client, params).await.map(Output::Many),
    }
}

/// `/events/{name}` with the event name percent-encoded.
fn event_path(params: &Parameters, suffix: &str) -> Result<String, NodeError> {
    let event_name = params.required_string("eventName")?;
    Ok(format!("/events/{}{}", path_segment(&event_name), suffix))
}

async fn get_all(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let filters = params.collection("filters")?;
    let simplify = params.simplify()?;

    let mut query = JsonMap::new();
    filters.copy_set("eventName", "name", &mut query);
    filters.copy_set("eventType", "type", &mut query);
    filters.copy_set("userId", "user_id", &mut query);
    filters.insert_date_range(&mut query)?;

    let events = list(client, params, "/events", query, &["events", "data"]).await?;
    Ok(simplify_records(client, RecordShape::Event, events, simplify))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let path = event_path(params, "")?;
    let simplify = params.simplify()?;

    let event = record(
        client,
        HttpMethod::GET,
        &path,
        &JsonMap::new(),
        &JsonMap::new(),
        &["event"],
    )
    .await?;
    Ok(simplify_record(client, RecordShape::Event, event, simplify))
}

async fn get_sessions(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let path = event_path(params, "/sessions")?;

    let mut query = JsonMap::new();
    params.collection("options")?.insert_date_range(&mut query)?;

    list(client, params, &path, query, &["sessions", "data"]).await
}

async fn get_metrics(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let path = event_path(params, "/metrics")?;
    let options = params.collection("metricOptions")?;

    let mut query = JsonMap::new();
    options.insert_date_range(&mut query)?;
    options.copy_set("interval", "interval", &mut query);
    options.copy_set("groupBy", "group_by", &mut query);

    items(client, &path, &query, &["metrics", "data"]).await
}
