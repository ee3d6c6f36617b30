use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{delete, list, project_entries, record};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::AlertOperation;
use crate::params::Parameters;

const CHANNEL_FIELDS: &[&str] = &["type", "target"];

pub async fn run(
    client: &LogRocketClient,
    operation: AlertOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        AlertOperation::GetAll => list(client, params, "/alerts", JsonMap::new(), &["alerts", "data"])
            .await
            .map(Output::Many),
        AlertOperation::Get => get(client, params).await.map(Output::One),
        AlertOperation::Create => create(client, params).await.map(Output::One),
        AlertOperation::Update => update(client, params).await.map(Output::One),
        AlertOperation::Delete => {
            let alert_id = params.required_string("alertId")?;
            delete(client, &format!("/alerts/{}", alert_id), "alertId", &alert_id)
                .await
                .map(Output::One)
        }
        AlertOperation::Enable => toggle(client, params, "enable").await.map(Output::One),
        AlertOperation::Disable => toggle(client, params, "disable").await.map(Output::One),
    }
}

fn channels(params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let entries = params
        .fixed_collection("channels", "channelValues")?
        .unwrap_or_default();
    Ok(project_entries(&entries, CHANNEL_FIELDS))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let alert_id = params.required_string("alertId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/alerts/{}", alert_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["alert"],
    )
    .await
}

async fn create(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let name = params.required_string("name")?;
    let alert_type = params.string_or("type", "error_spike")?;
    let threshold = params.number("threshold")?.unwrap_or_else(|| Value::from(0));
    let comparison = params.string_or("comparison", "greater_than")?;
    let window = params.string_or("window", "1h")?;

    let mut body = JsonMap::new();
    body.insert("name".to_owned(), Value::String(name));
    body.insert("type".to_owned(), Value::String(alert_type));
    body.insert("threshold".to_owned(), threshold);
    body.insert("comparison".to_owned(), Value::String(comparison));
    body.insert("window".to_owned(), Value::String(window));
    body.insert("channels".to_owned(), Value::Array(channels(params)?));
    params
        .collection("additionalFields")?
        .copy_defined("enabled", "enabled", &mut body);

    record(
        client,
        HttpMethod::POST,
        "/alerts",
        &body,
        &JsonMap::new(),
        &["alert"],
    )
    .await
}

async fn update(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let alert_id = params.required_string("alertId")?;
    let update_fields = params.collection("updateFields")?;

    let mut body = JsonMap::new();
    update_fields.copy_set("name", "name", &mut body);
    update_fields.copy_defined("threshold", "threshold", &mut body);
    update_fields.copy_set("comparison", "comparison", &mut body);
    update_fields.copy_set("window", "window", &mut body);
    update_fields.copy_defined("enabled", "enabled", &mut body);
    if update_fields.set("channels").is_some() {
        body.insert("channels".to_owned(), Value::Array(channels(&update_fields)?));
    }

    record(
        client,
        HttpMethod::PATCH,
        &format!("/alerts/{}", alert_id),
        &body,
        &JsonMap::new(),
        &["alert"],
    )
    .await
}

/// `enable` or `disable` an alert.
async fn toggle(client: &LogRocketClient, params: &Parameters, action: &str) -> Result<Value, NodeError> {
    let alert_id = params.required_string("alertId")?;

    record(
        client,
        HttpMethod::POST,
        &format!("/alerts/{}/{}", alert_id, action),
        &JsonMap::new(),
        &JsonMap::new(),
        &["alert"],
    )
    .await
}
