use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{delete, list, project_entries, record};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::FunnelOperation;
use crate::params::Parameters;

const STEP_FIELDS: &[&str] = &["name", "type", "value"];

pub async fn run(
    client: &LogRocketClient,
    operation: FunnelOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        FunnelOperation::GetAll => list(client, params, "/funnels", JsonMap::new(), &["funnels", "data"])
            .await
            .map(Output::Many),
        FunnelOperation::Get => get(client, params).await.map(Output::One),
        FunnelOperation::Create => create(client, params).await.map(Output::One),
        FunnelOperation::Update => update(client, params).await.map(Output::One),
        FunnelOperation::Delete => {
            let funnel_id = params.required_string("funnelId")?;
            delete(client, &format!("/funnels/{}", funnel_id), "funnelId", &funnel_id)
                .await
                .map(Output::One)
        }
        FunnelOperation::GetResults => get_results(client, params).await.map(Output::One),
    }
}

/// Steps as sent to the API; an absent steps parameter yields no steps.
fn steps(params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let entries = params.fixed_collection("steps", "stepValues")?.unwrap_or_default();
    Ok(project_entries(&entries, STEP_FIELDS))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let funnel_id = params.required_string("funnelId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/funnels/{}", funnel_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["funnel"],
    )
    .await
}

async fn create(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let name = params.required_string("name")?;

    let mut body = JsonMap::new();
    body.insert("name".to_owned(), Value::String(name));
    body.insert("steps".to_owned(), Value::Array(steps(params)?));

    record(
        client,
        HttpMethod::POST,
        "/funnels",
        &body,
        &JsonMap::new(),
        &["funnel"],
    )
    .await
}

async fn update(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let funnel_id = params.required_string("funnelId")?;
    let update_fields = params.collection("updateFields")?;

    let mut body = JsonMap::new();
    update_fields.copy_set("name", "name", &mut body);
    if update_fields.set("steps").is_some() {
        body.insert("steps".to_owned(), Value::Array(steps(&update_fields)?));
    }

    record(
        client,
        HttpMethod::PATCH,
        &format!("/funnels/{}", funnel_id),
        &body,
        &JsonMap::new(),
        &["funnel"],
    )
    .await
}

async fn get_results(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let funnel_id = params.required_string("funnelId")?;

    let mut query = JsonMap::new();
    params.collection("options")?.insert_date_range(&mut query)?;

    record(
        client,
        HttpMethod::GET,
        &format!("/funnels/{}/results", funnel_id),
        &JsonMap::new(),
        &query,
        &["results"],
    )
    .await
}
