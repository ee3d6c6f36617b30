use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{list, record};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::ProjectOperation;
use crate::params::Parameters;

/// Projects are called apps on older endpoints.
const PROJECT_KEYS: &[&str] = &["project", "app"];

pub async fn run(
    client: &LogRocketClient,
    operation: ProjectOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        ProjectOperation::GetAll => {
            list(client, params, "/projects", JsonMap::new(), &["projects", "apps", "data"])
                .await
                .map(Output::Many)
        }
        ProjectOperation::Get => get(client, params).await.map(Output::One),
        ProjectOperation::Update => update(client, params).await.map(Output::One),
        ProjectOperation::GetSdkConfig => get_sdk_config(client, params).await.map(Output::One),
    }
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let project_id = params.required_string("projectId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/projects/{}", project_id),
        &JsonMap::new(),
        &JsonMap::new(),
        PROJECT_KEYS,
    )
    .await
}

async fn update(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let project_id = params.required_string("projectId")?;
    let update_fields = params.collection("updateFields")?;

    let mut body = JsonMap::new();
    update_fields.copy_set("name", "name", &mut body);
    update_fields.copy_set("settings", "settings", &mut body);
    update_fields.copy_set("privacySettings", "privacy_settings", &mut body);

    record(
        client,
        HttpMethod::PATCH,
        &format!("/projects/{}", project_id),
        &body,
        &JsonMap::new(),
        PROJECT_KEYS,
    )
    .await
}

async fn get_sdk_config(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let project_id = params.required_string("projectId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/projects/{}/sdk-config", project_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["config"],
    )
    .await
}
