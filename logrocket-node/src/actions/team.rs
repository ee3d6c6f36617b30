use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{delete, list, record};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::TeamOperation;
use crate::params::Parameters;

const DEFAULT_ROLE: &str = "member";

pub async fn run(
    client: &LogRocketClient,
    operation: TeamOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        TeamOperation::GetAll => list(client, params, "/team", JsonMap::new(), &["members", "data"])
            .await
            .map(Output::Many),
        TeamOperation::Get => get(client, params).await.map(Output::One),
        TeamOperation::Invite => invite(client, params).await.map(Output::One),
        TeamOperation::Remove => {
            let member_id = params.required_string("memberId")?;
            delete(client, &format!("/team/{}", member_id), "memberId", &member_id)
                .await
                .map(Output::One)
        }
        TeamOperation::UpdateRole => update_role(client, params).await.map(Output::One),
    }
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let member_id = params.required_string("memberId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/team/{}", member_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["member"],
    )
    .await
}

async fn invite(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let email = params.required_string("email")?;
    let role = params.string_or("role", DEFAULT_ROLE)?;

    let mut body = JsonMap::new();
    body.insert("email".to_owned(), Value::String(email));
    body.insert("role".to_owned(), Value::String(role));
    params
        .collection("additionalFields")?
        .copy_set("name", "name", &mut body);

    record(
        client,
        HttpMethod::POST,
        "/team/invite",
        &body,
        &JsonMap::new(),
        &["invitation"],
    )
    .await
}

async fn update_role(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let member_id = params.required_string("memberId")?;
    let role = params.string_or("newRole", DEFAULT_ROLE)?;

    let mut body = JsonMap::new();
    body.insert("role".to_owned(), Value::String(role));

    record(
        client,
        HttpMethod::PATCH,
        &format!("/team/{}/role", member_id),
        &body,
        &JsonMap::new(),
        &["member"],
    )
    .await
}
