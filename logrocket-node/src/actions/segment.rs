use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{delete, list, project_entries, record};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::SegmentOperation;
use crate::params::Parameters;

const CONDITION_FIELDS: &[&str] = &["field", "operator", "value"];

pub async fn run(
    client: &LogRocketClient,
    operation: SegmentOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        SegmentOperation::GetAll => {
            list(client, params, "/segments", JsonMap::new(), &["segments", "data"])
                .await
                .map(Output::Many)
        }
        SegmentOperation::Get => get(client, params).await.map(Output::One),
        SegmentOperation::Create => create(client, params).await.map(Output::One),
        SegmentOperation::Update => update(client, params).await.map(Output::One),
        SegmentOperation::Delete => {
            let segment_id = params.required_string("segmentId")?;
            delete(client, &format!("/segments/{}", segment_id), "segmentId", &segment_id)
                .await
                .map(Output::One)
        }
        SegmentOperation::GetUsers => get_users(client, params).await.map(Output::Many),
    }
}

fn conditions(params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let entries = params
        .fixed_collection("conditions", "conditionValues")?
        .unwrap_or_default();
    Ok(project_entries(&entries, CONDITION_FIELDS))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let segment_id = params.required_string("segmentId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/segments/{}", segment_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["segment"],
    )
    .await
}

async fn create(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let name = params.required_string("name")?;
    let segment_type = params.string_or("type", "user")?;

    let mut body = JsonMap::new();
    body.insert("name".to_owned(), Value::String(name));
    body.insert("type".to_owned(), Value::String(segment_type));
    body.insert("conditions".to_owned(), Value::Array(conditions(params)?));
    params
        .collection("additionalFields")?
        .copy_set("description", "description", &mut body);

    record(
        client,
        HttpMethod::POST,
        "/segments",
        &body,
        &JsonMap::new(),
        &["segment"],
    )
    .await
}

async fn update(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let segment_id = params.required_string("segmentId")?;
    let update_fields = params.collection("updateFields")?;

    let mut body = JsonMap::new();
    update_fields.copy_set("name", "name", &mut body);
    update_fields.copy_set("description", "description", &mut body);
    if update_fields.set("conditions").is_some() {
        body.insert(
            "conditions".to_owned(),
            Value::Array(conditions(&update_fields)?),
        );
    }

    record(
        client,
        HttpMethod::PATCH,
        &format!("/segments/{}", segment_id),
        &body,
        &JsonMap::new(),
        &["segment"],
    )
    .await
}

async fn get_users(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let segment_id = params.required_string("segmentId")?;
    let path = format!("/segments/{}/users", segment_id);

    list(client, params, &path, JsonMap::new(), &["users", "data"]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_defaults_type_to_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(path("/segments")).json_body(json!({
                "name": "Power users",
                "type": "user",
                "conditions": [{"field": "session_count", "operator": "gt", "value": 10}],
                "description": "More than ten sessions"
            }));
            then.status(201).json_body(json!({"segment": {"id": "sg1"}}));
        });

        let output = run(
            &client_for(&server),
            SegmentOperation::Create,
            &params(json!({
                "name": "Power users",
                "conditions": {"conditionValues": [
                    {"field": "session_count", "operator": "gt", "value": 10}
                ]},
                "additionalFields": {"description": "More than ten sessions"}
            })),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(output, Output::One(json!({"id": "sg1"})));
    }

    #[tokio::test]
    async fn test_get_users_single_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(path("/segments/sg1/users"))
                .query_param("limit", "20");
            then.status(200).json_body(json!({"users": [{"id": "u1"}, {"id": "u2"}]}));
        });

        let output = run(
            &client_for(&server),
            SegmentOperation::GetUsers,
            &params(json!({"segmentId": "sg1", "limit": 20})),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(
            output,
            Output::Many(vec![json!({"id": "u1"}), json!({"id": "u2"})])
        );
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let error = run(&unreachable_client(), SegmentOperation::Delete, &Parameters::default())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Missing required parameter: segmentId");
    }
}
