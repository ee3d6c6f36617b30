use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::simplify::RecordShape;
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{list, record, simplify_record, simplify_records};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::UserOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: UserOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        UserOperation::GetAll => get_all(client, params).await.map(Output::Many),
        UserOperation::Get => get(client, params).await.map(Output::One),
        UserOperation::GetSessions => get_sessions(client, params).await.map(Output::Many),
        UserOperation::GetTraits => get_traits(client, params).await.map(Output::One),
        UserOperation::Identify => identify(client, params).await.map(Output::One),
        UserOperation::GetActivity => get_activity(client, params).await.map(Output::One),
    }
}

async fn get_all(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let filters = params.collection("filters")?;
    let simplify = params.simplify()?;

    let mut query = JsonMap::new();
    filters.copy_set("email", "email", &mut query);
    filters.insert_date_range(&mut query)?;

    let users = list(client, params, "/users", query, &["users", "data"]).await?;
    Ok(simplify_records(client, RecordShape::User, users, simplify))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let user_id = params.required_string("userId")?;
    let simplify = params.simplify()?;

    let user = record(
        client,
        HttpMethod::GET,
        &format!("/users/{}", user_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["user"],
    )
    .await?;
    Ok(simplify_record(client, RecordShape::User, user, simplify))
}

async fn get_sessions(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let user_id = params.required_string("userId")?;
    let path = format!("/users/{}/sessions", user_id);

    list(client, params, &path, JsonMap::new(), &["sessions", "data"]).await
}

async fn get_traits(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let user_id = params.required_string("userId")?;

    record(
        client,
        HttpMethod::GET,
        &format!("/users/{}/traits", user_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["traits"],
    )
    .await
}

async fn identify(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let user_id = params.required_string("userId")?;

    let mut body = JsonMap::new();
    body.insert("user_id".to_owned(), Value::String(user_id.clone()));
    params.copy_set("email", "email", &mut body);
    params.copy_set("name", "name", &mut body);

    if let Some(entries) = params.fixed_collection("traits", "traitValues")? {
        let mut traits = JsonMap::new();
        for entry in entries {
            let key = entry.required_string("key")?;
            let value = entry.defined("value").cloned().unwrap_or(Value::Null);
            traits.insert(key, value);
        }
        body.insert("traits".to_owned(), Value::Object(traits));
    }

    record(
        client,
        HttpMethod::POST,
        &format!("/users/{}/identify", user_id),
        &body,
        &JsonMap::new(),
        &["user"],
    )
    .await
}

async fn get_activity(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let user_id = params.required_string("userId")?;

    let mut query = JsonMap::new();
    params.collection("options")?.insert_date_range(&mut query)?;

    record(
        client,
        HttpMethod::GET,
        &format!("/users/{}/activity", user_id),
        &JsonMap::new(),
        &query,
        &["activity"],
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_identify_sends_traits() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(path("/users/u1/identify"))
                .json_body(json!({
                    "user_id": "u1",
                    "email": "a@example.com",
                    "traits": {"plan": "pro", "seats": 3}
                }));
            then.status(200)
                .json_body(json!({"user": {"id": "u1", "email": "a@example.com"}}));
        });

        let output = run(
            &client_for(&server),
            UserOperation::Identify,
            &params(json!({
                "userId": "u1",
                "email": "a@example.com",
                "name": "",
                "traits": {"traitValues": [
                    {"key": "plan", "value": "pro"},
                    {"key": "seats", "value": 3}
                ]}
            })),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(output, Output::One(json!({"id": "u1", "email": "a@example.com"})));
    }

    #[tokio::test]
    async fn test_get_all_simplifies_users() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(path("/users"))
                .query_param("email", "a@example.com")
                .query_param("limit", "50");
            then.status(200).json_body(json!({
                "users": [{"id": "u1", "first_seen": "2024-01-01", "session_count": 4, "plan": "pro"}]
            }));
        });

        let output = run(
            &client_for(&server),
            UserOperation::GetAll,
            &params(json!({"filters": {"email": "a@example.com"}})),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(
            output,
            Output::Many(vec![json!({"id": "u1", "firstSeen": "2024-01-01", "sessionCount": 4})])
        );
    }

    #[tokio::test]
    async fn test_get_activity_with_dates() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(path("/users/u1/activity"))
                .query_param("end_date", "2024-01-31T00:00:00.000Z");
            then.status(200).json_body(json!({"activity": [{"kind": "login"}]}));
        });

        let output = run(
            &client_for(&server),
            UserOperation::GetActivity,
            &params(json!({"userId": "u1", "options": {"endDate": "2024-01-31"}})),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(output, Output::One(json!([{"kind": "login"}])));
    }
}
