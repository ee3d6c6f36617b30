//! Session highlights. LogRocket may deliver these asynchronously to `webhookUrl` instead of
//! in the response, so responses are returned untouched.
use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::JsonMap;
use serde_json::Value;

use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::HighlightOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: HighlightOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        HighlightOperation::GetForUser => get_for_user(client, params).await.map(Output::One),
        HighlightOperation::GetForSession => get_for_session(client, params).await.map(Output::One),
        HighlightOperation::GetForTimeRange => {
            get_for_time_range(client, params).await.map(Output::One)
        }
    }
}

async fn get_for_user(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let user_id = params.required_string("userId")?;
    let time_range = params.collection("timeRange")?;

    let mut query = JsonMap::new();
    time_range.copy_set("startMs", "start_ms", &mut query);
    time_range.copy_set("endMs", "end_ms", &mut query);
    params
        .collection("options")?
        .copy_set("webhookUrl", "webhook_url", &mut query);

    let path = format!("/users/{}/highlights", user_id);
    Ok(client
        .execute(HttpMethod::GET, &path, &JsonMap::new(), &query)
        .await?)
}

async fn get_for_session(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let session_id = params.required_string("sessionId")?;

    let mut query = JsonMap::new();
    params
        .collection("options")?
        .copy_set("webhookUrl", "webhook_url", &mut query);

    let path = format!("/sessions/{}/highlights", session_id);
    Ok(client
        .execute(HttpMethod::GET, &path, &JsonMap::new(), &query)
        .await?)
}

async fn get_for_time_range(
    client: &LogRocketClient,
    params: &Parameters,
) -> Result<Value, NodeError> {
    let mut query = JsonMap::new();
    query.insert("start_ms".to_owned(), params.required_number("startMs")?);
    query.insert("end_ms".to_owned(), params.required_number("endMs")?);
    params
        .collection("options")?
        .copy_set("webhookUrl", "webhook_url", &mut query);

    Ok(client
        .execute(HttpMethod::GET, "/highlights", &JsonMap::new(), &query)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_for_time_range() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(path("/highlights"))
                .query_param("start_ms", "1705276800000")
                .query_param("end_ms", "1705363200000")
                .query_param("webhook_url", "https://hooks.example.com/highlights");
            then.status(200).json_body(json!({"status": "pending"}));
        });

        let output = run(
            &client_for(&server),
            HighlightOperation::GetForTimeRange,
            &params(json!({
                "startMs": 1_705_276_800_000_i64,
                "endMs": 1_705_363_200_000_i64,
                "options": {"webhookUrl": "https://hooks.example.com/highlights"}
            })),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(output, Output::One(json!({"status": "pending"})));
    }

    #[tokio::test]
    async fn test_get_for_time_range_requires_bounds() {
        let error = run(
            &unreachable_client(),
            HighlightOperation::GetForTimeRange,
            &params(json!({"startMs": 1})),
        )
        .await
        .unwrap_err();

        assert_eq!(error.to_string(), "Missing required parameter: endMs");
    }

    #[tokio::test]
    async fn test_get_for_user_time_range() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(path("/users/u1/highlights"))
                .query_param("end_ms", "2000");
            then.status(200)
                .json_body(json!({"highlights": [{"summary": "User rage clicked"}]}));
        });

        let output = run(
            &client_for(&server),
            HighlightOperation::GetForUser,
            &params(json!({"userId": "u1", "timeRange": {"startMs": 0, "endMs": 2000}})),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(
            output,
            Output::One(json!({"highlights": [{"summary": "User rage clicked"}]}))
        );
    }
}
