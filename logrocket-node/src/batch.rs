use logrocket_common::client::LogRocketClient;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::dispatch::dispatch;
use crate::error::NodeError;
use crate::operation::Operation;
use crate::params::Parameters;

/// One output record and the index of the input item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutput {
    pub json: Value,
    #[serde(rename = "pairedItem")]
    pub paired_item: usize,
}

/// Run one operation for every input item, in order.
///
/// A failing item either aborts the whole batch or, with `continue_on_fail`, is replaced by
/// an `{"error": message}` record and processing moves on to the next item.
pub async fn run_batch(
    client: &LogRocketClient,
    resource: &str,
    operation: &str,
    items: &[Parameters],
    continue_on_fail: bool,
) -> Result<Vec<BatchOutput>, NodeError> {
    let mut outputs = Vec::new();

    for (index, params) in items.iter().enumerate() {
        let result = match Operation::parse(resource, operation) {
            Ok(operation) => dispatch(client, operation, params).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(output) => {
                metrics::counter!("logrocket_node_items_total", &[("outcome", "success")])
                    .increment(1);
                outputs.extend(output.into_records().into_iter().map(|json| BatchOutput {
                    json,
                    paired_item: index,
                }));
            }
            Err(error) if continue_on_fail => {
                metrics::counter!("logrocket_node_items_total", &[("outcome", "failure")])
                    .increment(1);
                warn!(item = index, resource, operation, "item failed, continuing: {}", error);
                outputs.push(BatchOutput {
                    json: json!({"error": error.to_string()}),
                    paired_item: index,
                });
            }
            Err(error) => {
                metrics::counter!("logrocket_node_items_total", &[("outcome", "failure")])
                    .increment(1);
                return Err(error);
            }
        }
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_list_outputs_pair_with_their_item() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(path("/users/u1/sessions"));
            then.status(200).json_body(json!({"sessions": [{"id": "s1"}, {"id": "s2"}]}));
        });
        server.mock(|when, then| {
            when.method(GET).path(path("/users/u2/sessions"));
            then.status(200).json_body(json!({"sessions": [{"id": "s3"}]}));
        });

        let outputs = run_batch(
            &client_for(&server),
            "user",
            "getSessions",
            &[params(json!({"userId": "u1"})), params(json!({"userId": "u2"}))],
            false,
        )
        .await
        .unwrap();

        let paired: Vec<usize> = outputs.iter().map(|output| output.paired_item).collect();
        assert_eq!(paired, vec![0, 0, 1]);
        assert_eq!(outputs[2].json, json!({"id": "s3"}));
    }

    #[tokio::test]
    async fn test_unknown_operation_with_continue() {
        let outputs = run_batch(
            &unreachable_client(),
            "session",
            "nope",
            &[Parameters::default()],
            true,
        )
        .await
        .unwrap();

        assert_eq!(
            outputs,
            vec![BatchOutput {
                json: json!({"error": "Operation \"nope\" not found for resource \"session\""}),
                paired_item: 0,
            }]
        );
    }

    #[tokio::test]
    async fn test_failure_halts_without_continue() {
        let error = run_batch(
            &unreachable_client(),
            "session",
            "get",
            &[Parameters::default(), params(json!({"sessionId": "s1"}))],
            false,
        )
        .await
        .unwrap_err();

        assert_eq!(error.to_string(), "Missing required parameter: sessionId");
    }

    #[test]
    fn test_output_serialization() {
        let output = BatchOutput {
            json: json!({"id": "s1"}),
            paired_item: 3,
        };

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({"json": {"id": "s1"}, "pairedItem": 3})
        );
    }
}
