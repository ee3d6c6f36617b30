use logrocket_common::client::{HttpMethod, LogRocketClient};
use logrocket_common::simplify::RecordShape;
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{list, record, simplify_record, simplify_records};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::IssueOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: IssueOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    match operation {
        IssueOperation::GetAll => get_all(client, params).await.map(Output::Many),
        IssueOperation::Get => get(client, params).await.map(Output::One),
        IssueOperation::GetSessions => get_sessions(client, params).await.map(Output::Many),
        IssueOperation::Resolve => transition(client, params, "resolve").await.map(Output::One),
        IssueOperation::Ignore => transition(client, params, "ignore").await.map(Output::One),
        IssueOperation::Assign => assign(client, params).await.map(Output::One),
    }
}

async fn get_all(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let filters = params.collection("filters")?;
    let simplify = params.simplify()?;

    let mut query = JsonMap::new();
    for name in ["type", "status", "severity", "assignee"] {
        filters.copy_set(name, name, &mut query);
    }
    filters.insert_date_range(&mut query)?;

    let issues = list(client, params, "/issues", query, &["issues", "data"]).await?;
    Ok(simplify_records(client, RecordShape::Issue, issues, simplify))
}

async fn get(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let issue_id = params.required_string("issueId")?;
    let simplify = params.simplify()?;

    let issue = record(
        client,
        HttpMethod::GET,
        &format!("/issues/{}", issue_id),
        &JsonMap::new(),
        &JsonMap::new(),
        &["issue"],
    )
    .await?;
    Ok(simplify_record(client, RecordShape::Issue, issue, simplify))
}

async fn get_sessions(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let issue_id = params.required_string("issueId")?;
    let path = format!("/issues/{}/sessions", issue_id);

    list(client, params, &path, JsonMap::new(), &["sessions", "data"]).await
}

/// Move an issue to another state (`resolve` or `ignore`).
async fn transition(
    client: &LogRocketClient,
    params: &Parameters,
    action: &str,
) -> Result<Value, NodeError> {
    let issue_id = params.required_string("issueId")?;

    record(
        client,
        HttpMethod::POST,
        &format!("/issues/{}/{}", issue_id, action),
        &JsonMap::new(),
        &JsonMap::new(),
        &["issue"],
    )
    .await
}

async fn assign(client: &LogRocketClient, params: &Parameters) -> Result<Value, NodeError> {
    let issue_id = params.required_string("issueId")?;
    let assignee = params.required_string("assignee")?;

    let mut body = JsonMap::new();
    body.insert("assignee".to_owned(), Value::String(assignee));

    record(
        client,
        HttpMethod::POST,
        &format!("/issues/{}/assign", issue_id),
        &body,
        &JsonMap::new(),
        &["issue"],
    )
    .await
}
