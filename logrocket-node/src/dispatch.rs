use logrocket_common::client::LogRocketClient;
use serde_json::Value;
use tracing::debug;

use crate::actions::{
    alert, error, event, funnel, highlight, issue, metric, project, segment, session, team, user,
};
use crate::error::NodeError;
use crate::operation::Operation;
use crate::params::Parameters;

/// Result of running one operation for one input item.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    One(Value),
    Many(Vec<Value>),
}

impl Output {
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Output::One(record) => vec![record],
            Output::Many(records) => records,
        }
    }
}

/// Run `operation` with the parameters of one input item.
pub async fn dispatch(
    client: &LogRocketClient,
    operation: Operation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    debug!(%operation, "running operation");

    match operation {
        Operation::Session(op) => session::run(client, op, params).await,
        Operation::User(op) => user::run(client, op, params).await,
        Operation::Issue(op) => issue::run(client, op, params).await,
        Operation::Error(op) => error::run(client, op, params).await,
        Operation::Event(op) => event::run(client, op, params).await,
        Operation::Highlight(op) => highlight::run(client, op, params).await,
        Operation::Metric(op) => metric::run(client, op, params).await,
        Operation::Funnel(op) => funnel::run(client, op, params).await,
        Operation::Segment(op) => segment::run(client, op, params).await,
        Operation::Alert(op) => alert::run(client, op, params).await,
        Operation::Team(op) => team::run(client, op, params).await,
        Operation::Project(op) => project::run(client, op, params).await,
    }
}
