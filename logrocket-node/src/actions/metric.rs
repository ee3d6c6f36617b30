use logrocket_common::client::LogRocketClient;
use logrocket_common::simplify::RecordShape;
use logrocket_common::JsonMap;
use serde_json::Value;

use super::{items, path_segment, simplify_records};
use crate::dispatch::Output;
use crate::error::NodeError;
use crate::operation::MetricOperation;
use crate::params::Parameters;

pub async fn run(
    client: &LogRocketClient,
    operation: MetricOperation,
    params: &Parameters,
) -> Result<Output, NodeError> {
    let records = match operation {
        MetricOperation::GetPageViews => filtered(client, params, "/metrics/pageviews").await,
        MetricOperation::GetSessionMetrics => filtered(client, params, "/metrics/sessions").await,
        MetricOperation::GetErrorMetrics => unfiltered(client, params, "/metrics/errors").await,
        MetricOperation::GetPerformanceMetrics => performance(client, params).await,
        MetricOperation::GetCustomMetrics => custom(client, params).await,
    }?;

    Ok(Output::Many(records))
}

/// Query shared by every metric operation, out of the `options` collection.
fn options_query(params: &Parameters) -> Result<JsonMap, NodeError> {
    let options = params.collection("options")?;

    let mut query = JsonMap::new();
    options.insert_date_range(&mut query)?;
    options.copy_set("interval", "interval", &mut query);
    options.copy_set("groupBy", "group_by", &mut query);

    Ok(query)
}

async fn fetch(
    client: &LogRocketClient,
    params: &Parameters,
    path: &str,
    query: JsonMap,
) -> Result<Vec<Value>, NodeError> {
    let simplify = params.simplify()?;
    let metrics = items(client, path, &query, &["metrics", "data"]).await?;

    Ok(simplify_records(client, RecordShape::Metric, metrics, simplify))
}

async fn filtered(
    client: &LogRocketClient,
    params: &Parameters,
    path: &str,
) -> Result<Vec<Value>, NodeError> {
    let mut query = options_query(params)?;
    let filters = params.collection("filters")?;
    for name in ["url", "browser", "os"] {
        filters.copy_set(name, name, &mut query);
    }

    fetch(client, params, path, query).await
}

async fn unfiltered(
    client: &LogRocketClient,
    params: &Parameters,
    path: &str,
) -> Result<Vec<Value>, NodeError> {
    let query = options_query(params)?;
    fetch(client, params, path, query).await
}

async fn performance(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let metric = params.string_or("performanceMetric", "all")?;
    let mut query = options_query(params)?;

    if metric != "all" {
        query.insert("metric".to_owned(), Value::String(metric));
    }

    fetch(client, params, "/metrics/performance", query).await
}

async fn custom(client: &LogRocketClient, params: &Parameters) -> Result<Vec<Value>, NodeError> {
    let metric_name = params.required_string("metricName")?;
    let query = options_query(params)?;

    let path = format!("/metrics/custom/{}", path_segment(&metric_name));
    fetch(client, params, &path, query).await
}
