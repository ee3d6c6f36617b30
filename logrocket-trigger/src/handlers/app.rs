use std::sync::Arc;

use axum::{routing, Router};
use logrocket_common::alert::EventFilter;
use logrocket_common::metrics::setup_metrics_routes;
use logrocket_common::time::TimeSource;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use super::webhook;
use crate::sink::EventSink;

#[derive(Clone)]
pub struct State {
    pub sink: Arc<dyn EventSink + Send + Sync>,
    pub timesource: Arc<dyn TimeSource + Send + Sync>,
    pub filter: Arc<EventFilter>,
}

/// Build the trigger router. The `/metrics` route is only mounted when a recorder handle
/// is given.
pub fn router<
    TZ: TimeSource + Send + Sync + 'static,
    S: EventSink + Send + Sync + 'static,
>(
    timesource: TZ,
    sink: S,
    filter: EventFilter,
    webhook_path: &str,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let state = State {
        sink: Arc::new(sink),
        timesource: Arc::new(timesource),
        filter: Arc::new(filter),
    };

    let router = Router::new()
        .route("/", routing::get(index))
        .route(webhook_path, routing::post(webhook::post))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match metrics {
        Some(recorder_handle) => setup_metrics_routes(router, recorder_handle),
        None => router,
    }
}

pub async fn index() -> &'static str {
    "logrocket trigger"
}
