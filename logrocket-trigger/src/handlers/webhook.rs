use axum::{extract, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use logrocket_common::alert::{match_alert, raw_alert_type};
use logrocket_common::JsonMap;
use serde_json::Value;
use tracing::{debug, error};

use super::State;

/// Request headers as a JSON object, repeated headers joined with `, `.
fn headers_to_json(headers: &HeaderMap) -> JsonMap {
    let mut map = JsonMap::new();

    for name in headers.keys() {
        let value = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(name.as_str().to_owned(), Value::String(value));
    }

    map
}

pub async fn post(
    extract::State(state): extract::State<State>,
    headers: HeaderMap,
    Json(payload): Json<JsonMap>,
) -> impl IntoResponse {
    let alert_type = raw_alert_type(&payload).to_owned();
    metrics::counter!("webhook_alerts_received_total").increment(1);

    let received_at = state.timesource.current_time();
    let Some(event) = match_alert(
        &state.filter,
        payload,
        headers_to_json(&headers),
        &received_at,
    ) else {
        debug!(alert_type = alert_type.as_str(), filter = %state.filter, "alert filtered out");
        metrics::counter!("webhook_alerts_filtered_total").increment(1);
        return StatusCode::NO_CONTENT.into_response();
    };

    if let Err(e) = state.sink.send(event.clone()).await {
        error!(alert_type = alert_type.as_str(), "failed to deliver alert event: {}", e);
    }

    metrics::counter!("webhook_alerts_emitted_total").increment(1);

    (StatusCode::OK, Json(vec![Value::Object(event)])).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert_json_diff::assert_json_eq;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{self, Request, StatusCode},
    };
    use http_body_util::BodyExt; // for `collect`
    use logrocket_common::alert::EventFilter;
    use logrocket_common::links::build_session_url;
    use logrocket_common::time::FixedTime;
    use serde_json::json;
    use tower::ServiceExt; // for `call`, `oneshot`, and `ready`

    use super::*;
    use crate::handlers::router;
    use crate::sink::{EventSink, SinkError};

    const RECEIVED_AT: &str = "2024-01-15T12:30:00.000Z";

    #[derive(Clone, Default)]
    struct MemorySink {
        events: Arc<Mutex<Vec<JsonMap>>>,
    }

    impl MemorySink {
        fn events(&self) -> Vec<JsonMap> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventSink for MemorySink {
        async fn send(&self, event: JsonMap) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn app(filter: EventFilter, sink: MemorySink) -> axum::Router {
        router(
            FixedTime {
                time: RECEIVED_AT.to_owned(),
            },
            sink,
            filter,
            "/webhook",
            None,
        )
    }

    fn alert_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(http::Method::POST)
            .uri("/webhook")
            .header(http::header::CONTENT_TYPE, "application/json")
            .header("x-logrocket-signature", "abc")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn webhook_emits_matching_alert() {
        let sink = MemorySink::default();

        let response = app(EventFilter::ErrorSpike, sink.clone())
            .oneshot(alert_request(json!({
                "alert_type": "Error-Spike",
                "app_id": "org/app",
                "session_ids": ["s1"]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        let expected = json!([{
            "alert_type": "Error-Spike",
            "app_id": "org/app",
            "session_ids": ["s1"],
            "session_urls": [build_session_url("org/app", "s1", None)],
            "_webhook": {
                "receivedAt": RECEIVED_AT,
                "headers": {
                    "content-type": "application/json",
                    "x-logrocket-signature": "abc"
                }
            }
        }]);
        assert_json_eq!(body, expected);

        assert_eq!(sink.events().len(), 1);
        assert_json_eq!(Value::Object(sink.events()[0].clone()), expected[0]);
    }

    #[tokio::test]
    async fn webhook_filters_other_alerts() {
        let sink = MemorySink::default();

        let response = app(EventFilter::RageClick, sink.clone())
            .oneshot(alert_request(json!({"alert_type": "error_spike"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn webhook_rejects_non_json_body() {
        let response = app(EventFilter::Any, MemorySink::default())
            .oneshot(
                Request::builder()
                    .method(http::Method::POST)
                    .uri("/webhook")
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", "10.0.0.1".parse().unwrap());
        headers.append("x-forwarded-for", "10.0.0.2".parse().unwrap());

        assert_eq!(
            headers_to_json(&headers).get("x-forwarded-for"),
            Some(&json!("10.0.0.1, 10.0.0.2"))
        );
    }
}
