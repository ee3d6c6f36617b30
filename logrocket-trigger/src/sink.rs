use std::time::Duration;

use async_trait::async_trait;
use logrocket_common::JsonMap;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to forward event: {0}")]
    Forward(#[from] reqwest::Error),
}

/// Destination for alerts that passed the configured filter.
#[async_trait]
pub trait EventSink {
    async fn send(&self, event: JsonMap) -> Result<(), SinkError>;
}

pub struct PrintSink {}

#[async_trait]
impl EventSink for PrintSink {
    async fn send(&self, event: JsonMap) -> Result<(), SinkError> {
        info!("alert event: {}", serde_json::Value::Object(event));
        metrics::counter!("webhook_sink_events_total", &[("sink", "print")]).increment(1);

        Ok(())
    }
}

/// POSTs every event as JSON to a fixed URL.
pub struct ForwardSink {
    client: reqwest::Client,
    url: String,
}

impl ForwardSink {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

#[async_trait]
impl EventSink for ForwardSink {
    async fn send(&self, event: JsonMap) -> Result<(), SinkError> {
        self.client
            .post(&self.url)
            .json(&event)
            .send()
            .await?
            .error_for_status()?;

        metrics::counter!("webhook_sink_events_total", &[("sink", "forward")]).increment(1);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn event() -> JsonMap {
        match json!({"alert_type": "error_spike", "session_ids": ["s1"]}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_forward_posts_event() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/alerts")
                .json_body(json!({"alert_type": "error_spike", "session_ids": ["s1"]}));
            then.status(202);
        });

        let sink = ForwardSink::new(&server.url("/alerts"), Duration::from_secs(5)).unwrap();
        sink.send(event()).await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_forward_surfaces_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/alerts");
            then.status(503);
        });

        let sink = ForwardSink::new(&server.url("/alerts"), Duration::from_secs(5)).unwrap();

        assert!(matches!(
            sink.send(event()).await,
            Err(SinkError::Forward(_))
        ));
    }
}
