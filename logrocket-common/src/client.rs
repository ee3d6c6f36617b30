use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time;

use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::error::{parse_error_message, ApiError};
use crate::JsonMap;

pub const DEFAULT_API_BASE: &str = "https://api.logrocket.com/v1/orgs";
pub const DEFAULT_MAX_PAGES: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(pages) => pages,
    None => unreachable!(),
};

/// HTTP methods accepted by the LogRocket API.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpMethod {
    DELETE,
    GET,
    PATCH,
    POST,
    PUT,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{0} is not a valid HttpMethod")]
pub struct InvalidHttpMethod(pub String);

impl FromStr for HttpMethod {
    type Err = InvalidHttpMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_ref() {
            "DELETE" => Ok(HttpMethod::DELETE),
            "GET" => Ok(HttpMethod::GET),
            "PATCH" => Ok(HttpMethod::PATCH),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            invalid => Err(InvalidHttpMethod(invalid.to_owned())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let method = match self {
            HttpMethod::DELETE => "DELETE",
            HttpMethod::GET => "GET",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
        };
        f.write_str(method)
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HttpMethod::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for HttpMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(val: HttpMethod) -> Self {
        match val {
            HttpMethod::DELETE => http::Method::DELETE,
            HttpMethod::GET => http::Method::GET,
            HttpMethod::PATCH => http::Method::PATCH,
            HttpMethod::POST => http::Method::POST,
            HttpMethod::PUT => http::Method::PUT,
        }
    }
}

pub struct LogRocketClientBuilder {
    credentials: Credentials,
    api_base: String,
    timeout: Option<time::Duration>,
    max_pages: NonZeroUsize,
}

impl LogRocketClientBuilder {
    pub fn api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_owned();
        self
    }

    pub fn timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_pages(mut self, max_pages: NonZeroUsize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn build(self) -> Result<LogRocketClient, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("LogRocket Automation Connector");
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|error| ApiError::RequestFailed {
            status: None,
            message: format!("failed to construct http client: {}", error),
        })?;

        Ok(LogRocketClient {
            credentials: self.credentials,
            api_base: self.api_base,
            client,
            max_pages: self.max_pages,
        })
    }
}

/// Authenticated client for the LogRocket REST API of a single application.
#[derive(Clone, Debug)]
pub struct LogRocketClient {
    credentials: Credentials,
    /// Everything before the application id, e.g. `https://api.logrocket.com/v1/orgs`.
    api_base: String,
    client: reqwest::Client,
    /// Upper bound on the number of pages `fetch_all` will request.
    pub(crate) max_pages: NonZeroUsize,
}

impl LogRocketClient {
    pub fn builder(credentials: Credentials) -> LogRocketClientBuilder {
        LogRocketClientBuilder {
            credentials,
            api_base: DEFAULT_API_BASE.to_owned(),
            timeout: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// Full URL for an endpoint path such as `/sessions`.
    pub fn url(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        let url = format!("{}/{}{}", self.api_base, self.credentials.app_id, path);
        Ok(reqwest::Url::parse(&url)?)
    }

    /// Build, without sending, the request `execute` would issue.
    ///
    /// The body is only attached for non-GET requests, and only when it holds at least one field.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: &JsonMap,
        query: &JsonMap,
    ) -> Result<reqwest::Request, ApiError> {
        let mut request = self
            .client
            .request(method.into(), self.url(path)?)
            .header(header::AUTHORIZATION, self.credentials.authorization());

        if !query.is_empty() {
            request = request.query(&query_pairs(query));
        }

        if method != HttpMethod::GET && !body.is_empty() {
            request = request.json(body);
        }

        Ok(request.build()?)
    }

    /// Issue one authenticated request and decode its JSON response.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: &JsonMap,
        query: &JsonMap,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(method, path, body, query)?;
        debug!(%method, path, "sending LogRocket API request");

        let start = time::Instant::now();
        let result = self.send(request).await;
        let elapsed = start.elapsed().as_secs_f64();

        let outcome = match &result {
            Ok(_) => "success".to_owned(),
            Err(error) => error
                .status()
                .map_or_else(|| "transport_error".to_owned(), |s| s.to_string()),
        };
        let labels = [("method", method.to_string()), ("outcome", outcome)];
        metrics::counter!("logrocket_api_requests_total", &labels).increment(1);
        metrics::histogram!("logrocket_api_request_duration_seconds", &labels).record(elapsed);

        if let Err(error) = &result {
            warn!(%method, path, "LogRocket API request failed: {}", error);
        }

        result
    }

    /// Check the credentials with the cheapest authenticated call available.
    pub async fn verify_credentials(&self) -> Result<(), ApiError> {
        let mut query = JsonMap::new();
        query.insert("limit".to_owned(), Value::from(1));

        self.execute(HttpMethod::GET, "/sessions", &JsonMap::new(), &query)
            .await
            .map(|_| ())
    }

    async fn send(&self, request: reqwest::Request) -> Result<Value, ApiError> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let bytes = response.bytes().await?;

        if let Some(status_error) = status_error {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .map(|body| parse_error_message(&body))
                .filter(|message| message != "Unknown error")
                .unwrap_or_else(|| status_error.to_string());

            return Err(ApiError::RequestFailed {
                status: Some(status.as_u16()),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(JsonMap::new()));
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Render query parameters the way they appear on the wire: strings bare, other scalars as JSON.
fn query_pairs(query: &JsonMap) -> Vec<(String, String)> {
    query
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> LogRocketClient {
        LogRocketClient::builder(Credentials::new("secret-key", "org/app"))
            .api_base(&server.url("/v1/orgs"))
            .build()
            .expect("failed to build client")
    }

    fn object(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_http_method_from_str() {
        assert_eq!(HttpMethod::from_str("get"), Ok(HttpMethod::GET));
        assert_eq!(HttpMethod::from_str("Patch"), Ok(HttpMethod::PATCH));
        assert_eq!(
            HttpMethod::from_str("trace"),
            Err(InvalidHttpMethod("TRACE".to_owned()))
        );
    }

    #[test]
    fn test_url_includes_app_id() {
        let client = LogRocketClient::builder(Credentials::new("k", "org/app"))
            .build()
            .unwrap();

        assert_eq!(
            client.url("/sessions").unwrap().as_str(),
            "https://api.logrocket.com/v1/orgs/org/app/sessions"
        );
    }

    #[test]
    fn test_get_never_attaches_body() {
        let client = LogRocketClient::builder(Credentials::new("k", "org/app"))
            .build()
            .unwrap();
        let body = object(json!({"name": "ignored"}));

        let request = client
            .build_request(HttpMethod::GET, "/sessions", &body, &JsonMap::new())
            .unwrap();

        assert!(request.body().is_none());
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_post_attaches_non_empty_body() {
        let client = LogRocketClient::builder(Credentials::new("k", "org/app"))
            .build()
            .unwrap();
        let body = object(json!({"assignee": "dev@example.com"}));

        let request = client
            .build_request(HttpMethod::POST, "/issues/1/assign", &body, &JsonMap::new())
            .unwrap();

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let sent: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(sent, json!({"assignee": "dev@example.com"}));
    }

    #[test]
    fn test_post_with_empty_body_sends_nothing() {
        let client = LogRocketClient::builder(Credentials::new("k", "org/app"))
            .build()
            .unwrap();

        let request = client
            .build_request(HttpMethod::POST, "/issues/1/resolve", &JsonMap::new(), &JsonMap::new())
            .unwrap();

        assert!(request.body().is_none());
    }

    #[test]
    fn test_request_carries_token_and_query() {
        let client = LogRocketClient::builder(Credentials::new("k", "org/app"))
            .build()
            .unwrap();
        let query = object(json!({"limit": 10, "has_error": true, "email": "a@b.c"}));

        let request = client
            .build_request(HttpMethod::GET, "/sessions", &JsonMap::new(), &query)
            .unwrap();

        assert_eq!(
            request.headers().get(header::AUTHORIZATION).unwrap(),
            "Token k"
        );
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("limit".to_owned(), "10".to_owned())));
        assert!(pairs.contains(&("has_error".to_owned(), "true".to_owned())));
        assert!(pairs.contains(&("email".to_owned(), "a@b.c".to_owned())));
    }

    #[tokio::test]
    async fn test_execute_decodes_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/orgs/org/app/sessions/abc")
                .header("authorization", "Token secret-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"session": {"id": "abc"}}));
        });

        let response = client_for(&server)
            .execute(HttpMethod::GET, "/sessions/abc", &JsonMap::new(), &JsonMap::new())
            .await
            .expect("request failed");

        mock.assert();
        assert_eq!(response, json!({"session": {"id": "abc"}}));
    }

    #[tokio::test]
    async fn test_execute_empty_response_is_empty_object() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/v1/orgs/org/app/funnels/f1");
            then.status(204);
        });

        let response = client_for(&server)
            .execute(HttpMethod::DELETE, "/funnels/f1", &JsonMap::new(), &JsonMap::new())
            .await
            .expect("request failed");

        assert_eq!(response, json!({}));
    }

    #[tokio::test]
    async fn test_execute_maps_error_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/orgs/org/app/sessions/missing");
            then.status(404)
                .json_body(json!({"error": {"message": "Session not found"}}));
        });

        let error = client_for(&server)
            .execute(HttpMethod::GET, "/sessions/missing", &JsonMap::new(), &JsonMap::new())
            .await
            .expect_err("request should fail");

        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            "LogRocket API request failed: Session not found"
        );
    }

    #[tokio::test]
    async fn test_execute_falls_back_to_status_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/orgs/org/app/sessions");
            then.status(500).body("oops");
        });

        let error = client_for(&server)
            .execute(HttpMethod::GET, "/sessions", &JsonMap::new(), &JsonMap::new())
            .await
            .expect_err("request should fail");

        assert_eq!(error.status(), Some(500));
        assert!(error.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/orgs/org/app/sessions")
                .query_param("limit", "1");
            then.status(200).json_body(json!({"sessions": []}));
        });

        client_for(&server)
            .verify_credentials()
            .await
            .expect("credentials should be accepted");

        mock.assert();
    }
}
