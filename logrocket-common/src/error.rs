use serde_json::Value;
use thiserror::Error;

/// Enumeration of errors returned when talking to the LogRocket API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("LogRocket API request failed: {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },
    #[error("error building request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("LogRocket API returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("pagination aborted after {pages} pages: the API kept returning a cursor")]
    PaginationLimitExceeded { pages: usize },
}

impl ApiError {
    /// The HTTP status code, if the request reached the API at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

/// Build an `ApiError` out of a transport failure.
impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::RequestFailed {
            status: error.status().map(|status| status.as_u16()),
            message: error.to_string(),
        }
    }
}

/// Extract a human readable message from a LogRocket error body.
///
/// The API nests errors as `{"error": {"message", "code"}}` on most endpoints and uses a
/// flat `{"message"}` on a few others.
pub fn parse_error_message(body: &Value) -> String {
    let non_empty = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    if let Some(nested) = body.get("error").filter(|e| e.is_object()) {
        return non_empty(nested.get("message"))
            .or_else(|| non_empty(nested.get("code")))
            .unwrap_or_else(|| "Unknown error".to_owned());
    }

    non_empty(body.get("message")).unwrap_or_else(|| "Unknown error".to_owned())
}
