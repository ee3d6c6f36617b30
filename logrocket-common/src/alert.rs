//! Matching and enrichment of inbound LogRocket alert webhooks.
//!
//! LogRocket posts one JSON object per fired alert. The alert kind arrives in
//! `alert_type` (or `type` on older payloads) in whatever spelling the alert was
//! configured with, so it is normalized before being compared against the configured
//! filter. Matching payloads are passed through with receipt metadata and replay links.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::links::build_session_url;
use crate::JsonMap;

/// Which alerts a trigger reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    Any,
    ErrorSpike,
    RageClick,
    PerformanceRegression,
    CustomAlert,
    /// A filter outside the known set; it matches alert types containing its own name.
    Named(String),
}

impl EventFilter {
    /// Substrings of a normalized alert type that satisfy this filter.
    /// `Any` has none: it is short-circuited before matching.
    pub fn accepted_tokens(&self) -> Vec<&str> {
        match self {
            EventFilter::Any => vec![],
            EventFilter::ErrorSpike => vec!["error_spike", "error", "errors"],
            EventFilter::RageClick => vec!["rage_click", "rage_click_spike", "rage"],
            EventFilter::PerformanceRegression => {
                vec!["performance_regression", "performance", "perf"]
            }
            EventFilter::CustomAlert => vec!["custom", "custom_alert"],
            EventFilter::Named(name) => vec![name.as_str()],
        }
    }

    /// Whether an alert of the given raw type passes this filter.
    pub fn accepts(&self, raw_alert_type: &str) -> bool {
        if *self == EventFilter::Any {
            return true;
        }

        let normalized = normalize_alert_type(raw_alert_type);
        self.accepted_tokens()
            .iter()
            .any(|token| normalized.contains(token))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("event filter must not be empty")]
pub struct EmptyFilterError;

impl FromStr for EventFilter {
    type Err = EmptyFilterError;

    /// Filter names are normalized like alert types, so `Error-Spike` selects `ErrorSpike`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_alert_type(s.trim()).as_str() {
            "" => Err(EmptyFilterError),
            "any" => Ok(EventFilter::Any),
            "error_spike" => Ok(EventFilter::ErrorSpike),
            "rage_click" => Ok(EventFilter::RageClick),
            "performance_regression" => Ok(EventFilter::PerformanceRegression),
            "custom_alert" => Ok(EventFilter::CustomAlert),
            other => Ok(EventFilter::Named(other.to_owned())),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventFilter::Any => write!(f, "any"),
            EventFilter::ErrorSpike => write!(f, "error_spike"),
            EventFilter::RageClick => write!(f, "rage_click"),
            EventFilter::PerformanceRegression => write!(f, "performance_regression"),
            EventFilter::CustomAlert => write!(f, "custom_alert"),
            EventFilter::Named(name) => write!(f, "{}", name),
        }
    }
}

impl<'de> Deserialize<'de> for EventFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EventFilter::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for EventFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Lowercase and collapse every run of `_` and `-` into a single `_`.
pub fn normalize_alert_type(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut in_separator_run = false;

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c == '_' || c == '-' {
            if !in_separator_run {
                normalized.push('_');
            }
            in_separator_run = true;
        } else {
            normalized.push(c);
            in_separator_run = false;
        }
    }

    normalized
}

/// The alert kind a payload declares: `alert_type`, else `type`, else `"unknown"`.
pub fn raw_alert_type(payload: &JsonMap) -> &str {
    ["alert_type", "type"]
        .iter()
        .find_map(|key| {
            payload
                .get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("unknown")
}

/// Replay links for the sessions an alert refers to.
///
/// Links shipped in `session_urls` are kept as they are. Otherwise they are derived from
/// `session_ids` and `app_id` when both are present.
pub fn session_urls_for(payload: &JsonMap) -> Vec<String> {
    if let Some(urls) = payload.get("session_urls").filter(|v| !v.is_null()) {
        return urls
            .as_array()
            .map(|urls| {
                urls.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
    }

    let app_id = payload
        .get("app_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    let session_ids = payload.get("session_ids").and_then(Value::as_array);

    match (app_id, session_ids) {
        (Some(app_id), Some(session_ids)) => session_ids
            .iter()
            .filter_map(|id| match id {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(|session_id| build_session_url(app_id, &session_id, None))
            .collect(),
        _ => vec![],
    }
}

/// Decide whether `payload` passes `filter` and, if it does, build the event to emit.
///
/// The emitted event holds every payload field, a `_webhook` object with `receivedAt` and
/// the request `headers`, and `session_urls` when they had to be derived from session ids.
/// Returns `None` when the alert is filtered out.
pub fn match_alert(
    filter: &EventFilter,
    payload: JsonMap,
    headers: JsonMap,
    received_at: &str,
) -> Option<JsonMap> {
    if !filter.accepts(raw_alert_type(&payload)) {
        return None;
    }

    let had_session_urls = payload.get("session_urls").is_some_and(|v| !v.is_null());
    let session_urls = session_urls_for(&payload);

    let mut event = payload;
    event.insert(
        "_webhook".to_owned(),
        json!({
            "receivedAt": received_at,
            "headers": headers,
        }),
    );

    if !had_session_urls && !session_urls.is_empty() {
        event.insert("session_urls".to_owned(), json!(session_urls));
    }

    Some(event)
}
