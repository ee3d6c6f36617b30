//! Reduced views of LogRocket records.
//!
//! Each record type has a fixed set of output fields. Upstream payloads mix snake_case and
//! camelCase spellings, so every output field lists the names it can be read from, in
//! priority order.
use serde_json::Value;

use crate::links::build_session_url;
use crate::JsonMap;

type FieldAliases = (&'static str, &'static [&'static str]);

const SESSION_FIELDS: &[FieldAliases] = &[
    ("id", &["id"]),
    ("userId", &["user_id", "userId"]),
    ("email", &["email"]),
    ("startTime", &["start_time", "startTime"]),
    ("endTime", &["end_time", "endTime"]),
    ("duration", &["duration"]),
    ("browser", &["browser"]),
    ("os", &["os"]),
    ("device", &["device"]),
    ("url", &["url"]),
    ("hasError", &["has_error", "hasError"]),
    ("errorCount", &["error_count", "errorCount"]),
    ("pageCount", &["page_count", "pageCount"]),
];

const USER_FIELDS: &[FieldAliases] = &[
    ("id", &["id"]),
    ("userId", &["user_id", "userId"]),
    ("email", &["email"]),
    ("name", &["name"]),
    ("traits", &["traits"]),
    ("firstSeen", &["first_seen", "firstSeen"]),
    ("lastSeen", &["last_seen", "lastSeen"]),
    ("sessionCount", &["session_count", "sessionCount"]),
];

const ISSUE_FIELDS: &[FieldAliases] = &[
    ("id", &["id"]),
    ("type", &["type"]),
    ("status", &["status"]),
    ("severity", &["severity"]),
    ("title", &["title"]),
    ("message", &["message"]),
    ("firstOccurrence", &["first_occurrence", "firstOccurrence"]),
    ("lastOccurrence", &["last_occurrence", "lastOccurrence"]),
    ("occurrenceCount", &["occurrence_count", "occurrenceCount"]),
    ("affectedUsers", &["affected_users", "affectedUsers"]),
    ("assignee", &["assignee"]),
];

const ERROR_FIELDS: &[FieldAliases] = &[
    ("id", &["id"]),
    ("message", &["message"]),
    ("type", &["type"]),
    ("url", &["url"]),
    ("browser", &["browser"]),
    ("os", &["os"]),
    ("firstOccurrence", &["first_occurrence", "firstOccurrence"]),
    ("lastOccurrence", &["last_occurrence", "lastOccurrence"]),
    ("occurrenceCount", &["occurrence_count", "occurrenceCount"]),
    ("affectedUsers", &["affected_users", "affectedUsers"]),
    ("resolved", &["resolved"]),
];

const EVENT_FIELDS: &[FieldAliases] = &[
    ("id", &["id"]),
    ("name", &["name"]),
    ("type", &["type"]),
    ("timestamp", &["timestamp"]),
    ("properties", &["properties"]),
    ("userId", &["user_id", "userId"]),
    ("sessionId", &["session_id", "sessionId"]),
];

const METRIC_FIELDS: &[FieldAliases] = &[
    ("name", &["name"]),
    ("value", &["value"]),
    ("timestamp", &["timestamp"]),
    ("groupBy", &["group_by", "groupBy"]),
    ("count", &["count"]),
    ("average", &["average"]),
    ("percentile50", &["p50"]),
    ("percentile95", &["p95"]),
    ("percentile99", &["p99"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    Session,
    User,
    Issue,
    Error,
    Event,
    Metric,
}

impl RecordShape {
    fn fields(&self) -> &'static [FieldAliases] {
        match self {
            RecordShape::Session => SESSION_FIELDS,
            RecordShape::User => USER_FIELDS,
            RecordShape::Issue => ISSUE_FIELDS,
            RecordShape::Error => ERROR_FIELDS,
            RecordShape::Event => EVENT_FIELDS,
            RecordShape::Metric => METRIC_FIELDS,
        }
    }
}

/// Project `record` onto the output fields of `shape`.
///
/// Fields absent (or null) under every alias are left out. Sessions also get a
/// `sessionUrl` replay link built from their id and `app_id`.
pub fn simplify(shape: RecordShape, record: &Value, app_id: &str) -> Value {
    let mut simplified = JsonMap::new();

    for (name, aliases) in shape.fields() {
        let value = aliases
            .iter()
            .find_map(|alias| record.get(*alias).filter(|value| !value.is_null()));

        if let Some(value) = value {
            simplified.insert((*name).to_owned(), value.clone());
        }
    }

    if shape == RecordShape::Session {
        let session_id = match record.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };

        if let Some(session_id) = session_id {
            simplified.insert(
                "sessionUrl".to_owned(),
                Value::String(build_session_url(app_id, &session_id, None)),
            );
        }
    }

    Value::Object(simplified)
}

/// Simplify every record of a list.
pub fn simplify_all(shape: RecordShape, records: &[Value], app_id: &str) -> Vec<Value> {
    records
        .iter()
        .map(|record| simplify(shape, record, app_id))
        .collect()
}
