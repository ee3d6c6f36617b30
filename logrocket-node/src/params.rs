//! Typed access to the parameters of one input item.
//!
//! Items arrive as loosely typed JSON objects, so every accessor decides how an absent,
//! null or empty value is treated. "Set" below means present and truthy: not null,
//! `false`, `0` or `""`.
use logrocket_common::links::{millis_to_api_date, parse_api_date};
use logrocket_common::JsonMap;
use serde_json::{Number, Value};

use crate::error::NodeError;

pub const DEFAULT_LIMIT: u64 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: JsonMap,
}

impl From<JsonMap> for Parameters {
    fn from(values: JsonMap) -> Self {
        Parameters { values }
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Parameters {
    pub fn values(&self) -> &JsonMap {
        &self.values
    }

    /// The value of `name` unless it is absent or null.
    pub fn defined(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// The value of `name` if it is set.
    pub fn set(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| is_set(value))
    }

    pub fn string(&self, name: &str) -> Result<Option<String>, NodeError> {
        match self.set(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(NodeError::invalid_parameter(name, "expected a string")),
        }
    }

    pub fn required_string(&self, name: &str) -> Result<String, NodeError> {
        self.string(name)?
            .ok_or_else(|| NodeError::MissingParameter(name.to_owned()))
    }

    pub fn string_or(&self, name: &str, default: &str) -> Result<String, NodeError> {
        Ok(self.string(name)?.unwrap_or_else(|| default.to_owned()))
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, NodeError> {
        match self.defined(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s == "true" => Ok(true),
            Some(Value::String(s)) if s == "false" => Ok(false),
            Some(_) => Err(NodeError::invalid_parameter(name, "expected a boolean")),
        }
    }

    /// A numeric parameter; numeric strings are accepted and converted.
    pub fn number(&self, name: &str) -> Result<Option<Value>, NodeError> {
        match self.defined(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(Value::Number(n.clone()))),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => parse_number(s)
                .map(|n| Some(Value::Number(n)))
                .ok_or_else(|| NodeError::invalid_parameter(name, "expected a number")),
            Some(_) => Err(NodeError::invalid_parameter(name, "expected a number")),
        }
    }

    pub fn required_number(&self, name: &str) -> Result<Value, NodeError> {
        self.number(name)?
            .ok_or_else(|| NodeError::MissingParameter(name.to_owned()))
    }

    pub fn return_all(&self) -> Result<bool, NodeError> {
        self.bool_or("returnAll", false)
    }

    pub fn simplify(&self) -> Result<bool, NodeError> {
        self.bool_or("simplify", true)
    }

    /// Page size for single page list requests.
    pub fn limit(&self) -> Result<u64, NodeError> {
        match self.number("limit")? {
            None => Ok(DEFAULT_LIMIT),
            Some(limit) => limit
                .as_u64()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| NodeError::invalid_parameter("limit", "expected a positive integer")),
        }
    }

    /// A nested group of optional parameters (filters, options, update fields).
    pub fn collection(&self, name: &str) -> Result<Parameters, NodeError> {
        match self.defined(name) {
            None => Ok(Parameters::default()),
            Some(Value::Object(values)) => Ok(Parameters::from(values.clone())),
            Some(_) => Err(NodeError::invalid_parameter(name, "expected an object")),
        }
    }

    /// Repeated entries given either as `{wrapper: [...]}` or as a plain array.
    pub fn fixed_collection(
        &self,
        name: &str,
        wrapper: &str,
    ) -> Result<Option<Vec<Parameters>>, NodeError> {
        let entries = match self.defined(name) {
            None => return Ok(None),
            Some(Value::Array(entries)) => entries,
            Some(Value::Object(wrapped)) => match wrapped.get(wrapper) {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) | None => return Ok(None),
                Some(_) => {
                    return Err(NodeError::invalid_parameter(name, "expected a list of entries"))
                }
            },
            Some(_) => return Err(NodeError::invalid_parameter(name, "expected a list of entries")),
        };

        entries
            .iter()
            .map(|entry| match entry {
                Value::Object(values) => Ok(Parameters::from(values.clone())),
                _ => Err(NodeError::invalid_parameter(name, "expected every entry to be an object")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// A date parameter rendered as an API timestamp.
    pub fn date(&self, name: &str) -> Result<Option<String>, NodeError> {
        let invalid = || NodeError::invalid_parameter(name, "expected a date");

        match self.set(name) {
            None => Ok(None),
            Some(Value::String(s)) => parse_api_date(s).map(Some).ok_or_else(invalid),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(millis_to_api_date)
                .map(Some)
                .ok_or_else(invalid),
            Some(_) => Err(invalid()),
        }
    }

    /// Copy `startDate` and `endDate` into `query` as `start_date` and `end_date`.
    pub fn insert_date_range(&self, query: &mut JsonMap) -> Result<(), NodeError> {
        if let Some(start) = self.date("startDate")? {
            query.insert("start_date".to_owned(), Value::String(start));
        }
        if let Some(end) = self.date("endDate")? {
            query.insert("end_date".to_owned(), Value::String(end));
        }
        Ok(())
    }

    /// Copy `name` into `target` under `key` if it is set.
    pub fn copy_set(&self, name: &str, key: &str, target: &mut JsonMap) {
        if let Some(value) = self.set(name) {
            target.insert(key.to_owned(), value.clone());
        }
    }

    /// Copy `name` into `target` under `key` if it is present, even when falsy.
    pub fn copy_defined(&self, name: &str, key: &str, target: &mut JsonMap) {
        if let Some(value) = self.defined(name) {
            target.insert(key.to_owned(), value.clone());
        }
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Number::from(n));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}
