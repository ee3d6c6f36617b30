pub mod alert;
pub mod client;
pub mod credentials;
pub mod error;
pub mod links;
pub mod metrics;
pub mod pagination;
pub mod response;
pub mod simplify;
pub mod time;

/// JSON object used for request bodies, query parameters and records.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
