use std::str::FromStr;

use envconfig::Envconfig;
use logrocket_common::alert::EventFilter;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "BIND_PORT", default = "3305")]
    pub port: u16,

    #[envconfig(from = "WEBHOOK_PATH", default = "/webhook")]
    pub webhook_path: WebhookPath,

    /// Alert kind to react to, `any` for all of them.
    #[envconfig(from = "EVENT", default = "any")]
    pub event: EventFilter,

    /// When set, matching alerts are POSTed here instead of printed.
    #[envconfig(from = "FORWARD_URL")]
    pub forward_url: Option<String>,

    #[envconfig(default = "10")]
    pub forward_timeout_seconds: u64,

    #[envconfig(default = "false")]
    pub export_prometheus: bool,
}

impl Config {
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Route the webhook is served on. Must start with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPath(String);

impl WebhookPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidWebhookPathError;

impl FromStr for WebhookPath {
    type Err = InvalidWebhookPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('/') {
            Ok(WebhookPath(s.to_owned()))
        } else {
            Err(InvalidWebhookPathError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::init_from_hashmap(&HashMap::new()).unwrap();

        assert_eq!(config.bind(), "0.0.0.0:3305");
        assert_eq!(config.webhook_path.as_str(), "/webhook");
        assert_eq!(config.event, EventFilter::Any);
        assert_eq!(config.forward_url, None);
        assert!(!config.export_prometheus);
    }

    #[test]
    fn test_event_filter_from_env() {
        let env = HashMap::from([
            ("EVENT".to_owned(), "rage_click".to_owned()),
            ("FORWARD_URL".to_owned(), "http://localhost:8000/alerts".to_owned()),
        ]);
        let config = Config::init_from_hashmap(&env).unwrap();

        assert_eq!(config.event, EventFilter::RageClick);
        assert_eq!(
            config.forward_url.as_deref(),
            Some("http://localhost:8000/alerts")
        );
    }

    #[test]
    fn test_webhook_path_needs_leading_slash() {
        let env = HashMap::from([("WEBHOOK_PATH".to_owned(), "logrocket".to_owned())]);
        assert!(Config::init_from_hashmap(&env).is_err());

        let env = HashMap::from([("WEBHOOK_PATH".to_owned(), "/hooks/logrocket".to_owned())]);
        let config = Config::init_from_hashmap(&env).unwrap();
        assert_eq!(config.webhook_path.as_str(), "/hooks/logrocket");
    }

    #[test]
    fn test_empty_event_filter_is_rejected() {
        let env = HashMap::from([("EVENT".to_owned(), String::new())]);

        assert!(Config::init_from_hashmap(&env).is_err());
    }
}
