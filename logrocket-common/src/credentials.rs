use std::fmt;

use envconfig::Envconfig;

/// Credentials for the LogRocket REST API.
///
/// `app_id` is expected in the `org-slug/app-name` form but is not validated here:
/// it is spliced into request paths and replay links as-is.
#[derive(Envconfig, Clone, PartialEq, Eq)]
pub struct Credentials {
    #[envconfig(from = "LOGROCKET_API_KEY")]
    pub api_key: String,

    #[envconfig(from = "LOGROCKET_APP_ID")]
    pub app_id: String,
}

impl Credentials {
    pub fn new(api_key: &str, app_id: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            app_id: app_id.to_owned(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Token {}", self.api_key)
    }
}

/// Keep the API key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}
