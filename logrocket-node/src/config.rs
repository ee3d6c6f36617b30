use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time;

use envconfig::Envconfig;
use logrocket_common::client::LogRocketClient;
use logrocket_common::credentials::Credentials;
use logrocket_common::error::ApiError;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(nested = true)]
    pub credentials: Credentials,

    #[envconfig(from = "API_BASE_URL", default = "https://api.logrocket.com/v1/orgs")]
    pub api_base_url: String,

    #[envconfig(default = "30000")]
    pub request_timeout: EnvMsDuration,

    #[envconfig(default = "10000")]
    pub max_pages: NonZeroUsize,

    #[envconfig(default = "session")]
    pub resource: NonEmptyString,

    pub operation: NonEmptyString,

    #[envconfig(default = "false")]
    pub continue_on_fail: bool,

    #[envconfig(default = "false")]
    pub verify_credentials: bool,
}

impl Config {
    pub fn client(&self) -> Result<LogRocketClient, ApiError> {
        LogRocketClient::builder(self.credentials.clone())
            .api_base(&self.api_base_url)
            .timeout(self.request_timeout.0)
            .max_pages(self.max_pages)
            .build()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnvMsDuration(pub time::Duration);

#[derive(Debug, PartialEq, Eq)]
pub struct ParseEnvMsDurationError;

impl FromStr for EnvMsDuration {
    type Err = ParseEnvMsDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.parse::<u64>().map_err(|_| ParseEnvMsDurationError)?;

        Ok(EnvMsDuration(time::Duration::from_millis(ms)))
    }
}

#[derive(Debug, Clone)]
pub struct NonEmptyString(pub String);

impl NonEmptyString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StringIsEmptyError;

impl FromStr for NonEmptyString {
    type Err = StringIsEmptyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Err(StringIsEmptyError)
        } else {
            Ok(NonEmptyString(s.to_owned()))
        }
    }
}
