use std::env;

pub const EVENT_BRIDGE_ENABLED: &str = "NEWRELIC_EVENT_BRIDGE_ENABLED";
pub const SECRET_NAME: &str = "NEWRELIC_SECRET_NAME";
pub const ACCOUNT_ID: &str = "NEWRELIC_ACCOUNT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://insights-collector.newrelic.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub event_bridge_enabled: bool,
    pub secret_name: Option<String>,
    pub account_id: Option<String>,
    // collector base url, events are posted to {endpoint}/v1/accounts/{account_id}/events
    pub endpoint: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVariable(&'static str),
}

impl Config {
    pub fn load_from_env() -> Config {
        Config {
            event_bridge_enabled: env::var(EVENT_BRIDGE_ENABLED)
                .map(|v| is_enabled(&v))
                .unwrap_or(false),
            secret_name: non_empty_var(SECRET_NAME),
            account_id: non_empty_var(ACCOUNT_ID),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn secret_name(&self) -> Result<&str, ConfigError> {
        self.secret_name
            .as_deref()
            .ok_or(ConfigError::MissingVariable(SECRET_NAME))
    }

    pub fn account_id(&self) -> Result<&str, ConfigError> {
        self.account_id
            .as_deref()
            .ok_or(ConfigError::MissingVariable(ACCOUNT_ID))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_enabled(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "false" | "0" | "no" | "off"
    )
}
