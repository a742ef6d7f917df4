use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::newrelic::EventsApi;
use crate::secrets::{SecretStore, LICENSE_KEY_FIELD};

pub mod clients;
pub mod config;
pub mod newrelic;
pub mod secrets;

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

/// Fixed response returned to the lambda runtime once an invocation succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn success() -> Self {
        InvocationResponse {
            status_code: 200,
            body: "Success".to_string(),
        }
    }
}

// lambda handler
pub async fn function_handler(
    secrets: &dyn SecretStore,
    http: &reqwest::Client,
    config: &Config,
    evt: LambdaEvent<SnsEvent>,
) -> Result<InvocationResponse, Error> {
    info!("Handling lambda invocation");
    debug!("Handling event payload: {:?}", evt.payload);

    if !config.event_bridge_enabled {
        info!(
            "New Relic event bridge disabled, skipping {} records",
            evt.payload.records.len()
        );
        return Ok(InvocationResponse::success());
    }

    let secret_name = config.secret_name()?;
    let account_id = config.account_id()?;

    let secret = secrets.get_secret(secret_name).await?;
    let api_key = secret.api_key(LICENSE_KEY_FIELD)?;

    let events_api = EventsApi::new(http, &config.endpoint, account_id);
    info!(
        "Forwarding {} SNS records to {}",
        evt.payload.records.len(),
        events_api.url()
    );

    for record in &evt.payload.records {
        debug!("SNS message: {:?}", record.sns.message);
        let payload = newrelic::encode_payload(&record.sns.message)?;
        events_api.send(&api_key, payload).await?;
    }

    Ok(InvocationResponse::success())
}
