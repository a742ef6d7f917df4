use std::fmt;

use async_trait::async_trait;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use serde_json::{Map, Value};
use tracing::debug;

/// Field of the secret holding the New Relic license key.
pub const LICENSE_KEY_FIELD: &str = "new_relic_license_key";

#[derive(thiserror::Error, Debug)]
pub enum SecretError {
    #[error("Failed to access AWS Secrets Manager. Please make sure the lambda function has permissions to access the {secret_id} secret. Error: {error:?}")]
    FailedToAccessSecretsManager {
        secret_id: String,
        error: GetSecretValueError,
    },
    #[error("Didn't find the {secret_id} secret in AWS secretsmanager")]
    MissingSecret { secret_id: String },
    #[error("Secret {secret_id} is not a JSON object: {source}")]
    MalformedSecret {
        secret_id: String,
        source: serde_json::Error,
    },
    #[error("Secret {secret_id} has no {field} field")]
    MissingField { secret_id: String, field: String },
    #[error("Field {field} of secret {secret_id} is not a string")]
    InvalidField { secret_id: String, field: String },
}

/// Credential sent in the `Api-Key` header. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Key-value contents of a secret whose `SecretString` is a JSON object.
#[derive(Debug, Clone)]
pub struct SecretBundle {
    secret_id: String,
    fields: Map<String, Value>,
}

impl SecretBundle {
    pub fn parse(secret_id: &str, secret_string: &str) -> Result<SecretBundle, SecretError> {
        let fields = serde_json::from_str::<Map<String, Value>>(secret_string).map_err(|source| {
            SecretError::MalformedSecret {
                secret_id: secret_id.to_string(),
                source,
            }
        })?;
        Ok(SecretBundle {
            secret_id: secret_id.to_string(),
            fields,
        })
    }

    pub fn api_key(&self, field: &str) -> Result<ApiKey, SecretError> {
        match self.fields.get(field) {
            Some(Value::String(key)) => Ok(ApiKey(key.clone())),
            Some(_) => Err(SecretError::InvalidField {
                secret_id: self.secret_id.clone(),
                field: field.to_string(),
            }),
            None => Err(SecretError::MissingField {
                secret_id: self.secret_id.clone(),
                field: field.to_string(),
            }),
        }
    }
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretBundle, SecretError>;
}

#[async_trait]
impl SecretStore for aws_sdk_secretsmanager::Client {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretBundle, SecretError> {
        debug!("fetching secret {} from secrets manager", secret_id);
        let response = self
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|error| SecretError::FailedToAccessSecretsManager {
                secret_id: secret_id.to_string(),
                error: error.into_service_error(),
            })?;
        let secret = response
            .secret_string
            .ok_or_else(|| SecretError::MissingSecret {
                secret_id: secret_id.to_string(),
            })?;
        SecretBundle::parse(secret_id, &secret)
    }
}
