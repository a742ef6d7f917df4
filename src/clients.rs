use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use http::header::{HeaderMap, HeaderValue, USER_AGENT};

/// A type used to hold the clients the lambda function needs across
/// invocations: the secrets manager client and the outbound HTTP client.
#[derive(Clone)]
pub struct Clients {
    pub secrets: SecretsManagerClient,
    pub http: reqwest::Client,
}

impl Clients {
    pub fn new(sdk_config: &SdkConfig) -> Result<Self, reqwest::Error> {
        Ok(Clients {
            secrets: SecretsManagerClient::new(sdk_config),
            http: http_client()?,
        })
    }
}

pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        )),
    );
    reqwest::Client::builder().default_headers(headers).build()
}
