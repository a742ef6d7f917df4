use std::io::Write;
use std::time::Instant;

use flate2::write::GzEncoder;
use flate2::Compression;
use http::header::{CONTENT_ENCODING, CONTENT_TYPE};
use http::StatusCode;
use tracing::{debug, info};

use crate::secrets::ApiKey;

pub const API_KEY_HEADER: &str = "Api-Key";

#[derive(thiserror::Error, Debug)]
pub enum PayloadError {
    #[error("SNS message is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to gzip payload: {0}")]
    Compression(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to send data to New Relic. Status Code: {status}, Response: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Failed to reach New Relic: {0}")]
    Transport(#[from] reqwest::Error),
}

pub fn events_url(endpoint: &str, account_id: &str) -> String {
    format!(
        "{}/v1/accounts/{}/events",
        endpoint.trim_end_matches('/'),
        account_id
    )
}

/// encode_payload - parses an SNS message as JSON, re-serializes it compactly and gzips it
pub fn encode_payload(message: &str) -> Result<Vec<u8>, PayloadError> {
    let json_data: serde_json::Value = serde_json::from_str(message)?;
    let json_bytes = serde_json::to_vec(&json_data)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json_bytes)?;
    Ok(encoder.finish()?)
}

/// Client for the New Relic Event API of a single account.
pub struct EventsApi<'a> {
    client: &'a reqwest::Client,
    url: String,
}

impl<'a> EventsApi<'a> {
    pub fn new(client: &'a reqwest::Client, endpoint: &str, account_id: &str) -> Self {
        EventsApi {
            client,
            url: events_url(endpoint, account_id),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// send - posts one gzipped payload, accepting only 200 and 201 responses
    pub async fn send(&self, api_key: &ApiKey, payload: Vec<u8>) -> Result<(), DeliveryError> {
        debug!("sending event data to uri: {:?}", self.url);

        let start = Instant::now();
        let bytes = payload.len();
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key.token())
            .header(CONTENT_ENCODING, "gzip")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(DeliveryError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            status = status.as_u16(),
            body = %body,
            bytes,
            elapsed_ms = start.elapsed().as_millis(),
            "New Relic event delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn gunzip(data: &[u8]) -> String {
        let mut decoder = GzDecoder::new(data);
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_events_url() {
        assert_eq!(
            events_url("https://insights-collector.newrelic.com", "1234567"),
            "https://insights-collector.newrelic.com/v1/accounts/1234567/events"
        );
        assert_eq!(
            events_url("http://127.0.0.1:8080/", "42"),
            "http://127.0.0.1:8080/v1/accounts/42/events"
        );
    }

    #[test]
    fn test_encode_payload_is_compact_gzipped_json() {
        let payload = encode_payload("{\n  \"a\" : 1\n}").unwrap();
        // gzip magic
        assert_eq!(&payload[..2], &[0x1f, 0x8b]);
        assert_eq!(gunzip(&payload), r#"{"a":1}"#);
    }

    #[test]
    fn test_encode_payload_keeps_number_text() {
        for message in [
            r#"{"id":123456789012345678901234567890}"#,
            r#"{"ratio":0.100000000000000005551115123125782702118158340454101562}"#,
            r#"{"negative":-98765432109876543210987654321}"#,
        ] {
            let payload = encode_payload(message).unwrap();
            assert_eq!(gunzip(&payload), message);
        }
    }

    #[test]
    fn test_encode_payload_keeps_json_value() {
        let message = r#"[{"eventType": "Alarm", "state": "ALARM", "count": 3, "nested": {"ok": false}}]"#;
        let payload = encode_payload(message).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&gunzip(&payload)).unwrap();
        let expected: serde_json::Value = serde_json::from_str(message).unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_encode_payload_rejects_plain_text() {
        let err = encode_payload("[INFO] some test log line").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidJson(_)));
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = DeliveryError::UnexpectedStatus {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to send data to New Relic. Status Code: 404, Response: not found"
        );
    }
}
