//! HTTP table client for Airtable-style record APIs.

use std::time::Duration;

use async_trait::async_trait;
use form_spec::OwnerCredentials;
use serde_json::{Map, Value, json};

use crate::error::{EngineError, EngineResult};
use crate::traits::TableClient;

const DEFAULT_BASE_URL: &str = "https://api.airtable.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Writes records via `POST {base_url}/v0/{base_id}/{table_id}` with the
/// owner's Bearer token. The base URL is configurable so tests can point
/// it at a local mock server.
pub struct RestTableClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestTableClient {
    pub fn new() -> EngineResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| {
                EngineError::UpstreamWrite(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn write_record(
        &self,
        credentials: &OwnerCredentials,
        base_id: &str,
        table_id: &str,
        fields: Map<String, Value>,
    ) -> EngineResult<String> {
        let url = format!("{}/v0/{}/{}", self.base_url, base_id, table_id);
        tracing::debug!(%url, "creating record in external table");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credentials.access_token)
            .json(&json!({ "records": [{ "fields": fields }] }))
            .send()
            .await
            .map_err(|err| EngineError::UpstreamWrite(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::UpstreamWrite(format!(
                "external API returned {status}: {body}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| EngineError::UpstreamWrite(format!("invalid response body: {err}")))?;
        payload
            .pointer("/records/0/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| EngineError::UpstreamWrite("response missing record id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn credentials() -> OwnerCredentials {
        OwnerCredentials {
            owner_id: "owner-1".into(),
            access_token: "tok-123".into(),
        }
    }

    fn fields() -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("fldName".into(), json!("Ada"));
        fields
    }

    #[tokio::test]
    async fn posts_the_record_and_returns_the_upstream_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v0/appBase/tblTable")
            .match_header("authorization", "Bearer tok-123")
            .match_body(Matcher::PartialJson(json!({
                "records": [{ "fields": { "fldName": "Ada" } }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"records":[{"id":"rec123","fields":{"fldName":"Ada"}}]}"#)
            .create_async()
            .await;

        let client = RestTableClient::with_base_url(server.url()).unwrap();
        let id = client
            .write_record(&credentials(), "appBase", "tblTable", fields())
            .await
            .unwrap();

        assert_eq!(id, "rec123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_becomes_an_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v0/appBase/tblTable")
            .with_status(422)
            .with_body(r#"{"error":{"type":"UNKNOWN_FIELD_NAME"}}"#)
            .create_async()
            .await;

        let client = RestTableClient::with_base_url(server.url()).unwrap();
        let err = client
            .write_record(&credentials(), "appBase", "tblTable", fields())
            .await
            .unwrap_err();

        match err {
            EngineError::UpstreamWrite(message) => {
                assert!(message.contains("422"));
                assert!(message.contains("UNKNOWN_FIELD_NAME"));
            }
            other => panic!("expected UpstreamWrite, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_without_a_record_id_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v0/appBase/tblTable")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"records":[]}"#)
            .create_async()
            .await;

        let client = RestTableClient::with_base_url(server.url()).unwrap();
        let err = client
            .write_record(&credentials(), "appBase", "tblTable", fields())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::UpstreamWrite(_)));
    }
}
