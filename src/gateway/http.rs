use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::Gateway;
use crate::errors::ConsoleError;
use crate::models::{RunStatusReport, SummaryDocument};

/// reqwest-backed gateway speaking the platform's JSON interface.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct StartResponse {
    assessment_id: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(what: &str, err: reqwest::Error) -> ConsoleError {
        if err.is_timeout() {
            ConsoleError::Timeout(format!("{what} request timed out: {err}"))
        } else {
            ConsoleError::Network(format!("{what} request failed: {err}"))
        }
    }

    /// Decode a response body, mapping non-2xx statuses to an API error
    /// carrying the server's `error` field when present, and body decode
    /// failures to a malformed-response error.
    async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, ConsoleError> {
        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let detail = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("no error detail");
            return Err(ConsoleError::Api(format!(
                "{what} request returned {status}: {detail}"
            )));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ConsoleError::Malformed(format!("unexpected {what} response shape: {e}")))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_summary(&self) -> Result<SummaryDocument, ConsoleError> {
        let resp = self
            .client
            .get(self.url("/summary"))
            .send()
            .await
            .map_err(|e| Self::transport_error("summary", e))?;
        Self::decode(resp, "summary").await
    }

    async fn fetch_module_detail(&self, module: &str) -> Result<Value, ConsoleError> {
        let resp = self
            .client
            .get(self.url(&format!("/modules/{module}")))
            .send()
            .await
            .map_err(|e| Self::transport_error("module detail", e))?;
        Self::decode(resp, "module detail").await
    }

    async fn start_assessment(&self) -> Result<String, ConsoleError> {
        let resp = self
            .client
            .post(self.url("/assessments"))
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| Self::transport_error("start assessment", e))?;
        let started: StartResponse = Self::decode(resp, "start assessment").await?;
        debug!(assessment_id = %started.assessment_id, "assessment created");
        Ok(started.assessment_id)
    }

    async fn poll_assessment(&self, run_id: &str) -> Result<RunStatusReport, ConsoleError> {
        let resp = self
            .client
            .get(self.url(&format!("/assessments/{run_id}")))
            .send()
            .await
            .map_err(|e| Self::transport_error("poll assessment", e))?;
        Self::decode(resp, "poll assessment").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gw = HttpGateway::new("http://localhost:8080/api/");
        assert_eq!(gw.url("/summary"), "http://localhost:8080/api/summary");
    }

    #[test]
    fn test_url_joins_path() {
        let gw = HttpGateway::new("https://aegis.example.com");
        assert_eq!(
            gw.url("/assessments/abc123"),
            "https://aegis.example.com/assessments/abc123"
        );
    }
}
