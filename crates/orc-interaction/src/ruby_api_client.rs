//! RubyApiClient - HTTP client for the remote Ruby HDL compiler service.
//!
//! Talks JSON over POST to `{base}/ruby/compile`, `{base}/ruby/run` and
//! `{base}/ruby/viz`. Each call is a single round trip without retry. A body
//! that parses into the expected reply is returned even under a non-2xx
//! status; only unparseable bodies become transport errors.

use async_trait::async_trait;
use orc_core::compiler::{
    CompileRequest, CompileResponse, RemoteCompiler, RemoteOperation, RunRequest, RunResponse,
    VizRequest, VizResponse,
};
use orc_core::config::ClientConfig;
use orc_core::error::{OrcError, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Longest slice of an error body carried into a transport error message.
const MAX_ERROR_BODY: usize = 512;

/// [`RemoteCompiler`] backed by the service's HTTP API.
#[derive(Clone, Debug)]
pub struct RubyApiClient {
    client: Client,
    base_url: String,
}

impl RubyApiClient {
    /// Creates a client for the given base URL (e.g. `https://host`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Uses a preconfigured `reqwest` client (proxies, TLS settings, ...).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, operation: RemoteOperation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    async fn post<B, R>(&self, operation: RemoteOperation, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(operation);
        tracing::debug!(%operation, %url, "Sending request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                OrcError::transport(operation.as_ref(), format!("request failed: {err}"))
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|err| {
            OrcError::transport(operation.as_ref(), format!("failed to read response body: {err}"))
        })?;

        // The service may report diagnostics with an error status; a body of
        // the expected shape is a reply, whatever the status.
        match parse_response(operation, &body_text) {
            Ok(reply) => {
                if !status.is_success() {
                    tracing::debug!(%operation, %status, "Reply carried an error status");
                }
                Ok(reply)
            }
            Err(_) if !status.is_success() => Err(map_http_error(operation, status, &body_text)),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl RemoteCompiler for RubyApiClient {
    async fn compile(&self, source: &str, task_id: Option<&str>) -> Result<CompileResponse> {
        let request = CompileRequest {
            code: source.to_string(),
            task_id: task_id.filter(|id| !id.is_empty()).map(str::to_string),
        };
        let response: CompileResponse = self.post(RemoteOperation::Compile, &request).await?;
        tracing::debug!(
            task_id = %response.task_id,
            success = response.is_success(),
            "Compile finished"
        );
        Ok(response)
    }

    async fn run(&self, task_id: &str, input: &str) -> Result<RunResponse> {
        let request = RunRequest {
            task_id: task_id.to_string(),
            input: input.to_string(),
        };
        self.post(RemoteOperation::Run, &request).await
    }

    async fn visualize(&self, task_id: &str, input: &str) -> Result<VizResponse> {
        let request = VizRequest {
            task_id: task_id.to_string(),
            input: input.to_string(),
        };
        self.post(RemoteOperation::Visualize, &request).await
    }
}

fn parse_response<R: DeserializeOwned>(operation: RemoteOperation, body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|err| {
        OrcError::transport(operation.as_ref(), format!("unexpected response shape: {err}"))
    })
}

fn map_http_error(operation: RemoteOperation, status: StatusCode, body: &str) -> OrcError {
    let excerpt: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    if excerpt.is_empty() {
        OrcError::transport(operation.as_ref(), format!("HTTP {status}"))
    } else {
        OrcError::transport(operation.as_ref(), format!("HTTP {status}: {excerpt}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = RubyApiClient::new("https://example.test/");
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(
            client.endpoint(RemoteOperation::Compile),
            "https://example.test/ruby/compile"
        );
        assert_eq!(
            client.endpoint(RemoteOperation::Visualize),
            "https://example.test/ruby/viz"
        );
    }

    #[test]
    fn test_parse_compile_response() {
        let resp: CompileResponse = parse_response(
            RemoteOperation::Compile,
            r#"{"task_id":"T1","compile_err":"","rbs":"ARTIFACT"}"#,
        )
        .unwrap();
        assert_eq!(resp.task_id, "T1");
        assert_eq!(resp.rbs, "ARTIFACT");
    }

    #[test]
    fn test_unparseable_body_is_transport_error() {
        let err = parse_response::<VizResponse>(RemoteOperation::Visualize, "<html>oops</html>")
            .unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("viz"));
    }

    #[test]
    fn test_wrong_shape_is_transport_error() {
        let err = parse_response::<RunResponse>(RemoteOperation::Run, r#""output""#).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_http_error_message() {
        let err = map_http_error(
            RemoteOperation::Run,
            StatusCode::INTERNAL_SERVER_ERROR,
            " task not found \n",
        );
        assert_eq!(
            err.to_string(),
            "Transport error during run: HTTP 500 Internal Server Error: task not found"
        );

        let err = map_http_error(RemoteOperation::Run, StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err.to_string(),
            "Transport error during run: HTTP 502 Bad Gateway"
        );
    }
}
