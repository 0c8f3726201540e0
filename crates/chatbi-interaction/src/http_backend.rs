//! HTTP implementations of the backend capabilities.
//!
//! One [`HttpBackend`] implements every capability trait against the
//! ChatBI REST API: session registry, translation, execution, database
//! metadata and health. Every call carries the opaque `Login-Token`
//! credential and a fixed per-call timeout; 401/403 responses are
//! reported to the [`AccessGate`] uniformly before surfacing as typed
//! errors.

use crate::config::BackendConfig;
use async_trait::async_trait;
use chatbi_core::capability::{
    DatabaseConnection, DatabaseMetadata, ExecutionCapability, ExecutionRequest, HealthCapability,
    TableSummary, TranslateRequest, TranslateResponse, TranslationCapability,
};
use chatbi_core::session::{PersistedMessageRecord, Session, SessionRegistry};
use chatbi_core::{AccessGate, ChatBiError, Result, TabularResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

const LOGIN_TOKEN_HEADER: &str = "Login-Token";

/// HTTP client for the ChatBI backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    login_token: Option<String>,
    request_timeout: Duration,
    health_timeout: Duration,
    gate: AccessGate,
}

impl HttpBackend {
    /// Creates a backend client from configuration.
    ///
    /// The gate is shared: clone the one handed to the conversation
    /// controller so authorization failures block the whole UI.
    pub fn new(config: &BackendConfig, gate: AccessGate) -> Self {
        Self {
            client: Client::new(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            login_token: config.login_token.clone(),
            request_timeout: config.request_timeout(),
            health_timeout: config.health_timeout(),
            gate,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_headers(&self, mut request: RequestBuilder, timeout: Duration) -> RequestBuilder {
        request = request.timeout(timeout);
        if let Some(token) = &self.login_token {
            request = request.header(LOGIN_TOKEN_HEADER, token);
        }
        request
    }

    /// Sends a request, mapping transport failures and rejecting
    /// non-success statuses.
    ///
    /// 401/403 block the access gate before surfacing as
    /// [`ChatBiError::Authorization`]; other non-success statuses become
    /// persistence errors carrying the response body.
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatBiError::transport(format!("{context}: request timed out"))
            } else {
                ChatBiError::transport(format!("{context}: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if self.gate.report_status(status.as_u16()) {
            return Err(ChatBiError::authorization(status.as_u16()));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ChatBiError::not_found("resource", context.to_string()));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(ChatBiError::persistence(format!(
            "{context}: backend returned {status}: {body}"
        )))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T> {
        let request = self.apply_headers(self.client.get(self.url(path)), self.request_timeout);
        let response = self.send(request, context).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ChatBiError::malformed(context.to_string(), e.to_string()))
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        let request = self.apply_headers(
            self.client.post(self.url(path)).json(body),
            self.request_timeout,
        );
        let response = self.send(request, context).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ChatBiError::malformed(context.to_string(), e.to_string()))
    }
}

#[derive(Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

#[async_trait]
impl SessionRegistry for HttpBackend {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.get_json("/api/sessions", "list sessions").await
    }

    async fn create_session(&self, title: Option<&str>) -> Result<Session> {
        let body = title.map(|t| TitleBody { title: t });
        let request = self.apply_headers(
            self.client.post(self.url("/api/sessions")).json(&body),
            self.request_timeout,
        );
        let response = self.send(request, "create session").await?;
        response
            .json()
            .await
            .map_err(|e| ChatBiError::malformed("create session", e.to_string()))
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<Session> {
        let path = format!("/api/sessions/{session_id}");
        let request = self.apply_headers(
            self.client.patch(self.url(&path)).json(&TitleBody { title }),
            self.request_timeout,
        );
        let response = self.send(request, "rename session").await?;
        response
            .json()
            .await
            .map_err(|e| ChatBiError::malformed("rename session", e.to_string()))
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let path = format!("/api/sessions/{session_id}");
        let request = self.apply_headers(self.client.delete(self.url(&path)), self.request_timeout);
        self.send(request, "delete session").await?;
        Ok(())
    }

    async fn session_messages(&self, session_id: &str) -> Result<Vec<PersistedMessageRecord>> {
        let path = format!("/api/sessions/{session_id}/messages");
        self.get_json(&path, "load session messages").await
    }
}

#[async_trait]
impl TranslationCapability for HttpBackend {
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        tracing::debug!(target: "backend", session = ?request.session_id, "translate request");
        self.post_json("/api/chat", request, "translate").await
    }
}

#[async_trait]
impl ExecutionCapability for HttpBackend {
    async fn execute(&self, request: &ExecutionRequest) -> Result<TabularResult> {
        tracing::debug!(target: "backend", session = ?request.session_id, "execute request");
        self.post_json("/api/execute-sql", request, "execute SQL")
            .await
    }
}

#[async_trait]
impl DatabaseMetadata for HttpBackend {
    async fn list_connections(&self) -> Result<Vec<DatabaseConnection>> {
        self.get_json("/api/admin/databases", "list connections")
            .await
    }

    async fn list_tables(&self, connection_id: &str) -> Result<Vec<TableSummary>> {
        let path = format!("/api/admin/databases/{connection_id}/tables");
        self.get_json(&path, "list tables").await
    }
}

#[async_trait]
impl HealthCapability for HttpBackend {
    async fn health_check(&self) -> Result<()> {
        let request = self.apply_headers(self.client.get(self.url("/api/health")), self.health_timeout);
        self.send(request, "health check").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbi_core::AccessState;

    fn backend(endpoint: &str) -> HttpBackend {
        HttpBackend::new(&BackendConfig::new(endpoint), AccessGate::new())
    }

    #[test]
    fn test_url_joining_strips_trailing_slash() {
        let backend = backend("http://localhost:8080/");
        assert_eq!(
            backend.url("/api/sessions"),
            "http://localhost:8080/api/sessions"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 1 is reserved and unassigned; connection is refused fast.
        let backend = backend("http://127.0.0.1:1");
        let err = backend.list_sessions().await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
        // Transport failures never block the gate.
        assert_eq!(backend.gate.current(), AccessState::Open);
    }
}
