//! HTTP adapter for the hosted auth service and document API.

use std::rc::Rc;

use async_trait::async_trait;
use dioxus_logger::tracing::{info, warn};
use gloo_net::http::{Request, RequestBuilder, Response};
use repo_client::backend::IdentityStream;
use repo_client::{
    AppConfig, AuthProvider, Backend, ClientError, ClientResult, DocumentStore, Identity,
    IdentityFeed, MemoryBackend, Subscription,
};
use serde::{Deserialize, Serialize};
use shared_types::{Document, DocumentWrite};

use crate::ws;

#[derive(Debug, Serialize)]
pub struct TokenSignInRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SignInResponse {
    pub uid: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct AddDocumentResponse {
    pub id: String,
}

/// Pick the collaborators for this page load. Without an endpoint the app
/// runs against an in-memory store that lives as long as the tab.
pub fn build_backend(config: &AppConfig) -> Backend {
    match config.connection.endpoint.as_deref() {
        Some(endpoint) => {
            info!("Using document API at {}", endpoint);
            let http = Rc::new(HttpBackend::new(endpoint, config.connection.api_key.clone()));
            Backend::new(http.clone(), http)
        }
        None => {
            warn!("No backend endpoint configured, serving from memory");
            MemoryBackend::new().backend()
        }
    }
}

/// Map a non-success status to the error surfaced to callers.
pub fn status_error(status: u16, path: &str) -> Option<ClientError> {
    match status {
        200..=299 => None,
        404 => Some(ClientError::NotFound(path.to_string())),
        401 | 403 => Some(ClientError::Store(format!("permission denied on {path}"))),
        _ => Some(ClientError::Store(format!("HTTP error: {status}"))),
    }
}

#[derive(Clone)]
pub struct HttpBackend {
    endpoint: String,
    api_key: Option<String>,
    identity: IdentityFeed,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            identity: IdentityFeed::default(),
        }
    }

    pub fn auth_url(&self, action: &str) -> String {
        format!("{}/v1/auth/{}", self.endpoint, action)
    }

    pub fn document_url(&self, path: &str) -> String {
        format!("{}/v1/documents/{}", self.endpoint, path)
    }

    fn bearer_token(&self) -> Option<String> {
        self.identity.current().and_then(|identity| identity.token)
    }

    fn authorize(&self, mut builder: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }
        if let Some(token) = self.bearer_token() {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder, write: Option<&DocumentWrite>) -> ClientResult<Response> {
        let request = match write {
            Some(write) => self
                .authorize(builder)
                .json(write)
                .map_err(|e| ClientError::Serialization(format!("Failed to serialize request: {e}")))?,
            None => self
                .authorize(builder)
                .build()
                .map_err(|e| ClientError::Transport(format!("Failed to build request: {e}")))?,
        };

        request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request failed: {e}")))
    }

    async fn write(&self, builder: RequestBuilder, path: &str, write: DocumentWrite) -> ClientResult<Response> {
        let response = self.send(builder, Some(&write)).await?;
        match status_error(response.status(), path) {
            Some(e) => Err(e),
            None => Ok(response),
        }
    }

    async fn sign_in(&self, request: Request, anonymous: bool) -> ClientResult<Identity> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Auth(format!("Request failed: {e}")))?;

        if !response.ok() {
            return Err(ClientError::Auth(format!("HTTP error: {}", response.status())));
        }

        let data: SignInResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Auth(format!("Failed to parse JSON: {e}")))?;

        let identity = Identity {
            uid: data.uid,
            anonymous,
            token: Some(data.token),
        };
        self.identity.publish(Some(identity.clone()));
        Ok(identity)
    }
}

#[async_trait(?Send)]
impl AuthProvider for HttpBackend {
    async fn sign_in_with_token(&self, token: &str) -> ClientResult<Identity> {
        let request = self
            .authorize(Request::post(&self.auth_url("token")))
            .json(&TokenSignInRequest { token })
            .map_err(|e| ClientError::Auth(format!("Failed to serialize request: {e}")))?;
        self.sign_in(request, false).await
    }

    async fn sign_in_anonymously(&self) -> ClientResult<Identity> {
        let request = self
            .authorize(Request::post(&self.auth_url("anonymous")))
            .build()
            .map_err(|e| ClientError::Auth(format!("Failed to build request: {e}")))?;
        self.sign_in(request, true).await
    }

    async fn sign_out(&self) -> ClientResult<()> {
        self.identity.publish(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity.current()
    }

    fn watch_identity(&self) -> IdentityStream {
        self.identity.watch()
    }
}

#[async_trait(?Send)]
impl DocumentStore for HttpBackend {
    async fn get(&self, path: &str) -> ClientResult<Option<Document>> {
        let response = self.send(Request::get(&self.document_url(path)), None).await?;
        match status_error(response.status(), path) {
            None => {}
            Some(ClientError::NotFound(_)) => return Ok(None),
            Some(e) => return Err(e),
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(format!("Failed to parse JSON: {e}")))?;
        Ok(Some(document))
    }

    async fn set(&self, path: &str, write: DocumentWrite) -> ClientResult<()> {
        self.write(Request::put(&self.document_url(path)), path, write)
            .await
            .map(|_| ())
    }

    async fn update(&self, path: &str, write: DocumentWrite) -> ClientResult<()> {
        self.write(Request::patch(&self.document_url(path)), path, write)
            .await
            .map(|_| ())
    }

    async fn add(&self, collection_path: &str, write: DocumentWrite) -> ClientResult<String> {
        let response = self
            .write(Request::post(&self.document_url(collection_path)), collection_path, write)
            .await?;
        let data: AddDocumentResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(format!("Failed to parse JSON: {e}")))?;
        Ok(data.id)
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.send(Request::delete(&self.document_url(path)), None).await?;
        match status_error(response.status(), path) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn listen(&self, collection_path: &str) -> Subscription {
        let url = ws::listen_url(&self.endpoint, collection_path, self.bearer_token().as_deref());
        ws::listen(&url, collection_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let backend = HttpBackend::new("https://db.example.edu", Some("k-1".to_string()));
        assert_eq!(backend.auth_url("anonymous"), "https://db.example.edu/v1/auth/anonymous");
        assert_eq!(
            backend.document_url("artifacts/ut/public/data/materials/m1"),
            "https://db.example.edu/v1/documents/artifacts/ut/public/data/materials/m1"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(200, "p"), None);
        assert_eq!(status_error(204, "p"), None);
        assert_eq!(status_error(404, "p"), Some(ClientError::NotFound("p".to_string())));
        assert!(matches!(status_error(403, "p"), Some(ClientError::Store(_))));
        assert!(matches!(status_error(500, "p"), Some(ClientError::Store(_))));
    }

    #[test]
    fn test_offline_config_uses_memory_backend() {
        let backend = build_backend(&AppConfig::offline());
        assert!(backend.auth.current_identity().is_none());
    }

    #[test]
    fn test_token_request_shape() {
        let body = serde_json::to_value(TokenSignInRequest { token: "tok-1" }).unwrap();
        assert_eq!(body, serde_json::json!({"token": "tok-1"}));
    }
}
