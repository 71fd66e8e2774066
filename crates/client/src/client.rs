//! HTTP transport shared by every resource API.

use std::sync::Arc;

use ems_types::{ApiEnvelope, ErrorBody, Portal};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::{ClientConfig, normalize_base_url},
    error::{ClientError, ClientResult},
    token_store::{FileTokenStore, TokenStore},
};

/// Talks to the EMS REST API on behalf of one user. Every call names the
/// portal it acts for; that portal's stored token is sent as a bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ems-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, base_url, tokens))
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl AsRef<str>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url.as_ref()),
            tokens,
        }
    }

    /// Client backed by the token file named in `config`.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let tokens = Arc::new(FileTokenStore::new(config.token_file.clone()));
        Self::new(&config.base_url, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, portal: Portal, path: &str) -> ClientResult<T> {
        let envelope = self.get_envelope(portal, path).await?;
        into_data(envelope, path)
    }

    pub async fn get_query<T, Q>(&self, portal: Portal, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let (builder, authed) = self.prepare(portal, Method::GET, path)?;
        let envelope = self
            .dispatch(portal, &Method::GET, path, builder.query(query), authed)
            .await?;
        into_data(envelope, path)
    }

    /// Full envelope, for endpoints that answer `success: false` with 200.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        portal: Portal,
        path: &str,
    ) -> ClientResult<ApiEnvelope<T>> {
        let (builder, authed) = self.prepare(portal, Method::GET, path)?;
        self.dispatch(portal, &Method::GET, path, builder, authed).await
    }

    pub async fn post<T, B>(&self, portal: Portal, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope = self.send_json(portal, Method::POST, path, body).await?;
        into_data(envelope, path)
    }

    pub async fn patch<T, B>(&self, portal: Portal, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope = self.send_json(portal, Method::PATCH, path, body).await?;
        into_data(envelope, path)
    }

    pub async fn put<T, B>(&self, portal: Portal, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope = self.send_json(portal, Method::PUT, path, body).await?;
        into_data(envelope, path)
    }

    /// POST whose answer carries only a message.
    pub async fn post_for_message<B>(&self, portal: Portal, path: &str, body: &B) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        let envelope: ApiEnvelope<serde_json::Value> =
            self.send_json(portal, Method::POST, path, body).await?;
        Ok(envelope.message)
    }

    pub async fn patch_for_message<B>(&self, portal: Portal, path: &str, body: &B) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        let envelope: ApiEnvelope<serde_json::Value> =
            self.send_json(portal, Method::PATCH, path, body).await?;
        Ok(envelope.message)
    }

    /// DELETE; returns the server's confirmation message.
    pub async fn delete(&self, portal: Portal, path: &str) -> ClientResult<String> {
        let (builder, authed) = self.prepare(portal, Method::DELETE, path)?;
        let envelope: ApiEnvelope<serde_json::Value> = self
            .dispatch(portal, &Method::DELETE, path, builder, authed)
            .await?;
        Ok(envelope.message)
    }

    /// Sends `body` and decodes the raw response body as `T`.
    pub async fn send_json<T, B>(
        &self,
        portal: Portal,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (builder, authed) = self.prepare(portal, method.clone(), path)?;
        self.dispatch(portal, &method, path, builder.json(body), authed)
            .await
    }

    fn prepare(&self, portal: Portal, method: Method, path: &str) -> ClientResult<(RequestBuilder, bool)> {
        let mut builder = self.http.request(method, self.url(path));
        let token = self.tokens.get(portal)?;
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }
        Ok((builder, token.is_some()))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        portal: Portal,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
        authed: bool,
    ) -> ClientResult<T> {
        debug!(
            %method,
            path,
            %portal,
            auth = if authed { "bearer" } else { "none" },
            "api request"
        );
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%method, path, status = status.as_u16(), "api response");

        if !status.is_success() {
            return Err(self.reject(portal, status, &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn reject(&self, portal: Portal, status: StatusCode, bytes: &[u8]) -> ClientError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            match self.tokens.remove(portal) {
                Ok(()) => debug!(%portal, status = status.as_u16(), "stored token cleared"),
                Err(err) => warn!(%portal, error = %err, "could not clear stored token"),
            }
        }
        let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
        let message = if body.message.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            body.message
        };
        ClientError::Api {
            status,
            message,
            gologin: body.gologin.unwrap_or(false),
        }
    }
}

fn into_data<T>(envelope: ApiEnvelope<T>, path: &str) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::MissingData(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;

    #[test]
    fn urls_join_without_double_slash() {
        let client = ApiClient::new("http://localhost:5001/", Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
        assert_eq!(client.url("/healthz"), "http://localhost:5001/healthz");
    }

    #[test]
    fn rejection_keeps_server_message() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(Portal::Employee, "stale").unwrap();
        let client = ApiClient::new("http://localhost", store.clone()).unwrap();

        let err = client.reject(
            Portal::Employee,
            StatusCode::UNAUTHORIZED,
            br#"{"success":false,"message":"Invalid or expired token","gologin":true}"#,
        );
        assert_eq!(err.user_message(), "Invalid or expired token");
        assert!(err.requires_login());
        assert_eq!(store.get(Portal::Employee).unwrap(), None);
    }

    #[test]
    fn rejection_without_body_uses_status_text() {
        let client = ApiClient::new("http://localhost", Arc::new(MemoryTokenStore::new())).unwrap();
        let err = client.reject(Portal::Hr, StatusCode::NOT_FOUND, b"");
        assert_eq!(err.user_message(), "Not Found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.requires_login());
    }
}
