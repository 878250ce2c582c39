//! Authenticated HTTP client for the CourierSync services.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the inventory service. Every request carries a bearer
//! token when a session is present; a 401 triggers one token refresh and
//! one replay of the request before the session is declared dead.

use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthService, RefreshOutcome};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client shared by the auth and API layers.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

/// Replay bookkeeping for 401 recovery. A request starts in `Initial`;
/// after one refresh-and-replay it is `Retried` and a further 401 is
/// surfaced as an ordinary HTTP error instead of another refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    Initial,
    Retried,
}

/// API client for the inventory service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth: AuthService,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>, auth: AuthService) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Resolve an endpoint against the configured base URL with exactly one
    /// separating slash. Absolute URLs pass through untouched.
    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            )
        }
    }

    /// Start from `Content-Type: application/json`, merge caller headers
    /// over it, then set the bearer token. Authorization always reflects
    /// the current session, even over a caller-supplied value.
    fn build_headers(
        extra: Option<&header::HeaderMap>,
        token: Option<&str>,
    ) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(extra) = extra {
            for (name, value) in extra {
                headers.insert(name.clone(), value.clone());
            }
        }

        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}")).map_err(
                |_| ApiError::InvalidResponse("stored access token is not a valid header value".to_string()),
            )?;
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Issue `method` against `endpoint`, decoding the JSON reply.
    ///
    /// Returns `Ok(None)` for a success without a JSON body (a 204, or an
    /// acknowledgement with no content type); callers decide whether that
    /// is meaningful. `body` is serialized as JSON when present and omitted
    /// entirely when `None`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_headers(method, endpoint, body, None).await
    }

    /// [`request`](Self::request) with extra headers merged over the defaults.
    pub async fn request_with_headers<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        extra_headers: Option<&header::HeaderMap>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.resolve_url(endpoint);
        let mut token = self.auth.access_token();
        let mut state = RetryState::Initial;

        loop {
            let headers = Self::build_headers(extra_headers, token.as_deref())?;
            let mut request = self.http.request(method.clone(), &url).headers(headers);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED && state == RetryState::Initial {
                debug!(url = %url, "401 received, attempting token refresh");
                match self.auth.refresh_access_token().await {
                    RefreshOutcome::Refreshed(new_token) => {
                        token = Some(new_token);
                        state = RetryState::Retried;
                        continue;
                    }
                    outcome => {
                        warn!(url = %url, ?outcome, "session could not be recovered");
                        return Err(ApiError::SessionExpired);
                    }
                }
            }

            return Self::into_result(&url, response).await;
        }
    }

    /// Map a terminal response to the caller's result.
    async fn into_result<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<Option<T>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            debug!(url = %url, status = %status, "success without a JSON body");
            return Ok(None);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {url}: {e}")))
    }

    // ===== Convenience wrappers =====

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, ApiError> {
        self.request(Method::GET, endpoint, None::<&()>).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: Option<&B>) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, body).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: Option<&B>) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, ApiError> {
        self.request(Method::DELETE, endpoint, None::<&()>).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::MemorySessionStore;

    fn test_client(base_url: &str) -> ApiClient {
        let http = Client::new();
        let auth = AuthService::new(http.clone(), "http://localhost:0/api", Arc::new(MemorySessionStore::new()));
        ApiClient::new(http, base_url, auth)
    }

    #[test]
    fn resolves_relative_endpoints_with_one_slash() {
        let client = test_client("https://api.example.com/api");
        assert_eq!(
            client.resolve_url("/paquetes"),
            "https://api.example.com/api/paquetes"
        );
        assert_eq!(
            client.resolve_url("paquetes"),
            "https://api.example.com/api/paquetes"
        );

        let trailing = test_client("https://api.example.com/api/");
        assert_eq!(
            trailing.resolve_url("/paquetes"),
            "https://api.example.com/api/paquetes"
        );
        assert_eq!(
            trailing.resolve_url("paquetes"),
            "https://api.example.com/api/paquetes"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let client = test_client("https://api.example.com/api");
        assert_eq!(
            client.resolve_url("https://other.example.com/v2/thing"),
            "https://other.example.com/v2/thing"
        );
        assert_eq!(
            client.resolve_url("http://insecure.example.com/x"),
            "http://insecure.example.com/x"
        );
    }

    #[test]
    fn default_headers_carry_json_content_type() {
        let headers = ApiClient::build_headers(None, None).unwrap();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn caller_headers_merge_over_defaults() {
        let mut extra = header::HeaderMap::new();
        extra.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/plain"),
        );
        extra.insert("x-request-id", header::HeaderValue::from_static("42"));

        let headers = ApiClient::build_headers(Some(&extra), None).unwrap();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-request-id").unwrap(), "42");
    }

    #[test]
    fn bearer_token_wins_over_caller_authorization() {
        let mut extra = header::HeaderMap::new();
        extra.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_static("Basic abc"),
        );

        let headers = ApiClient::build_headers(Some(&extra), Some("T1")).unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer T1");
    }
}
