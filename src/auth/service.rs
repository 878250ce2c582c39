//! Login, logout, and token refresh against the authentication service.
//!
//! `AuthService` is the single source of truth for "is there a usable
//! session" and the only component that writes session storage. The
//! request client calls [`AuthService::refresh_access_token`] when a 401
//! tells it the access token went stale.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::ApiError;

use super::session::{keys, SessionStore};

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Payload returned by `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub role: String,
    #[serde(rename = "permisos", default)]
    pub permissions: Vec<String>,
}

/// Body for the refresh and revoke endpoints.
#[derive(Debug, Serialize)]
struct RefreshTokenBody<'a> {
    refresh_token: &'a str,
}

/// Reply from the refresh endpoint. The service has shipped the new token
/// under both names; `access_token` wins when both are present.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl RefreshResponse {
    fn into_token(self) -> Option<String> {
        self.access_token
            .filter(|t| !t.is_empty())
            .or(self.token.filter(|t| !t.is_empty()))
    }
}

/// Outcome of a refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was obtained and persisted.
    Refreshed(String),
    /// No refresh token is stored; nothing was sent and the session
    /// (such as it is) was left alone.
    NoRefreshToken,
    /// The service rejected the refresh or the reply was unusable; the
    /// session has been cleared.
    Rejected,
}

/// Credential lifecycle against the authentication service.
/// Clone is cheap - the HTTP client and the store are shared internally.
#[derive(Clone)]
pub struct AuthService {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    /// `http` is shared with the API client so both reuse one connection pool.
    pub fn new(http: Client, base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            store,
        }
    }

    /// Authenticate and persist the returned session, replacing any prior one.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/login", self.base_url);

        let response = self.http.post(&url).json(credentials).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "login rejected");
            let message = if body.trim().is_empty() {
                format!("login rejected with status {status}")
            } else {
                body
            };
            return Err(ApiError::Authentication(message));
        }

        let data: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("bad login payload: {e}")))?;

        self.save_session(&data);
        debug!(role = %data.role, "login succeeded");
        Ok(data)
    }

    /// Revoke the refresh token server-side (best effort) and clear the
    /// local session. Idempotent: with no session present this is a no-op
    /// for both the server call and storage.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.refresh_token() {
            let url = format!("{}/login/logout", self.base_url);
            let body = RefreshTokenBody {
                refresh_token: &refresh_token,
            };
            // Revocation failure never blocks local cleanup.
            match self.http.post(&url).json(&body).send().await {
                Ok(response) => debug!(status = %response.status(), "refresh token revocation sent"),
                Err(e) => warn!(error = %e, "refresh token revocation failed"),
            }
        }

        for key in keys::ALL {
            self.store.remove(key);
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// With no refresh token stored this returns immediately without a
    /// network call. Any refresh failure is session death: a full
    /// [`logout`](Self::logout) runs before `Rejected` is returned. On
    /// success only the stored access token is overwritten.
    pub async fn refresh_access_token(&self) -> RefreshOutcome {
        let Some(refresh_token) = self.refresh_token() else {
            debug!("no refresh token stored, skipping refresh");
            return RefreshOutcome::NoRefreshToken;
        };

        let url = format!("{}/login/refresh", self.base_url);
        let body = RefreshTokenBody {
            refresh_token: &refresh_token,
        };

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token refresh failed to send");
                self.logout().await;
                return RefreshOutcome::Rejected;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "token refresh rejected");
            self.logout().await;
            return RefreshOutcome::Rejected;
        }

        let parsed: RefreshResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "token refresh reply unreadable");
                self.logout().await;
                return RefreshOutcome::Rejected;
            }
        };

        match parsed.into_token() {
            Some(token) => {
                self.store.set(keys::ACCESS_TOKEN, &token);
                debug!("access token refreshed");
                RefreshOutcome::Refreshed(token)
            }
            None => {
                warn!("token refresh reply carried no token");
                self.logout().await;
                RefreshOutcome::Rejected
            }
        }
    }

    // ===== Session reads (safe with no session present) =====

    pub fn access_token(&self) -> Option<String> {
        self.store.get(keys::ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(keys::REFRESH_TOKEN)
    }

    pub fn user_role(&self) -> Option<String> {
        self.store.get(keys::USER_ROLE)
    }

    /// Stored permission list; empty when absent or undecodable.
    pub fn user_permissions(&self) -> Vec<String> {
        self.store
            .get(keys::USER_PERMISSIONS)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Access token presence is the sole authentication predicate; local
    /// expiry is not checked, the backend answers 401 when it matters.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn save_session(&self, data: &LoginResponse) {
        let permissions =
            serde_json::to_string(&data.permissions).unwrap_or_else(|_| "[]".to_string());
        self.store.set(keys::ACCESS_TOKEN, &data.token);
        self.store.set(keys::REFRESH_TOKEN, &data.refresh_token);
        self.store.set(keys::USER_ROLE, &data.role);
        self.store.set(keys::USER_PERMISSIONS, &permissions);
    }
}
