//! Bearer token lifecycle for the POS API.
//!
//! Tokens are cached in memory for a TTL shorter than their real expiry. When
//! a call still fails with [`PosError::AuthExpired`] the cached value is
//! dropped, a new token is fetched unconditionally, and the call is retried
//! exactly once.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::PosError;

const TOKEN_ENDPOINT: &str = "GetSecurityToken/JSON";

/// Login credentials for the POS token endpoint.
#[derive(Clone)]
pub struct PosCredentials {
    pub user: String,
    pub password: String,
    /// Store identifier (`rtd`) the POS scopes the token to.
    pub rtd: String,
}

impl std::fmt::Debug for PosCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosCredentials")
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("rtd", &self.rtd)
            .finish()
    }
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Acquires, caches, and refreshes the POS bearer token.
pub struct TokenManager {
    client: Client,
    token_url: Url,
    credentials: PosCredentials,
    ttl: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub(crate) fn new(
        client: Client,
        base_url: &Url,
        credentials: PosCredentials,
        ttl: Duration,
    ) -> Result<Self, PosError> {
        let token_url = base_url
            .join(TOKEN_ENDPOINT)
            .map_err(|e| PosError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            token_url,
            credentials,
            ttl,
            cached: Mutex::new(None),
        })
    }

    /// Returns the cached token if it has not expired, otherwise refreshes.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::refresh_token`].
    pub async fn get_token(&self) -> Result<String, PosError> {
        {
            let cached = self.cached.lock().await;
            if let Some(token) = cached.as_ref() {
                if Instant::now() < token.expires_at {
                    return Ok(token.value.clone());
                }
            }
        }
        self.refresh_token().await
    }

    /// Requests a new token unconditionally and caches it.
    ///
    /// # Errors
    ///
    /// - [`PosError::Unreachable`] if the token endpoint cannot be reached.
    /// - [`PosError::Auth`] if the endpoint answers with a non-2xx status or
    ///   the body carries no usable token string.
    pub async fn refresh_token(&self) -> Result<String, PosError> {
        tracing::info!("refreshing POS API token");

        let mut url = self.token_url.clone();
        url.query_pairs_mut()
            .append_pair("user", &self.credentials.user)
            .append_pair("pwd", &self.credentials.password)
            .append_pair("rtd", &self.credentials.rtd);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PosError::from_transport(TOKEN_ENDPOINT, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PosError::from_transport(TOKEN_ENDPOINT, e))?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "POS token endpoint rejected request");
            return Err(PosError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|_| PosError::Auth("token endpoint returned a non-JSON body".to_string()))?;

        let Some(token) = extract_token(&payload) else {
            tracing::error!("POS token response carried no usable token");
            return Err(PosError::Auth(
                "invalid token received from POS API".to_string(),
            ));
        };

        *self.cached.lock().await = Some(CachedToken {
            value: token.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        tracing::info!(ttl_secs = self.ttl.as_secs(), "POS API token refreshed");

        Ok(token)
    }

    /// Drops the cached token so the next call fetches a new one.
    pub async fn clear_token(&self) {
        *self.cached.lock().await = None;
        tracing::debug!("POS token cache cleared");
    }

    /// Runs `operation` with the current token, refreshing and retrying once
    /// if it fails with [`PosError::AuthExpired`].
    ///
    /// Any other error, or a second failure after the refresh, is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error from `operation`, or from token acquisition.
    pub async fn with_auto_refresh<T, F, Fut>(&self, mut operation: F) -> Result<T, PosError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, PosError>>,
    {
        let token = self.get_token().await?;
        match operation(token).await {
            Err(err) if err.is_auth_expired() => {
                tracing::warn!(error = %err, "POS token rejected; refreshing and retrying once");
                self.clear_token().await;
                let token = self.refresh_token().await?;
                operation(token).await
            }
            other => other,
        }
    }
}

/// Pulls the token string out of the shapes the POS is known to return:
/// a bare string, or an object keyed by `Token`, `token`, or `SecurityToken`
/// whose value is a string or a nested object with `Token`/`token`.
fn extract_token(payload: &Value) -> Option<String> {
    let candidate = match payload {
        Value::Object(map) => ["Token", "token", "SecurityToken"]
            .iter()
            .find_map(|key| map.get(*key))
            .unwrap_or(payload),
        other => other,
    };

    let value = match candidate {
        Value::Object(inner) => inner.get("Token").or_else(|| inner.get("token"))?,
        other => other,
    };

    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
