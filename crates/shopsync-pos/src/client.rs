//! HTTP client for the POS REST API.
//!
//! Wraps `reqwest` with POS-specific token handling and error classification.
//! Each feed call goes through [`TokenManager::with_auto_refresh`] and the
//! raw JSON is handed to the [`crate::feed`] adapter.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use shopsync_core::{AppConfig, Department, PosProduct, SubDepartment};

use crate::error::PosError;
use crate::feed;
use crate::token::{PosCredentials, TokenManager};

const DEPARTMENTS_ENDPOINT: &str = "GetDepList/JSON";
const SUB_DEPARTMENTS_ENDPOINT: &str = "GetSubList/JSON";
const PRODUCTS_ENDPOINT: &str = "GetWebProductList/json";

/// The three POS listings fetched together for a sync or menu run.
#[derive(Debug, Clone, Default)]
pub struct PosFeed {
    pub departments: Vec<Department>,
    pub sub_departments: Vec<SubDepartment>,
    pub products: Vec<PosProduct>,
}

/// Client for the POS REST API.
pub struct PosClient {
    client: Client,
    base_url: Url,
    tokens: TokenManager,
}

impl PosClient {
    /// Creates a client rooted at `base_url` (for example
    /// `http://host:58200/rest`).
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`PosError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(
        base_url: &str,
        credentials: PosCredentials,
        token_ttl: Duration,
        timeout_secs: u64,
    ) -> Result<Self, PosError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopsync/0.1 (catalog-sync)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PosError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let tokens = TokenManager::new(client.clone(), &base_url, credentials, token_ttl)?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Builds a client from the POS section of [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`PosClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PosError> {
        Self::new(
            &config.pos_base_url,
            PosCredentials {
                user: config.pos_user.clone(),
                password: config.pos_password.clone(),
                rtd: config.pos_rtd.clone(),
            },
            Duration::from_secs(config.pos_token_ttl_secs),
            config.pos_request_timeout_secs,
        )
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Fetches the department list.
    ///
    /// # Errors
    ///
    /// - [`PosError::Unreachable`] if the POS host cannot be reached.
    /// - [`PosError::AuthExpired`] if the token is still rejected after one refresh.
    /// - [`PosError::Api`] for any other token-related `Message`.
    /// - [`PosError::Status`], [`PosError::Deserialize`], or
    ///   [`PosError::UnexpectedShape`] for malformed responses.
    pub async fn fetch_departments(&self) -> Result<Vec<Department>, PosError> {
        let payload = self.fetch_endpoint(DEPARTMENTS_ENDPOINT, &[]).await?;
        let entries = feed::unwrap_list(payload, feed::DEPARTMENTS_KEY, DEPARTMENTS_ENDPOINT)?;
        let departments = feed::parse_departments(entries);
        tracing::info!(count = departments.len(), "fetched POS departments");
        Ok(departments)
    }

    /// Fetches the sub-department list.
    ///
    /// # Errors
    ///
    /// Same as [`PosClient::fetch_departments`].
    pub async fn fetch_sub_departments(&self) -> Result<Vec<SubDepartment>, PosError> {
        let payload = self.fetch_endpoint(SUB_DEPARTMENTS_ENDPOINT, &[]).await?;
        let entries = feed::unwrap_list(
            payload,
            feed::SUB_DEPARTMENTS_KEY,
            SUB_DEPARTMENTS_ENDPOINT,
        )?;
        let subs = feed::parse_sub_departments(entries);
        tracing::info!(count = subs.len(), "fetched POS sub-departments");
        Ok(subs)
    }

    /// Fetches the web product list including promotional prices.
    ///
    /// # Errors
    ///
    /// Same as [`PosClient::fetch_departments`].
    pub async fn fetch_products(&self) -> Result<Vec<PosProduct>, PosError> {
        let payload = self
            .fetch_endpoint(PRODUCTS_ENDPOINT, &[("promos", "true")])
            .await?;
        let entries = feed::unwrap_list(payload, feed::PRODUCTS_KEY, PRODUCTS_ENDPOINT)?;
        let products = feed::parse_products(entries);
        tracing::info!(count = products.len(), "fetched POS products");
        Ok(products)
    }

    /// Fetches departments, sub-departments, and products in that order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; nothing is partially returned.
    pub async fn fetch_feed(&self) -> Result<PosFeed, PosError> {
        let departments = self.fetch_departments().await?;
        let sub_departments = self.fetch_sub_departments().await?;
        let products = self.fetch_products().await?;
        Ok(PosFeed {
            departments,
            sub_departments,
            products,
        })
    }

    async fn fetch_endpoint(
        &self,
        endpoint: &'static str,
        extra: &[(&str, &str)],
    ) -> Result<Value, PosError> {
        self.tokens
            .with_auto_refresh(|token| {
                let url = self.build_url(endpoint, &token, extra);
                async move { self.request_json(endpoint, url).await }
            })
            .await
    }

    fn build_url(&self, endpoint: &str, token: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{endpoint}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("token", token);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends the GET, maps the status, parses JSON, and checks for an
    /// application-level token `Message`.
    async fn request_json(&self, endpoint: &str, url: Url) -> Result<Value, PosError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PosError::from_transport(endpoint, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PosError::AuthExpired(format!(
                "{endpoint} returned HTTP 401"
            )));
        }
        if !status.is_success() {
            tracing::error!(endpoint, status = status.as_u16(), "POS request failed");
            return Err(PosError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_owned(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PosError::from_transport(endpoint, e))?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|e| PosError::Deserialize {
                context: endpoint.to_owned(),
                source: e,
            })?;

        check_token_message(&payload)?;
        Ok(payload)
    }
}

/// Inspects a top-level `Message` field. Messages mentioning the token are
/// errors; those that also say "invalid" or "expired" are refreshable.
fn check_token_message(payload: &Value) -> Result<(), PosError> {
    let Some(message) = payload.get("Message").and_then(Value::as_str) else {
        return Ok(());
    };
    let lower = message.to_lowercase();
    if !lower.contains("token") {
        return Ok(());
    }
    if lower.contains("invalid") || lower.contains("expired") {
        Err(PosError::AuthExpired(message.to_owned()))
    } else {
        Err(PosError::Api(message.to_owned()))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
