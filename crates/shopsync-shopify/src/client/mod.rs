//! HTTP client for the Shopify Admin REST API.

mod catalog;
mod mutations;

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopsync_core::AppConfig;

use crate::error::ShopifyError;
use crate::pagination::extract_next_url;
use crate::rate_limit::retry_with_backoff;
use crate::types::Page;

/// Maximum number of pages to follow for one listing before giving up.
/// Prevents infinite loops on cycling cursors.
pub(super) const MAX_PAGES: usize = 500;

/// Page size for every listing endpoint.
pub(super) const PAGE_LIMIT: u32 = 250;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Error bodies are kept for classification but capped for log output.
const MAX_ERROR_BODY_CHARS: usize = 1000;

/// HTTP client for one shop's Admin API.
///
/// Rate limiting (429) and connectivity failures are retried with
/// exponential backoff up to `max_retries` additional attempts; any other
/// non-2xx response becomes [`ShopifyError::UnexpectedStatus`] carrying the
/// response body.
pub struct ShopifyClient {
    pub(super) client: Client,
    /// `https://{shop}/admin/api/{version}/`, always with a trailing slash.
    pub(super) base_url: Url,
    access_token: String,
    pub(super) max_retries: u32,
    pub(super) backoff_base_secs: u64,
}

/// Body and `Link` header of a successful response.
pub(super) struct RawResponse {
    pub body: String,
    pub link: Option<String>,
}

impl ShopifyClient {
    /// Creates a client for `admin_base_url`
    /// (e.g. `https://shop.myshopify.com/admin/api/2025-07`).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ShopifyError::InvalidBaseUrl`] if the base
    /// URL does not parse.
    pub fn new(
        admin_base_url: &str,
        access_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopsync/0.1 (catalog-sync)")
            .build()?;

        let normalised = format!("{}/", admin_base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ShopifyError::InvalidBaseUrl {
            base_url: admin_base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the Shopify section of [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`ShopifyClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ShopifyError> {
        Self::new(
            &config.shopify_admin_base_url(),
            &config.shopify_access_token,
            config.shopify_request_timeout_secs,
            config.shopify_max_retries,
            config.shopify_retry_backoff_base_secs,
        )
    }

    /// Resolves `path` (e.g. `"products.json"`) against the admin base URL
    /// and appends `query`.
    pub(super) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ShopifyError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ShopifyError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends one request with retry and maps the response status.
    pub(super) async fn execute<B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<RawResponse, ShopifyError>
    where
        B: Serialize + Sync + ?Sized,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let method = method.clone();
            async move {
                let mut request = self
                    .client
                    .request(method, url)
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json");
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| ShopifyError::from_transport(url, e))?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .map_or(0, parse_retry_after);
                    return Err(ShopifyError::RateLimited { retry_after_secs });
                }

                // Extract the Link header before consuming the response body.
                let link = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let text = response
                    .text()
                    .await
                    .map_err(|e| ShopifyError::from_transport(url, e))?;

                if !status.is_success() {
                    return Err(ShopifyError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                        body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                    });
                }

                Ok(RawResponse { body: text, link })
            }
        })
        .await
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ShopifyError> {
        let raw = self.execute::<()>(Method::GET, url, None).await?;
        parse_body(&raw.body, url)
    }

    /// Fetches every page of a listing, following `Link: rel="next"` URLs.
    ///
    /// All-or-nothing: a failure on any page discards earlier pages, since a
    /// partial listing would make present products look like orphans.
    ///
    /// # Errors
    ///
    /// Propagates any request error, and returns
    /// [`ShopifyError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub(super) async fn fetch_all<P: Page>(&self, first: Url) -> Result<Vec<P::Item>, ShopifyError> {
        let first = first.to_string();
        let mut items = Vec::new();
        let mut next = Some(first.clone());
        let mut page_count = 0usize;

        while let Some(url) = next {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    url: first,
                    max_pages: MAX_PAGES,
                });
            }

            let raw = self.execute::<()>(Method::GET, &url, None).await?;
            let page: P = parse_body(&raw.body, &url)?;
            items.extend(page.into_items());
            next = extract_next_url(raw.link.as_deref());
        }

        tracing::debug!(url = %first, pages = page_count, items = items.len(), "listing fetched");
        Ok(items)
    }
}

/// Shopify sends fractional seconds (`"2.0"`); anything unparseable is 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_retry_after(value: &str) -> u64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map_or(0, |secs| secs.ceil() as u64)
}

fn parse_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, ShopifyError> {
    serde_json::from_str(body).map_err(|e| ShopifyError::Deserialize {
        context: url.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
