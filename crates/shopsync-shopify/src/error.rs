use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Shopify could not be reached (connect failure or timeout).
    #[error("unable to connect to Shopify at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("pagination limit reached for {url}: exceeded {max_pages} pages")]
    PaginationLimit { url: String, max_pages: usize },

    #[error("invalid Shopify admin URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("response from {context} is missing \"{field}\"")]
    MissingField { context: String, field: &'static str },
}

impl ShopifyError {
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ShopifyError::Unreachable {
                url: url.to_owned(),
                source: err,
            }
        } else {
            ShopifyError::Http(err)
        }
    }

    /// `true` when Shopify could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ShopifyError::Unreachable { .. })
    }

    /// `true` when a collect creation was rejected because the membership
    /// already exists.
    #[must_use]
    pub fn is_duplicate_collect(&self) -> bool {
        match self {
            ShopifyError::UnexpectedStatus { body, .. } => {
                body.contains("already exists") || body.contains("duplicate")
            }
            _ => false,
        }
    }
}
