use thiserror::Error;

/// Errors returned by the POS API client.
#[derive(Debug, Error)]
pub enum PosError {
    /// The POS host could not be reached (connect failure or timeout).
    #[error("unable to connect to the POS API at {endpoint}: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport-level failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from a feed endpoint.
    #[error("POS API returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The POS rejected the bearer token as invalid or expired.
    #[error("POS token rejected: {0}")]
    AuthExpired(String),

    /// A token could not be acquired from the token endpoint.
    #[error("POS token acquisition failed: {0}")]
    Auth(String),

    /// The POS returned an application-level error `Message`.
    #[error("POS API error: {0}")]
    Api(String),

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON was valid but not in any recognized feed shape.
    #[error("unexpected response shape from {endpoint}: {reason}")]
    UnexpectedShape { endpoint: String, reason: String },

    #[error("invalid POS base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl PosError {
    /// Classifies a `reqwest` failure, separating "cannot connect" from the rest.
    pub(crate) fn from_transport(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            PosError::Unreachable {
                endpoint: endpoint.to_owned(),
                source: err,
            }
        } else {
            PosError::Http(err)
        }
    }

    /// `true` when a single token refresh and retry may resolve the failure.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, PosError::AuthExpired(_))
    }

    /// `true` when the POS host could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, PosError::Unreachable { .. })
    }
}
