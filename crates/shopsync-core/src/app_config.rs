use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_keys: Vec<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Root of the POS REST API, e.g. `http://pos.example.com:58200/rest`.
    pub pos_base_url: String,
    pub pos_user: String,
    pub pos_password: String,
    /// Store identifier the POS expects on the token request (`rtd`).
    pub pos_rtd: String,
    /// Lifetime of a cached POS token. Kept below the real one-hour expiry.
    pub pos_token_ttl_secs: u64,
    pub pos_request_timeout_secs: u64,
    /// `*.myshopify.com` domain of the storefront.
    pub shopify_shop_domain: String,
    pub shopify_access_token: String,
    pub shopify_api_version: String,
    pub shopify_request_timeout_secs: u64,
    pub shopify_max_retries: u32,
    pub shopify_retry_backoff_base_secs: u64,
    /// Pause after every N-th POS feed entry during reconciliation.
    pub sync_throttle_every: usize,
    pub sync_throttle_pause_ms: u64,
    /// Cron expression for the scheduled product sync; `None` disables it.
    pub sync_cron: Option<String>,
    pub menu_output_dir: PathBuf,
}

impl AppConfig {
    /// Base URL of the Shopify Admin REST API for the configured shop and version.
    #[must_use]
    pub fn shopify_admin_base_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}",
            self.shopify_shop_domain.trim_end_matches('/'),
            self.shopify_api_version
        )
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("pos_base_url", &self.pos_base_url)
            .field("pos_user", &self.pos_user)
            .field("pos_password", &"[redacted]")
            .field("pos_rtd", &self.pos_rtd)
            .field("pos_token_ttl_secs", &self.pos_token_ttl_secs)
            .field("pos_request_timeout_secs", &self.pos_request_timeout_secs)
            .field("shopify_shop_domain", &self.shopify_shop_domain)
            .field("shopify_access_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field(
                "shopify_request_timeout_secs",
                &self.shopify_request_timeout_secs,
            )
            .field("shopify_max_retries", &self.shopify_max_retries)
            .field(
                "shopify_retry_backoff_base_secs",
                &self.shopify_retry_backoff_base_secs,
            )
            .field("sync_throttle_every", &self.sync_throttle_every)
            .field("sync_throttle_pause_ms", &self.sync_throttle_pause_ms)
            .field("sync_cron", &self.sync_cron)
            .field("menu_output_dir", &self.menu_output_dir)
            .finish()
    }
}
