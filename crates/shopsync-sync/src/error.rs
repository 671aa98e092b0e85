use shopsync_pos::PosError;
use shopsync_shopify::ShopifyError;
use thiserror::Error;

/// Fatal errors that abort a sync run before any storefront mutation.
///
/// Individual mutation failures are never surfaced here; they are logged and
/// counted in [`crate::EntityCounters::failed`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch POS feed: {0}")]
    Feed(#[from] PosError),

    #[error("POS returned no {0}; refusing to sync from an empty feed")]
    EmptyFeed(&'static str),

    #[error("failed to read storefront catalog: {0}")]
    Catalog(#[from] ShopifyError),
}

impl SyncError {
    /// `true` when either upstream could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        match self {
            SyncError::Feed(e) => e.is_unreachable(),
            SyncError::Catalog(e) => e.is_unreachable(),
            SyncError::EmptyFeed(_) => false,
        }
    }
}
