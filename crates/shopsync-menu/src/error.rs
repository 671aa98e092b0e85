use std::path::PathBuf;

use shopsync_pos::PosError;
use shopsync_shopify::ShopifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to fetch POS departments: {0}")]
    Feed(#[from] PosError),

    #[error("failed to list storefront collections: {0}")]
    Catalog(#[from] ShopifyError),

    #[error("failed to serialize menu document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write menu export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MenuError {
    /// `true` when either upstream could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        match self {
            MenuError::Feed(e) => e.is_unreachable(),
            MenuError::Catalog(e) => e.is_unreachable(),
            MenuError::Serialize(_) | MenuError::Write { .. } => false,
        }
    }
}
