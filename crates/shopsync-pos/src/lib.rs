//! Client for the POS REST API.
//!
//! Every feed call runs through [`TokenManager::with_auto_refresh`], which
//! retries exactly once with a fresh token when the POS reports the current
//! one as invalid or expired. Responses are normalized by the [`feed`]
//! adapter into the canonical records of `shopsync-core`.

pub mod client;
pub mod error;
pub mod feed;
pub mod token;

pub use client::{PosClient, PosFeed};
pub use error::PosError;
pub use token::{PosCredentials, TokenManager};
