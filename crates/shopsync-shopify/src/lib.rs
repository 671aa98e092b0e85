pub mod cache;
pub mod client;
pub mod error;
pub mod pagination;
mod rate_limit;
pub mod types;

pub use cache::{CollectionMembership, ProductCache, ProductSnapshot};
pub use client::ShopifyClient;
pub use error::ShopifyError;
pub use types::{Collection, CollectOutcome, CreatedProduct, NewProduct, ProductUpdate};
