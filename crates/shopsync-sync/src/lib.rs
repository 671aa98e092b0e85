//! Reconciliation of the POS catalog into the Shopify storefront.
//!
//! [`reconcile`] is the diffing engine: it walks departments, sub-departments,
//! and products in feed order, issuing create/update/collect/delete calls
//! through the [`Storefront`] seam and mutating the run-scoped
//! [`CatalogCache`] as it goes. [`run_product_sync`] wires it to a live feed.

pub mod error;
pub mod reconcile;
pub mod report;
pub mod run;
pub mod source;

pub use error::SyncError;
pub use reconcile::{reconcile, CatalogCache, SyncOptions};
pub use report::{EntityCounters, SyncReport};
pub use run::run_product_sync;
pub use source::{FeedSource, Storefront};
