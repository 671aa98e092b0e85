use std::time::Instant;

use crate::error::SyncError;
use crate::reconcile::{reconcile, CatalogCache, SyncOptions};
use crate::report::SyncReport;
use crate::source::{FeedSource, Storefront};

/// Executes one full product sync.
///
/// The feed is fetched and validated, then the storefront product and
/// membership caches are built, all before the first mutation. Any failure in
/// those phases aborts the run with nothing written.
///
/// # Errors
///
/// Returns [`SyncError::Feed`] when the POS feed cannot be fetched,
/// [`SyncError::EmptyFeed`] when any of the three lists is empty, and
/// [`SyncError::Catalog`] when the storefront catalog cannot be read.
pub async fn run_product_sync<F, S>(
    feed_source: &F,
    storefront: &S,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError>
where
    F: FeedSource + ?Sized,
    S: Storefront + ?Sized,
{
    let started = Instant::now();
    let feed = feed_source.fetch_feed().await?;

    if feed.departments.is_empty() {
        return Err(SyncError::EmptyFeed("departments"));
    }
    if feed.sub_departments.is_empty() {
        return Err(SyncError::EmptyFeed("sub-departments"));
    }
    if feed.products.is_empty() {
        return Err(SyncError::EmptyFeed("products"));
    }
    tracing::info!(
        departments = feed.departments.len(),
        sub_departments = feed.sub_departments.len(),
        products = feed.products.len(),
        "POS feed fetched"
    );

    let mut cache = CatalogCache {
        products: storefront.build_product_cache().await?,
        membership: storefront.build_collection_membership().await?,
    };

    let report = reconcile(
        storefront,
        &feed.departments,
        &feed.sub_departments,
        &feed.products,
        &mut cache,
        options,
    )
    .await;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis(),
        products_total = report.products.total(),
        failures = report.failures(),
        "product sync complete"
    );
    Ok(report)
}
