//! `shopsync-cli sync` handlers.

use shopsync_core::{AppConfig, SyncAction};
use shopsync_pos::{PosClient, PosFeed};
use shopsync_shopify::ShopifyClient;
use shopsync_sync::{run_product_sync, EntityCounters, SyncOptions, SyncReport};

use crate::record_best_effort;

/// Runs one reconciliation against the live POS and storefront.
///
/// # Errors
///
/// Returns an error if a client cannot be built or the run aborts before
/// reconciling (feed unavailable, empty feed, catalog unreadable).
pub(crate) async fn run_sync(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let pos = PosClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build POS client: {e}"))?;
    let shopify = ShopifyClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))?;

    let report = run_product_sync(&pos, &shopify, &SyncOptions::from_app_config(config)).await?;
    record_best_effort(pool, SyncAction::SyncProducts).await;

    print!("{}", format_report(&report));
    if report.failures() > 0 {
        tracing::warn!(failed = report.failures(), "sync finished with failed calls");
    }
    Ok(())
}

/// Fetches the POS feed and prints what a sync would work from.
///
/// # Errors
///
/// Returns an error if the POS client cannot be built or the feed fetch fails.
pub(crate) async fn run_dry_run(config: &AppConfig) -> anyhow::Result<()> {
    let pos = PosClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build POS client: {e}"))?;
    let feed = pos.fetch_feed().await?;
    print!("{}", format_feed_summary(&feed));
    Ok(())
}

fn format_counters(label: &str, c: &EntityCounters) -> String {
    format!(
        "{label:<16} created={} updated={} skipped={} existing={} deleted={} failed={}\n",
        c.created, c.updated, c.skipped, c.existing, c.deleted, c.failed
    )
}

pub(crate) fn format_report(report: &SyncReport) -> String {
    let mut out = String::from("sync complete\n");
    out.push_str(&format_counters("departments", &report.departments));
    out.push_str(&format_counters("sub-departments", &report.sub_departments));
    out.push_str(&format_counters("products", &report.products));
    out
}

pub(crate) fn format_feed_summary(feed: &PosFeed) -> String {
    let with_barcode = feed
        .products
        .iter()
        .filter(|p| p.barcode.as_deref().is_some_and(|b| !b.trim().is_empty()))
        .count();
    let unmapped = feed
        .products
        .iter()
        .filter(|p| p.department_id.is_none() && p.sub_department_id.is_none())
        .count();

    format!(
        "dry-run: departments={} sub-departments={} products={} (with barcode={with_barcode}, unmapped={unmapped})\n",
        feed.departments.len(),
        feed.sub_departments.len(),
        feed.products.len(),
    )
}
