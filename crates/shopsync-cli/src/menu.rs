//! `shopsync-cli menu` handler.

use std::path::Path;

use chrono::Local;
use shopsync_core::{AppConfig, SyncAction};
use shopsync_menu::{generate_menu, write_export, MenuStats};
use shopsync_pos::PosClient;
use shopsync_shopify::ShopifyClient;

use crate::record_best_effort;

/// Builds the mega menu from live data and writes it under `output_dir`.
///
/// # Errors
///
/// Returns an error if a client cannot be built, either upstream fails, or
/// the export cannot be written.
pub(crate) async fn run_menu(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let pos = PosClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build POS client: {e}"))?;
    let shopify = ShopifyClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))?;

    let generated = generate_menu(&shopify, &pos).await?;
    let path = write_export(output_dir, &generated.document, Local::now().naive_local()).await?;
    record_best_effort(pool, SyncAction::MegaMenu).await;

    print!("{}", format_stats(&generated.stats));
    println!("written to {}", path.display());
    Ok(())
}

pub(crate) fn format_stats(stats: &MenuStats) -> String {
    format!(
        "mega menu: {} categories from {} collections, {} departments, {} sub-departments\n",
        stats.categories, stats.collections, stats.departments, stats.sub_departments
    )
}
