//! Sync and menu runs shared by the HTTP handlers and the scheduler.
//!
//! Every run holds the single run lock for its whole duration; a caller that
//! cannot take the lock gets [`JobError::Busy`] instead of queueing. Runs are
//! spawned, so a dropped HTTP request does not stop one midway.

use std::sync::Arc;

use chrono::Local;
use shopsync_core::SyncAction;
use shopsync_menu::{
    export_file_name, generate_menu, render_document, CollectionSource, DepartmentSource,
    MenuError, MenuStats,
};
use shopsync_sync::{run_product_sync, FeedSource, Storefront, SyncError, SyncOptions, SyncReport};
use sqlx::PgPool;
use tokio::sync::Mutex;
use tokio::task::JoinError;

/// Upstream clients used by the runs, behind their trait seams.
#[derive(Clone)]
pub struct Services {
    pub feed: Arc<dyn FeedSource>,
    pub storefront: Arc<dyn Storefront>,
    pub collections: Arc<dyn CollectionSource>,
    pub departments: Arc<dyn DepartmentSource>,
    pub sync_options: SyncOptions,
}

impl Services {
    /// Builds the live POS and Shopify clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either base URL is invalid or an HTTP client
    /// cannot be built.
    pub fn from_app_config(config: &shopsync_core::AppConfig) -> anyhow::Result<Self> {
        let pos = Arc::new(shopsync_pos::PosClient::from_app_config(config)?);
        let shopify = Arc::new(shopsync_shopify::ShopifyClient::from_app_config(config)?);
        Ok(Self {
            feed: pos.clone(),
            storefront: shopify.clone(),
            collections: shopify,
            departments: pos,
            sync_options: SyncOptions::from_app_config(config),
        })
    }
}

/// Shared run lock; held for the duration of one sync or menu run.
pub type RunLock = Arc<Mutex<()>>;

/// Why a run did not produce a result.
#[derive(Debug)]
pub enum JobError {
    /// Another sync or menu run is in flight.
    Busy,
    Sync(SyncError),
    Menu(MenuError),
    /// The spawned run panicked or was aborted.
    Aborted(JoinError),
}

/// A rendered menu ready for download.
#[derive(Debug, Clone)]
pub struct MenuExport {
    pub file_name: String,
    pub body: String,
    pub stats: MenuStats,
}

/// Runs one product sync and records it in the sync log on success.
///
/// The run executes on its own task holding the lock, so it completes even
/// if the caller's future is dropped.
///
/// # Errors
///
/// Returns [`JobError::Busy`] when another run holds the lock, otherwise the
/// fatal [`SyncError`] of the run.
pub async fn run_sync(
    services: &Services,
    pool: &PgPool,
    lock: &RunLock,
) -> Result<SyncReport, JobError> {
    let Ok(guard) = Arc::clone(lock).try_lock_owned() else {
        return Err(JobError::Busy);
    };
    let services = services.clone();
    let pool = pool.clone();

    let run = tokio::spawn(async move {
        let _guard = guard;
        let report = run_product_sync(
            services.feed.as_ref(),
            services.storefront.as_ref(),
            &services.sync_options,
        )
        .await?;
        record(&pool, SyncAction::SyncProducts).await;
        Ok::<_, SyncError>(report)
    });

    run.await
        .map_err(JobError::Aborted)?
        .map_err(JobError::Sync)
}

/// Builds the menu, renders it for export, and records it on success.
///
/// Detached from the caller like [`run_sync`].
///
/// # Errors
///
/// Returns [`JobError::Busy`] when another run holds the lock, otherwise the
/// [`MenuError`] of the generation.
pub async fn build_menu_export(
    services: &Services,
    pool: &PgPool,
    lock: &RunLock,
) -> Result<MenuExport, JobError> {
    let Ok(guard) = Arc::clone(lock).try_lock_owned() else {
        return Err(JobError::Busy);
    };
    let services = services.clone();
    let pool = pool.clone();

    let run = tokio::spawn(async move {
        let _guard = guard;
        let generated =
            generate_menu(services.collections.as_ref(), services.departments.as_ref()).await?;
        let body = render_document(&generated.document)?;
        record(&pool, SyncAction::MegaMenu).await;
        Ok::<_, MenuError>(MenuExport {
            file_name: export_file_name(Local::now().naive_local()),
            body,
            stats: generated.stats,
        })
    });

    run.await
        .map_err(JobError::Aborted)?
        .map_err(JobError::Menu)
}

/// A failed log write does not fail the run that already completed.
async fn record(pool: &PgPool, action: SyncAction) {
    if let Err(e) = shopsync_db::record_sync(pool, action).await {
        tracing::warn!(action = %action, error = %e, "failed to record sync completion");
    }
}
