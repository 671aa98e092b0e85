//! Background job scheduler.
//!
//! Registers the cron-driven product sync when `SHOPSYNC_SYNC_CRON` is set.
//! Scheduled runs share the HTTP run lock, so a tick that lands while a
//! manual run is in flight is skipped.

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::jobs::{self, JobError, RunLock, Services};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    cron: Option<&str>,
    pool: PgPool,
    services: Services,
    lock: RunLock,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match cron {
        Some(expr) => register_sync_job(&scheduler, expr, pool, services, lock).await?,
        None => tracing::info!("scheduler: SHOPSYNC_SYNC_CRON not set; no scheduled sync"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_sync_job(
    scheduler: &JobScheduler,
    expr: &str,
    pool: PgPool,
    services: Services,
    lock: RunLock,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(expr, move |_uuid, _lock| {
        let pool = pool.clone();
        let services = services.clone();
        let lock = lock.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting product sync");
            match jobs::run_sync(&services, &pool, &lock).await {
                Ok(report) => tracing::info!(
                    created = report.products.created,
                    updated = report.products.updated,
                    deleted = report.products.deleted,
                    failed = report.failures(),
                    "scheduler: product sync complete"
                ),
                Err(JobError::Busy) => {
                    tracing::warn!("scheduler: another run is in progress; skipping tick");
                }
                Err(JobError::Sync(e)) => {
                    tracing::error!(error = %e, "scheduler: product sync failed");
                }
                Err(JobError::Menu(e)) => {
                    tracing::error!(error = %e, "scheduler: unexpected menu error");
                }
                Err(JobError::Aborted(e)) => {
                    tracing::error!(error = %e, "scheduler: product sync task aborted");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = expr, "scheduler: product sync registered");
    Ok(())
}
