//! Background index refresh.
//!
//! Registers a cron job at server startup that re-reads the catalog file and
//! swaps the search index. A failed reload keeps the previous index serving.

use std::path::Path;
use std::sync::Arc;

use flashrv_search::SearchEngine;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// refresh cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    engine: Arc<SearchEngine>,
    config: Arc<flashrv_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_refresh_job(&scheduler, engine, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the recurring catalog-reload job on the configured cron schedule.
async fn register_refresh_job(
    scheduler: &JobScheduler,
    engine: Arc<SearchEngine>,
    config: Arc<flashrv_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let cron_expr = config.index_refresh_cron.clone();
    let job = Job::new_async(cron_expr.as_str(), move |_uuid, _lock| {
        let engine = Arc::clone(&engine);
        let config = Arc::clone(&config);

        Box::pin(async move {
            refresh_index(&engine, &config.catalog_path);
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Reload the catalog snapshot and publish a fresh index.
///
/// Readers keep serving the previous index throughout; the swap is a single
/// reference replacement inside the engine.
fn refresh_index(engine: &SearchEngine, catalog_path: &Path) {
    match flashrv_core::load_salons(catalog_path) {
        Ok(salons_file) => {
            engine.rebuild_index(&salons_file.salons);
            tracing::info!(
                salons = salons_file.salons.len(),
                indexed = engine.indexed_count(),
                "scheduler: search index rebuilt"
            );
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %catalog_path.display(),
                "scheduler: catalog reload failed; keeping previous index"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_keeps_previous_index_on_load_failure() {
        let engine = SearchEngine::from_catalog(&[]);
        refresh_index(&engine, Path::new("/nonexistent/salons.yaml"));
        assert_eq!(engine.indexed_count(), 0);
    }

    #[test]
    fn refresh_rebuilds_from_real_catalog_file() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("salons.yaml");
        let engine = SearchEngine::new();
        refresh_index(&engine, &path);
        assert!(engine.indexed_count() > 0, "seed catalog should index");
    }
}
