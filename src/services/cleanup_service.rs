use std::{sync::Arc, time::Duration};

use actix_web::rt::task::JoinHandle;

use crate::{models::domain::CleanupReport, repositories::DocumentStore};

/// One cleanup pass. Failures are logged, never propagated.
pub async fn run_cleanup(store: &dyn DocumentStore, max_age: Duration) -> CleanupReport {
    match store.cleanup(max_age).await {
        Ok(report) => {
            if report.removed > 0 || report.failed > 0 {
                log::info!(
                    "Cleanup pass: scanned {}, removed {}, failed {}",
                    report.scanned,
                    report.removed,
                    report.failed
                );
            }
            report
        }
        Err(e) => {
            log::error!("Cleanup pass failed: {}", e);
            CleanupReport::default()
        }
    }
}

/// Runs `run_cleanup` every `interval`, starting immediately.
pub fn spawn_cleanup_task(
    store: Arc<dyn DocumentStore>,
    interval: Duration,
    max_age: Duration,
) -> JoinHandle<()> {
    log::info!(
        "Scheduling document cleanup every {}s for files older than {}s",
        interval.as_secs(),
        max_age.as_secs()
    );
    actix_web::rt::spawn(async move {
        let mut ticker = actix_web::rt::time::interval(interval);
        loop {
            ticker.tick().await;
            run_cleanup(store.as_ref(), max_age).await;
        }
    })
}
