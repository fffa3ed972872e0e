//! Periodic expiration sweep.
//!
//! Lazy expiry on read only catches snippets somebody asks for; the sweeper
//! removes the rest on a fixed cadence.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::service::SnippetService;

/// Handle to a background task calling [`SnippetService::sweep_expired`].
///
/// The task stops when [`Sweeper::shutdown`] is awaited or the handle is dropped.
pub struct Sweeper {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn the sweep loop. The first sweep runs one full `interval` after start.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(service: SnippetService, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(Self::run(service, interval, shutdown_rx));
        tracing::info!(interval_secs = interval.as_secs(), "started expiration sweeper");
        Self { shutdown_tx, handle: Some(handle) }
    }

    async fn run(service: SnippetService, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        // tokio intervals panic on a zero period
        let interval = interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::info!("checking for expired snippets");
                    match service.sweep_expired().await {
                        Ok(count) => tracing::info!(count, "expired snippets deleted"),
                        Err(e) => tracing::error!(error = %e, "failed to delete expired snippets"),
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("expiration sweeper stopped");
    }

    /// Stop the loop and wait for an in-flight sweep to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "expiration sweeper task ended abnormally");
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::db::SnippetDb;
    use crate::snippet::{ExpiryClass, Language};
    use chrono::{Duration as ChronoDuration, Utc};

    async fn service(clock: ManualClock) -> SnippetService {
        let db = SnippetDb::open_in_memory().await.unwrap();
        SnippetService::builder(db).clock(clock).build()
    }

    #[tokio::test]
    async fn test_sweeps_on_tick() {
        let clock = ManualClock::new(Utc::now());
        let svc = service(clock.clone()).await;
        svc.create("old", false, ExpiryClass::OneMinute, Language::Plaintext).await.unwrap();
        svc.create("keep", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        clock.advance(ChronoDuration::minutes(2));

        let sweeper = Sweeper::spawn(svc.clone(), Duration::from_millis(20));

        let swept = tokio::time::timeout(Duration::from_secs(5), async {
            while svc.db().count_snippets().await.unwrap() != 1 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(swept.is_ok(), "expired snippet was never swept");

        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let svc = service(ManualClock::new(Utc::now())).await;
        let sweeper = Sweeper::spawn(svc, Duration::from_secs(1));
        tokio::time::timeout(Duration::from_secs(5), sweeper.shutdown())
            .await
            .expect("sweeper did not stop");
    }
}
