//! Holds the current rate table and keeps it fresh in the background.

use crate::core::currency::{RateProvider, RateTable};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Fetched,
    Fallback,
}

/// Shared, atomically replaced rate table.
///
/// Starts empty, which makes every conversion a no-op until the first refresh
/// completes.
#[derive(Clone)]
pub struct RateCache {
    base: String,
    known_currencies: Vec<String>,
    table: Arc<RwLock<RateTable>>,
    updates: Arc<watch::Sender<u64>>,
}

impl RateCache {
    pub fn new(base: &str, known_currencies: &[String]) -> Self {
        let (updates, _) = watch::channel(0);
        Self {
            base: base.to_uppercase(),
            known_currencies: known_currencies.iter().map(|c| c.to_uppercase()).collect(),
            table: Arc::new(RwLock::new(RateTable::new(base, Default::default()))),
            updates: Arc::new(updates),
        }
    }

    /// Snapshot of the table in effect right now.
    pub fn current(&self) -> RateTable {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Receives a bumped counter each time the table is replaced.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    pub fn replace(&self, table: RateTable) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
        self.updates.send_modify(|version| *version += 1);
    }

    pub fn fallback_table(&self) -> RateTable {
        RateTable::identity(&self.base, &self.known_currencies)
    }

    /// Fetches a new table. The old one stays in effect until the fetch
    /// finishes; a failed fetch installs the identity fallback.
    #[instrument(name = "RateRefresh", skip(self, provider), fields(base = %self.base))]
    pub async fn refresh(&self, provider: &dyn RateProvider) -> RefreshOutcome {
        match provider.fetch_rates(&self.base).await {
            Ok(table) => {
                let table = RateTable {
                    base: self.base.clone(),
                    ..table
                }
                .normalized();
                info!(currencies = table.rates.len(), "Exchange rates updated");
                self.replace(table);
                RefreshOutcome::Fetched
            }
            Err(e) => {
                warn!("Failed to fetch exchange rates, using fallback: {e:#}");
                self.replace(self.fallback_table());
                RefreshOutcome::Fallback
            }
        }
    }

    /// Refreshes now and then every `interval` until the returned handle is
    /// shut down or dropped.
    pub fn spawn_refresher(
        &self,
        provider: Arc<dyn RateProvider>,
        interval: Duration,
    ) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let cache = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("Rate refresher stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        cache.refresh(provider.as_ref()).await;
                    }
                }
            }
        });

        RefreshHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Cancellation handle for the background refresher.
pub struct RefreshHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stops the refresher and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("Rate refresher ended abnormally: {e}");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
