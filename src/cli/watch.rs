use super::ui;
use crate::core::budget::Budget;
use crate::core::currency::RateProvider;
use anyhow::Result;
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Keeps rates fresh every `interval` and reprints the summary after each
/// refresh, until `shutdown` resolves. Returns how many summaries were shown.
pub async fn run<F>(
    budget: &Budget,
    provider: Arc<dyn RateProvider>,
    interval: Duration,
    shutdown: F,
) -> Result<usize>
where
    F: Future<Output = ()>,
{
    let mut updates = budget.rates().subscribe();
    let handle = budget.rates().spawn_refresher(provider, interval);
    tokio::pin!(shutdown);

    let mut rendered = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Watch interrupted");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if rendered > 0 {
                    ui::print_separator();
                }
                println!("{}", budget.summary().display_as_table(budget.theme()));
                println!(
                    "\n{}",
                    ui::style_text(
                        &format!(
                            "Rates refreshed at {}, next refresh in {}s. Press Ctrl-C to stop.",
                            Local::now().format("%H:%M:%S"),
                            interval.as_secs()
                        ),
                        ui::StyleType::Subtle
                    )
                );
                rendered += 1;
            }
        }
    }

    handle.shutdown().await;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::RateTable;
    use crate::core::rates::RateCache;
    use crate::store::memory::MemoryCollection;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticRates;

    #[async_trait]
    impl RateProvider for StaticRates {
        async fn fetch_rates(&self, base: &str) -> anyhow::Result<RateTable> {
            Ok(RateTable::new(
                base,
                HashMap::from([("EUR".to_string(), 0.9)]),
            ))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_renders_on_each_refresh() {
        let budget = Budget::load(
            Arc::new(MemoryCollection::new()),
            RateCache::new("USD", &["USD".to_string(), "EUR".to_string()]),
            "USD",
        );
        let interval = Duration::from_secs(60);

        let rendered = run(
            &budget,
            Arc::new(StaticRates),
            interval,
            tokio::time::sleep(interval * 2 + Duration::from_secs(1)),
        )
        .await
        .unwrap();

        assert!(rendered >= 2, "rendered {rendered} times");
        assert_eq!(budget.rates().current().rate("EUR"), Some(0.9));
    }
}
