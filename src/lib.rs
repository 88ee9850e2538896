pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::entries::{AddArgs, EditArgs};
use crate::cli::settings::ThemeChange;
use crate::core::cache::Store;
use crate::core::config::AppConfig;
use crate::core::entry::EntryId;
use crate::core::view::Filter;
use crate::core::{Budget, RateCache, RateProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the collection holding entries and preferences.
pub const BUDGET_COLLECTION: &str = "budget";

pub enum AppCommand {
    Add(AddArgs),
    Edit(EditArgs),
    Delete { id: EntryId, yes: bool },
    List(Filter),
    Summary,
    Currency(Option<String>),
    Theme(Option<ThemeChange>),
    Rates,
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Tally starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let store = store::KeyValueStore::open(&data_path);
    let rates = RateCache::new(&config.base_currency, &config.known_currencies);
    let mut budget = Budget::load(
        store.get_collection(BUDGET_COLLECTION, true),
        rates,
        &config.currency,
    );
    match command {
        AppCommand::Add(args) => {
            if let Some(id) = cli::entries::add(&mut budget, args) {
                println!("Added entry {id}");
            }
        }
        AppCommand::Edit(args) => {
            if let Some(id) = cli::entries::edit(&mut budget, args) {
                println!("Updated entry {id}");
            }
        }
        AppCommand::Delete { id, yes } => {
            if budget.entry(id).is_none() {
                println!("No entry with id {id}");
            } else if cli::entries::delete(&mut budget, id, |prompt| {
                yes || cli::entries::confirm_on_terminal(prompt)
            }) {
                println!("Deleted entry {id}");
            }
        }
        AppCommand::List(filter) => {
            refresh_rates(&budget, rate_provider(&config)?.as_ref()).await;
            cli::entries::list(&mut budget, filter)?;
        }
        AppCommand::Summary => {
            refresh_rates(&budget, rate_provider(&config)?.as_ref()).await;
            cli::summary::run(&budget)?;
        }
        AppCommand::Currency(code) => cli::settings::currency(&mut budget, code.as_deref())?,
        AppCommand::Theme(change) => cli::settings::theme(&mut budget, change)?,
        AppCommand::Rates => {
            refresh_rates(&budget, rate_provider(&config)?.as_ref()).await;
            cli::settings::rates(&budget)?;
        }
        AppCommand::Watch => {
            let provider = rate_provider(&config)?;
            cli::watch::run(&budget, provider, config.refresh_interval(), async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    debug!("Could not listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            })
            .await?;
        }
    }

    Ok(())
}

fn rate_provider(config: &AppConfig) -> Result<Arc<dyn RateProvider>> {
    Ok(Arc::new(
        providers::exchange_rate::ExchangeRateProvider::new(config.rates_base_url())?,
    ))
}

async fn refresh_rates(budget: &Budget, provider: &dyn RateProvider) {
    let pb = cli::ui::new_spinner("Fetching exchange rates...");
    budget.rates().refresh(provider).await;
    pb.finish_and_clear();
}
