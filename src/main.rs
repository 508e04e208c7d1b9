//! Transaction monitor demo.
//!
//! Runs a simulated workload against a fake instrument store and logs the
//! resulting timelines and statistics.
//!
//! ```text
//!   sequential:  PricingService.price ──▶ InstrumentStore.lookup (nested)
//!   failing:     lookups of ids divisible by 7 return NotFound
//!   concurrent:  N tokio workers calling InstrumentStore.fetch
//!   fan-out:     PricingService.refresh_batch spawning inherited fetches
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use txn_monitor::config::loader::load_config;
use txn_monitor::config::watcher::ConfigWatcher;
use txn_monitor::observability::logging::init_logging;
use txn_monitor::{CorrelationContext, MonitorConfig, TransactionMonitor};

const STORE: &str = "demo::store::InstrumentStore";
const SERVICE: &str = "demo::service::PricingService";

#[derive(Parser)]
#[command(name = "txn-monitor")]
#[command(about = "Run a simulated workload under the transaction monitor", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of concurrent worker tasks
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Only print the condensed timeline
    #[arg(long)]
    condensed_only: bool,

    /// Reload the configuration file when it changes
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Error)]
enum StoreError {
    #[error("instrument {0} not found")]
    NotFound(u32),
}

/// Fake data source with random latency.
#[derive(Clone)]
struct InstrumentStore {
    monitor: TransactionMonitor,
}

impl InstrumentStore {
    fn lookup(&self, id: u32) -> Result<String, StoreError> {
        self.monitor.invoke(STORE, "lookup", || {
            std::thread::sleep(latency());
            if id % 7 == 0 {
                Err(StoreError::NotFound(id))
            } else {
                Ok(format!("INSTR-{id:04}"))
            }
        })
    }

    fn price(&self, id: u32) -> Result<u64, StoreError> {
        self.monitor.invoke(SERVICE, "price", || {
            let symbol = self.lookup(id)?;
            std::thread::sleep(latency());
            Ok(symbol.len() as u64 * 100 + fastrand::u64(..100))
        })
    }

    async fn fetch(&self, id: u32) -> Result<String, StoreError> {
        self.monitor
            .invoke_async(STORE, "fetch", async {
                tokio::time::sleep(latency()).await;
                if id % 7 == 0 {
                    Err(StoreError::NotFound(id))
                } else {
                    Ok(format!("INSTR-{id:04}"))
                }
            })
            .await
    }
}

fn latency() -> Duration {
    Duration::from_millis(fastrand::u64(1..15))
}

async fn refresh_batch(store: InstrumentStore, ids: Vec<u32>) -> Result<usize, StoreError> {
    let monitor = store.monitor.clone();
    monitor
        .invoke_async(SERVICE, "refresh_batch", async move {
            let handles: Vec<_> = ids
                .into_iter()
                .map(|id| {
                    let store = store.clone();
                    tokio::spawn(CorrelationContext::inherit(async move { store.fetch(id).await }))
                })
                .collect();

            let mut refreshed = 0;
            for handle in handles {
                if let Ok(Ok(_)) = handle.await {
                    refreshed += 1;
                }
            }
            Ok(refreshed)
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };
    init_logging(&config.observability.log_level);

    tracing::info!(
        workers = cli.workers,
        max_event_log_size = config.monitoring.max_event_log_size,
        stack_trace_enabled = config.monitoring.stack_trace_enabled,
        "txn-monitor demo starting"
    );

    let monitor = TransactionMonitor::from_config(&config);

    let _watcher = match (&cli.config, cli.watch) {
        (Some(path), true) => Some(ConfigWatcher::new(path, monitor.config().clone()).run()?),
        (None, true) => {
            tracing::warn!("--watch ignored without --config");
            None
        }
        _ => None,
    };

    let store = InstrumentStore {
        monitor: monitor.clone(),
    };

    // Sequential top-level calls, each with a nested lookup.
    for id in 1..=8 {
        match store.price(id) {
            Ok(price) => tracing::debug!(id, price, "Priced instrument"),
            Err(e) => tracing::warn!(id, error = %e, "Pricing failed"),
        }
    }

    // Concurrent workers, each invocation its own correlation chain.
    let workers: Vec<_> = (0..cli.workers as u32)
        .map(|worker| {
            let store = store.clone();
            tokio::spawn(async move {
                for id in (worker * 10)..(worker * 10 + 3) {
                    if let Err(e) = store.fetch(id).await {
                        tracing::warn!(worker, id, error = %e, "Fetch failed");
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.await?;
    }

    let refreshed = refresh_batch(store.clone(), (20..26).collect()).await?;
    tracing::info!(refreshed, "Batch refresh finished");

    if !cli.condensed_only {
        tracing::info!("\n{}", monitor.render_verbose_timeline());
    }
    tracing::info!("\n{}", monitor.render_condensed_timeline());
    tracing::info!("\n{}", monitor.render_stats_by_thread());
    tracing::info!("\n{}", monitor.render_stats_by_method());

    let report = monitor.prune_event_log();
    tracing::info!(
        events = report.remaining,
        pruned = report.removed,
        "Demo complete"
    );
    Ok(())
}
