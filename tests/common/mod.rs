//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::sync::Arc;

use txn_monitor::config::{MonitorConfig, MonitoringConfig};
use txn_monitor::recording::{Event, InvocationId, ManualClock};
use txn_monitor::telemetry::{NoTelemetry, TelemetryProvider};
use txn_monitor::TransactionMonitor;

/// Wall-clock start for monitors built with a manual clock.
#[allow(dead_code)]
pub const START_MS: u64 = 1_700_000_000_000;

/// Monitor driven by a manual clock, without telemetry.
pub fn manual_monitor(config: MonitoringConfig) -> (TransactionMonitor, Arc<ManualClock>) {
    manual_monitor_with(config, Arc::new(NoTelemetry))
}

#[allow(dead_code)]
pub fn manual_monitor_with(
    config: MonitoringConfig,
    telemetry: Arc<dyn TelemetryProvider>,
) -> (TransactionMonitor, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let config = MonitorConfig {
        monitoring: config,
        ..Default::default()
    };
    let monitor = TransactionMonitor::with_parts(config.shared(), telemetry, clock.clone());
    (monitor, clock)
}

/// Events grouped by invocation, each group in log order.
#[allow(dead_code)]
pub fn by_invocation(events: &[Event]) -> BTreeMap<InvocationId, Vec<&Event>> {
    let mut groups: BTreeMap<InvocationId, Vec<&Event>> = BTreeMap::new();
    for event in events {
        groups.entry(event.invocation).or_default().push(event);
    }
    groups
}

/// Method names of a rendered timeline, top to bottom.
#[allow(dead_code)]
pub fn timeline_methods(rendered: &str, method_label: &str) -> Vec<String> {
    let marker = format!("{method_label}: ");
    rendered
        .lines()
        .filter_map(|line| line.split_once(marker.as_str()))
        .map(|(_, rest)| rest.split(' ').next().unwrap_or_default().to_string())
        .collect()
}
