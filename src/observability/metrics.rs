//! Metrics collection and exposition.
//!
//! # Metrics
//! - `funder_requests_total` (counter): funding calls by outcome
//! - `funder_value_ether` (histogram): value of successful transfers
//! - `funder_submission_attempts` (histogram): attempts per submission
//! - `funder_gas_price_wei` (gauge): last fetched price by tier
//! - `funder_oracle_failures_total` (counter): gas price lookups that failed
//! - `funder_rpc_health` (gauge): 1=healthy, 0=unhealthy
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;

use alloy::primitives::utils::format_ether;
use alloy::primitives::U256;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a funding call by outcome.
pub fn record_funding_request(outcome: &'static str) {
    metrics::counter!("funder_requests_total", "outcome" => outcome).increment(1);
}

/// Record the value of a successful transfer.
pub fn record_funded_value(value: U256) {
    let ether = format_ether(value).parse::<f64>().unwrap_or(0.0);
    metrics::histogram!("funder_value_ether").record(ether);
}

pub fn record_submission_attempts(attempts: u32) {
    metrics::histogram!("funder_submission_attempts").record(f64::from(attempts));
}

pub fn record_gas_price(tier: &'static str, wei: u128) {
    metrics::gauge!("funder_gas_price_wei", "tier" => tier).set(wei as f64);
}

pub fn record_oracle_failure() {
    metrics::counter!("funder_oracle_failures_total").increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    metrics::gauge!("funder_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
