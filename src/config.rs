use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::RetryConfig;

// ============================================================================
// Application Configuration
// ============================================================================
//
// Every flag falls back to a DISPATCH_* environment variable, then to the
// default below.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "courier-dispatch")]
#[command(about = "Assigns delivery orders to couriers and moves couriers until delivery")]
pub struct AppConfig {
    /// How often the oldest waiting order is dispatched
    #[arg(long, env = "DISPATCH_ASSIGN_INTERVAL_MS", default_value = "1000")]
    pub assign_interval_ms: u64,

    /// How often every busy courier takes one step
    #[arg(long, env = "DISPATCH_MOVE_INTERVAL_MS", default_value = "1000")]
    pub move_interval_ms: u64,

    #[arg(long, env = "DISPATCH_METRICS_PORT", default_value = "9090")]
    pub metrics_port: u16,

    /// Used when RUST_LOG is not set
    #[arg(long, env = "DISPATCH_LOG_FILTER", default_value = "info,courier_dispatch=debug")]
    pub log_filter: String,

    #[arg(long, env = "DISPATCH_RETRY_MAX_ATTEMPTS", default_value = "3")]
    pub retry_max_attempts: u32,

    /// How long the demo runs before shutting down
    #[arg(long, env = "DISPATCH_DEMO_SECONDS", default_value = "15")]
    pub demo_seconds: u64,

    #[arg(long, env = "DISPATCH_DEMO_COURIERS", default_value = "3")]
    pub demo_couriers: usize,

    #[arg(long, env = "DISPATCH_DEMO_ORDERS", default_value = "5")]
    pub demo_orders: usize,
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.assign_interval_ms > 0, "assign interval must be greater than zero");
        anyhow::ensure!(self.move_interval_ms > 0, "move interval must be greater than zero");
        anyhow::ensure!(self.retry_max_attempts > 0, "retry attempts must be greater than zero");
        Ok(())
    }

    pub fn assign_interval(&self) -> Duration {
        Duration::from_millis(self.assign_interval_ms)
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    pub fn demo_duration(&self) -> Duration {
        Duration::from_secs(self.demo_seconds)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().with_max_attempts(self.retry_max_attempts)
    }
}
