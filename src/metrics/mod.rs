// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order lifecycle (created, assigned, completed)
// - Courier movement
// - Dispatch failures
// - Job runs (outcome, duration)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Order Lifecycle Metrics
    pub orders_created: IntCounter,
    pub orders_assigned: IntCounter,
    pub orders_completed: IntCounter,

    // Courier Metrics
    pub courier_moves: IntCounter,
    pub free_couriers: IntGauge,

    // Dispatch Metrics
    pub dispatch_failures: IntCounterVec,

    // Job Metrics
    pub job_runs: IntCounterVec,
    pub job_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders accepted")?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_assigned = IntCounter::new("orders_assigned_total", "Total orders assigned to a courier")?;
        registry.register(Box::new(orders_assigned.clone()))?;

        let orders_completed = IntCounter::new("orders_completed_total", "Total orders delivered")?;
        registry.register(Box::new(orders_completed.clone()))?;

        let courier_moves = IntCounter::new("courier_moves_total", "Total courier move steps applied")?;
        registry.register(Box::new(courier_moves.clone()))?;

        let free_couriers = IntGauge::new("free_couriers", "Couriers without an assigned order at last dispatch")?;
        registry.register(Box::new(free_couriers.clone()))?;

        let dispatch_failures = IntCounterVec::new(
            Opts::new("dispatch_failures_total", "Dispatch attempts that did not assign an order"),
            &["reason"],
        )?;
        registry.register(Box::new(dispatch_failures.clone()))?;

        let job_runs = IntCounterVec::new(
            Opts::new("job_runs_total", "Background job runs"),
            &["job", "outcome"],
        )?;
        registry.register(Box::new(job_runs.clone()))?;

        let job_duration = HistogramVec::new(
            HistogramOpts::new("job_duration_seconds", "Background job run duration")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["job"],
        )?;
        registry.register(Box::new(job_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_assigned,
            orders_completed,
            courier_moves,
            free_couriers,
            dispatch_failures,
            job_runs,
            job_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_dispatch_failure(&self, reason: &str) {
        self.dispatch_failures.with_label_values(&[reason]).inc();
    }

    /// Helper to record one background job run
    pub fn record_job_run(&self, job: &str, duration_secs: f64, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.job_runs.with_label_values(&[job, outcome]).inc();
        self.job_duration.with_label_values(&[job]).observe(duration_secs);
    }
}
