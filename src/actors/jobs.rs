use actix::prelude::*;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::{Assignment, DispatchCommandHandler, DispatchError, MoveReport};
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::utils::{retry_on_transient, RetryConfig};

use super::core::HealthStatus;
use super::health_monitor::{HealthMonitorActor, UpdateHealth};

// ============================================================================
// Background Jobs - Periodic dispatch and movement
// ============================================================================
//
// Each job is an actor that notifies itself on a fixed interval. A run goes
// through retry_on_transient, is timed into job metrics and reports its
// outcome to the health monitor.
//
//   AssignOrdersJob  → DispatchCommandHandler::assign_orders
//   MoveCouriersJob  → DispatchCommandHandler::move_couriers
//
// ============================================================================

pub const ASSIGN_ORDERS_JOB: &str = "assign_orders";
pub const MOVE_COURIERS_JOB: &str = "move_couriers";

#[derive(Debug, Clone)]
pub struct JobSettings {
    pub assign_interval: Duration,
    pub move_interval: Duration,
    pub retry: RetryConfig,
}

impl From<&AppConfig> for JobSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            assign_interval: config.assign_interval(),
            move_interval: config.move_interval(),
            retry: config.retry_config(),
        }
    }
}

/// Shared plumbing for one job run
#[derive(Clone)]
struct JobRunner {
    job: &'static str,
    handler: Arc<DispatchCommandHandler>,
    metrics: Arc<Metrics>,
    health: Addr<HealthMonitorActor>,
    retry: RetryConfig,
}

impl JobRunner {
    /// `degraded` inspects a successful run for partial failures
    async fn run<T, F, Fut>(self, operation: F, degraded: fn(&T) -> Option<String>) -> Result<T, DispatchError>
    where
        F: Fn(Arc<DispatchCommandHandler>) -> Fut,
        Fut: Future<Output = Result<T, DispatchError>>,
    {
        let started = Instant::now();
        let handler = self.handler.clone();

        let result = retry_on_transient(self.job, &self.retry, |_attempt| operation(handler.clone()))
            .await
            .into_result();

        let (status, details, success) = match &result {
            Ok(value) => match degraded(value) {
                Some(reason) => {
                    tracing::warn!(job = self.job, reason = %reason, "Job run partially failed");
                    (HealthStatus::Degraded(reason), None, true)
                }
                None => (HealthStatus::Healthy, None, true),
            },
            Err(DispatchError::NoCourierAvailable(order_id)) => {
                tracing::debug!(job = self.job, order_id = %order_id, "No free courier fits, order stays waiting");
                (HealthStatus::Healthy, Some(format!("order {} waiting for a courier", order_id)), true)
            }
            Err(e) => {
                tracing::error!(job = self.job, error = %e, "Job run failed");
                (HealthStatus::Degraded(e.to_string()), Some(e.reason().to_string()), false)
            }
        };

        self.metrics
            .record_job_run(self.job, started.elapsed().as_secs_f64(), success);

        self.health.do_send(UpdateHealth {
            component: self.job.to_string(),
            status,
            details,
        });

        result
    }
}

// ============================================================================
// Assign Orders Job
// ============================================================================

#[derive(Message)]
#[rtype(result = "Result<Option<Assignment>, DispatchError>")]
pub struct RunAssignOrders;

pub struct AssignOrdersJob {
    runner: JobRunner,
    interval: Duration,
}

impl AssignOrdersJob {
    pub fn new(
        handler: Arc<DispatchCommandHandler>,
        metrics: Arc<Metrics>,
        health: Addr<HealthMonitorActor>,
        settings: &JobSettings,
    ) -> Self {
        Self {
            runner: JobRunner {
                job: ASSIGN_ORDERS_JOB,
                handler,
                metrics,
                health,
                retry: settings.retry.clone(),
            },
            interval: settings.assign_interval,
        }
    }
}

impl Actor for AssignOrdersJob {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "AssignOrdersJob started");

        ctx.run_interval(self.interval, |_act, ctx| {
            ctx.notify(RunAssignOrders);
        });
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("AssignOrdersJob stopped");
    }
}

impl Handler<RunAssignOrders> for AssignOrdersJob {
    type Result = ResponseFuture<Result<Option<Assignment>, DispatchError>>;

    fn handle(&mut self, _msg: RunAssignOrders, _: &mut Self::Context) -> Self::Result {
        let runner = self.runner.clone();
        Box::pin(async move {
            runner
                .run(|handler| async move { handler.assign_orders().await }, |_: &Option<Assignment>| None)
                .await
        })
    }
}

// ============================================================================
// Move Couriers Job
// ============================================================================

#[derive(Message)]
#[rtype(result = "Result<MoveReport, DispatchError>")]
pub struct RunMoveCouriers;

pub struct MoveCouriersJob {
    runner: JobRunner,
    interval: Duration,
}

impl MoveCouriersJob {
    pub fn new(
        handler: Arc<DispatchCommandHandler>,
        metrics: Arc<Metrics>,
        health: Addr<HealthMonitorActor>,
        settings: &JobSettings,
    ) -> Self {
        Self {
            runner: JobRunner {
                job: MOVE_COURIERS_JOB,
                handler,
                metrics,
                health,
                retry: settings.retry.clone(),
            },
            interval: settings.move_interval,
        }
    }
}

impl Actor for MoveCouriersJob {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "MoveCouriersJob started");

        ctx.run_interval(self.interval, |_act, ctx| {
            ctx.notify(RunMoveCouriers);
        });
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("MoveCouriersJob stopped");
    }
}

impl Handler<RunMoveCouriers> for MoveCouriersJob {
    type Result = ResponseFuture<Result<MoveReport, DispatchError>>;

    fn handle(&mut self, _msg: RunMoveCouriers, _: &mut Self::Context) -> Self::Result {
        let runner = self.runner.clone();
        Box::pin(async move {
            runner
                .run(
                    |handler| async move { handler.move_couriers().await },
                    |report: &MoveReport| {
                        (report.failed > 0).then(|| format!("{} deliveries could not advance", report.failed))
                    },
                )
                .await
        })
    }
}

/// Message to gracefully stop a job
#[derive(Message)]
#[rtype(result = "()")]
pub struct StopJob;

impl Handler<StopJob> for AssignOrdersJob {
    type Result = ();

    fn handle(&mut self, _: StopJob, ctx: &mut Self::Context) {
        ctx.stop();
    }
}

impl Handler<StopJob> for MoveCouriersJob {
    type Result = ();

    fn handle(&mut self, _: StopJob, ctx: &mut Self::Context) {
        ctx.stop();
    }
}
