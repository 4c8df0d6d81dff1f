use actix::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;

use crate::application::DispatchCommandHandler;
use crate::metrics::Metrics;

use super::core::HealthStatus;
use super::health_monitor::{GetSystemHealth, HealthMonitorActor, SystemHealth, UpdateHealth};
use super::jobs::{AssignOrdersJob, JobSettings, MoveCouriersJob, StopJob, ASSIGN_ORDERS_JOB, MOVE_COURIERS_JOB};

// ============================================================================
// Coordinator Actor - Orchestrates the dispatch jobs
// ============================================================================
//
// Responsibilities:
// - Manages lifecycle of child actors (jobs, health monitor)
// - Coordinates graceful shutdown
// - Reports system health
//
// Actor Hierarchy:
//   CoordinatorActor
//   ├── HealthMonitorActor
//   ├── AssignOrdersJob
//   └── MoveCouriersJob
//
// ============================================================================

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(30);

pub struct CoordinatorActor {
    handler: Arc<DispatchCommandHandler>,
    metrics: Arc<Metrics>,
    settings: JobSettings,
    health_monitor: Option<Addr<HealthMonitorActor>>,
    assign_job: Option<Addr<AssignOrdersJob>>,
    move_job: Option<Addr<MoveCouriersJob>>,
}

impl CoordinatorActor {
    pub fn new(handler: Arc<DispatchCommandHandler>, metrics: Arc<Metrics>, settings: JobSettings) -> Self {
        Self {
            handler,
            metrics,
            settings,
            health_monitor: None,
            assign_job: None,
            move_job: None,
        }
    }

    fn start_child_actors(&mut self) {
        tracing::info!("Starting child actors");

        let health_monitor = HealthMonitorActor::new().start();
        self.health_monitor = Some(health_monitor.clone());

        let assign_job = AssignOrdersJob::new(
            self.handler.clone(),
            self.metrics.clone(),
            health_monitor.clone(),
            &self.settings,
        )
        .start();
        self.assign_job = Some(assign_job);

        health_monitor.do_send(UpdateHealth {
            component: ASSIGN_ORDERS_JOB.to_string(),
            status: HealthStatus::Healthy,
            details: Some("Job started".to_string()),
        });

        let move_job = MoveCouriersJob::new(
            self.handler.clone(),
            self.metrics.clone(),
            health_monitor.clone(),
            &self.settings,
        )
        .start();
        self.move_job = Some(move_job);

        health_monitor.do_send(UpdateHealth {
            component: MOVE_COURIERS_JOB.to_string(),
            status: HealthStatus::Healthy,
            details: Some("Job started".to_string()),
        });

        tracing::info!("All child actors started");
    }
}

impl Actor for CoordinatorActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("CoordinatorActor started");
        self.start_child_actors();

        ctx.run_interval(HEALTH_LOG_INTERVAL, |act, _ctx| {
            if let Some(ref health_monitor) = act.health_monitor {
                let health_monitor = health_monitor.clone();
                actix::spawn(async move {
                    match health_monitor.send(GetSystemHealth).await {
                        Ok(health) => match health.overall_status {
                            HealthStatus::Healthy => {
                                tracing::debug!("System health check: Healthy");
                            }
                            HealthStatus::Degraded(ref msg) => {
                                tracing::warn!("System health check: Degraded - {}", msg);
                            }
                            HealthStatus::Unhealthy(ref msg) => {
                                tracing::error!("System health check: Unhealthy - {}", msg);
                            }
                        },
                        Err(e) => {
                            tracing::error!("Failed to get system health: {}", e);
                        }
                    }
                });
            }
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        tracing::info!("CoordinatorActor stopping - initiating graceful shutdown");
        Running::Stop
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("CoordinatorActor stopped");
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "Result<(), String>")]
pub struct Shutdown;

impl Handler<Shutdown> for CoordinatorActor {
    type Result = Result<(), String>;

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        tracing::info!("Received shutdown signal");

        if let Some(assign_job) = self.assign_job.take() {
            assign_job.do_send(StopJob);
        }

        if let Some(move_job) = self.move_job.take() {
            move_job.do_send(StopJob);
        }

        // Monitor stops once the last address to it is dropped
        self.health_monitor = None;

        ctx.stop();

        Ok(())
    }
}

impl Handler<GetSystemHealth> for CoordinatorActor {
    type Result = ResponseFuture<SystemHealth>;

    fn handle(&mut self, _msg: GetSystemHealth, _: &mut Self::Context) -> Self::Result {
        let health_monitor = self.health_monitor.clone();

        Box::pin(async move {
            let unavailable = |reason: String| SystemHealth {
                overall_status: HealthStatus::Unhealthy(reason),
                components: Default::default(),
                check_time: Utc::now(),
            };

            match health_monitor {
                Some(monitor) => match monitor.send(GetSystemHealth).await {
                    Ok(health) => health,
                    Err(e) => unavailable(format!("health monitor unreachable: {}", e)),
                },
                None => unavailable("coordinator stopped".to_string()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{CourierRepository, InMemoryStore, NoopNotifier, OrderRepository};
    use crate::utils::RetryConfig;

    fn coordinator() -> CoordinatorActor {
        let metrics = Arc::new(Metrics::new().unwrap());
        let store = InMemoryStore::new(Arc::new(NoopNotifier));
        let couriers: Arc<dyn CourierRepository> = Arc::new(store.courier_repository());
        let orders: Arc<dyn OrderRepository> = Arc::new(store.order_repository());
        let handler = Arc::new(DispatchCommandHandler::new(couriers, orders, metrics.clone()));

        CoordinatorActor::new(
            handler,
            metrics,
            JobSettings {
                assign_interval: Duration::from_secs(3600),
                move_interval: Duration::from_secs(3600),
                retry: RetryConfig::default(),
            },
        )
    }

    #[actix::test]
    async fn test_children_report_healthy_on_start() {
        let coordinator = coordinator().start();

        let health = coordinator.send(GetSystemHealth).await.unwrap();
        assert!(health.overall_status.is_healthy());
        assert!(health.components.contains_key(ASSIGN_ORDERS_JOB));
        assert!(health.components.contains_key(MOVE_COURIERS_JOB));
    }

    #[actix::test]
    async fn test_shutdown_stops_coordinator() {
        let coordinator = coordinator().start();

        assert_eq!(coordinator.send(Shutdown).await.unwrap(), Ok(()));

        // Mailbox closes once the actor has stopped
        actix::clock::sleep(Duration::from_millis(50)).await;
        assert!(!coordinator.connected());
    }
}
