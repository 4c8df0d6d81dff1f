use actix::prelude::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::core::{ComponentHealth, HealthStatus};

// ============================================================================
// Health Monitor Actor - Tracks health of the background jobs
// ============================================================================
//
// Responsibilities:
// - Keep the last reported status of every component
// - Aggregate system-wide health on request
//
// ============================================================================

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
pub struct UpdateHealth {
    pub component: String,
    pub status: HealthStatus,
    pub details: Option<String>,
}

#[derive(Message)]
#[rtype(result = "SystemHealth")]
pub struct GetSystemHealth;

#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub overall_status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
    pub check_time: DateTime<Utc>,
}

// ============================================================================
// Health Monitor Actor
// ============================================================================

#[derive(Default)]
pub struct HealthMonitorActor {
    components: HashMap<String, ComponentHealth>,
}

impl HealthMonitorActor {
    pub fn new() -> Self {
        Self::default()
    }

    fn compute_overall_status(&self) -> HealthStatus {
        HealthStatus::aggregate(
            self.components
                .iter()
                .map(|(name, health)| (name.as_str(), &health.status)),
        )
    }
}

impl Actor for HealthMonitorActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("HealthMonitorActor started");
    }
}

impl Handler<UpdateHealth> for HealthMonitorActor {
    type Result = ();

    fn handle(&mut self, msg: UpdateHealth, _: &mut Self::Context) {
        let changed = self
            .components
            .get(&msg.component)
            .map_or(true, |current| current.status != msg.status);

        if changed {
            tracing::debug!(
                component = %msg.component,
                status = ?msg.status,
                "Component health changed"
            );
        }

        let health = ComponentHealth::new(msg.component.clone(), msg.status).with_details(msg.details);
        self.components.insert(msg.component, health);
    }
}

impl Handler<GetSystemHealth> for HealthMonitorActor {
    type Result = MessageResult<GetSystemHealth>;

    fn handle(&mut self, _msg: GetSystemHealth, _: &mut Self::Context) -> Self::Result {
        MessageResult(SystemHealth {
            overall_status: self.compute_overall_status(),
            components: self.components.clone(),
            check_time: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix::test]
    async fn test_reports_are_aggregated() {
        let monitor = HealthMonitorActor::new().start();

        monitor
            .send(UpdateHealth {
                component: "assign_orders".to_string(),
                status: HealthStatus::Healthy,
                details: None,
            })
            .await
            .unwrap();
        monitor
            .send(UpdateHealth {
                component: "move_couriers".to_string(),
                status: HealthStatus::Degraded("store unavailable".to_string()),
                details: Some("attempt 3".to_string()),
            })
            .await
            .unwrap();

        let health = monitor.send(GetSystemHealth).await.unwrap();
        assert_eq!(health.components.len(), 2);
        assert!(health.overall_status.is_degraded());
        assert_eq!(
            health.components["move_couriers"].details.as_deref(),
            Some("attempt 3")
        );
    }

    #[actix::test]
    async fn test_latest_report_replaces_previous() {
        let monitor = HealthMonitorActor::new().start();

        for status in [HealthStatus::Unhealthy("down".to_string()), HealthStatus::Healthy] {
            monitor
                .send(UpdateHealth {
                    component: "assign_orders".to_string(),
                    status,
                    details: None,
                })
                .await
                .unwrap();
        }

        let health = monitor.send(GetSystemHealth).await.unwrap();
        assert!(health.overall_status.is_healthy());
    }
}
