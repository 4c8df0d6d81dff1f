use chrono::{DateTime, Utc};

// ============================================================================
// Health Abstractions
// ============================================================================
//
// Status values reported by the background jobs and aggregated by the
// health monitor.
//
// ============================================================================

/// Health status of a component
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, HealthStatus::Degraded(_))
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self, HealthStatus::Unhealthy(_))
    }

    /// Worst status wins: Unhealthy > Degraded > Healthy
    pub fn aggregate<'a>(components: impl IntoIterator<Item = (&'a str, &'a HealthStatus)>) -> HealthStatus {
        let mut degraded = Vec::new();
        let mut unhealthy = Vec::new();

        for (name, status) in components {
            match status {
                HealthStatus::Unhealthy(msg) => unhealthy.push(format!("{}: {}", name, msg)),
                HealthStatus::Degraded(msg) => degraded.push(format!("{}: {}", name, msg)),
                HealthStatus::Healthy => {}
            }
        }

        if !unhealthy.is_empty() {
            unhealthy.sort();
            HealthStatus::Unhealthy(unhealthy.join(", "))
        } else if !degraded.is_empty() {
            degraded.sort();
            HealthStatus::Degraded(degraded.join(", "))
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Health information for a component
#[derive(Debug, Clone)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
    pub details: Option<String>,
}

impl ComponentHealth {
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            last_check: Utc::now(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_healthy() {
        let none: [(&str, &HealthStatus); 0] = [];
        assert!(HealthStatus::aggregate(none).is_healthy());
    }

    #[test]
    fn test_degraded_component_degrades_system() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("store unavailable".to_string());

        let overall = HealthStatus::aggregate([("assign_orders", &degraded), ("move_couriers", &healthy)]);
        assert_eq!(overall, HealthStatus::Degraded("assign_orders: store unavailable".to_string()));
    }

    #[test]
    fn test_unhealthy_wins_over_degraded() {
        let degraded = HealthStatus::Degraded("slow".to_string());
        let unhealthy = HealthStatus::Unhealthy("stopped".to_string());

        let overall = HealthStatus::aggregate([("a", &degraded), ("b", &unhealthy)]);
        assert!(overall.is_unhealthy());
        assert!(!overall.is_degraded());
    }
}
