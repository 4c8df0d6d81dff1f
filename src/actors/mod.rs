// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based runtime for the periodic dispatch work.
//
// Structure:
// - core/           - Health status types
// - health_monitor  - Aggregates component health
// - jobs            - AssignOrdersJob, MoveCouriersJob
// - coordinator     - Starts and stops everything above
//
// Note: Business rules live in the domain and the command handler.
//       Actors only schedule, retry and report.
//
// ============================================================================

mod core;
mod health_monitor;
mod jobs;
mod coordinator;

pub use self::core::{ComponentHealth, HealthStatus};
pub use health_monitor::{GetSystemHealth, HealthMonitorActor, SystemHealth, UpdateHealth};
pub use jobs::{
    AssignOrdersJob, JobSettings, MoveCouriersJob, RunAssignOrders, RunMoveCouriers, StopJob,
    ASSIGN_ORDERS_JOB, MOVE_COURIERS_JOB,
};
pub use coordinator::{CoordinatorActor, Shutdown};
