// ============================================================================
// Courier Dispatch
// ============================================================================
//
// Layers:
// - domain/      - Courier and Order aggregates, dispatch services
// - persistence/ - Repository contracts, change notification, in-memory store
// - application/ - Command handler and read queries
// - actors/      - Periodic jobs, health monitoring, coordinator
// - metrics/     - Prometheus metrics and HTTP exposition
// - utils/       - Retry with exponential backoff
// - config       - CLI / environment configuration
//
// ============================================================================

pub mod domain;
pub mod persistence;
pub mod application;
pub mod actors;
pub mod metrics;
pub mod utils;
pub mod config;
