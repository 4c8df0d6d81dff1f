// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// This module contains the delivery aggregates and the rules they enforce.
// - kernel/   - Location, identifier guards, error joining, AggregateRoot
// - courier/  - Courier aggregate and its storage places
// - order/    - Order aggregate and its status state machine
// - services/ - Free-courier query and dispatcher
//
// Nothing here performs I/O or logs; errors are returned as values.
//
// ============================================================================

pub mod kernel;
pub mod courier;
pub mod order;
pub mod services;
