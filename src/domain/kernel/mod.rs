// ============================================================================
// Shared Kernel - Value objects and guards used by every aggregate
// ============================================================================

pub mod aggregate;
pub mod guard;
pub mod location;

pub use aggregate::AggregateRoot;
pub use guard::{join, join_nested, GuardError, ValidationErrors};
pub use location::Location;
