// ============================================================================
// Persistence Layer
// ============================================================================
//
// Repository contracts consumed by the application layer, the change
// notification hook, and an in-memory adapter implementing both.
//
// ============================================================================

pub mod repository;
pub mod notifier;
pub mod memory;

pub use repository::{CourierRepository, OrderRepository, RepositoryError};
pub use notifier::{
    AggregateSnapshot, BroadcastNotifier, ChangeEnvelope, ChangeKind, ChangeNotifier, NoopNotifier,
};
pub use memory::{InMemoryCourierRepository, InMemoryOrderRepository, InMemoryStore};
