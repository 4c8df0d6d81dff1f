use uuid::Uuid;

// ============================================================================
// Aggregate Root Pattern
// ============================================================================
//
// Every persisted aggregate exposes its identity and a structural check.
// Repositories call `validate` before accepting a write, which catches
// instances that never went through a factory (e.g. deserialized ones).
//
// ============================================================================

pub trait AggregateRoot: Clone + Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name used in logs, notifications and repository errors
    const AGGREGATE_TYPE: &'static str;

    fn aggregate_id(&self) -> Uuid;

    fn validate(&self) -> Result<(), Self::Error>;
}
