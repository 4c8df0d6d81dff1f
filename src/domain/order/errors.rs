use crate::domain::kernel::{GuardError, ValidationErrors};
use super::value_objects::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Order validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("Order status {0} is not a valid status to assign")]
    InvalidStatusToAssign(OrderStatus),

    #[error("Order must be assigned before completion")]
    NotAssigned,

    #[error("Order is already completed")]
    AlreadyCompleted,

    #[error("Order status {status} is invalid with courier {courier}")]
    InconsistentCourier { status: OrderStatus, courier: String },
}
