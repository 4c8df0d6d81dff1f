use uuid::Uuid;

use crate::domain::kernel::{GuardError, ValidationErrors};
use crate::domain::order::OrderError;

// ============================================================================
// Courier Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoragePlaceError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("Storage place {place_id} is occupied by order {order_id}")]
    Occupied { place_id: Uuid, order_id: Uuid },

    #[error("Order volume {volume} exceeds storage place capacity {capacity}")]
    VolumeExceeded { volume: i32, capacity: i32 },

    #[error("Storage place {0} is empty")]
    Empty(Uuid),

    #[error("Storage place holds order {stored}, not order {requested}")]
    OrderMismatch { stored: Uuid, requested: Uuid },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CourierError {
    #[error("Courier validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("value is required: storage places")]
    StoragePlacesRequired,

    #[error("Storage place not found for order {0}")]
    StoragePlaceNotFound(Uuid),

    #[error("Storage place operation failed: {0}")]
    StoragePlace(#[from] StoragePlaceError),

    #[error("Order is invalid: {0}")]
    Order(#[from] OrderError),
}
