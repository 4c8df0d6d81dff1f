use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::Order;
use crate::utils::IsTransient;

// ============================================================================
// Repository Contracts
// ============================================================================
//
// Implementations must:
// 1. Call `validate()` on an aggregate before persisting it
// 2. Report a missing aggregate as `RepositoryError::NotFound`
// 3. Invoke the change notifier exactly once per successful add/update
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{aggregate_type} not found: {id}")]
    NotFound { aggregate_type: &'static str, id: Uuid },

    #[error("{aggregate_type} already exists: {id}")]
    AlreadyExists { aggregate_type: &'static str, id: Uuid },

    #[error("{aggregate_type} {id} is invalid: {reason}")]
    InvalidAggregate {
        aggregate_type: &'static str,
        id: Uuid,
        reason: String,
    },

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

impl IsTransient for RepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}

#[async_trait]
pub trait CourierRepository: Send + Sync {
    async fn add(&self, courier: &Courier) -> Result<(), RepositoryError>;

    async fn update(&self, courier: &Courier) -> Result<(), RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Courier, RepositoryError>;

    async fn get_all(&self) -> Result<Vec<Courier>, RepositoryError>;

    /// Couriers with no order in `Assigned` status, from one consistent snapshot
    async fn get_all_free(&self) -> Result<Vec<Courier>, RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn add(&self, order: &Order) -> Result<(), RepositoryError>;

    async fn update(&self, order: &Order) -> Result<(), RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Order, RepositoryError>;

    /// Oldest order still waiting for a courier
    async fn get_first_in_created_status(&self) -> Result<Option<Order>, RepositoryError>;

    /// Every order waiting for a courier, oldest first
    async fn get_all_in_created_status(&self) -> Result<Vec<Order>, RepositoryError>;

    async fn get_all_in_assigned_status(&self) -> Result<Vec<Order>, RepositoryError>;

    async fn get_all_not_completed(&self) -> Result<Vec<Order>, RepositoryError>;
}
