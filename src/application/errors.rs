use uuid::Uuid;

use crate::domain::courier::CourierError;
use crate::domain::kernel::ValidationErrors;
use crate::domain::order::OrderError;
use crate::domain::services::DispatcherError;
use crate::persistence::RepositoryError;
use crate::utils::IsTransient;

// ============================================================================
// Application Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Repository failure: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Courier(#[from] CourierError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("No free courier can take order {0}")]
    NoCourierAvailable(Uuid),
}

impl DispatchError {
    /// Stable label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            DispatchError::Repository(RepositoryError::NotFound { .. }) => "not_found",
            DispatchError::Repository(_) => "repository",
            DispatchError::Courier(_) => "courier_rule",
            DispatchError::Order(_) => "order_rule",
            DispatchError::Validation(_) => "validation",
            DispatchError::NoCourierAvailable(_) => "no_courier_available",
        }
    }
}

impl From<DispatcherError> for DispatchError {
    fn from(error: DispatcherError) -> Self {
        match error {
            DispatcherError::NoCourierAvailable(order_id) => DispatchError::NoCourierAvailable(order_id),
            DispatcherError::Courier(e) => DispatchError::Courier(e),
            DispatcherError::Order(e) => DispatchError::Order(e),
        }
    }
}

impl IsTransient for DispatchError {
    fn is_transient(&self) -> bool {
        match self {
            DispatchError::Repository(e) => e.is_transient(),
            _ => false,
        }
    }
}
