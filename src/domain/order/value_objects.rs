use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::fmt;
use std::str::FromStr;

use crate::domain::kernel::GuardError;
use super::errors::OrderError;

// ============================================================================
// Order Status - Lifecycle state machine
// ============================================================================
//
//   Created ──assign──▶ Assigned ──complete──▶ Completed
//                        │   ▲
//                        └───┘ assign (reassignment)
//
// There is no "unknown" variant: text that does not name one of the three
// states is rejected when parsed or deserialized.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Assigned,
    Completed,
}

impl OrderStatus {
    /// Status reached by assigning a courier from the current status
    pub fn assign(self) -> Result<Self, OrderError> {
        match self {
            OrderStatus::Created | OrderStatus::Assigned => Ok(OrderStatus::Assigned),
            OrderStatus::Completed => Err(OrderError::InvalidStatusToAssign(self)),
        }
    }

    /// Status reached by completing delivery from the current status
    pub fn complete(self) -> Result<Self, OrderError> {
        match self {
            OrderStatus::Assigned => Ok(OrderStatus::Completed),
            OrderStatus::Created => Err(OrderError::NotAssigned),
            OrderStatus::Completed => Err(OrderError::AlreadyCompleted),
        }
    }

    /// `Created` must have no courier; `Assigned` and `Completed` must have one
    pub fn ensure_courier(self, courier_id: Option<Uuid>) -> Result<(), OrderError> {
        let consistent = match self {
            OrderStatus::Created => courier_id.is_none(),
            OrderStatus::Assigned | OrderStatus::Completed => courier_id.is_some(),
        };

        if consistent {
            Ok(())
        } else {
            Err(OrderError::InconsistentCourier {
                status: self,
                courier: courier_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(OrderStatus::Created),
            "assigned" => Ok(OrderStatus::Assigned),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(GuardError::invalid("status", format!("unknown order status '{}'", other)).into()),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
