use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::kernel::guard::{join_nested, require_id, require_positive};
use crate::domain::kernel::{AggregateRoot, GuardError, Location, ValidationErrors};
use super::errors::OrderError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// The courier is held as a weak reference (id only). Every transition
// computes the next status first and only then mutates, so a failed call
// leaves the order untouched.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: Uuid,
    location: Location,
    volume: i32,
    status: OrderStatus,
    courier_id: Option<Uuid>,
}

impl Order {
    /// New order in `Created` status with no courier
    pub fn new(id: Uuid, location: Location, volume: i32) -> Result<Self, ValidationErrors> {
        Self::check_fields(id, &location, volume)?;

        Ok(Self {
            id,
            location,
            volume,
            status: OrderStatus::Created,
            courier_id: None,
        })
    }

    /// Rehydrate a persisted order, enforcing the status/courier rule
    pub fn restore(
        id: Uuid,
        location: Location,
        volume: i32,
        status: OrderStatus,
        courier_id: Option<Uuid>,
    ) -> Result<Self, OrderError> {
        let order = Self {
            id,
            location,
            volume,
            status,
            courier_id,
        };
        order.validate()?;
        Ok(order)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn courier_id(&self) -> Option<Uuid> {
        self.courier_id
    }

    /// True when the order is currently in delivery by `courier_id`
    pub fn is_assigned_to(&self, courier_id: Uuid) -> bool {
        self.status == OrderStatus::Assigned && self.courier_id == Some(courier_id)
    }

    /// Assign (or reassign) the order to a courier
    pub fn assign(&mut self, courier_id: Uuid) -> Result<(), OrderError> {
        self.ensure_constructed()?;
        require_id("courier id", courier_id)?;

        let next = self.status.assign()?;
        next.ensure_courier(Some(courier_id))?;

        self.status = next;
        self.courier_id = Some(courier_id);
        Ok(())
    }

    /// Mark the order as delivered
    pub fn complete(&mut self) -> Result<(), OrderError> {
        self.ensure_constructed()?;
        let next = self.status.complete()?;
        next.ensure_courier(self.courier_id)?;

        self.status = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        Self::check_fields(self.id, &self.location, self.volume)?;
        self.status.ensure_courier(self.courier_id)
    }

    /// Deserialized instances skip the factories; refuse to operate on a broken one
    fn ensure_constructed(&self) -> Result<(), GuardError> {
        self.validate().map_err(|_| GuardError::not_constructed("order"))
    }

    fn check_fields(id: Uuid, location: &Location, volume: i32) -> Result<(), ValidationErrors> {
        join_nested(
            [require_id("order id", id), require_positive("order volume", volume)],
            location.validate(),
        )
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl AggregateRoot for Order {
    type Error = OrderError;

    const AGGREGATE_TYPE: &'static str = "Order";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<(), Self::Error> {
        Order::validate(self)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
