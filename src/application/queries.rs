use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::courier::{Courier, StoragePlace};
use crate::domain::order::{Order, OrderStatus};
use crate::persistence::{CourierRepository, OrderRepository};

use super::errors::DispatchError;

// ============================================================================
// Read Models - Flat views returned to callers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePlaceView {
    pub id: Uuid,
    pub name: String,
    pub total_volume: i32,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierView {
    pub id: Uuid,
    pub name: String,
    pub speed: i32,
    pub x: i32,
    pub y: i32,
    pub storage_places: Vec<StoragePlaceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    pub volume: i32,
    pub status: OrderStatus,
    pub courier_id: Option<Uuid>,
}

impl From<&StoragePlace> for StoragePlaceView {
    fn from(place: &StoragePlace) -> Self {
        Self {
            id: place.id(),
            name: place.name().to_string(),
            total_volume: place.total_volume(),
            order_id: place.order_id(),
        }
    }
}

impl From<&Courier> for CourierView {
    fn from(courier: &Courier) -> Self {
        Self {
            id: courier.id(),
            name: courier.name().to_string(),
            speed: courier.speed(),
            x: courier.location().x(),
            y: courier.location().y(),
            storage_places: courier.storage_places().iter().map(StoragePlaceView::from).collect(),
        }
    }
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            x: order.location().x(),
            y: order.location().y(),
            volume: order.volume(),
            status: order.status(),
            courier_id: order.courier_id(),
        }
    }
}

// ============================================================================
// Dispatch Queries
// ============================================================================

pub struct DispatchQueries {
    couriers: Arc<dyn CourierRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl DispatchQueries {
    pub fn new(couriers: Arc<dyn CourierRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { couriers, orders }
    }

    pub async fn get_all_couriers(&self) -> Result<Vec<CourierView>, DispatchError> {
        let couriers = self.couriers.get_all().await?;
        Ok(couriers.iter().map(CourierView::from).collect())
    }

    /// Orders still waiting for a courier or on their way
    pub async fn get_incomplete_orders(&self) -> Result<Vec<OrderView>, DispatchError> {
        let orders = self.orders.get_all_not_completed().await?;
        Ok(orders.iter().map(OrderView::from).collect())
    }
}
