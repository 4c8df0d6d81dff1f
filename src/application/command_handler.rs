use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::kernel::Location;
use crate::domain::order::{Order, OrderError};
use crate::domain::services::{Dispatcher, DispatcherError};
use crate::metrics::Metrics;
use crate::persistence::{CourierRepository, OrderRepository, RepositoryError};

use super::commands::{AddStoragePlace, Assignment, CreateCourier, CreateOrder, MoveReport};
use super::errors::DispatchError;

// ============================================================================
// Dispatch Command Handler
// ============================================================================
//
// Orchestrates: Command → Repository load → Aggregate → Repository update
//
// Every command runs inside one unit of work (a single async mutex), so at
// most one mutation per courier and per order is in flight at any time.
//
// ============================================================================

pub struct DispatchCommandHandler {
    couriers: Arc<dyn CourierRepository>,
    orders: Arc<dyn OrderRepository>,
    dispatcher: Dispatcher,
    metrics: Arc<Metrics>,
    unit_of_work: Mutex<()>,
}

impl DispatchCommandHandler {
    pub fn new(
        couriers: Arc<dyn CourierRepository>,
        orders: Arc<dyn OrderRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            couriers,
            orders,
            dispatcher: Dispatcher::new(),
            metrics,
            unit_of_work: Mutex::new(()),
        }
    }

    pub async fn create_courier(&self, command: CreateCourier) -> Result<Uuid, DispatchError> {
        let location = Location::new(command.x, command.y)?;
        let courier = Courier::new(Uuid::new_v4(), command.name, command.speed, location)?;

        let _unit = self.unit_of_work.lock().await;
        self.couriers.add(&courier).await?;

        tracing::info!(
            courier_id = %courier.id(),
            name = %courier.name(),
            speed = courier.speed(),
            location = %courier.location(),
            "Courier created"
        );

        Ok(courier.id())
    }

    pub async fn add_storage_place(&self, command: AddStoragePlace) -> Result<Uuid, DispatchError> {
        let _unit = self.unit_of_work.lock().await;

        let mut courier = self.couriers.get(command.courier_id).await?;
        let place_id = courier.add_storage_place(command.name, command.volume)?;
        self.couriers.update(&courier).await?;

        tracing::info!(
            courier_id = %courier.id(),
            storage_place_id = %place_id,
            volume = command.volume,
            "Storage place added"
        );

        Ok(place_id)
    }

    /// Accept a new order; an order id seen before is left untouched
    pub async fn create_order(&self, command: CreateOrder) -> Result<Uuid, DispatchError> {
        let location = Location::new(command.x, command.y)?;
        let order = Order::new(command.order_id, location, command.volume)?;

        let _unit = self.unit_of_work.lock().await;

        match self.orders.get(order.id()).await {
            Ok(_) => {
                tracing::debug!(order_id = %order.id(), "Order already exists, ignoring");
                return Ok(order.id());
            }
            Err(RepositoryError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        self.orders.add(&order).await?;
        self.metrics.orders_created.inc();

        tracing::info!(
            order_id = %order.id(),
            location = %order.location(),
            volume = order.volume(),
            "Order created"
        );

        Ok(order.id())
    }

    /// Assign the oldest waiting order some free courier can take
    ///
    /// Orders no free courier fits are skipped, so one oversized order
    /// does not hold back the orders queued behind it.
    pub async fn assign_orders(&self) -> Result<Option<Assignment>, DispatchError> {
        let _unit = self.unit_of_work.lock().await;

        let waiting = self.orders.get_all_in_created_status().await?;
        let Some(oldest) = waiting.first().map(Order::id) else {
            return Ok(None);
        };

        let mut free = self.couriers.get_all_free().await?;
        self.metrics.free_couriers.set(free.len() as i64);

        for mut order in waiting {
            let courier = match self.dispatcher.dispatch(&mut order, &mut free) {
                Ok(courier) => courier.clone(),
                Err(DispatcherError::NoCourierAvailable(order_id)) => {
                    tracing::debug!(order_id = %order_id, "No free courier fits, trying next order");
                    continue;
                }
                Err(e) => {
                    let error = DispatchError::from(e);
                    self.metrics.record_dispatch_failure(error.reason());
                    return Err(error);
                }
            };

            self.orders.update(&order).await?;
            self.couriers.update(&courier).await?;
            self.metrics.orders_assigned.inc();

            tracing::info!(
                order_id = %order.id(),
                courier_id = %courier.id(),
                courier = %courier.name(),
                "Order assigned"
            );

            return Ok(Some(Assignment {
                order_id: order.id(),
                courier_id: courier.id(),
            }));
        }

        let error = DispatchError::NoCourierAvailable(oldest);
        self.metrics.record_dispatch_failure(error.reason());
        Err(error)
    }

    /// Move every courier with an assigned order one step; deliver on arrival
    ///
    /// A failure on one order is logged and counted; the other couriers
    /// still move.
    pub async fn move_couriers(&self) -> Result<MoveReport, DispatchError> {
        let _unit = self.unit_of_work.lock().await;

        let mut report = MoveReport::default();

        for order in self.orders.get_all_in_assigned_status().await? {
            let order_id = order.id();

            match self.advance(order).await {
                Ok(delivered) => {
                    report.moved += 1;
                    if delivered {
                        report.completed += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    self.metrics.record_dispatch_failure(e.reason());
                    tracing::error!(order_id = %order_id, error = %e, "Failed to advance delivery");
                }
            }
        }

        Ok(report)
    }

    /// One step of the courier carrying `order`; true once delivered
    async fn advance(&self, mut order: Order) -> Result<bool, DispatchError> {
        let courier_id = order
            .courier_id()
            .ok_or(OrderError::InconsistentCourier {
                status: order.status(),
                courier: "none".to_string(),
            })?;

        let mut courier = self.couriers.get(courier_id).await?;
        courier.move_towards(order.location())?;
        self.metrics.courier_moves.inc();

        tracing::debug!(
            courier_id = %courier.id(),
            order_id = %order.id(),
            location = %courier.location(),
            target = %order.location(),
            "Courier moved"
        );

        if courier.location() != order.location() {
            self.couriers.update(&courier).await?;
            return Ok(false);
        }

        order.complete()?;
        courier.complete_order(order.id())?;

        // Courier first: a freed compartment never points at an open order
        self.couriers.update(&courier).await?;
        self.orders.update(&order).await?;
        self.metrics.orders_completed.inc();

        tracing::info!(
            order_id = %order.id(),
            courier_id = %courier.id(),
            "Order delivered"
        );

        Ok(true)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
