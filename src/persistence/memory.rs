use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::kernel::AggregateRoot;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::services::free_couriers;
use super::notifier::{AggregateSnapshot, ChangeEnvelope, ChangeKind, ChangeNotifier};
use super::repository::{CourierRepository, OrderRepository, RepositoryError};

// ============================================================================
// In-Memory Store - Repository adapter for couriers and orders
// ============================================================================
//
// Both collections live behind one RwLock so read queries spanning couriers
// and orders (the free-courier query) see a consistent snapshot. Collections
// keep insertion order. Nothing is durable.
//
// ============================================================================

#[derive(Default)]
struct State {
    couriers: Vec<Courier>,
    orders: Vec<Order>,
}

pub struct InMemoryStore {
    state: RwLock<State>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl InMemoryStore {
    pub fn new(notifier: Arc<dyn ChangeNotifier>) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(State::default()),
            notifier,
        })
    }

    pub fn courier_repository(self: &Arc<Self>) -> InMemoryCourierRepository {
        InMemoryCourierRepository { store: Arc::clone(self) }
    }

    pub fn order_repository(self: &Arc<Self>) -> InMemoryOrderRepository {
        InMemoryOrderRepository { store: Arc::clone(self) }
    }

    /// Validate, write, then notify once the write lock is released
    async fn save<A, F>(&self, aggregate: &A, kind: ChangeKind, collection: F) -> Result<(), RepositoryError>
    where
        A: AggregateRoot + Into<AggregateSnapshot>,
        F: FnOnce(&mut State) -> &mut Vec<A>,
    {
        let id = aggregate.aggregate_id();

        aggregate.validate().map_err(|e| RepositoryError::InvalidAggregate {
            aggregate_type: A::AGGREGATE_TYPE,
            id,
            reason: e.to_string(),
        })?;

        {
            let mut state = self.state.write().await;
            let items = collection(&mut *state);
            let position = items.iter().position(|item| item.aggregate_id() == id);

            match (kind, position) {
                (ChangeKind::Added, None) => items.push(aggregate.clone()),
                (ChangeKind::Added, Some(_)) => {
                    return Err(RepositoryError::AlreadyExists {
                        aggregate_type: A::AGGREGATE_TYPE,
                        id,
                    })
                }
                (ChangeKind::Updated, Some(index)) => items[index] = aggregate.clone(),
                (ChangeKind::Updated, None) => return Err(not_found::<A>(id)),
            }
        }

        tracing::debug!(
            aggregate_id = %id,
            aggregate_type = A::AGGREGATE_TYPE,
            kind = ?kind,
            "Persisted aggregate"
        );

        self.notifier.notify(
            ChangeEnvelope::new(kind, aggregate).with_metadata("store".to_string(), "memory".to_string()),
        );
        Ok(())
    }
}

fn not_found<A: AggregateRoot>(id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        aggregate_type: A::AGGREGATE_TYPE,
        id,
    }
}

fn find<A: AggregateRoot>(items: &[A], id: Uuid) -> Result<A, RepositoryError> {
    items
        .iter()
        .find(|item| item.aggregate_id() == id)
        .cloned()
        .ok_or_else(|| not_found::<A>(id))
}

// ============================================================================
// Courier Repository
// ============================================================================

#[derive(Clone)]
pub struct InMemoryCourierRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl CourierRepository for InMemoryCourierRepository {
    async fn add(&self, courier: &Courier) -> Result<(), RepositoryError> {
        self.store.save(courier, ChangeKind::Added, |state| &mut state.couriers).await
    }

    async fn update(&self, courier: &Courier) -> Result<(), RepositoryError> {
        self.store.save(courier, ChangeKind::Updated, |state| &mut state.couriers).await
    }

    async fn get(&self, id: Uuid) -> Result<Courier, RepositoryError> {
        let state = self.store.state.read().await;
        find(&state.couriers, id)
    }

    async fn get_all(&self) -> Result<Vec<Courier>, RepositoryError> {
        let state = self.store.state.read().await;
        Ok(state.couriers.clone())
    }

    async fn get_all_free(&self) -> Result<Vec<Courier>, RepositoryError> {
        let state = self.store.state.read().await;
        Ok(free_couriers(&state.couriers, &state.orders))
    }
}

// ============================================================================
// Order Repository
// ============================================================================

#[derive(Clone)]
pub struct InMemoryOrderRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, order: &Order) -> Result<(), RepositoryError> {
        self.store.save(order, ChangeKind::Added, |state| &mut state.orders).await
    }

    async fn update(&self, order: &Order) -> Result<(), RepositoryError> {
        self.store.save(order, ChangeKind::Updated, |state| &mut state.orders).await
    }

    async fn get(&self, id: Uuid) -> Result<Order, RepositoryError> {
        let state = self.store.state.read().await;
        find(&state.orders, id)
    }

    async fn get_first_in_created_status(&self) -> Result<Option<Order>, RepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .orders
            .iter()
            .find(|order| order.status() == OrderStatus::Created)
            .cloned())
    }

    async fn get_all_in_created_status(&self) -> Result<Vec<Order>, RepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .orders
            .iter()
            .filter(|order| order.status() == OrderStatus::Created)
            .cloned()
            .collect())
    }

    async fn get_all_in_assigned_status(&self) -> Result<Vec<Order>, RepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .orders
            .iter()
            .filter(|order| order.status() == OrderStatus::Assigned)
            .cloned()
            .collect())
    }

    async fn get_all_not_completed(&self) -> Result<Vec<Order>, RepositoryError> {
        let state = self.store.state.read().await;
        Ok(state
            .orders
            .iter()
            .filter(|order| !order.status().is_terminal())
            .cloned()
            .collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kernel::Location;
    use crate::persistence::notifier::{BroadcastNotifier, NoopNotifier};

    fn location(x: i32, y: i32) -> Location {
        Location::new(x, y).unwrap()
    }

    fn create_test_courier(name: &str) -> Courier {
        Courier::new(Uuid::new_v4(), name, 2, location(0, 0)).unwrap()
    }

    fn create_test_order() -> Order {
        Order::new(Uuid::new_v4(), location(3, 3), 5).unwrap()
    }

    fn repositories() -> (InMemoryCourierRepository, InMemoryOrderRepository) {
        let store = InMemoryStore::new(Arc::new(NoopNotifier));
        (store.courier_repository(), store.order_repository())
    }

    #[tokio::test]
    async fn test_add_and_get_courier() {
        let (couriers, _) = repositories();
        let courier = create_test_courier("Alice");

        couriers.add(&courier).await.unwrap();

        let loaded = couriers.get(courier.id()).await.unwrap();
        assert_eq!(loaded, courier);
        assert_eq!(loaded.name(), "Alice");
    }

    #[tokio::test]
    async fn test_missing_aggregates_are_not_found() {
        let (couriers, orders) = repositories();
        let id = Uuid::new_v4();

        let error = couriers.get(id).await.unwrap_err();
        assert_eq!(error, RepositoryError::NotFound { aggregate_type: "Courier", id });

        let error = orders.get(id).await.unwrap_err();
        assert!(error.is_not_found());

        let error = orders.update(&create_test_order()).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_add_is_rejected() {
        let (_, orders) = repositories();
        let order = create_test_order();

        orders.add(&order).await.unwrap();
        let error = orders.add(&order).await.unwrap_err();
        assert!(matches!(error, RepositoryError::AlreadyExists { aggregate_type: "Order", .. }));
    }

    #[tokio::test]
    async fn test_invalid_aggregate_is_rejected_without_notification() {
        let notifier = Arc::new(BroadcastNotifier::new(8));
        let mut changes = notifier.subscribe();
        let store = InMemoryStore::new(notifier.clone());
        let orders = store.order_repository();

        let json = format!(
            r#"{{"id":"{}","location":{{"x":1,"y":1}},"volume":3,"status":"assigned","courier_id":null}}"#,
            Uuid::new_v4()
        );
        let broken: Order = serde_json::from_str(&json).unwrap();

        let error = orders.add(&broken).await.unwrap_err();
        assert!(matches!(error, RepositoryError::InvalidAggregate { .. }));
        assert!(changes.try_recv().is_err());
        assert!(orders.get(broken.id()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_notifies_once_per_successful_write() {
        let notifier = Arc::new(BroadcastNotifier::new(16));
        let mut changes = notifier.subscribe();
        let store = InMemoryStore::new(notifier.clone());
        let couriers = store.courier_repository();

        let mut courier = create_test_courier("Alice");
        couriers.add(&courier).await.unwrap();
        courier.move_towards(location(1, 0)).unwrap();
        couriers.update(&courier).await.unwrap();
        let _ = couriers.add(&courier).await;

        let added = changes.try_recv().unwrap();
        assert_eq!(added.kind, ChangeKind::Added);
        assert_eq!(added.aggregate_id, courier.id());

        let updated = changes.try_recv().unwrap();
        assert_eq!(updated.kind, ChangeKind::Updated);
        match updated.snapshot {
            AggregateSnapshot::Courier(snapshot) => assert_eq!(snapshot.location(), location(1, 0)),
            other => panic!("unexpected snapshot: {:?}", other),
        }

        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_get_all_free_excludes_couriers_with_assigned_orders() {
        let (couriers, orders) = repositories();
        let a = create_test_courier("A");
        let b = create_test_courier("B");
        let idle = create_test_courier("C");
        for courier in [&a, &b, &idle] {
            couriers.add(courier).await.unwrap();
        }

        let assigned = Order::restore(Uuid::new_v4(), location(1, 1), 1, OrderStatus::Assigned, Some(a.id())).unwrap();
        let completed = Order::restore(Uuid::new_v4(), location(1, 1), 1, OrderStatus::Completed, Some(b.id())).unwrap();
        orders.add(&assigned).await.unwrap();
        orders.add(&completed).await.unwrap();

        let free = couriers.get_all_free().await.unwrap();
        assert_eq!(free, vec![b, idle]);
    }

    #[tokio::test]
    async fn test_order_queries_by_status() {
        let (_, orders) = repositories();
        let courier_id = Uuid::new_v4();

        let first = create_test_order();
        let second = create_test_order();
        let mut assigned = create_test_order();
        assigned.assign(courier_id).unwrap();
        let mut completed = create_test_order();
        completed.assign(courier_id).unwrap();
        completed.complete().unwrap();

        for order in [&completed, &first, &assigned, &second] {
            orders.add(order).await.unwrap();
        }

        let next = orders.get_first_in_created_status().await.unwrap();
        assert_eq!(next, Some(first.clone()));

        let waiting = orders.get_all_in_created_status().await.unwrap();
        assert_eq!(waiting, vec![first.clone(), second.clone()]);

        let in_delivery = orders.get_all_in_assigned_status().await.unwrap();
        assert_eq!(in_delivery, vec![assigned.clone()]);

        let open = orders.get_all_not_completed().await.unwrap();
        assert_eq!(open, vec![first, assigned, second]);
    }

    #[tokio::test]
    async fn test_no_created_orders() {
        let (_, orders) = repositories();
        assert_eq!(orders.get_first_in_created_status().await.unwrap(), None);
        assert!(orders.get_all_in_created_status().await.unwrap().is_empty());
    }
}
