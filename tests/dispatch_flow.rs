use std::sync::Arc;
use uuid::Uuid;

use courier_dispatch::application::{
    AddStoragePlace, CreateCourier, CreateOrder, DispatchCommandHandler, DispatchError, DispatchQueries,
};
use courier_dispatch::domain::order::OrderStatus;
use courier_dispatch::metrics::Metrics;
use courier_dispatch::persistence::{
    AggregateSnapshot, BroadcastNotifier, ChangeKind, CourierRepository, InMemoryStore, OrderRepository,
};

struct Harness {
    handler: DispatchCommandHandler,
    queries: DispatchQueries,
    notifier: Arc<BroadcastNotifier>,
}

fn harness() -> Harness {
    let notifier = Arc::new(BroadcastNotifier::new(64));
    let store = InMemoryStore::new(notifier.clone());
    let couriers: Arc<dyn CourierRepository> = Arc::new(store.courier_repository());
    let orders: Arc<dyn OrderRepository> = Arc::new(store.order_repository());
    let metrics = Arc::new(Metrics::new().unwrap());

    Harness {
        handler: DispatchCommandHandler::new(couriers.clone(), orders.clone(), metrics),
        queries: DispatchQueries::new(couriers, orders),
        notifier,
    }
}

async fn run_until_delivered(handler: &DispatchCommandHandler, max_ticks: usize) -> usize {
    let mut delivered = 0;
    for _ in 0..max_ticks {
        loop {
            match handler.assign_orders().await {
                Ok(Some(_)) => continue,
                Ok(None) | Err(DispatchError::NoCourierAvailable(_)) => break,
                Err(e) => panic!("assign failed: {}", e),
            }
        }
        delivered += handler.move_couriers().await.unwrap().completed;
    }
    delivered
}

#[tokio::test]
async fn every_order_is_delivered_and_couriers_end_free() {
    let h = harness();

    let slow = h
        .handler
        .create_courier(CreateCourier { name: "Slow".to_string(), speed: 1, x: 0, y: 0 })
        .await
        .unwrap();
    let fast = h
        .handler
        .create_courier(CreateCourier { name: "Fast".to_string(), speed: 3, x: 9, y: 9 })
        .await
        .unwrap();
    h.handler
        .add_storage_place(AddStoragePlace { courier_id: fast, name: "Trunk".to_string(), volume: 25 })
        .await
        .unwrap();

    let order_ids = [(1, 1, 4), (8, 2, 20), (5, 5, 9)];
    for (x, y, volume) in order_ids {
        h.handler
            .create_order(CreateOrder { order_id: Uuid::new_v4(), x, y, volume })
            .await
            .unwrap();
    }

    let delivered = run_until_delivered(&h.handler, 60).await;
    assert_eq!(delivered, 3);
    assert!(h.queries.get_incomplete_orders().await.unwrap().is_empty());

    let couriers = h.queries.get_all_couriers().await.unwrap();
    assert_eq!(couriers.len(), 2);
    assert!(couriers.iter().any(|c| c.id == slow));
    for courier in couriers {
        assert!(courier.storage_places.iter().all(|place| place.order_id.is_none()));
    }
}

#[tokio::test]
async fn oversized_order_waits_without_blocking_queries() {
    let h = harness();

    h.handler
        .create_courier(CreateCourier { name: "Alice".to_string(), speed: 2, x: 0, y: 0 })
        .await
        .unwrap();
    let order_id = h
        .handler
        .create_order(CreateOrder { order_id: Uuid::new_v4(), x: 2, y: 2, volume: 11 })
        .await
        .unwrap();

    let error = h.handler.assign_orders().await.unwrap_err();
    assert!(matches!(error, DispatchError::NoCourierAvailable(id) if id == order_id));

    let open = h.queries.get_incomplete_orders().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].status, OrderStatus::Created);
    assert_eq!(open[0].courier_id, None);
}

#[tokio::test]
async fn changes_are_broadcast_per_write() {
    let h = harness();
    let mut changes = h.notifier.subscribe();

    let courier_id = h
        .handler
        .create_courier(CreateCourier { name: "Alice".to_string(), speed: 5, x: 0, y: 0 })
        .await
        .unwrap();
    let order_id = h
        .handler
        .create_order(CreateOrder { order_id: Uuid::new_v4(), x: 1, y: 0, volume: 2 })
        .await
        .unwrap();
    h.handler.assign_orders().await.unwrap();

    let first = changes.recv().await.unwrap();
    assert_eq!(first.kind, ChangeKind::Added);
    assert_eq!(first.aggregate_id, courier_id);

    let second = changes.recv().await.unwrap();
    assert_eq!(second.kind, ChangeKind::Added);
    assert_eq!(second.aggregate_id, order_id);

    // Assignment writes the order first, then the courier
    let third = changes.recv().await.unwrap();
    assert_eq!(third.kind, ChangeKind::Updated);
    match third.snapshot {
        AggregateSnapshot::Order(order) => assert_eq!(order.status(), OrderStatus::Assigned),
        other => panic!("expected order snapshot, got {:?}", other),
    }

    let fourth = changes.recv().await.unwrap();
    assert_eq!(fourth.aggregate_id, courier_id);
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn oversized_order_does_not_hold_back_later_orders() {
    let h = harness();

    h.handler
        .create_courier(CreateCourier { name: "Alice".to_string(), speed: 4, x: 0, y: 0 })
        .await
        .unwrap();
    let oversized = h
        .handler
        .create_order(CreateOrder { order_id: Uuid::new_v4(), x: 2, y: 2, volume: 11 })
        .await
        .unwrap();
    let small = h
        .handler
        .create_order(CreateOrder { order_id: Uuid::new_v4(), x: 3, y: 1, volume: 2 })
        .await
        .unwrap();

    let delivered = run_until_delivered(&h.handler, 5).await;
    assert_eq!(delivered, 1);

    let open = h.queries.get_incomplete_orders().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, oversized);
    assert_eq!(open[0].status, OrderStatus::Created);
    assert!(open.iter().all(|order| order.id != small));
}

#[tokio::test]
async fn delivery_writes_courier_before_order() {
    let h = harness();

    let courier_id = h
        .handler
        .create_courier(CreateCourier { name: "Alice".to_string(), speed: 5, x: 0, y: 0 })
        .await
        .unwrap();
    let order_id = h
        .handler
        .create_order(CreateOrder { order_id: Uuid::new_v4(), x: 1, y: 0, volume: 2 })
        .await
        .unwrap();
    h.handler.assign_orders().await.unwrap();

    let mut changes = h.notifier.subscribe();
    let report = h.handler.move_couriers().await.unwrap();
    assert_eq!(report.completed, 1);

    let first = changes.recv().await.unwrap();
    assert_eq!(first.aggregate_id, courier_id);
    match first.snapshot {
        AggregateSnapshot::Courier(courier) => {
            assert!(courier.storage_places().iter().all(|place| place.order_id().is_none()))
        }
        other => panic!("expected courier snapshot, got {:?}", other),
    }

    let second = changes.recv().await.unwrap();
    assert_eq!(second.aggregate_id, order_id);
    match second.snapshot {
        AggregateSnapshot::Order(order) => assert_eq!(order.status(), OrderStatus::Completed),
        other => panic!("expected order snapshot, got {:?}", other),
    }
    assert!(changes.try_recv().is_err());
}
