use actix::prelude::*;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use courier_dispatch::actors::{CoordinatorActor, GetSystemHealth, JobSettings, Shutdown};
use courier_dispatch::application::{
    AddStoragePlace, CreateCourier, CreateOrder, DispatchCommandHandler, DispatchQueries,
};
use courier_dispatch::config::AppConfig;
use courier_dispatch::metrics::{self, Metrics};
use courier_dispatch::persistence::{
    BroadcastNotifier, ChangeNotifier, CourierRepository, InMemoryStore, OrderRepository,
};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[actix::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    config.validate()?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .init();

    tracing::info!(?config, "Starting courier dispatch demo");

    // === 1. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        runtime.block_on(async {
            if let Err(e) = metrics::start_metrics_server(metrics_registry, metrics_port).await {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    });

    // === 2. Store with change notifications ===
    let notifier = Arc::new(BroadcastNotifier::new(CHANGE_CHANNEL_CAPACITY));
    let mut changes = notifier.subscribe();
    actix::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => match change.to_json() {
                    Ok(json) => tracing::debug!(change = %json, "Aggregate changed"),
                    Err(e) => tracing::warn!(error = %e, "Failed to render change"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped = skipped, "Change listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let store = InMemoryStore::new(notifier as Arc<dyn ChangeNotifier>);
    let couriers: Arc<dyn CourierRepository> = Arc::new(store.courier_repository());
    let orders: Arc<dyn OrderRepository> = Arc::new(store.order_repository());

    let handler = Arc::new(DispatchCommandHandler::new(couriers.clone(), orders.clone(), metrics.clone()));
    let queries = DispatchQueries::new(couriers, orders);

    // === 3. Seed demo couriers and orders ===
    seed(&handler, &config).await?;

    // === 4. Start the coordinator and let the jobs run ===
    let coordinator = CoordinatorActor::new(handler, metrics, JobSettings::from(&config)).start();

    tracing::info!(seconds = config.demo_seconds, "Dispatch jobs running");
    tokio::time::sleep(config.demo_duration()).await;

    let health = coordinator.send(GetSystemHealth).await?;
    tracing::info!(status = ?health.overall_status, "System health before shutdown");

    for courier in queries.get_all_couriers().await? {
        tracing::info!(courier = %serde_json::to_string(&courier)?, "Courier");
    }

    let incomplete = queries.get_incomplete_orders().await?;
    tracing::info!(remaining = incomplete.len(), "Orders not yet delivered");
    for order in incomplete {
        tracing::info!(order = %serde_json::to_string(&order)?, "Open order");
    }

    if let Err(e) = coordinator.send(Shutdown).await? {
        tracing::warn!("Coordinator shutdown reported: {}", e);
    }

    tracing::info!("Demo complete");

    Ok(())
}

/// Deterministic spread of couriers and orders across the grid
async fn seed(handler: &DispatchCommandHandler, config: &AppConfig) -> anyhow::Result<()> {
    for i in 0..config.demo_couriers {
        let n = i as i32;
        let courier_id = handler
            .create_courier(CreateCourier {
                name: format!("Courier {}", i + 1),
                speed: 1 + n % 3,
                x: (n * 7) % 11,
                y: (n * 3) % 11,
            })
            .await?;

        if i % 2 == 1 {
            handler
                .add_storage_place(AddStoragePlace {
                    courier_id,
                    name: "Trunk".to_string(),
                    volume: 20,
                })
                .await?;
        }
    }

    for i in 0..config.demo_orders {
        let n = i as i32;
        handler
            .create_order(CreateOrder {
                order_id: Uuid::now_v7(),
                x: (n * 5 + 2) % 11,
                y: (n * 9 + 4) % 11,
                volume: 3 + (n * 4) % 15,
            })
            .await?;
    }

    tracing::info!(
        couriers = config.demo_couriers,
        orders = config.demo_orders,
        "Demo data seeded"
    );

    Ok(())
}
