use actix_web::{web, App, HttpResponse, HttpServer};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

// ============================================================================
// Metrics Exporter - Scrape endpoint for the dispatch registry
// ============================================================================
//
//   GET /metrics  → text exposition of every dispatch metric
//   GET /health   → liveness of the exporter plus registered family count
//
// Runs on its own runtime; the dispatch actors never wait on it.
//
// ============================================================================

pub const METRICS_PATH: &str = "/metrics";
pub const HEALTH_PATH: &str = "/health";

const SERVICE_NAME: &str = "courier-dispatch";

struct Exporter {
    registry: Arc<Registry>,
}

impl Exporter {
    fn render(&self) -> Result<(String, Vec<u8>), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut body = Vec::new();
        encoder.encode(&self.registry.gather(), &mut body)?;
        Ok((encoder.format_type().to_string(), body))
    }
}

fn routes(registry: Arc<Registry>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(Exporter { registry }))
            .route(METRICS_PATH, web::get().to(scrape))
            .route(HEALTH_PATH, web::get().to(liveness));
    }
}

/// Serve the dispatch registry until the runtime stops
pub async fn start_metrics_server(registry: Arc<Registry>, port: u16) -> std::io::Result<()> {
    tracing::info!(port = port, path = METRICS_PATH, "Metrics exporter listening");

    HttpServer::new(move || App::new().configure(routes(registry.clone())))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}

async fn scrape(exporter: web::Data<Exporter>) -> HttpResponse {
    match exporter.render() {
        Ok((content_type, body)) => HttpResponse::Ok().content_type(content_type).body(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode dispatch metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn liveness(exporter: web::Data<Exporter>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "metric_families": exporter.registry.gather().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use actix_web::test;

    #[actix_web::test]
    async fn test_scrape_exposes_dispatch_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.orders_created.inc();
        let app = test::init_service(App::new().configure(routes(Arc::new(metrics.registry().clone())))).await;

        let request = test::TestRequest::get().uri(METRICS_PATH).to_request();
        let response = test::call_service(&app, request).await;
        assert!(response.status().is_success());

        let body = test::read_body(response).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("orders_created_total 1"));
    }

    #[actix_web::test]
    async fn test_liveness_reports_registered_families() {
        let metrics = Metrics::new().unwrap();
        let expected = metrics.registry().gather().len();
        let app = test::init_service(App::new().configure(routes(Arc::new(metrics.registry().clone())))).await;

        let request = test::TestRequest::get().uri(HEALTH_PATH).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["metric_families"], expected);
    }
}
