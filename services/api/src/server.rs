use crate::cli::ServeArgs;
use crate::demo::{seed_demo_pool, DEMO_REQUEST};
use crate::infra::{in_memory_service, AppState, InMemoryMatchStore};
use crate::routes::with_matchmaking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use matchmaker::config::AppConfig;
use matchmaker::error::AppError;
use matchmaker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = InMemoryMatchStore::default();
    let service = in_memory_service(&store, config.matching.clone());
    if args.demo_data {
        seed_demo_pool(&store, &service, 24)?;
        info!(request_id = DEMO_REQUEST, "seeded demo candidate pool");
    }

    let app = with_matchmaking_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        minimum = config.matching.minimum_recommendations,
        "matchmaking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
