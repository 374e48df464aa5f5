use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use hireboard::board::{BoardService, PlanCatalog};
use hireboard::config::AppConfig;
use hireboard::error::AppError;
use hireboard::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{seed_store, AppState, InMemoryBoardStore, InMemoryNotificationPublisher};
use crate::routes::with_board_routes;

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

    let store = Arc::new(InMemoryBoardStore::default());
    seed_store(&store);
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let board_service = Arc::new(BoardService::new(
        store,
        notifications,
        PlanCatalog::standard(),
    ));

    let app = with_board_routes(board_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
