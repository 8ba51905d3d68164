use crate::cli::ServeArgs;
use crate::demo::seed_demo_data;
use crate::infra::AppState;
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use freelance_hub::config::AppConfig;
use freelance_hub::error::AppError;
use freelance_hub::marketplace::{InMemoryStore, MarketplaceState};
use freelance_hub::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let store = Arc::new(InMemoryStore::default());
    let marketplace_state = Arc::new(MarketplaceState::new(store));

    if args.demo_data {
        match seed_demo_data(&marketplace_state) {
            Ok(seeded) => info!(
                freelancers = seeded.freelancers,
                recruiters = seeded.recruiters,
                jobs = seeded.jobs,
                "demo data loaded"
            ),
            Err(err) => warn!("demo seed failed: {err}"),
        }
    }

    let app = with_marketplace_routes(marketplace_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketplace API ready");

    axum::serve(listener, app).await?;
    Ok(())
}
