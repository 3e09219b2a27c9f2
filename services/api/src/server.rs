use crate::cli::ServeArgs;
use crate::infra::{ApiContext, AppState};
use crate::routes::api_router;
use crate::scripts;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jobmatch::config::AppConfig;
use jobmatch::error::AppError;
use jobmatch::telemetry;
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

    telemetry::init(env!("CARGO_CRATE_NAME"), &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let ctx = ApiContext::new(&config);
    if scripts::seed_admin(ctx.store.as_ref(), &config.admin)? {
        info!(email = %config.admin.email, "admin account created");
    }

    let app = api_router(ctx)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "jobmatch api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
