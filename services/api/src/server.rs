use crate::cli::ServeArgs;
use crate::infra::{seed_demo_catalog, AppState, InMemoryBenefitCatalog, RecordingSubmissionGateway};
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use benefit_forms::config::AppConfig;
use benefit_forms::error::AppError;
use benefit_forms::forms::BenefitFormService;
use benefit_forms::telemetry;
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

    let catalog = Arc::new(InMemoryBenefitCatalog::default());
    seed_demo_catalog(&catalog);
    let gateway = Arc::new(RecordingSubmissionGateway::default());
    let form_service = Arc::new(BenefitFormService::new(catalog, gateway));

    let app = with_form_routes(form_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "benefit form service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
