use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_accounts, AnalyzerBackend, AppState, InMemoryHiringStore,
    InMemoryNotificationPublisher, ScriptedAnalyzer,
};
use crate::routes::with_hiring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hireloop::config::AppConfig;
use hireloop::error::AppError;
use hireloop::telemetry;
use hireloop::workflows::hiring::{GeminiAnalyzer, HiringService};
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

    let store = Arc::new(InMemoryHiringStore::default());
    seed_demo_accounts(&store);
    let publisher = Arc::new(InMemoryNotificationPublisher::default());

    let analyzer = match config.analyzer.api_key.clone() {
        Some(api_key) => {
            info!(model = %config.analyzer.model, "transcript analyzer: hosted model");
            AnalyzerBackend::Gemini(GeminiAnalyzer::new(
                config.analyzer.endpoint.clone(),
                config.analyzer.model.clone(),
                api_key,
            ))
        }
        None => {
            info!("transcript analyzer: scripted fallback (no GEMINI_API_KEY)");
            AnalyzerBackend::Scripted(ScriptedAnalyzer)
        }
    };

    let service = Arc::new(HiringService::new(store, publisher, Arc::new(analyzer)));

    let app = with_hiring_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hiring board ready");

    axum::serve(listener, app).await?;
    Ok(())
}
