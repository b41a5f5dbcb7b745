use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::middleware::{cors_layer, rate_limit, ClientRateLimiter};
use crate::routes::portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::mail::{select_transport, MailDispatcher};
use job_portal::persistence::SqliteStore;
use job_portal::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const MAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.database.url = database;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(SqliteStore::open(&config.database.url)?);
    info!(database = %config.database.url, "database ready");

    let transport = select_transport(&config.mail)?;
    info!(transport = transport.name(), "mail transport selected");
    let (mail_queue, mail_worker) = MailDispatcher::start(
        transport,
        config.mail.sender.clone(),
        config.mail.queue_capacity,
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: store.clone(),
    };
    let rate_limiter = Arc::new(ClientRateLimiter::new(config.server.rate_limit_per_second));

    let app = portal_routes(store, mail_queue)
        .layer(Extension(app_state))
        .layer(axum::middleware::from_fn_with_state(rate_limiter, rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.allowed_origins))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job portal api ready");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    readiness_flag.store(false, Ordering::Release);
    match mail_worker.shutdown(MAIL_DRAIN_TIMEOUT).await {
        Some(stats) => info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "mail queue drained"
        ),
        None => warn!("mail queue was not drained cleanly"),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining");
}
