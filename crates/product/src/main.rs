use anyhow::{Context, Result};
use genproto::product::{
    product_command_service_server::ProductCommandServiceServer,
    product_query_service_server::ProductQueryServiceServer,
};
use product::{
    config::{myconfig::Config, server_config::ServerConfig},
    handler::{command::ProductCommandServiceImpl, query::ProductQueryServiceImpl},
    metrics::metrics_router,
    state::AppState,
};
use shared::{
    config::ConnectionManager,
    utils::{Telemetry, init_logger},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::broadcast;
use tonic::transport::Server;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let (server_config, state, telemetry, _log_guard) =
        setup().await.context("Failed to setup application")?;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let server_handles = run_servers(server_config, state.clone(), shutdown_tx.clone());

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received (Ctrl+C)."),
        Err(e) => error!("Failed to listen for shutdown signal: {e}"),
    }

    if let Err(e) = shutdown_tx.send(()) {
        warn!("Failed to send shutdown signal: {e}");
    }

    shutdown(state, telemetry, server_handles).await;

    Ok(())
}

async fn setup() -> Result<(ServerConfig, Arc<AppState>, Telemetry, Option<WorkerGuard>)> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;
    let server_config = ServerConfig::from_config(&config)?;

    let telemetry = Telemetry::init("product-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let log_guard = init_logger(
        telemetry.logger_provider(),
        "product-service",
        config.dev_mode,
        config.enable_file_log,
    );

    info!("🚀 Starting Product Service initialization...");

    let db_pool = ConnectionManager::new_pool(
        &server_config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    let state = Arc::new(AppState::new(db_pool));

    info!("✅ Application setup completed successfully.");
    Ok((server_config, state, telemetry, log_guard))
}

struct ServerHandles {
    grpc_handle: tokio::task::JoinHandle<()>,
    metrics_handle: tokio::task::JoinHandle<()>,
}

fn run_servers(
    server_config: ServerConfig,
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
) -> ServerHandles {
    let command_service =
        ProductCommandServiceImpl::new(Arc::new(state.di_container.product_command.clone()));

    let query_service =
        ProductQueryServiceImpl::new(Arc::new(state.di_container.product_query.clone()));

    let grpc_handle = run_grpc_server(
        command_service,
        query_service,
        server_config.grpc_addr,
        shutdown_tx.subscribe(),
    );

    let metrics_handle =
        run_metrics_server(state, server_config.metric_addr, shutdown_tx.subscribe());

    ServerHandles {
        grpc_handle,
        metrics_handle,
    }
}

fn run_grpc_server(
    command_service: ProductCommandServiceImpl,
    query_service: ProductQueryServiceImpl,
    grpc_addr: SocketAddr,
    shutdown_rx: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            info!("📡 Attempting to start gRPC server on {grpc_addr}");

            let server_shutdown_rx = shutdown_rx.resubscribe();

            match start_grpc_server(
                command_service.clone(),
                query_service.clone(),
                grpc_addr,
                server_shutdown_rx,
            )
            .await
            {
                Ok(()) => {
                    info!("✅ gRPC server stopped gracefully");
                    break;
                }
                Err(e) => {
                    error!("❌ gRPC server failed: {e:#}. Restarting in 5s...");
                    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                }
            }
        }
    })
}

async fn start_grpc_server(
    command_service: ProductCommandServiceImpl,
    query_service: ProductQueryServiceImpl,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!("📡 Starting gRPC server on {addr}");

    let shutdown_future = async move {
        let _ = shutdown_rx.recv().await;
        info!("gRPC server received shutdown signal");
    };

    Server::builder()
        .add_service(ProductCommandServiceServer::new(command_service))
        .add_service(ProductQueryServiceServer::new(query_service))
        .serve_with_shutdown(addr, shutdown_future)
        .await
        .with_context(|| format!("gRPC server failed to start on {addr}"))
}

fn run_metrics_server(
    state: Arc<AppState>,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("❌ Failed to bind metrics server on {addr}: {e}");
                return;
            }
        };

        info!("📈 Metrics server listening on {addr}");

        let shutdown_future = async move {
            let _ = shutdown_rx.recv().await;
            info!("Metrics server received shutdown signal");
        };

        if let Err(e) = axum::serve(listener, metrics_router(state))
            .with_graceful_shutdown(shutdown_future)
            .await
        {
            error!("❌ Metrics server failed: {e}");
        }
    })
}

async fn shutdown(state: Arc<AppState>, telemetry: Telemetry, server_handles: ServerHandles) {
    info!("🛑 Shutting down all servers...");

    let shutdown_timeout = tokio::time::Duration::from_secs(30);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = tokio::join!(server_handles.grpc_handle, server_handles.metrics_handle);
    })
    .await;

    match shutdown_result {
        Ok(()) => info!("✅ All components shutdown gracefully"),
        Err(_) => {
            warn!("⚠️  Shutdown timeout reached, forcing exit");
        }
    }

    ConnectionManager::close(&state.pool).await;

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    info!("✅ Product Service shutdown complete.");
}
