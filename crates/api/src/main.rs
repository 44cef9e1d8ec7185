use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grax_api::config::ServerConfig;
use grax_api::router::build_app_router;
use grax_api::scripting::environment::GraphEngineFactory;
use grax_api::scripting::gateway::ScriptGateway;
use grax_api::state::AppState;
use grax_core::scripting::lifecycle::EngineLifecycleManager;
use grax_core::scripting::policy::CountingPolicy;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grax_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Graph store ---
    let store = grax_db::GraphStore::new();
    tracing::info!("Graph store initialized");

    // --- Script gateway ---
    // The lifecycle manager is wired here and handed to the gateway
    // explicitly; it is the single owner of the current engine instance.
    let manager = EngineLifecycleManager::new(
        Box::new(GraphEngineFactory),
        Box::new(CountingPolicy::new(config.engine_max_executions)),
    );
    let gateway = Arc::new(ScriptGateway::new(store.clone(), manager));
    tracing::info!(
        max_executions = config.engine_max_executions,
        "Script gateway created"
    );

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        gateway,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
