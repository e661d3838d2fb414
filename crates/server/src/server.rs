//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Turning the registration plan into concrete routes
//! - Middleware stack (logging, request ids, timeout, CORS)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::viewer::ViewerPage;
use crate::routes::{health, listing, login, not_found};
use crate::state::ServerState;
use apimount::{RouteDescriptor, RouteKind};
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use document::DocumentFormat;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router from the state's registration plan
///
/// Every planned route is registered at its absolute path:
/// - static assets: `ServeDir` over the configured assets directory
/// - document listing: one GET route per format (`.json`, `.yaml`)
/// - viewer: GET, an HTML page pointing at the JSON document
/// - login: POST, only when an authenticator is configured
///
/// `/health` is always mounted. Middleware stack (applied in reverse order):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS
/// 5. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let mut router = Router::new().route("/health", get(health::health_check));

    for route in &state.plan.routes {
        tracing::debug!(kind = ?route.kind, path = %route.absolute_path, "registering route");
        router = match route.kind {
            RouteKind::StaticAssets => router.nest_service(
                &route.absolute_path,
                ServeDir::new(&state.config.assets_dir),
            ),
            RouteKind::DocumentListing => add_listing_routes(router, &state, route),
            RouteKind::Viewer => match viewer_page(&state, route) {
                Some(page) => router.route(
                    &route.absolute_path,
                    get(move || {
                        let page = page.clone();
                        async move { page.render() }
                    }),
                ),
                None => router,
            },
            RouteKind::Login => router.route(&route.absolute_path, post(login::login)),
        };
    }

    router
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn add_listing_routes(
    mut router: Router<Arc<ServerState>>,
    state: &Arc<ServerState>,
    route: &RouteDescriptor,
) -> Router<Arc<ServerState>> {
    let Some(instance) = route.instance else {
        return router;
    };

    for (format, path) in route.listing_paths() {
        let state = state.clone();
        router = router.route(
            &path,
            get(
                move |headers: HeaderMap, Query(query): Query<Vec<(String, String)>>| {
                    listing::serve_document(state.clone(), instance, format, headers, query)
                },
            ),
        );
    }
    router
}

/// Viewer page of the instance `route` belongs to, linked to the same
/// instance's assets and JSON document.
fn viewer_page(state: &ServerState, route: &RouteDescriptor) -> Option<ViewerPage> {
    let index = route.instance?;
    let instance = state.plan.instances.get(index)?;

    let mut assets_path = None;
    let mut document_url = None;
    for sibling in state.plan.routes_for(index) {
        match sibling.kind {
            RouteKind::StaticAssets => assets_path = Some(sibling.absolute_path.clone()),
            RouteKind::DocumentListing => {
                document_url = sibling
                    .listing_paths()
                    .into_iter()
                    .find(|(format, _)| *format == DocumentFormat::Json)
                    .map(|(_, path)| path);
            }
            _ => {}
        }
    }

    Some(ViewerPage {
        title: instance
            .config
            .title
            .clone()
            .unwrap_or_else(|| instance.paths.instance_name.clone()),
        assets_path: assets_path?,
        document_url: document_url?,
        login_path: state.plan.login_route().map(|r| r.absolute_path.clone()),
    })
}

/// Start the apimount HTTP server
///
/// Loads the mount configuration and resource registry named in `config`,
/// plans the routes and serves them until SIGTERM or Ctrl+C.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let state = Arc::new(ServerState::from_config(config.clone())?);
    let addr: SocketAddr = config.socket_addr()?;

    for instance in &state.plan.instances {
        tracing::info!(
            instance = %instance.paths.instance_name,
            view_path = %instance.paths.view_path,
            key = %instance.cache_key,
            "Mounted instance"
        );
    }
    tracing::info!(
        "Starting apimount server on {} with {} instances, login {}",
        addr,
        state.plan.instances.len(),
        if state.authenticator.is_some() { "enabled" } else { "disabled" }
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
