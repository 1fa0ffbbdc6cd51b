use crate::auth::{CredentialStore, PgCredentialStore};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::{SetRequestHeaderLayer, SetResponseHeaderLayer},
    trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

mod config;
pub use self::config::{
    Config, DEFAULT_ACQUIRE_TIMEOUT_SECONDS, DEFAULT_DB_HOST, DEFAULT_DB_PORT,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DatabaseConfig,
};

pub mod handlers;

mod openapi;
pub use self::openapi::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Start the server
///
/// The pool connects lazily: an unreachable database fails individual
/// requests (and `/health`) instead of preventing startup.
///
/// # Errors
/// Return error if failed to bind the port or serve requests
pub async fn new(config: Config) -> Result<()> {
    let pool = config
        .database
        .pool_options()
        .connect_lazy_with(config.database.connect_options());

    info!(
        "Credential store: {}:{}/{} (max {} connections)",
        config.database.host(),
        config.database.port(),
        config.database.name(),
        config.database.max_connections()
    );

    let store = PgCredentialStore::new(pool.clone());

    let app = router(Arc::new(store));

    let listener = TcpListener::bind(format!("::0:{}", config.port)).await?;

    info!("Listening on [::]:{}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;

    info!("Gracefully shutdown");

    Ok(())
}

/// Build the application router around any credential store.
pub fn router(store: Arc<dyn CredentialStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any);

    // kept out of the CORS layer, which would answer OPTIONS itself
    let health = Router::new()
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ));

    Router::new()
        .route("/", get(|| async { "🏥" }))
        .route("/login", post(handlers::login))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(store.clone())),
        )
        .merge(health)
        .layer(Extension(store))
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
