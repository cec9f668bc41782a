//! HTTP service and Postgres storage for todos.
//!
//! # Overview
//! Wraps `todo-core` in an axum router, a sqlx Postgres gateway and the
//! ambient pieces a deployable service needs: environment configuration,
//! JSON tracing, request ids, a per-request deadline and panic recovery.
//!
//! # Design
//! - `app` is generic over the gateway so tests drive the real router
//!   against `InMemoryTodoRepository`.
//! - Error-to-status mapping happens only in `error::ApiError`.
//! - `/openapi.json` serves the generated `handlers::ApiDoc`.
//! - `run` serves until Ctrl-C or SIGTERM, then drains in-flight requests.

pub mod config;
pub mod error;
pub mod handlers;
pub mod postgres;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use todo_core::{TodoRepository, TodoService};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use handlers::{ApiDoc, CompleteAllBody, TodoBody};
pub use postgres::PostgresTodoRepository;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the router with the default 30 second request deadline.
pub fn app<R: TodoRepository + 'static>(service: Arc<TodoService<R>>) -> Router {
    app_with_timeout(service, Duration::from_secs(30))
}

pub fn app_with_timeout<R: TodoRepository + 'static>(
    service: Arc<TodoService<R>>,
    request_timeout: Duration,
) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos::<R>).post(handlers::create_todo::<R>),
        )
        .route("/todos/complete-all", post(handlers::complete_all_todos::<R>))
        .route(
            "/todos/{id}",
            get(handlers::get_todo::<R>)
                .put(handlers::update_todo::<R>)
                .delete(handlers::delete_todo::<R>),
        )
        .route("/todos/{id}/complete", post(handlers::complete_todo::<R>))
        .route("/openapi.json", get(handlers::openapi))
        .with_state(service)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Serve `router` on `listener` until a shutdown signal arrives.
pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
