//! # fincore-api: Customer Onboarding Service
//!
//! Axum service in front of [`fincore_core`]. Applicants are checked
//! against their Sri Lankan NIC before they can enroll in the loan program.
//!
//! ## API Surface
//!
//! | Path                          | Module                  | Purpose                  |
//! |-------------------------------|-------------------------|--------------------------|
//! | `POST /v1/customers/eligibility` | [`routes::customers`] | Pre-check an applicant |
//! | `POST /v1/customers`          | [`routes::customers`]   | Enroll an applicant      |
//! | `GET /v1/customers/:id`       | [`routes::customers`]   | Fetch an enrolled record |
//! | `GET /openapi.json`           | [`openapi`]             | OpenAPI document         |
//! | `GET /health/*`, `GET /metrics` | this module           | Probes and scraping      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Maximum accepted request body. Onboarding forms are small.
const BODY_LIMIT_BYTES: usize = 256 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` are mounted outside the metrics middleware
/// so scrapes and probes do not skew request counts.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    let metrics_on = state.config.metrics_enabled;

    let mut api = Router::new()
        .merge(routes::customers::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api.with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        probes = probes
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let probes = probes.with_state(state);

    Router::new()
        .merge(probes)
        .merge(api)
        .layer(TraceLayer::new_for_http())
}

/// GET /metrics: Prometheus metrics scrape endpoint.
///
/// Refreshes the enrolled customer gauge, then encodes every metric in
/// Prometheus text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics
        .customers_total()
        .set(i64::try_from(state.customers.len()).unwrap_or(i64::MAX));

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Returns 200 "ready" while the customer registry lock is
/// acquirable, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if !state.customers.is_accessible() {
        tracing::warn!("customer registry lock unavailable");
        return (StatusCode::SERVICE_UNAVAILABLE, "customer registry locked").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}
