//! # Prometheus Metrics
//!
//! Request metrics and onboarding decision counters backed by a
//! `prometheus` registry.
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in middleware.
//! Eligibility outcomes are counted by the customer handlers. The enrolled
//! customer gauge is refreshed on each `/metrics` scrape (pull model).

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use fincore_core::Rejection;
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

/// Outcome label for an accepted applicant.
pub const OUTCOME_ACCEPTED: &str = "accepted";

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain metrics --
    eligibility_decisions_total: IntCounterVec,
    customers_total: IntGauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

fn sum_counters(collector: &IntCounterVec) -> u64 {
    collector
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("fincore_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "fincore_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("fincore_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let eligibility_decisions_total = IntCounterVec::new(
            Opts::new(
                "fincore_eligibility_decisions_total",
                "Eligibility gate decisions by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");

        let customers_total =
            IntGauge::new("fincore_customers_total", "Enrolled customers in the registry")
                .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(eligibility_decisions_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(customers_total.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                eligibility_decisions_total,
                customers_total,
            }),
        }
    }

    /// Return current total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        sum_counters(&self.inner.http_requests_total)
    }

    /// Return current total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        sum_counters(&self.inner.http_errors_total)
    }

    /// Return how many decisions were recorded with `outcome`.
    pub fn decisions(&self, outcome: &str) -> u64 {
        self.inner
            .eligibility_decisions_total
            .with_label_values(&[outcome])
            .get()
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    /// Count one eligibility gate decision.
    pub fn record_decision<T>(&self, decision: &Result<T, Rejection>) {
        let outcome = match decision {
            Ok(_) => OUTCOME_ACCEPTED,
            Err(rejection) => rejection.kind().as_str(),
        };
        self.inner
            .eligibility_decisions_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Access the enrolled customers gauge for updating.
    pub fn customers_total(&self) -> &IntGauge {
        &self.inner.customers_total
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that records HTTP request metrics via Prometheus.
///
/// Requests are labelled with the route template (`/v1/customers/:id`), never
/// the raw URI, so the label set stays bounded.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_PATH, MatchedPath::as_str)
        .to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincore_core::{check_eligibility, Sex};

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
        assert_eq!(m.decisions(OUTCOME_ACCEPTED), 0);
    }

    #[test]
    fn requests_increments() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/test", 200, 0.01);
        m.record_request("POST", "/test", 201, 0.02);
        m.record_request("GET", "/other", 200, 0.005);
        assert_eq!(m.requests(), 3);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn client_and_server_errors_count() {
        let m = ApiMetrics::new();
        m.record_request("POST", "/v1/customers", 422, 0.1);
        m.record_request("POST", "/v1/customers", 403, 0.1);
        m.record_request("GET", "/v1/customers/{id}", 500, 0.05);
        assert_eq!(m.requests(), 3);
        assert_eq!(m.errors(), 3);
    }

    #[test]
    fn decisions_are_labelled_by_outcome() {
        let m = ApiMetrics::new();
        m.record_decision(&check_eligibility("856234567V", Sex::Female));
        m.record_decision(&check_eligibility("198523445678", Sex::Female));
        m.record_decision(&check_eligibility("198523445678", Sex::Male));
        m.record_decision(&check_eligibility("12345678V", Sex::Male));
        m.record_decision(&check_eligibility("856234567V", Sex::Female));
        assert_eq!(m.decisions(OUTCOME_ACCEPTED), 2);
        assert_eq!(m.decisions("sex_mismatch"), 1);
        assert_eq!(m.decisions("policy_ineligible"), 1);
        assert_eq!(m.decisions("invalid_identity_format"), 1);
    }

    #[test]
    fn concurrent_increments_are_safe() {
        let m = ApiMetrics::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        m.record_request("GET", "/health/liveness", 200, 0.001);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(m.requests(), 4000);
    }

    #[test]
    fn gather_and_encode_contains_metric_names() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/metrics", 200, 0.001);
        m.record_decision(&check_eligibility("856234567V", Sex::Female));
        m.customers_total().set(3);
        let text = m.gather_and_encode().unwrap();
        assert!(text.contains("fincore_http_requests_total"));
        assert!(text.contains("fincore_http_request_duration_seconds"));
        assert!(text.contains("fincore_eligibility_decisions_total{outcome=\"accepted\"} 1"));
        assert!(text.contains("fincore_customers_total 3"));
    }
}
