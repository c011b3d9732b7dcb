//! Request metrics with Prometheus text exposition.
//!
//! A small in-process registry: one counter family for HTTP requests plus
//! process-level gauges, rendered in the standard exposition format for
//! pull-based scraping at `GET /metrics`.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Label set for the request counter
type RequestKey = (String, String, u16);

/// In-process metrics for the service
///
/// Thread-safe; shared across handlers via `Arc`. The counter map is keyed
/// by (method, route template, status) — the route template rather than the
/// raw path, so `/api/log/{id}` stays a single series.
#[derive(Debug)]
pub struct ServiceMetrics {
    started: Instant,
    start_epoch_secs: u64,
    requests: Mutex<BTreeMap<RequestKey, u64>>,
}

impl ServiceMetrics {
    /// Create a new registry, stamping the process start time
    pub fn new() -> Self {
        let start_epoch_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            started: Instant::now(),
            start_epoch_secs,
            requests: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record one completed HTTP request
    pub fn record_request(&self, method: &str, path: &str, status: u16) {
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            // A poisoned lock only loses counter increments; never take the
            // whole service down for it
            Err(poisoned) => poisoned.into_inner(),
        };
        *requests
            .entry((method.to_string(), path.to_string(), status))
            .or_insert(0) += 1;
    }

    /// Render all metrics in Prometheus text exposition format
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(1024);

        writeln!(
            output,
            "# HELP http_requests_total Total number of HTTP requests handled"
        )
        .unwrap();
        writeln!(output, "# TYPE http_requests_total counter").unwrap();
        {
            let requests = match self.requests.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            for ((method, path, status), count) in requests.iter() {
                writeln!(
                    output,
                    "http_requests_total{{method=\"{}\",path=\"{}\",status=\"{}\"}} {}",
                    method, path, status, count
                )
                .unwrap();
            }
        }
        writeln!(output).unwrap();

        writeln!(
            output,
            "# HELP process_start_time_seconds Start time of the process since the Unix epoch"
        )
        .unwrap();
        writeln!(output, "# TYPE process_start_time_seconds gauge").unwrap();
        writeln!(output, "process_start_time_seconds {}", self.start_epoch_secs).unwrap();
        writeln!(output).unwrap();

        writeln!(
            output,
            "# HELP process_uptime_seconds Seconds since the process started"
        )
        .unwrap();
        writeln!(output, "# TYPE process_uptime_seconds gauge").unwrap();
        writeln!(
            output,
            "process_uptime_seconds {}",
            self.started.elapsed().as_secs()
        )
        .unwrap();

        output
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Content type of the Prometheus text exposition format
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Middleware recording every response into the registry
///
/// Labels use the matched route template when available so dynamic segments
/// like entry ids do not explode series cardinality.
pub async fn track_requests(
    metrics: Arc<ServiceMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    metrics.record_request(&method, &path, response.status().as_u16());

    response
}
