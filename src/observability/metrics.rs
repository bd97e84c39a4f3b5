//! Metrics collection and exposition.
//!
//! # Metrics
//! - `requestbin_captured_total` (counter): requests captured, by method
//!   (standard methods by name, extension methods as `OTHER`)
//! - `requestbin_clears_total` (counter): buffer clears
//! - `requestbin_broadcasts_total` (counter): snapshot broadcast passes
//! - `requestbin_evicted_subscribers_total` (counter): viewers dropped on failed push
//! - `requestbin_subscribers` (gauge): connected live viewers
//! - `requestbin_buffer_len` (gauge): captures currently held
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is optional and serves its own listener

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_capture(method: &Method) {
    metrics::counter!("requestbin_captured_total", "method" => method_label(method)).increment(1);
}

/// Label for a request method. Senders can invent any method token, so only
/// the standard set gets its own series.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "OTHER",
    }
}

pub fn record_clear() {
    metrics::counter!("requestbin_clears_total").increment(1);
}

pub fn record_broadcast(evicted: usize) {
    metrics::counter!("requestbin_broadcasts_total").increment(1);
    if evicted > 0 {
        metrics::counter!("requestbin_evicted_subscribers_total").increment(evicted as u64);
    }
}

pub fn record_state(buffer_len: usize, subscribers: usize) {
    metrics::gauge!("requestbin_buffer_len").set(buffer_len as f64);
    metrics::gauge!("requestbin_subscribers").set(subscribers as f64);
}
