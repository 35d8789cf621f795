//! `GET /metrics` in Prometheus text format

use axum::{extract::State, http::header, response::IntoResponse};
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Register help text for every metric the service emits.
pub fn describe_metrics() {
    describe_counter!(
        "reservations_admitted_total",
        "Reservations admitted by the booking core"
    );
    describe_counter!(
        "reservation_seats_admitted_total",
        "Seats handed out by admitted reservations"
    );
    describe_counter!(
        "reservations_rejected_total",
        "Reservation requests refused, labelled by reason"
    );
    describe_counter!("reservations_cancelled_total", "Reservations cancelled");
    describe_counter!(
        "reservations_cancel_refused_total",
        "Cancellations refused after the deadline"
    );
    describe_counter!("http_requests_total", "HTTP requests served");
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "HTTP request latency"
    );
}

pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
