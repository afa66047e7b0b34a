use std::time::Instant;

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error,
};
use common::{errors::WalletError, utils::TxType};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

// Wallet Metrics
lazy_static! {
    pub static ref WALLET_UPDATES: IntCounterVec = register_int_counter_vec!(
        "wallet_updates_total",
        "Total number of successful wallet updates",
        &["type"]
    )
    .unwrap();
    pub static ref WALLET_UPDATE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "wallet_update_failures_total",
        "Total number of rejected wallet updates",
        &["reason"]
    )
    .unwrap();
    pub static ref WALLET_UPDATE_AMOUNT: HistogramVec = register_histogram_vec!(
        "wallet_update_amount",
        "Distribution of wallet update amounts",
        &["type"],
        vec![0.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0]
    )
    .unwrap();
}

// API Performance Metrics
lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["endpoint", "method", "status"]
    )
    .unwrap();
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["endpoint", "method"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    )
    .unwrap();
}

pub fn record_wallet_update(tx_type: TxType, amount: Decimal) {
    let label = tx_type.to_string();
    WALLET_UPDATES.with_label_values(&[label.as_str()]).inc();
    WALLET_UPDATE_AMOUNT
        .with_label_values(&[label.as_str()])
        .observe(amount.to_f64().unwrap_or(f64::MAX));
}

pub fn record_wallet_failure(err: &WalletError) {
    WALLET_UPDATE_FAILURES
        .with_label_values(&[err.category()])
        .inc();
}

pub fn record_http_request(endpoint: &str, method: &str, status: &str, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[endpoint, method, status])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[endpoint, method])
        .observe(duration);
}

/// Records every request, including ones rejected by inner middleware.
///
/// Must wrap outside the rate limiter so throttled requests are counted.
pub async fn track_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let started = Instant::now();
    let method = req.method().to_string();

    let result = next.call(req).await;
    let (endpoint, status) = match &result {
        Ok(res) => (
            res.request()
                .match_pattern()
                .unwrap_or_else(|| "unmatched".to_string()),
            res.status(),
        ),
        // rejected before routing, so there is no pattern to report
        Err(e) => ("unmatched".to_string(), e.as_response_error().status_code()),
    };

    record_http_request(
        &endpoint,
        &method,
        status.as_str(),
        started.elapsed().as_secs_f64(),
    );
    result
}

/// Renders the default registry in the prometheus text format.
pub fn gather_text() -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
