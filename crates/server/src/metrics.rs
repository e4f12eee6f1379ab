use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static STORE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "heroes_store_operations_total",
        "Hero store operations by action and outcome",
        &["action", "outcome"]
    )
    .expect("register store_operations_total")
});

/// Count one store call as `ok`, `not_found` or `error`.
pub fn observe<T>(action: &str, result: &Result<T, ServiceError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) if e.is_not_found() => "not_found",
        Err(_) => "error",
    };
    STORE_OPERATIONS_TOTAL.with_label_values(&[action, outcome]).inc();
}

pub async fn metrics_handler() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}
