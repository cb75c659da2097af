//! Logging setup and the tower layers wrapped around the CRUD routes.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::Response;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::error_response;

const DEFAULT_FILTER: &str = "info,crud_demo_api=debug,crud_demo_data=debug,tower_http=debug";

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins when set and valid; otherwise the service and its data
/// layer log at `debug` and everything else at `info`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// One `INFO` span per request; the closing event carries status and latency
/// in milliseconds.
pub fn request_trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

pub type PanicHandler = fn(Box<dyn Any + Send>) -> Response;

/// Turns a panicking handler into `500 {"error": "Internal server error"}`.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(panic: Box<dyn Any + Send>) -> Response {
    let detail = match panic.downcast_ref::<&str>() {
        Some(msg) => (*msg).to_string(),
        None => panic
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_else(|| "non-string panic payload".to_string()),
    };
    tracing::error!(panic = %detail, "crud demo handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
