use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize structured JSON logging for the bot process.
///
/// Correlation ids and span context are enough to follow an approval across
/// its ledger retries; there is no separate metrics pipeline.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("duty-roster telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span with the common shift-workflow attributes.
pub fn create_workflow_span(
    operation: &str,
    actor: u64,
    approver: Option<u64>,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "shift_workflow",
        operation = operation,
        actor.id = actor,
        approver.id = approver,
        correlation.id = correlation_id,
    )
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    tracing::info!("duty-roster telemetry shutdown complete");
}
