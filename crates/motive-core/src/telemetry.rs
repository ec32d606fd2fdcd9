//! Fire-and-forget telemetry side channel.

use tracing::debug;

/// Lifecycle points reported to the telemetry sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryEvent {
    Enter,
    Settled,
    Exit,
    Cancellation,
}

/// Sink for motion telemetry events.
///
/// Implementations must be fire-and-forget: no return value, and failures
/// must never propagate into the animation logic (do not panic).
pub trait TelemetrySink: Send + Sync {
    fn log_event(&self, event: TelemetryEvent, message: &str);
}

/// Default sink that forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn log_event(&self, event: TelemetryEvent, message: &str) {
        debug!(event = ?event, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingTelemetry.log_event(TelemetryEvent::Enter, "enter without subscriber");
        TracingTelemetry.log_event(TelemetryEvent::Cancellation, "cancel without subscriber");
    }
}
