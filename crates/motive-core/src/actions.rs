//! Cancellation reasons and callback aliases shared across the engine.

use std::sync::Arc;

/// Reason attached to a cancellation for diagnostics and telemetry.
///
/// The reason never changes engine behavior beyond what gets logged and
/// what is handed to the cancellation callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationError {
    /// Unspecified cancellation.
    Default,
    /// Cancelled because memory pressure exceeded the allowed maximum.
    MemoryMaxExceeded,
    /// Cancelled because loading took too long.
    LoadingTimeout,
    /// Cancelled because the host element was torn down.
    HostDestroyed,
}

/// Callback invoked at animation lifecycle points (begin/end).
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// Callback invoked when an animation or chain is cancelled.
pub type CancelAction = Arc<dyn Fn(CancellationError) + Send + Sync>;
