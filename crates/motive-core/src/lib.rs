pub mod actions;
pub mod animation;
pub mod config;
pub mod curves;
pub mod engine;
pub mod error;
pub mod link;
pub mod player;
pub mod target;
pub mod telemetry;
pub mod util;
pub mod values;
pub mod view;

pub use actions::{Action, CancelAction, CancellationError};
pub use config::MotionConfig;
pub use curves::{CubicBezier, MotionCurve, MotionDuration, MotionState};
pub use engine::{MotionChain, MotionEngine};
pub use error::{Error, Result};
pub use link::MotionLinkProps;
pub use player::{MotionPlayer, MotionPlayerBuilder};
pub use target::{MotionTarget, PropertyUpdate};
pub use telemetry::{TelemetryEvent, TelemetrySink, TracingTelemetry};
pub use values::{Color, MotionScaleFactor, MotionTypeKey, MotionValue, MotionValueMap, Phases, Stagger};
pub use view::{MotionView, MotionViewBase};
