//! The seam between the engine and whatever it animates.

use crate::values::Color;

/// One frame's worth of change for a single property lane.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyUpdate {
    Alpha(f32),
    ScaleX(f32),
    ScaleY(f32),
    TranslationX(f32),
    TranslationY(f32),
    Rotation(f32),
    Elevation(f32),
    CardElevation(f32),
    CornerRadius(f32),
    ScrollX(f32),
    IndicatorOffset(f32),
    IndicatorWidth(f32),
    /// Layout-mutating width change, applied every frame.
    Width(f32),
    /// Layout-mutating height change, applied every frame.
    Height(f32),
    Gradient(Vec<Color>),
}

/// An element the engine can drive.
///
/// Implementations receive property updates on every animation frame and
/// must apply them synchronously. The engine holds targets weakly, so a
/// dropped target simply stops receiving frames.
pub trait MotionTarget: Send + Sync {
    /// Apply one property update for the current frame.
    fn apply(&self, update: PropertyUpdate);

    /// Whether the target exposes card surfaces (corner radius, card
    /// elevation). Non-card targets reject those properties up front.
    fn is_card(&self) -> bool {
        false
    }

    /// Current translation, used as the starting point for target-relative
    /// translation values.
    fn translation(&self) -> (f32, f32) {
        (0.0, 0.0)
    }

    /// Accessibility announcement hook. Default is silent.
    fn announce(&self, _text: &str) {}
}
