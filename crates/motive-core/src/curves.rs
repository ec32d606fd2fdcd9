//! Named easing curves, duration tokens, and the two-state motion direction.
//!
//! The curve and duration tables are fixed design-system constants; nothing
//! here is configurable at runtime.

use std::time::Duration;

/// A 4-parameter cubic bezier easing definition.
///
/// The curve maps animation progress on the x axis to eased output on the
/// y axis, with implicit anchors at (0, 0) and (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate the curve at linear progress `t` in [0, 1].
    ///
    /// Solves for the bezier parameter whose x coordinate matches `t` by
    /// bisection, then returns the y coordinate at that parameter.
    pub fn eval(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let mut low = 0.0f32;
        let mut high = 1.0f32;
        for _ in 0..32 {
            let mid = (low + high) / 2.0;
            if bezier_component(self.x1, self.x2, mid) < t {
                low = mid;
            } else {
                high = mid;
            }
        }
        let param = (low + high) / 2.0;
        bezier_component(self.y1, self.y2, param)
    }
}

/// One-dimensional cubic bezier with anchors 0 and 1.
#[inline]
fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t
}

/// Named motion curves, each bound to a fixed cubic-bezier definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionCurve {
    Linear,
    Ease01,
    Ease02,
    Decelerate01,
    Decelerate02,
    Decelerate03,
    Accelerate01,
    Accelerate02,
    Accelerate03,
}

impl MotionCurve {
    pub const ALL: [MotionCurve; 9] = [
        MotionCurve::Linear,
        MotionCurve::Ease01,
        MotionCurve::Ease02,
        MotionCurve::Decelerate01,
        MotionCurve::Decelerate02,
        MotionCurve::Decelerate03,
        MotionCurve::Accelerate01,
        MotionCurve::Accelerate02,
        MotionCurve::Accelerate03,
    ];

    /// The bezier definition bound to this curve.
    pub const fn bezier(self) -> CubicBezier {
        match self {
            MotionCurve::Linear => CubicBezier::new(0.0, 0.0, 1.0, 1.0),
            MotionCurve::Ease01 => CubicBezier::new(0.33, 0.0, 0.67, 1.0),
            MotionCurve::Ease02 => CubicBezier::new(0.0, 0.0, 0.2, 1.0),
            MotionCurve::Decelerate01 => CubicBezier::new(0.33, 0.0, 0.1, 1.0),
            MotionCurve::Decelerate02 => CubicBezier::new(0.0, 0.0, 0.0, 1.0),
            MotionCurve::Decelerate03 => CubicBezier::new(0.1, 0.9, 0.2, 1.0),
            MotionCurve::Accelerate01 => CubicBezier::new(0.8, 0.0, 0.78, 1.0),
            MotionCurve::Accelerate02 => CubicBezier::new(1.0, 0.0, 1.0, 1.0),
            MotionCurve::Accelerate03 => CubicBezier::new(0.9, 0.1, 1.0, 0.2),
        }
    }

    /// Apply the easing function to a linear progress value in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        self.bezier().eval(t)
    }
}

/// Named duration tokens in milliseconds.
///
/// The base scale runs 0-900ms; the remaining tokens are special-purpose
/// values for specific UI affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionDuration {
    /// Zero-length token for deterministic testing.
    Zero,
    Short01,
    Short02,
    Short03,
    Medium01,
    Medium02,
    Medium03,
    Long01,
    Long02,
    ExtendedLong01,
    ExtendedLong02,
    TestableSlow,
    SearchExpand,
    Search166,
    Search116,
    Search183,
    Search80,
    SearchWithAnimationBuffer,
    ViewPagerOut,
    ResetSelectedPivot,
    ShimmerTransitionDelay,
    AppBarHeaderReset,
}

impl MotionDuration {
    pub const ALL: [MotionDuration; 22] = [
        MotionDuration::Zero,
        MotionDuration::Short01,
        MotionDuration::Short02,
        MotionDuration::Short03,
        MotionDuration::Medium01,
        MotionDuration::Medium02,
        MotionDuration::Medium03,
        MotionDuration::Long01,
        MotionDuration::Long02,
        MotionDuration::ExtendedLong01,
        MotionDuration::ExtendedLong02,
        MotionDuration::TestableSlow,
        MotionDuration::SearchExpand,
        MotionDuration::Search166,
        MotionDuration::Search116,
        MotionDuration::Search183,
        MotionDuration::Search80,
        MotionDuration::SearchWithAnimationBuffer,
        MotionDuration::ViewPagerOut,
        MotionDuration::ResetSelectedPivot,
        MotionDuration::ShimmerTransitionDelay,
        MotionDuration::AppBarHeaderReset,
    ];

    /// Token value in milliseconds.
    pub const fn millis(self) -> u64 {
        match self {
            MotionDuration::Zero => 0,
            MotionDuration::Short01 => 50,
            MotionDuration::Short02 => 100,
            MotionDuration::Short03 => 150,
            MotionDuration::Medium01 => 200,
            MotionDuration::Medium02 => 250,
            MotionDuration::Medium03 => 300,
            MotionDuration::Long01 => 400,
            MotionDuration::Long02 => 500,
            MotionDuration::ExtendedLong01 => 750,
            MotionDuration::ExtendedLong02 => 900,
            MotionDuration::TestableSlow => 500,
            MotionDuration::SearchExpand => 266,
            MotionDuration::Search166 => 166,
            MotionDuration::Search116 => 116,
            MotionDuration::Search183 => 183,
            MotionDuration::Search80 => 80,
            MotionDuration::SearchWithAnimationBuffer => 280,
            MotionDuration::ViewPagerOut => 80,
            MotionDuration::ResetSelectedPivot => 60,
            MotionDuration::ShimmerTransitionDelay => 3000,
            MotionDuration::AppBarHeaderReset => 250,
        }
    }

    pub const fn duration(self) -> Duration {
        Duration::from_millis(self.millis())
    }
}

/// Which direction an element is currently configured to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Entering,
    Exiting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_boundaries() {
        for curve in MotionCurve::ALL {
            assert!(
                (curve.apply(0.0)).abs() < 0.001,
                "{:?} at t=0",
                curve
            );
            assert!(
                (curve.apply(1.0) - 1.0).abs() < 0.001,
                "{:?} at t=1",
                curve
            );
        }
    }

    #[test]
    fn curve_monotonic() {
        // All the design-system curves are monotonic easings.
        for curve in MotionCurve::ALL {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f32 / 20.0;
                let v = curve.apply(t);
                assert!(v >= prev - 0.001, "{:?} not monotonic at t={}", curve, t);
                prev = v;
            }
        }
    }

    #[test]
    fn linear_is_identity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((MotionCurve::Linear.apply(t) - t).abs() < 0.005);
        }
    }

    #[test]
    fn duration_tokens_in_range() {
        for token in MotionDuration::ALL {
            assert_eq!(token.duration(), Duration::from_millis(token.millis()));
        }
        assert_eq!(MotionDuration::Zero.millis(), 0);
        assert_eq!(MotionDuration::Medium01.millis(), 200);
        assert_eq!(MotionDuration::ExtendedLong02.millis(), 900);
    }
}
