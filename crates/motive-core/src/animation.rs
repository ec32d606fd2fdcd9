//! Building and driving per-property animations.
//!
//! [`build_animation_set`] turns a value map into discrete property
//! animations for one direction; [`drive`] plays such a set against a
//! weakly-held target on a fixed frame interval.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::trace;

use crate::curves::{MotionCurve, MotionState};
use crate::error::{Error, Result};
use crate::target::{MotionTarget, PropertyUpdate};
use crate::util::{lerp, lerp_gradient};
use crate::values::{Color, MotionValue, MotionValueMap, Phases};

/// The scalar property lanes an animation can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarLane {
    Alpha,
    ScaleX,
    ScaleY,
    TranslationX,
    TranslationY,
    Rotation,
    Elevation,
    CardElevation,
    CornerRadius,
    ScrollX,
    IndicatorOffset,
    IndicatorWidth,
    Width,
    Height,
}

impl ScalarLane {
    fn update(self, value: f32) -> PropertyUpdate {
        match self {
            ScalarLane::Alpha => PropertyUpdate::Alpha(value),
            ScalarLane::ScaleX => PropertyUpdate::ScaleX(value),
            ScalarLane::ScaleY => PropertyUpdate::ScaleY(value),
            ScalarLane::TranslationX => PropertyUpdate::TranslationX(value),
            ScalarLane::TranslationY => PropertyUpdate::TranslationY(value),
            ScalarLane::Rotation => PropertyUpdate::Rotation(value),
            ScalarLane::Elevation => PropertyUpdate::Elevation(value),
            ScalarLane::CardElevation => PropertyUpdate::CardElevation(value),
            ScalarLane::CornerRadius => PropertyUpdate::CornerRadius(value),
            ScalarLane::ScrollX => PropertyUpdate::ScrollX(value),
            ScalarLane::IndicatorOffset => PropertyUpdate::IndicatorOffset(value),
            ScalarLane::IndicatorWidth => PropertyUpdate::IndicatorWidth(value),
            ScalarLane::Width => PropertyUpdate::Width(value),
            ScalarLane::Height => PropertyUpdate::Height(value),
        }
    }
}

#[derive(Debug, Clone)]
enum Track {
    Scalar { lane: ScalarLane, from: f32, to: f32 },
    Gradient { from: Vec<Color>, to: Vec<Color> },
}

/// One discrete property animation: a value track and its easing curve.
#[derive(Debug, Clone)]
pub struct PropertyAnimation {
    track: Track,
    curve: MotionCurve,
}

impl PropertyAnimation {
    fn scalar(lane: ScalarLane, from: f32, to: f32, curve: MotionCurve) -> Self {
        Self {
            track: Track::Scalar { lane, from, to },
            curve,
        }
    }

    /// The lane this animation drives, if scalar.
    pub fn lane(&self) -> Option<ScalarLane> {
        match self.track {
            Track::Scalar { lane, .. } => Some(lane),
            Track::Gradient { .. } => None,
        }
    }

    /// The property update for linear progress `t` in [0, 1], after easing.
    pub fn sample(&self, t: f32) -> PropertyUpdate {
        let eased = self.curve.apply(t.clamp(0.0, 1.0));
        match &self.track {
            Track::Scalar { lane, from, to } => lane.update(lerp(*from, *to, eased)),
            Track::Gradient { from, to } => {
                PropertyUpdate::Gradient(lerp_gradient(from, to, eased))
            }
        }
    }
}

/// The (from, to) pair for one direction through a phase triple.
fn span(phases: Phases, state: MotionState) -> (f32, f32) {
    match state {
        MotionState::Entering => (phases.enter, phases.settled),
        MotionState::Exiting => (phases.settled, phases.exit),
    }
}

/// Build the discrete property animations for one direction.
///
/// Produces one animation per value map entry, except `Scale` and `Resize`
/// which each expand to two lanes. Card-only properties fail fast when the
/// target is not card-capable.
pub fn build_animation_set(
    target: &Arc<dyn MotionTarget>,
    values: &MotionValueMap,
    state: MotionState,
    curve: MotionCurve,
) -> Result<Vec<PropertyAnimation>> {
    let mut set = Vec::new();

    for (_, value) in values.iter() {
        match value {
            MotionValue::Alpha(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(ScalarLane::Alpha, from, to, curve));
            }
            MotionValue::Scale(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(ScalarLane::ScaleX, from, to, curve));
                set.push(PropertyAnimation::scalar(ScalarLane::ScaleY, from, to, curve));
            }
            MotionValue::TranslationX(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::TranslationX,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::TranslationY(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::TranslationY,
                    from,
                    to,
                    curve,
                ));
            }
            // Target translations move from wherever the element currently
            // is, in both directions.
            MotionValue::TranslationXTarget { target: x } => {
                let (current, _) = target.translation();
                set.push(PropertyAnimation::scalar(
                    ScalarLane::TranslationX,
                    current,
                    *x,
                    curve,
                ));
            }
            MotionValue::TranslationYTarget { target: y } => {
                let (_, current) = target.translation();
                set.push(PropertyAnimation::scalar(
                    ScalarLane::TranslationY,
                    current,
                    *y,
                    curve,
                ));
            }
            MotionValue::Resize { width, height } => {
                let (w_from, w_to) = span(*width, state);
                let (h_from, h_to) = span(*height, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::Width,
                    w_from,
                    w_to,
                    curve,
                ));
                set.push(PropertyAnimation::scalar(
                    ScalarLane::Height,
                    h_from,
                    h_to,
                    curve,
                ));
            }
            MotionValue::Elevation(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::Elevation,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::CardElevation(p) => {
                if !target.is_card() {
                    return Err(Error::NotCardCapable {
                        property: value.type_key(),
                    });
                }
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::CardElevation,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::CornerRadius(p) => {
                if !target.is_card() {
                    return Err(Error::NotCardCapable {
                        property: value.type_key(),
                    });
                }
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::CornerRadius,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::ColorGradient {
                enter,
                settled,
                exit,
            } => {
                let (from, to) = match state {
                    MotionState::Entering => (enter.clone(), settled.clone()),
                    MotionState::Exiting => (settled.clone(), exit.clone()),
                };
                set.push(PropertyAnimation {
                    track: Track::Gradient { from, to },
                    curve,
                });
            }
            MotionValue::ScrollX(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::ScrollX,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::IndicatorOffset(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::IndicatorOffset,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::IndicatorWidth(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::IndicatorWidth,
                    from,
                    to,
                    curve,
                ));
            }
            MotionValue::Rotation(p) => {
                let (from, to) = span(*p, state);
                set.push(PropertyAnimation::scalar(
                    ScalarLane::Rotation,
                    from,
                    to,
                    curve,
                ));
            }
        }
    }

    Ok(set)
}

/// Apply the final frame of every animation in the set.
pub(crate) fn apply_final(target: &dyn MotionTarget, set: &[PropertyAnimation]) {
    for animation in set {
        target.apply(animation.sample(1.0));
    }
}

/// Drive an animation set to completion against a weakly-held target.
///
/// Samples every animation once per frame until the duration elapses, then
/// applies the exact end values. Returns early when the target has been
/// dropped; the remaining frames are skipped but completion is still
/// reported to the caller.
pub(crate) async fn drive(
    target: &Weak<dyn MotionTarget>,
    set: &[PropertyAnimation],
    duration: Duration,
    frame: Duration,
) {
    if duration.is_zero() {
        if let Some(target) = target.upgrade() {
            apply_final(target.as_ref(), set);
        }
        return;
    }

    let start = Instant::now();
    let mut ticker = interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let now = ticker.tick().await;
        let t = now.duration_since(start).as_secs_f32() / duration.as_secs_f32();

        let Some(target) = target.upgrade() else {
            trace!("animation target dropped mid-flight");
            return;
        };

        if t >= 1.0 {
            apply_final(target.as_ref(), set);
            return;
        }
        for animation in set {
            target.apply(animation.sample(t));
        }
    }
}
