//! Interpolation helpers shared by the animation paths.

use palette::Mix;
use rand::Rng;

use crate::values::Color;

/// Linear interpolation between two scalars at fraction `t`.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Interpolate two colors in linear RGBA space.
#[inline]
pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    from.mix(to, t)
}

/// Interpolate two gradient stop lists position-by-position.
///
/// When the lists differ in length the shorter one's last stop is reused,
/// so the result always has as many stops as the longer input.
pub fn lerp_gradient(from: &[Color], to: &[Color], t: f32) -> Vec<Color> {
    let len = from.len().max(to.len());
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let a = stop_at(from, i);
        let b = stop_at(to, i);
        match (a, b) {
            (Some(a), Some(b)) => out.push(lerp_color(a, b, t)),
            (Some(a), None) => out.push(a),
            (None, Some(b)) => out.push(b),
            (None, None) => {}
        }
    }
    out
}

#[inline]
fn stop_at(stops: &[Color], i: usize) -> Option<Color> {
    stops.get(i).or_else(|| stops.last()).copied()
}

/// Random opaque color, for demo and shimmer fills.
pub fn random_color() -> Color {
    let mut rng = rand::rng();
    Color::new(
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
        1.0,
    )
}
