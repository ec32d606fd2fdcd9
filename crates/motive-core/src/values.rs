//! Animatable property descriptors and the per-element value map.

use std::collections::HashMap;

use crate::curves::MotionDuration;

/// Linear-space RGBA color used for gradient animation.
pub type Color = palette::LinSrgba;

/// The three phase values a property moves through.
///
/// `enter` is the value at animation start, `settled` the value while the
/// element is at rest on screen, `exit` the value it leaves toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phases {
    pub enter: f32,
    pub settled: f32,
    pub exit: f32,
}

impl Phases {
    pub const fn new(enter: f32, settled: f32, exit: f32) -> Self {
        Self { enter, settled, exit }
    }
}

/// Fixed identifiers for the animatable properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionTypeKey {
    Alpha,
    Scale,
    TranslationX,
    TranslationY,
    TranslationXTarget,
    TranslationYTarget,
    Resize,
    Elevation,
    CardElevation,
    ColorGradient,
    ScrollX,
    IndicatorOffset,
    IndicatorWidth,
    Rotation,
    CornerRadius,
}

/// One animatable property with its phase values.
///
/// Immutable once constructed; the engine only reads these.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionValue {
    Alpha(Phases),
    /// Uniform scale, driven on both axes from the same phase values.
    Scale(Phases),
    TranslationX(Phases),
    TranslationY(Phases),
    /// Translate from the element's current x to a fixed target.
    TranslationXTarget { target: f32 },
    /// Translate from the element's current y to a fixed target.
    TranslationYTarget { target: f32 },
    /// Width and height animated together, mutating layout each frame.
    Resize { width: Phases, height: Phases },
    Elevation(Phases),
    /// Shadow elevation on a card surface. Requires a card-capable target.
    CardElevation(Phases),
    /// Gradient stop lists interpolated color-by-color.
    ColorGradient {
        enter: Vec<Color>,
        settled: Vec<Color>,
        exit: Vec<Color>,
    },
    ScrollX(Phases),
    IndicatorOffset(Phases),
    IndicatorWidth(Phases),
    Rotation(Phases),
    /// Corner rounding on a card surface. Requires a card-capable target.
    CornerRadius(Phases),
}

impl MotionValue {
    /// The property key this value animates.
    pub fn type_key(&self) -> MotionTypeKey {
        match self {
            MotionValue::Alpha(_) => MotionTypeKey::Alpha,
            MotionValue::Scale(_) => MotionTypeKey::Scale,
            MotionValue::TranslationX(_) => MotionTypeKey::TranslationX,
            MotionValue::TranslationY(_) => MotionTypeKey::TranslationY,
            MotionValue::TranslationXTarget { .. } => MotionTypeKey::TranslationXTarget,
            MotionValue::TranslationYTarget { .. } => MotionTypeKey::TranslationYTarget,
            MotionValue::Resize { .. } => MotionTypeKey::Resize,
            MotionValue::Elevation(_) => MotionTypeKey::Elevation,
            MotionValue::CardElevation(_) => MotionTypeKey::CardElevation,
            MotionValue::ColorGradient { .. } => MotionTypeKey::ColorGradient,
            MotionValue::ScrollX(_) => MotionTypeKey::ScrollX,
            MotionValue::IndicatorOffset(_) => MotionTypeKey::IndicatorOffset,
            MotionValue::IndicatorWidth(_) => MotionTypeKey::IndicatorWidth,
            MotionValue::Rotation(_) => MotionTypeKey::Rotation,
            MotionValue::CornerRadius(_) => MotionTypeKey::CornerRadius,
        }
    }
}

/// Per-element collection of motion values, at most one per property key.
///
/// Built fresh for each animation request and only read by the engine.
#[derive(Debug, Clone, Default)]
pub struct MotionValueMap {
    values: HashMap<MotionTypeKey, MotionValue>,
}

impl MotionValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under its own property key, replacing any prior value
    /// for that property.
    pub fn insert(&mut self, value: MotionValue) -> Option<MotionValue> {
        self.values.insert(value.type_key(), value)
    }

    pub fn with(mut self, value: MotionValue) -> Self {
        self.insert(value);
        self
    }

    pub fn get(&self, key: MotionTypeKey) -> Option<&MotionValue> {
        self.values.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MotionTypeKey, &MotionValue)> {
        self.values.iter()
    }
}

/// Per-item delay steps for cascading layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stagger {
    Zero,
    Loose,
    Loosest,
    Medium,
    Normal,
    Tight,
    Tightest,
}

impl Stagger {
    pub const fn delay_millis(self) -> u64 {
        match self {
            Stagger::Zero => MotionDuration::Zero.millis(),
            Stagger::Loose => MotionDuration::Long01.millis(),
            Stagger::Loosest => MotionDuration::Long02.millis(),
            Stagger::Medium => MotionDuration::Medium01.millis(),
            Stagger::Normal => MotionDuration::Medium02.millis(),
            Stagger::Tight => MotionDuration::Short03.millis(),
            Stagger::Tightest => MotionDuration::Short02.millis(),
        }
    }
}

/// Scale factors applied to cascading entrances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionScaleFactor {
    CascadeBase,
    CascadeLight,
    CascadeNormal,
    CascadeMedium,
    CascadeMedium2,
    CascadeLarge,
}

impl MotionScaleFactor {
    pub const fn factor(self) -> f32 {
        match self {
            MotionScaleFactor::CascadeBase => 1.0,
            MotionScaleFactor::CascadeLight => 1.1,
            MotionScaleFactor::CascadeNormal => 1.15,
            MotionScaleFactor::CascadeMedium => 1.25,
            MotionScaleFactor::CascadeMedium2 => 1.4,
            MotionScaleFactor::CascadeLarge => 1.5,
        }
    }
}
