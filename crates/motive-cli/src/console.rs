//! Console-backed motion target for the demos.

use std::sync::Mutex;

use motive_core::{Color, MotionTarget, PropertyUpdate};

/// Last-applied value for every property lane.
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub alpha: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub rotation: f32,
    pub elevation: f32,
    pub card_elevation: f32,
    pub corner_radius: f32,
    pub scroll_x: f32,
    pub indicator_offset: f32,
    pub indicator_width: f32,
    pub width: f32,
    pub height: f32,
    pub gradient: Vec<Color>,
    pub announcements: Vec<String>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            translation_x: 0.0,
            translation_y: 0.0,
            rotation: 0.0,
            elevation: 0.0,
            card_elevation: 0.0,
            corner_radius: 0.0,
            scroll_x: 0.0,
            indicator_offset: 0.0,
            indicator_width: 0.0,
            width: 0.0,
            height: 0.0,
            gradient: Vec::new(),
            announcements: Vec::new(),
        }
    }
}

/// A fake element that records updates instead of drawing.
pub struct ConsoleTarget {
    label: String,
    card: bool,
    state: Mutex<ConsoleState>,
}

impl ConsoleTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            card: false,
            state: Mutex::new(ConsoleState::default()),
        }
    }

    pub fn card(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            card: true,
            state: Mutex::new(ConsoleState::default()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn snapshot(&self) -> ConsoleState {
        self.state.lock().expect("console lock poisoned").clone()
    }
}

impl MotionTarget for ConsoleTarget {
    fn apply(&self, update: PropertyUpdate) {
        tracing::trace!(label = %self.label, ?update, "frame");
        let mut state = self.state.lock().expect("console lock poisoned");
        match update {
            PropertyUpdate::Alpha(v) => state.alpha = v,
            PropertyUpdate::ScaleX(v) => state.scale_x = v,
            PropertyUpdate::ScaleY(v) => state.scale_y = v,
            PropertyUpdate::TranslationX(v) => state.translation_x = v,
            PropertyUpdate::TranslationY(v) => state.translation_y = v,
            PropertyUpdate::Rotation(v) => state.rotation = v,
            PropertyUpdate::Elevation(v) => state.elevation = v,
            PropertyUpdate::CardElevation(v) => state.card_elevation = v,
            PropertyUpdate::CornerRadius(v) => state.corner_radius = v,
            PropertyUpdate::ScrollX(v) => state.scroll_x = v,
            PropertyUpdate::IndicatorOffset(v) => state.indicator_offset = v,
            PropertyUpdate::IndicatorWidth(v) => state.indicator_width = v,
            PropertyUpdate::Width(v) => state.width = v,
            PropertyUpdate::Height(v) => state.height = v,
            PropertyUpdate::Gradient(stops) => state.gradient = stops,
        }
    }

    fn is_card(&self) -> bool {
        self.card
    }

    fn translation(&self) -> (f32, f32) {
        let state = self.state.lock().expect("console lock poisoned");
        (state.translation_x, state.translation_y)
    }

    fn announce(&self, text: &str) {
        self.state
            .lock()
            .expect("console lock poisoned")
            .announcements
            .push(text.to_string());
    }
}
