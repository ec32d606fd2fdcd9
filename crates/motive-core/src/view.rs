//! Element-side view of the engine.
//!
//! A [`MotionView`] describes everything the engine needs to animate one
//! element; [`MotionEngine::init_player`] turns it into a registered
//! player. [`MotionViewBase`] is the plain-data implementation most
//! callers want.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::actions::{Action, CancelAction};
use crate::curves::{MotionCurve, MotionDuration};
use crate::engine::MotionEngine;
use crate::player::MotionPlayer;
use crate::target::MotionTarget;
use crate::values::MotionValueMap;

/// Everything the engine needs to know about an animatable element.
///
/// All configuration methods have defaults; an implementation only has to
/// supply its target handle and value map.
pub trait MotionView: Send + Sync {
    fn motion_target(&self) -> Weak<dyn MotionTarget>;

    fn motion_values(&self) -> MotionValueMap;

    fn duration(&self) -> MotionDuration {
        MotionDuration::Medium02
    }

    fn curve_enter(&self) -> MotionCurve {
        MotionCurve::Ease01
    }

    fn curve_exit(&self) -> MotionCurve {
        MotionCurve::Ease01
    }

    /// Chain membership. A `Some` key auto-registers the player as the
    /// chain's next link.
    fn chain_key(&self) -> Option<String> {
        None
    }

    /// Delay the chain waits after this link before advancing.
    fn next_index_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn on_begin(&self) -> Option<Action> {
        None
    }

    fn on_end(&self) -> Option<Action> {
        None
    }

    fn on_cancel(&self) -> Option<CancelAction> {
        None
    }

    /// Accessibility text announced when the enter animation starts.
    fn enter_text(&self) -> Option<String> {
        None
    }

    /// Accessibility text announced when the element settles.
    fn settled_text(&self) -> Option<String> {
        None
    }

    /// Accessibility text announced when the exit animation finishes.
    fn exit_text(&self) -> Option<String> {
        None
    }
}

/// Plain-data [`MotionView`] built with chained setters.
pub struct MotionViewBase {
    target: Weak<dyn MotionTarget>,
    values: MotionValueMap,
    duration: MotionDuration,
    curve_enter: MotionCurve,
    curve_exit: MotionCurve,
    chain_key: Option<String>,
    next_index_delay: Duration,
    on_begin: Option<Action>,
    on_end: Option<Action>,
    on_cancel: Option<CancelAction>,
    enter_text: Option<String>,
    settled_text: Option<String>,
    exit_text: Option<String>,
}

impl MotionViewBase {
    pub fn new(target: Weak<dyn MotionTarget>, values: MotionValueMap) -> Self {
        Self {
            target,
            values,
            duration: MotionDuration::Medium02,
            curve_enter: MotionCurve::Ease01,
            curve_exit: MotionCurve::Ease01,
            chain_key: None,
            next_index_delay: Duration::ZERO,
            on_begin: None,
            on_end: None,
            on_cancel: None,
            enter_text: None,
            settled_text: None,
            exit_text: None,
        }
    }

    pub fn duration(mut self, duration: MotionDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn curve_enter(mut self, curve: MotionCurve) -> Self {
        self.curve_enter = curve;
        self
    }

    pub fn curve_exit(mut self, curve: MotionCurve) -> Self {
        self.curve_exit = curve;
        self
    }

    pub fn chain(mut self, key: impl Into<String>, next_index_delay: Duration) -> Self {
        self.chain_key = Some(key.into());
        self.next_index_delay = next_index_delay;
        self
    }

    pub fn on_begin(mut self, action: Action) -> Self {
        self.on_begin = Some(action);
        self
    }

    pub fn on_end(mut self, action: Action) -> Self {
        self.on_end = Some(action);
        self
    }

    pub fn on_cancel(mut self, action: CancelAction) -> Self {
        self.on_cancel = Some(action);
        self
    }

    pub fn announcements(
        mut self,
        enter: Option<String>,
        settled: Option<String>,
        exit: Option<String>,
    ) -> Self {
        self.enter_text = enter;
        self.settled_text = settled;
        self.exit_text = exit;
        self
    }
}

impl MotionView for MotionViewBase {
    fn motion_target(&self) -> Weak<dyn MotionTarget> {
        self.target.clone()
    }

    fn motion_values(&self) -> MotionValueMap {
        self.values.clone()
    }

    fn duration(&self) -> MotionDuration {
        self.duration
    }

    fn curve_enter(&self) -> MotionCurve {
        self.curve_enter
    }

    fn curve_exit(&self) -> MotionCurve {
        self.curve_exit
    }

    fn chain_key(&self) -> Option<String> {
        self.chain_key.clone()
    }

    fn next_index_delay(&self) -> Duration {
        self.next_index_delay
    }

    fn on_begin(&self) -> Option<Action> {
        self.on_begin.clone()
    }

    fn on_end(&self) -> Option<Action> {
        self.on_end.clone()
    }

    fn on_cancel(&self) -> Option<CancelAction> {
        self.on_cancel.clone()
    }

    fn enter_text(&self) -> Option<String> {
        self.enter_text.clone()
    }

    fn settled_text(&self) -> Option<String> {
        self.settled_text.clone()
    }

    fn exit_text(&self) -> Option<String> {
        self.exit_text.clone()
    }
}

impl MotionEngine {
    /// Build a player from a view description and register it with the
    /// view's chain when one is named.
    pub fn init_player(self: &Arc<Self>, view: &dyn MotionView) -> Arc<MotionPlayer> {
        let mut builder = MotionPlayer::builder(view.motion_target())
            .values(view.motion_values())
            .duration(view.duration())
            .curve_enter(view.curve_enter())
            .curve_exit(view.curve_exit())
            .announcements(view.enter_text(), view.settled_text(), view.exit_text());
        if let Some(key) = view.chain_key() {
            builder = builder.chain(key, view.next_index_delay());
        }
        if let Some(action) = view.on_begin() {
            builder = builder.on_begin(action);
        }
        if let Some(action) = view.on_end() {
            builder = builder.on_end(action);
        }
        if let Some(action) = view.on_cancel() {
            builder = builder.on_cancel(action);
        }
        builder.build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::PropertyUpdate;
    use crate::values::{MotionValue, Phases};
    use std::sync::Mutex;

    struct TestTarget {
        updates: Mutex<Vec<PropertyUpdate>>,
    }

    impl MotionTarget for TestTarget {
        fn apply(&self, update: PropertyUpdate) {
            self.updates.lock().unwrap().push(update);
        }
    }

    #[tokio::test]
    async fn init_player_registers_chain_membership() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(TestTarget {
            updates: Mutex::new(Vec::new()),
        });

        let view = MotionViewBase::new(
            Arc::downgrade(&target),
            MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0))),
        )
        .duration(MotionDuration::Zero)
        .chain("header", Duration::from_millis(50));

        let player = engine.init_player(&view);

        assert_eq!(player.chain_key(), Some("header"));
        assert_eq!(player.next_index_delay(), Duration::from_millis(50));
        assert_eq!(engine.chain_len("header"), 1);
    }

    #[tokio::test]
    async fn init_player_without_chain_stays_standalone() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(TestTarget {
            updates: Mutex::new(Vec::new()),
        });

        let view = MotionViewBase::new(
            Arc::downgrade(&target),
            MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0))),
        )
        .duration(MotionDuration::Zero);

        let player = engine.init_player(&view);
        player.enter(false).unwrap();

        assert!(player.chain_key().is_none());
        assert!(!engine.has_chain("header"));
    }
}
