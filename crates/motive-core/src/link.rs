//! Scope-based links: one concurrent task per property animation.
//!
//! Unlike chain playback, which sequences whole players, a link animates a
//! single element by fanning its animation set out to one task per property
//! under a supervisor scope keyed by chain id. Replaying a chain id
//! replaces the previous scope.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::actions::{Action, CancelAction, CancellationError};
use crate::animation::build_animation_set;
use crate::curves::{MotionCurve, MotionDuration, MotionState};
use crate::engine::MotionEngine;
use crate::error::Result;
use crate::target::MotionTarget;
use crate::values::MotionValueMap;

/// Configuration for one link playback.
pub struct MotionLinkProps {
    pub chain_id: String,
    pub link_id: String,
    pub values: MotionValueMap,
    pub duration: MotionDuration,
    pub curve: MotionCurve,
    /// Delay before the link's animations start.
    pub chain_delay: Duration,
    pub on_enter: Option<Action>,
    pub on_exit: Option<Action>,
    pub on_cancel: Option<CancelAction>,
    pub enter_text: Option<String>,
    pub settled_text: Option<String>,
    pub exit_text: Option<String>,
}

impl MotionLinkProps {
    pub fn new(
        chain_id: impl Into<String>,
        link_id: impl Into<String>,
        values: MotionValueMap,
        duration: MotionDuration,
        curve: MotionCurve,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            link_id: link_id.into(),
            values,
            duration,
            curve,
            chain_delay: Duration::ZERO,
            on_enter: None,
            on_exit: None,
            on_cancel: None,
            enter_text: None,
            settled_text: None,
            exit_text: None,
        }
    }

    pub fn with_chain_delay(mut self, delay: Duration) -> Self {
        self.chain_delay = delay;
        self
    }

    pub fn with_on_enter(mut self, action: Action) -> Self {
        self.on_enter = Some(action);
        self
    }

    pub fn with_on_exit(mut self, action: Action) -> Self {
        self.on_exit = Some(action);
        self
    }

    pub fn with_on_cancel(mut self, action: CancelAction) -> Self {
        self.on_cancel = Some(action);
        self
    }

    /// Accessibility strings announced at enter start, settle, and exit end.
    pub fn with_announcements(
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

pub(crate) struct LinkScope {
    id: u64,
    abort: AbortHandle,
    on_cancel: Option<CancelAction>,
}

impl MotionEngine {
    /// Play a link in the enter direction. Replaces any scope already
    /// running under the same chain id, without firing its callbacks.
    pub fn play_enter_link(
        self: &Arc<Self>,
        target: Weak<dyn MotionTarget>,
        props: MotionLinkProps,
    ) -> Result<()> {
        self.play_link(target, props, MotionState::Entering)
    }

    /// Play a link in the exit direction.
    pub fn play_exit_link(
        self: &Arc<Self>,
        target: Weak<dyn MotionTarget>,
        props: MotionLinkProps,
    ) -> Result<()> {
        self.play_link(target, props, MotionState::Exiting)
    }

    fn play_link(
        self: &Arc<Self>,
        target: Weak<dyn MotionTarget>,
        props: MotionLinkProps,
        state: MotionState,
    ) -> Result<()> {
        let Some(strong) = target.upgrade() else {
            warn!(chain = %props.chain_id, link = %props.link_id, "link target gone");
            return Ok(());
        };
        let set = build_animation_set(&strong, &props.values, state, props.curve)?;
        if state == MotionState::Entering {
            if let Some(text) = &props.enter_text {
                strong.announce(text);
            }
        }
        drop(strong);

        let id = self.next_set_id();
        let engine = Arc::downgrade(self);
        let chain_id = props.chain_id.clone();
        let duration = props.duration.duration();
        let frame = self.frame_interval();
        let delay = props.chain_delay;
        let done_action = match state {
            MotionState::Entering => props.on_enter.clone(),
            MotionState::Exiting => props.on_exit.clone(),
        };
        let done_text = match state {
            MotionState::Entering => props.settled_text.clone(),
            MotionState::Exiting => props.exit_text.clone(),
        };
        let announce_target = target.clone();
        let (ready_tx, ready_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if ready_rx.await.is_err() {
                return;
            }
            if !delay.is_zero() {
                sleep(delay).await;
            }

            let mut tasks = JoinSet::new();
            for animation in set {
                let target = target.clone();
                tasks.spawn(async move {
                    crate::animation::drive(&target, &[animation], duration, frame).await;
                });
            }
            while tasks.join_next().await.is_some() {}

            let Some(engine) = engine.upgrade() else { return };
            let removed = {
                let mut scopes = engine.link_scopes.lock().expect("engine lock poisoned");
                match scopes.get(&chain_id) {
                    Some(scope) if scope.id == id => {
                        scopes.remove(&chain_id);
                        true
                    }
                    _ => false,
                }
            };
            if removed {
                if let Some(text) = &done_text {
                    if let Some(target) = announce_target.upgrade() {
                        target.announce(text);
                    }
                }
                if let Some(action) = done_action {
                    action();
                }
            }
        });

        let previous = self
            .link_scopes
            .lock()
            .expect("engine lock poisoned")
            .insert(
                props.chain_id.clone(),
                LinkScope {
                    id,
                    abort: handle.abort_handle(),
                    on_cancel: props.on_cancel.clone(),
                },
            );
        if let Some(previous) = previous {
            previous.abort.abort();
        }
        let _ = ready_tx.send(());

        Ok(())
    }

    /// Cancel the scope running under a chain id, firing its cancellation
    /// callback.
    pub fn cancel_link_scope(&self, chain_id: &str, reason: CancellationError) {
        let scope = self
            .link_scopes
            .lock()
            .expect("engine lock poisoned")
            .remove(chain_id);
        let Some(scope) = scope else {
            debug!(chain_id, "cancel requested for unknown link scope");
            return;
        };
        scope.abort.abort();
        if let Some(on_cancel) = scope.on_cancel {
            on_cancel(reason);
        }
    }

    /// Cancel every running link scope with the given reason.
    pub fn cancel_all_link_scopes(&self, reason: CancellationError) {
        let scopes: Vec<_> = {
            let mut map = self.link_scopes.lock().expect("engine lock poisoned");
            map.drain().map(|(_, scope)| scope).collect()
        };
        debug!(count = scopes.len(), ?reason, "cancelling all link scopes");
        for scope in scopes {
            scope.abort.abort();
            if let Some(on_cancel) = scope.on_cancel {
                on_cancel(reason);
            }
        }
    }

    /// Number of link scopes currently registered.
    pub fn link_scope_count(&self) -> usize {
        self.link_scopes.lock().expect("engine lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::PropertyUpdate;
    use crate::values::{MotionValue, Phases};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TestTarget {
        updates: Mutex<Vec<PropertyUpdate>>,
    }

    impl TestTarget {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                updates: Mutex::new(Vec::new()),
            })
        }
    }

    impl MotionTarget for TestTarget {
        fn apply(&self, update: PropertyUpdate) {
            self.updates.lock().unwrap().push(update);
        }
    }

    fn props(chain: &str) -> MotionLinkProps {
        let values = MotionValueMap::new()
            .with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0)))
            .with(MotionValue::Scale(Phases::new(1.15, 1.0, 1.15)));
        MotionLinkProps::new(chain, "link-0", values, MotionDuration::Zero, MotionCurve::Ease02)
    }

    #[tokio::test(start_paused = true)]
    async fn enter_link_runs_all_properties_and_fires_callback() {
        let engine = MotionEngine::new();
        let target = TestTarget::new();
        let dyn_target: Arc<dyn MotionTarget> = target.clone();
        let entered = Arc::new(AtomicUsize::new(0));
        let entered_count = Arc::clone(&entered);

        engine
            .play_enter_link(
                Arc::downgrade(&dyn_target),
                props("card").with_on_enter(Arc::new(move || {
                    entered_count.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .unwrap();
        assert_eq!(engine.link_scope_count(), 1);

        tokio::time::sleep(Duration::from_millis(10)).await;

        let updates = target.updates.lock().unwrap();
        assert!(updates.contains(&PropertyUpdate::Alpha(1.0)));
        assert!(updates.contains(&PropertyUpdate::ScaleX(1.0)));
        assert!(updates.contains(&PropertyUpdate::ScaleY(1.0)));
        drop(updates);

        assert_eq!(entered.load(Ordering::SeqCst), 1);
        assert_eq!(engine.link_scope_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn chain_delay_defers_the_first_frame() {
        let engine = MotionEngine::new();
        let target = TestTarget::new();
        let dyn_target: Arc<dyn MotionTarget> = target.clone();

        engine
            .play_enter_link(
                Arc::downgrade(&dyn_target),
                props("delayed").with_chain_delay(Duration::from_millis(100)),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(target.updates.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!target.updates.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn replay_replaces_scope_quietly() {
        let engine = MotionEngine::new();
        let target = TestTarget::new();
        let dyn_target: Arc<dyn MotionTarget> = target.clone();
        let cancelled = Arc::new(AtomicUsize::new(0));
        let cancelled_count = Arc::clone(&cancelled);

        let first = MotionLinkProps::new(
            "tab",
            "link-0",
            MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0))),
            MotionDuration::Long02,
            MotionCurve::Linear,
        )
        .with_on_cancel(Arc::new(move |_| {
            cancelled_count.fetch_add(1, Ordering::SeqCst);
        }));

        engine
            .play_enter_link(Arc::downgrade(&dyn_target), first)
            .unwrap();
        engine
            .play_exit_link(Arc::downgrade(&dyn_target), props("tab"))
            .unwrap();

        assert_eq!(engine.link_scope_count(), 1);
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_fires_callback_and_blocks_completion() {
        let engine = MotionEngine::new();
        let target = TestTarget::new();
        let dyn_target: Arc<dyn MotionTarget> = target.clone();
        let entered = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(Mutex::new(Vec::new()));
        let entered_count = Arc::clone(&entered);
        let cancelled_log = Arc::clone(&cancelled);

        let link = MotionLinkProps::new(
            "sheet",
            "link-0",
            MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0))),
            MotionDuration::Long02,
            MotionCurve::Linear,
        )
        .with_on_enter(Arc::new(move || {
            entered_count.fetch_add(1, Ordering::SeqCst);
        }))
        .with_on_cancel(Arc::new(move |reason| {
            cancelled_log.lock().unwrap().push(reason);
        }));

        engine
            .play_enter_link(Arc::downgrade(&dyn_target), link)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        engine.cancel_link_scope("sheet", CancellationError::LoadingTimeout);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(entered.load(Ordering::SeqCst), 0);
        assert_eq!(
            cancelled.lock().unwrap().as_slice(),
            &[CancellationError::LoadingTimeout]
        );
        assert_eq!(engine.link_scope_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_reaches_every_scope() {
        let engine = MotionEngine::new();
        let target = TestTarget::new();
        let dyn_target: Arc<dyn MotionTarget> = target.clone();
        let cancelled = Arc::new(AtomicUsize::new(0));

        for chain in ["a", "b", "c"] {
            let cancelled_count = Arc::clone(&cancelled);
            let link = MotionLinkProps::new(
                chain,
                "link-0",
                MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0))),
                MotionDuration::Long02,
                MotionCurve::Linear,
            )
            .with_on_cancel(Arc::new(move |_| {
                cancelled_count.fetch_add(1, Ordering::SeqCst);
            }));
            engine
                .play_enter_link(Arc::downgrade(&dyn_target), link)
                .unwrap();
        }
        assert_eq!(engine.link_scope_count(), 3);

        engine.cancel_all_link_scopes(CancellationError::Default);
        assert_eq!(cancelled.load(Ordering::SeqCst), 3);
        assert_eq!(engine.link_scope_count(), 0);
    }
}
