//! Per-element motion player.
//!
//! A [`MotionPlayer`] owns the animation configuration for one element and
//! plays at most one animation set at a time. Starting a new direction
//! silently replaces whatever was running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::actions::{Action, CancelAction, CancellationError};
use crate::animation::{apply_final, build_animation_set, drive};
use crate::curves::{MotionCurve, MotionDuration, MotionState};
use crate::engine::MotionEngine;
use crate::error::Result;
use crate::target::MotionTarget;
use crate::telemetry::TelemetryEvent;
use crate::values::MotionValueMap;

const DEFAULT_FRAME: Duration = Duration::from_millis(16);

struct ActiveSet {
    id: u64,
    abort: AbortHandle,
    finished: Arc<AtomicBool>,
}

/// Plays enter and exit animation sets for a single target element.
///
/// Construct through [`MotionPlayer::builder`]. The player holds its target
/// weakly; once the target is dropped, playback requests become no-ops.
pub struct MotionPlayer {
    engine: Weak<MotionEngine>,
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
    active: Mutex<Option<ActiveSet>>,
}

impl MotionPlayer {
    pub fn builder(target: Weak<dyn MotionTarget>) -> MotionPlayerBuilder {
        MotionPlayerBuilder::new(target)
    }

    /// The chain this player belongs to, if any.
    pub fn chain_key(&self) -> Option<&str> {
        self.chain_key.as_deref()
    }

    /// Delay before the chain advances past this link.
    pub fn next_index_delay(&self) -> Duration {
        self.next_index_delay
    }

    /// Whether an animation set is currently in flight.
    pub fn is_playing(&self) -> bool {
        self.active
            .lock()
            .expect("player lock poisoned")
            .as_ref()
            .map(|set| !set.finished.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Play the enter direction. With `jump_to_end` the final values are
    /// applied synchronously and callbacks fire before this returns.
    pub fn enter(self: &Arc<Self>, jump_to_end: bool) -> Result<()> {
        self.play(MotionState::Entering, jump_to_end)
    }

    /// Play the exit direction.
    pub fn exit(self: &Arc<Self>) -> Result<()> {
        self.play(MotionState::Exiting, false)
    }

    fn play(self: &Arc<Self>, state: MotionState, jump_to_end: bool) -> Result<()> {
        let Some(target) = self.target.upgrade() else {
            warn!(chain = ?self.chain_key, "motion target gone, skipping playback");
            return Ok(());
        };

        let curve = match state {
            MotionState::Entering => self.curve_enter,
            MotionState::Exiting => self.curve_exit,
        };
        let set = build_animation_set(&target, &self.values, state, curve)?;

        // Replaces whatever was running, without firing its callbacks.
        self.halt();

        let engine = self.engine.upgrade();
        let animations_enabled = engine
            .as_ref()
            .map(|e| e.animations_enabled())
            .unwrap_or(true);
        let frame = engine.as_ref().map(|e| e.frame_interval()).unwrap_or(DEFAULT_FRAME);

        if let Some(on_begin) = &self.on_begin {
            on_begin();
        }
        match state {
            MotionState::Entering => {
                self.telemetry(TelemetryEvent::Enter, "motion enter started");
                if let Some(text) = &self.enter_text {
                    target.announce(text);
                }
            }
            MotionState::Exiting => {
                self.telemetry(TelemetryEvent::Exit, "motion exit started");
            }
        }

        let duration = self.duration.duration();
        if jump_to_end || duration.is_zero() || !animations_enabled {
            apply_final(target.as_ref(), &set);
            self.complete(state);
            return Ok(());
        }

        let finished = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = oneshot::channel();
        let player = Arc::clone(self);
        let weak_target = self.target.clone();
        let task_finished = Arc::clone(&finished);

        let handle = tokio::spawn(async move {
            // Wait until the caller has recorded the active set, so a
            // completed animation never races its own registration.
            if ready_rx.await.is_err() {
                return;
            }
            drive(&weak_target, &set, duration, frame).await;
            let id = player.finish_active(&task_finished);
            if !task_finished.swap(true, Ordering::SeqCst) {
                player.complete(state);
            }
            if let (Some(engine), Some(id)) = (player.engine.upgrade(), id) {
                engine.deregister_running_set(id);
            }
        });

        let id = engine.as_ref().map(|e| e.next_set_id()).unwrap_or(0);
        {
            let mut active = self.active.lock().expect("player lock poisoned");
            *active = Some(ActiveSet {
                id,
                abort: handle.abort_handle(),
                finished,
            });
        }
        if let Some(engine) = engine {
            engine.register_running_set(id, Arc::downgrade(self));
        }
        let _ = ready_tx.send(());

        Ok(())
    }

    fn complete(&self, state: MotionState) {
        if let Some(target) = self.target.upgrade() {
            match state {
                MotionState::Entering => {
                    if let Some(text) = &self.settled_text {
                        target.announce(text);
                    }
                }
                MotionState::Exiting => {
                    if let Some(text) = &self.exit_text {
                        target.announce(text);
                    }
                }
            }
        }
        match state {
            MotionState::Entering => {
                self.telemetry(TelemetryEvent::Settled, "motion enter settled")
            }
            MotionState::Exiting => self.telemetry(TelemetryEvent::Exit, "motion exit finished"),
        }
        if let Some(on_end) = &self.on_end {
            on_end();
        }
    }

    /// Cancel the in-flight animation set, firing the cancellation callback
    /// and then the end callback exactly once.
    pub fn cancel(&self, reason: CancellationError) {
        let taken = self.active.lock().expect("player lock poisoned").take();
        let Some(set) = taken else {
            return;
        };
        if set.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        set.abort.abort();
        if let Some(engine) = self.engine.upgrade() {
            engine.deregister_running_set(set.id);
        }
        debug!(?reason, chain = ?self.chain_key, "motion cancelled");
        self.telemetry(TelemetryEvent::Cancellation, "motion cancelled");
        if let Some(on_cancel) = &self.on_cancel {
            on_cancel(reason);
        }
        if let Some(on_end) = &self.on_end {
            on_end();
        }
    }

    /// Stop the in-flight animation set without firing any callbacks.
    /// Used when a new playback supersedes the current one and when a
    /// chain is torn down.
    pub(crate) fn halt(&self) {
        let taken = self.active.lock().expect("player lock poisoned").take();
        if let Some(set) = taken {
            set.finished.store(true, Ordering::SeqCst);
            set.abort.abort();
            if let Some(engine) = self.engine.upgrade() {
                engine.deregister_running_set(set.id);
            }
        }
    }

    /// Clear the active slot, but only if it still belongs to the playback
    /// identified by `finished`. A superseding playback may already have
    /// replaced the slot by the time the old task winds down.
    fn finish_active(&self, finished: &Arc<AtomicBool>) -> Option<u64> {
        let mut active = self.active.lock().expect("player lock poisoned");
        match active.as_ref() {
            Some(set) if Arc::ptr_eq(&set.finished, finished) => {
                active.take().map(|set| set.id)
            }
            _ => None,
        }
    }

    fn telemetry(&self, event: TelemetryEvent, message: &str) {
        if let Some(engine) = self.engine.upgrade() {
            engine.log_telemetry(event, message);
        }
    }
}

/// Builder for [`MotionPlayer`].
pub struct MotionPlayerBuilder {
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

impl MotionPlayerBuilder {
    fn new(target: Weak<dyn MotionTarget>) -> Self {
        Self {
            target,
            values: MotionValueMap::new(),
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

    pub fn values(mut self, values: MotionValueMap) -> Self {
        self.values = values;
        self
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

    /// Attach this player to a chain and set the delay the chain waits
    /// after this link before advancing.
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

    /// Accessibility strings announced at enter start, settle, and exit end.
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

    /// Finish the player and register it with the engine's chain registry
    /// when a chain key was set.
    pub fn build(self, engine: &Arc<MotionEngine>) -> Arc<MotionPlayer> {
        let player = Arc::new(MotionPlayer {
            engine: Arc::downgrade(engine),
            target: self.target,
            values: self.values,
            duration: self.duration,
            curve_enter: self.curve_enter,
            curve_exit: self.curve_exit,
            chain_key: self.chain_key,
            next_index_delay: self.next_index_delay,
            on_begin: self.on_begin,
            on_end: self.on_end,
            on_cancel: self.on_cancel,
            enter_text: self.enter_text,
            settled_text: self.settled_text,
            exit_text: self.exit_text,
            active: Mutex::new(None),
        });
        if let Some(key) = player.chain_key.clone() {
            engine.add_motion_player_for_chain(&key, Arc::clone(&player));
        }
        player
    }
}
