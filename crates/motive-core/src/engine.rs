//! Engine-owned registries for chains, running sets, and link scopes.
//!
//! A [`MotionEngine`] is an owned object, not ambient state; create one per
//! application (or per test) and share it behind an [`Arc`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::actions::{Action, CancelAction, CancellationError};
use crate::config::MotionConfig;
use crate::curves::MotionState;
use crate::link::LinkScope;
use crate::player::MotionPlayer;
use crate::telemetry::{TelemetrySink, TelemetryEvent, TracingTelemetry};

/// A named sequence of players played one after another.
pub struct MotionChain {
    chain_key: String,
    links: Vec<Arc<MotionPlayer>>,
    on_enter: Option<Action>,
    on_end: Option<Action>,
    on_cancel: Option<CancelAction>,
}

impl MotionChain {
    pub fn new(chain_key: impl Into<String>) -> Self {
        Self {
            chain_key: chain_key.into(),
            links: Vec::new(),
            on_enter: None,
            on_end: None,
            on_cancel: None,
        }
    }

    pub fn with_links(mut self, links: Vec<Arc<MotionPlayer>>) -> Self {
        self.links = links;
        self
    }

    pub fn with_on_enter(mut self, action: Action) -> Self {
        self.on_enter = Some(action);
        self
    }

    pub fn with_on_end(mut self, action: Action) -> Self {
        self.on_end = Some(action);
        self
    }

    pub fn with_on_cancel(mut self, action: CancelAction) -> Self {
        self.on_cancel = Some(action);
        self
    }
}

struct PlaybackHandle {
    id: u64,
    abort: AbortHandle,
}

/// Central scheduling object for chains, players, and link scopes.
pub struct MotionEngine {
    animations_enabled: AtomicBool,
    frame_interval_ms: AtomicU64,
    ids: AtomicU64,
    telemetry: Arc<dyn TelemetrySink>,
    chains: Mutex<HashMap<String, MotionChain>>,
    running_sets: Mutex<HashMap<u64, Weak<MotionPlayer>>>,
    playbacks: Mutex<HashMap<String, PlaybackHandle>>,
    pub(crate) link_scopes: Mutex<HashMap<String, LinkScope>>,
}

impl MotionEngine {
    pub fn new() -> Arc<Self> {
        Self::from_config(&MotionConfig::default())
    }

    pub fn from_config(config: &MotionConfig) -> Arc<Self> {
        Self::with_telemetry(config, Arc::new(TracingTelemetry))
    }

    pub fn with_telemetry(
        config: &MotionConfig,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            animations_enabled: AtomicBool::new(config.motion.animations_enabled),
            frame_interval_ms: AtomicU64::new(config.motion.frame_interval_ms.max(1)),
            ids: AtomicU64::new(1),
            telemetry,
            chains: Mutex::new(HashMap::new()),
            running_sets: Mutex::new(HashMap::new()),
            playbacks: Mutex::new(HashMap::new()),
            link_scopes: Mutex::new(HashMap::new()),
        })
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled.load(Ordering::SeqCst)
    }

    /// Toggle animation globally. Disabled animations jump straight to
    /// their final values.
    pub fn set_animations_enabled(&self, enabled: bool) {
        self.animations_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.load(Ordering::SeqCst))
    }

    pub(crate) fn next_set_id(&self) -> u64 {
        self.ids.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn log_telemetry(&self, event: TelemetryEvent, message: &str) {
        self.telemetry.log_event(event, message);
    }

    // ---- running sets ----

    pub(crate) fn register_running_set(&self, id: u64, player: Weak<MotionPlayer>) {
        self.running_sets
            .lock()
            .expect("engine lock poisoned")
            .insert(id, player);
    }

    pub(crate) fn deregister_running_set(&self, id: u64) {
        self.running_sets
            .lock()
            .expect("engine lock poisoned")
            .remove(&id);
    }

    /// Number of animation sets currently in flight.
    pub fn running_set_count(&self) -> usize {
        self.running_sets.lock().expect("engine lock poisoned").len()
    }

    /// Cancel every in-flight animation set with the given reason.
    pub fn cancel_all_running_sets(&self, reason: CancellationError) {
        let players: Vec<_> = {
            let mut sets = self.running_sets.lock().expect("engine lock poisoned");
            sets.drain().filter_map(|(_, weak)| weak.upgrade()).collect()
        };
        debug!(count = players.len(), ?reason, "cancelling all running sets");
        for player in players {
            player.cancel(reason);
        }
    }

    // ---- chain registry ----

    /// Register a chain. Re-registering an existing key is a no-op so the
    /// chain survives UI rebuilds without losing its links.
    pub fn add_motion_chain(&self, chain: MotionChain) {
        let mut chains = self.chains.lock().expect("engine lock poisoned");
        if chains.contains_key(&chain.chain_key) {
            warn!(key = %chain.chain_key, "chain already registered, keeping existing");
            return;
        }
        chains.insert(chain.chain_key.clone(), chain);
    }

    /// Append a player to a chain, creating the chain when absent.
    pub fn add_motion_player_for_chain(&self, key: &str, player: Arc<MotionPlayer>) {
        let mut chains = self.chains.lock().expect("engine lock poisoned");
        chains
            .entry(key.to_string())
            .or_insert_with(|| MotionChain::new(key))
            .links
            .push(player);
    }

    pub fn has_chain(&self, key: &str) -> bool {
        self.chains
            .lock()
            .expect("engine lock poisoned")
            .contains_key(key)
    }

    pub fn chain_len(&self, key: &str) -> usize {
        self.chains
            .lock()
            .expect("engine lock poisoned")
            .get(key)
            .map(|chain| chain.links.len())
            .unwrap_or(0)
    }

    /// Remove a chain, stopping its playback and halting its links without
    /// firing any callbacks.
    pub fn clear_chain_for_key(&self, key: &str) {
        if let Some(playback) = self
            .playbacks
            .lock()
            .expect("engine lock poisoned")
            .remove(key)
        {
            playback.abort.abort();
        }
        self.remove_chain(key);
    }

    fn remove_chain(&self, key: &str) {
        let chain = self.chains.lock().expect("engine lock poisoned").remove(key);
        if let Some(chain) = chain {
            for link in &chain.links {
                link.halt();
            }
        }
    }

    fn chain_link(&self, key: &str, index: usize) -> Option<Arc<MotionPlayer>> {
        self.chains
            .lock()
            .expect("engine lock poisoned")
            .get(key)
            .and_then(|chain| chain.links.get(index).cloned())
    }

    fn chain_action(&self, key: &str, pick: fn(&MotionChain) -> Option<Action>) -> Option<Action> {
        self.chains
            .lock()
            .expect("engine lock poisoned")
            .get(key)
            .and_then(pick)
    }

    // ---- chain playback ----

    /// Play a chain's links in order, entering. Each link's advance delay
    /// elapses before the next link starts, and once more after the last
    /// link before the chain is considered finished. With `clear_on_finish`
    /// the chain deregisters itself at that point.
    pub fn play_enter_chain_for_key(self: &Arc<Self>, key: &str, clear_on_finish: bool) {
        self.play_chain(key, MotionState::Entering, clear_on_finish);
    }

    /// Play a chain's links in order, exiting.
    pub fn play_exit_chain_for_key(self: &Arc<Self>, key: &str, clear_on_finish: bool) {
        self.play_chain(key, MotionState::Exiting, clear_on_finish);
    }

    fn play_chain(self: &Arc<Self>, key: &str, state: MotionState, clear_on_finish: bool) {
        if !self.has_chain(key) {
            warn!(key, "no chain registered for key");
            return;
        }

        if state == MotionState::Entering {
            if let Some(on_enter) = self.chain_action(key, |c| c.on_enter.clone()) {
                on_enter();
            }
        }

        let id = self.next_set_id();
        let engine = Arc::downgrade(self);
        let chain_key = key.to_string();
        let (ready_tx, ready_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if ready_rx.await.is_err() {
                return;
            }
            // Each playback walks the chain with its own index, so two
            // playbacks of the same key never share advancement state.
            let mut index = 0usize;
            loop {
                let Some(engine) = engine.upgrade() else { return };
                let Some(link) = engine.chain_link(&chain_key, index) else {
                    drop(engine);
                    break;
                };
                let played = match state {
                    MotionState::Entering => link.enter(false),
                    MotionState::Exiting => link.exit(),
                };
                if let Err(err) = played {
                    error!(key = %chain_key, index, %err, "chain link failed to play");
                }
                let delay = link.next_index_delay();
                drop(engine);
                sleep(delay).await;
                index += 1;
            }

            let Some(engine) = engine.upgrade() else { return };
            let removed = {
                let mut playbacks = engine.playbacks.lock().expect("engine lock poisoned");
                match playbacks.get(&chain_key) {
                    Some(playback) if playback.id == id => {
                        playbacks.remove(&chain_key);
                        true
                    }
                    _ => false,
                }
            };
            // A superseded playback leaves chain teardown to its successor.
            if !removed {
                return;
            }
            let on_end = engine.chain_action(&chain_key, |c| c.on_end.clone());
            if clear_on_finish {
                engine.remove_chain(&chain_key);
            }
            if let Some(on_end) = on_end {
                on_end();
            }
        });

        let previous = self
            .playbacks
            .lock()
            .expect("engine lock poisoned")
            .insert(
                key.to_string(),
                PlaybackHandle {
                    id,
                    abort: handle.abort_handle(),
                },
            );
        if let Some(previous) = previous {
            previous.abort.abort();
        }
        let _ = ready_tx.send(());
    }

    /// Cancel a chain: stop its driver so no further link starts, halt the
    /// links quietly, and fire only the chain-level cancellation callback.
    ///
    /// The driver finishes once the advance delays elapse, but link
    /// animations can outlive it; cancellation therefore halts the links
    /// whenever the chain is registered, driver or no driver.
    pub fn cancel_chain(&self, key: &str, reason: CancellationError) {
        let playback = self
            .playbacks
            .lock()
            .expect("engine lock poisoned")
            .remove(key);
        if let Some(playback) = playback {
            playback.abort.abort();
        }

        let on_cancel = {
            let chains = self.chains.lock().expect("engine lock poisoned");
            chains.get(key).map(|chain| {
                for link in &chain.links {
                    link.halt();
                }
                chain.on_cancel.clone()
            })
        };
        let Some(on_cancel) = on_cancel else {
            debug!(key, "cancel requested for unknown chain");
            return;
        };
        self.log_telemetry(TelemetryEvent::Cancellation, "chain cancelled");
        if let Some(on_cancel) = on_cancel {
            on_cancel(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::MotionDuration;
    use crate::target::{MotionTarget, PropertyUpdate};
    use crate::values::{MotionValue, MotionValueMap, Phases};
    use std::sync::atomic::AtomicUsize;

    struct NullTarget;

    impl MotionTarget for NullTarget {
        fn apply(&self, _update: PropertyUpdate) {}
    }

    fn alpha_values() -> MotionValueMap {
        MotionValueMap::new().with(MotionValue::Alpha(Phases::new(0.0, 1.0, 0.0)))
    }

    /// Zero-duration link that records each time it begins playing.
    fn counting_link(
        engine: &Arc<MotionEngine>,
        target: &Arc<dyn MotionTarget>,
        key: &str,
        delay_ms: u64,
        started: &Arc<AtomicUsize>,
    ) -> Arc<MotionPlayer> {
        let started = Arc::clone(started);
        MotionPlayer::builder(Arc::downgrade(target))
            .values(alpha_values())
            .duration(MotionDuration::Zero)
            .chain(key, Duration::from_millis(delay_ms))
            .on_begin(Arc::new(move || {
                started.fetch_add(1, Ordering::SeqCst);
            }))
            .build(engine)
    }

    #[tokio::test]
    async fn chain_registration_is_idempotent() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let started = Arc::new(AtomicUsize::new(0));

        engine.add_motion_chain(MotionChain::new("toolbar"));
        counting_link(&engine, &target, "toolbar", 0, &started);
        counting_link(&engine, &target, "toolbar", 0, &started);
        assert_eq!(engine.chain_len("toolbar"), 2);

        // Re-registering keeps the populated chain.
        engine.add_motion_chain(MotionChain::new("toolbar"));
        assert_eq!(engine.chain_len("toolbar"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn chain_advances_one_link_per_delay() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let started = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            counting_link(&engine, &target, "cascade", 100, &started);
        }

        engine.play_enter_chain_for_key("cascade", false);
        tokio::time::sleep(Duration::from_millis(250)).await;

        // Links start at t=0, 100, 200; the fourth waits until t=300.
        assert_eq!(started.load(Ordering::SeqCst), 3);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(started.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_on_finish_removes_chain_after_final_delay() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let started = Arc::new(AtomicUsize::new(0));
        let ended = Arc::new(AtomicUsize::new(0));

        engine.add_motion_chain(MotionChain::new("banner").with_on_end({
            let ended = Arc::clone(&ended);
            Arc::new(move || {
                ended.fetch_add(1, Ordering::SeqCst);
            })
        }));
        counting_link(&engine, &target, "banner", 100, &started);
        counting_link(&engine, &target, "banner", 100, &started);

        engine.play_enter_chain_for_key("banner", true);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(engine.has_chain("banner"));

        // Final link's delay must elapse before the chain clears.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!engine.has_chain("banner"));
        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_blocks_pending_advancement() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let started = Arc::new(AtomicUsize::new(0));
        let chain_cancelled = Arc::new(AtomicUsize::new(0));
        let link_cancelled = Arc::new(AtomicUsize::new(0));

        engine.add_motion_chain(MotionChain::new("menu").with_on_cancel({
            let chain_cancelled = Arc::clone(&chain_cancelled);
            Arc::new(move |_| {
                chain_cancelled.fetch_add(1, Ordering::SeqCst);
            })
        }));
        for _ in 0..3 {
            let started = Arc::clone(&started);
            let link_cancelled = Arc::clone(&link_cancelled);
            MotionPlayer::builder(Arc::downgrade(&target))
                .values(alpha_values())
                .duration(MotionDuration::Zero)
                .chain("menu", Duration::from_millis(100))
                .on_begin(Arc::new(move || {
                    started.fetch_add(1, Ordering::SeqCst);
                }))
                .on_cancel(Arc::new(move |_| {
                    link_cancelled.fetch_add(1, Ordering::SeqCst);
                }))
                .build(&engine);
        }

        engine.play_enter_chain_for_key("menu", false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        engine.cancel_chain("menu", CancellationError::MemoryMaxExceeded);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        // No further link starts after cancellation, and the links
        // themselves stay quiet.
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(link_cancelled.load(Ordering::SeqCst), 0);
        assert_eq!(chain_cancelled.load(Ordering::SeqCst), 1);
        assert!(engine.has_chain("menu"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_driver_finishes_still_halts_links() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let chain_cancelled = Arc::new(AtomicUsize::new(0));

        engine.add_motion_chain(MotionChain::new("overlay").with_on_cancel({
            let chain_cancelled = Arc::clone(&chain_cancelled);
            Arc::new(move |_| {
                chain_cancelled.fetch_add(1, Ordering::SeqCst);
            })
        }));
        // Link animations far outlive the sum of advance delays, so the
        // driver exits while both are still in flight.
        let links: Vec<_> = (0..2)
            .map(|_| {
                MotionPlayer::builder(Arc::downgrade(&target))
                    .values(alpha_values())
                    .duration(MotionDuration::Long02)
                    .chain("overlay", Duration::from_millis(10))
                    .build(&engine)
            })
            .collect();

        engine.play_enter_chain_for_key("overlay", false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(engine.running_set_count(), 2);

        engine.cancel_chain("overlay", CancellationError::Default);

        assert_eq!(chain_cancelled.load(Ordering::SeqCst), 1);
        assert_eq!(engine.running_set_count(), 0);
        for link in &links {
            assert!(!link.is_playing());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_chains_advance_independently() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let left = Arc::new(AtomicUsize::new(0));
        let right = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            counting_link(&engine, &target, "left", 100, &left);
        }
        for _ in 0..2 {
            counting_link(&engine, &target, "right", 300, &right);
        }

        engine.play_enter_chain_for_key("left", false);
        engine.play_enter_chain_for_key("right", false);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(left.load(Ordering::SeqCst), 3);
        assert_eq!(right.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(right.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn replayed_chain_supersedes_previous_driver() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let started = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            counting_link(&engine, &target, "pager", 200, &started);
        }

        engine.play_enter_chain_for_key("pager", false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        // Restart: the old driver is aborted, the new one begins at index 0.
        engine.play_enter_chain_for_key("pager", false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(started.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_millis(400)).await;
        // Only the replacement driver advanced to the second link.
        assert_eq!(started.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_running_sets_reaches_every_player() {
        let engine = MotionEngine::new();
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let cancelled = Arc::new(AtomicUsize::new(0));

        let players: Vec<_> = (0..3)
            .map(|_| {
                let cancelled = Arc::clone(&cancelled);
                MotionPlayer::builder(Arc::downgrade(&target))
                    .values(alpha_values())
                    .duration(MotionDuration::Long02)
                    .on_cancel(Arc::new(move |reason| {
                        assert_eq!(reason, CancellationError::HostDestroyed);
                        cancelled.fetch_add(1, Ordering::SeqCst);
                    }))
                    .build(&engine)
            })
            .collect();

        for player in &players {
            player.enter(false).unwrap();
        }
        assert_eq!(engine.running_set_count(), 3);

        engine.cancel_all_running_sets(CancellationError::HostDestroyed);
        assert_eq!(cancelled.load(Ordering::SeqCst), 3);
        assert_eq!(engine.running_set_count(), 0);
    }

    #[tokio::test]
    async fn disabled_animations_jump_to_end() {
        let engine = MotionEngine::new();
        engine.set_animations_enabled(false);
        let target: Arc<dyn MotionTarget> = Arc::new(NullTarget);
        let ended = Arc::new(AtomicUsize::new(0));
        let ended_count = Arc::clone(&ended);

        let player = MotionPlayer::builder(Arc::downgrade(&target))
            .values(alpha_values())
            .duration(MotionDuration::Long02)
            .on_end(Arc::new(move || {
                ended_count.fetch_add(1, Ordering::SeqCst);
            }))
            .build(&engine);

        player.enter(false).unwrap();
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(engine.running_set_count(), 0);
    }
}
