use crate::{
    clock::{Clock, MonotonicClock},
    compile::{Sequence, build, terminal_state},
    foundation::error::MotionResult,
    model::SceneDef,
    player::{PlaybackState, Player, TickReport},
    surface::SceneTree,
};

/// Environment variable read by [`EnvMotionGate`].
pub const REDUCED_MOTION_ENV: &str = "GALA_REDUCED_MOTION";

/// "Should motion be suppressed?", asked once per mount.
pub trait MotionGate {
    fn prefers_reduced_motion(&self) -> bool;
}

impl MotionGate for bool {
    fn prefers_reduced_motion(&self) -> bool {
        *self
    }
}

/// Reads the preference from `GALA_REDUCED_MOTION` (`1`, `true` or `reduce`).
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvMotionGate;

impl EnvMotionGate {
    pub fn parse(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "reduce"
        )
    }
}

impl MotionGate for EnvMotionGate {
    fn prefers_reduced_motion(&self) -> bool {
        std::env::var(REDUCED_MOTION_ENV).is_ok_and(|v| Self::parse(&v))
    }
}

/// A loaded animation engine: the clock playback runs on.
pub struct Engine {
    clock: Box<dyn Clock>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

/// Produces an [`Engine`] for [`SceneHost::mount_with`].
pub trait EngineLoader {
    fn load(&mut self) -> MotionResult<Engine>;
}

impl<F> EngineLoader for F
where
    F: FnMut() -> MotionResult<Engine>,
{
    fn load(&mut self) -> MotionResult<Engine> {
        self()
    }
}

/// Identifies one mount's pending engine load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum FallbackReason {
    ReducedMotion,
    EngineLoad,
    Configuration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountOutcome {
    /// The tree shows a static frame; nothing will play.
    Static(FallbackReason),
    /// Motion is allowed; deliver the engine with [`SceneHost::complete_load`].
    Loading(LoadTicket),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The mount that asked for this load is gone.
    Cancelled,
    Fallback(FallbackReason),
    Started,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum HostState {
    Unmounted,
    Loading,
    Animating,
    Static(FallbackReason),
}

/// Owns one scene's target tree and the player animating it.
///
/// Every failure path ends in a static frame: the sequence's terminal state when the
/// definition builds, otherwise the mount-time values.
pub struct SceneHost {
    scene: SceneDef,
    tree: SceneTree,
    state: HostState,
    generation: u64,
    player: Option<Player>,
}

impl SceneHost {
    pub fn new(scene: SceneDef) -> Self {
        let tree = scene.tree();
        Self {
            scene,
            tree,
            state: HostState::Unmounted,
            generation: 0,
            player: None,
        }
    }

    pub fn scene(&self) -> &SceneDef {
        &self.scene
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn player_state(&self) -> Option<PlaybackState> {
        self.player.as_ref().map(Player::state)
    }

    /// Fresh tree, one gate query. A previous mount is torn down first.
    #[tracing::instrument(skip(self, gate), fields(scene = %self.scene.name))]
    pub fn mount(&mut self, gate: &dyn MotionGate) -> MountOutcome {
        if self.state != HostState::Unmounted {
            self.unmount();
        }
        self.generation += 1;
        self.tree = self.scene.tree();

        if gate.prefers_reduced_motion() {
            tracing::debug!("reduced motion; showing terminal state");
            return MountOutcome::Static(self.fall_back(FallbackReason::ReducedMotion));
        }
        self.state = HostState::Loading;
        MountOutcome::Loading(LoadTicket {
            generation: self.generation,
        })
    }

    /// Deliver the result of the engine load started by `ticket`.
    #[tracing::instrument(skip(self, result), fields(scene = %self.scene.name))]
    pub fn complete_load(&mut self, ticket: LoadTicket, result: MotionResult<Engine>) -> LoadOutcome {
        if ticket.generation != self.generation || self.state != HostState::Loading {
            tracing::debug!("late engine load ignored");
            return LoadOutcome::Cancelled;
        }
        let engine = match result {
            Ok(engine) => engine,
            Err(err) => {
                tracing::warn!(error = %err, "animation engine unavailable");
                return LoadOutcome::Fallback(self.fall_back(FallbackReason::EngineLoad));
            }
        };
        let seq = match build(&self.scene.sequence, &self.tree) {
            Ok(seq) => seq,
            Err(err) => {
                tracing::warn!(error = %err, "sequence rejected");
                return LoadOutcome::Fallback(self.fall_back(FallbackReason::Configuration));
            }
        };
        let mut player = Player::with_boxed_clock(seq, engine.clock);
        player.start(&mut self.tree);
        self.player = Some(player);
        self.state = HostState::Animating;
        LoadOutcome::Started
    }

    /// Mount and load synchronously.
    pub fn mount_with(&mut self, gate: &dyn MotionGate, loader: &mut dyn EngineLoader) -> HostState {
        if let MountOutcome::Loading(ticket) = self.mount(gate) {
            self.complete_load(ticket, loader.load());
        }
        self.state
    }

    /// Per-frame callback.
    pub fn frame(&mut self) -> TickReport {
        match self.player.as_mut() {
            Some(player) => player.tick(&mut self.tree),
            None => TickReport::default(),
        }
    }

    pub fn pointer_enter(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.pause();
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.resume();
        }
    }

    /// Dispose the player and cancel any outstanding load. Repeated calls do nothing.
    pub fn unmount(&mut self) {
        if self.state == HostState::Unmounted {
            return;
        }
        self.generation += 1;
        if let Some(mut player) = self.player.take() {
            player.dispose();
        }
        self.state = HostState::Unmounted;
        tracing::debug!(scene = %self.scene.name, "unmounted");
    }

    fn fall_back(&mut self, reason: FallbackReason) -> FallbackReason {
        // Only the end state is resolved here; no sequence or player is ever created.
        match terminal_state(&self.scene.sequence, &self.tree) {
            Ok(end) => Sequence::apply_state(&end, &mut self.tree),
            Err(err) => {
                tracing::warn!(error = %err, "no terminal state; keeping mount values");
            }
        }
        self.state = HostState::Static(reason);
        reason
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.unmount();
    }
}
