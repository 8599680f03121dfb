use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use crate::{
    clock::Clock,
    compile::Sequence,
    foundation::core::Millis,
    surface::Surface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Disposed,
}

/// What one call to [`Player::tick`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TickReport {
    /// Labels the playhead passed, in timeline order.
    pub labels: Vec<String>,
    /// Loop wraps performed.
    pub loops: u64,
    /// Property writes sent to the surface.
    pub writes: usize,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.loops == 0 && self.writes == 0
    }
}

/// Real-time playback of a [`Sequence`], looping forever.
///
/// Pending activations sit in a min-heap keyed by `(start, declaration order)` and are drained
/// against the clock on every [`tick`](Self::tick). The surface is borrowed per call only.
pub struct Player {
    seq: Sequence,
    clock: Box<dyn Clock>,
    state: PlaybackState,
    /// Playhead within the current iteration, `0..=cycle`.
    position: Millis,
    iteration: u64,
    last_clock: Option<Millis>,
    /// Wall time already elapsed but not yet applied (folded in by `pause`).
    carry: Millis,
    pending: BinaryHeap<Reverse<(Millis, usize)>>,
    active: BTreeSet<usize>,
    next_label: usize,
    current_label: Option<String>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("state", &self.state)
            .field("position", &self.position)
            .field("iteration", &self.iteration)
            .field("pending", &self.pending.len())
            .field("active", &self.active.len())
            .finish_non_exhaustive()
    }
}

impl Player {
    pub fn new(seq: Sequence, clock: impl Clock + 'static) -> Self {
        Self::with_boxed_clock(seq, Box::new(clock))
    }

    pub fn with_boxed_clock(seq: Sequence, clock: Box<dyn Clock>) -> Self {
        Self {
            seq,
            clock,
            state: PlaybackState::Idle,
            position: Millis::ZERO,
            iteration: 0,
            last_clock: None,
            carry: Millis::ZERO,
            pending: BinaryHeap::new(),
            active: BTreeSet::new(),
            next_label: 0,
            current_label: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> Millis {
        self.position
    }

    /// Completed loop iterations.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Most recent label reached in the current iteration.
    pub fn current_label(&self) -> Option<&str> {
        self.current_label.as_deref()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.seq
    }

    /// Idle → Running: restore the baseline and apply everything scheduled at time zero.
    pub fn start(&mut self, surface: &mut dyn Surface) -> TickReport {
        let mut report = TickReport::default();
        if self.state != PlaybackState::Idle {
            tracing::debug!(state = ?self.state, "start ignored");
            return report;
        }
        self.state = PlaybackState::Running;
        self.last_clock = Some(self.clock.now());
        self.restart_iteration(surface, &mut report);
        tracing::debug!(duration = %self.seq.duration(), cycle = %self.seq.cycle(), "playback started");
        report
    }

    /// Running → Paused. The playhead freezes where the clock has it now.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Running {
            return;
        }
        let now = self.clock.now();
        if let Some(last) = self.last_clock.take() {
            self.carry = self.carry.saturating_add(now.saturating_sub(last));
        }
        self.state = PlaybackState::Paused;
        tracing::debug!(position = %self.position, "playback paused");
    }

    /// Paused → Running, continuing from the frozen playhead.
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.last_clock = Some(self.clock.now());
        self.state = PlaybackState::Running;
        tracing::debug!(position = %self.position, "playback resumed");
    }

    /// Cancel every pending activation. Safe in any state; later calls do nothing.
    pub fn dispose(&mut self) {
        if self.state == PlaybackState::Disposed {
            return;
        }
        self.state = PlaybackState::Disposed;
        self.pending.clear();
        self.active.clear();
        self.last_clock = None;
        self.carry = Millis::ZERO;
        self.current_label = None;
        tracing::debug!(iterations = self.iteration, "playback disposed");
    }

    /// Advance by the wall time elapsed since the previous tick and write due values.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> TickReport {
        let mut report = TickReport::default();
        if self.state != PlaybackState::Running {
            return report;
        }
        let now = self.clock.now();
        let last = self.last_clock.replace(now).unwrap_or(now);
        let elapsed = self.carry.saturating_add(now.saturating_sub(last));
        self.carry = Millis::ZERO;
        if elapsed > Millis::ZERO {
            self.advance(elapsed, surface, &mut report);
        }
        report
    }

    fn advance(&mut self, elapsed: Millis, surface: &mut dyn Surface, report: &mut TickReport) {
        let cycle = self.seq.cycle();
        let mut target = self.position.saturating_add(elapsed);
        while target >= cycle {
            self.advance_to(cycle, surface, report);
            let mut rest = target.saturating_sub(cycle);
            self.iteration += 1;
            report.loops += 1;
            // Whole iterations are deterministic, so skip them outright.
            if rest >= cycle {
                let skipped = rest.0 / cycle.0;
                self.iteration += skipped;
                report.loops += skipped;
                rest = Millis(rest.0 % cycle.0);
            }
            tracing::debug!(iteration = self.iteration, "loop wrap");
            self.restart_iteration(surface, report);
            target = rest;
        }
        self.advance_to(target, surface, report);
    }

    fn restart_iteration(&mut self, surface: &mut dyn Surface, report: &mut TickReport) {
        self.position = Millis::ZERO;
        self.active.clear();
        self.pending = self
            .seq
            .tweens()
            .iter()
            .enumerate()
            .map(|(i, tw)| Reverse((tw.start, i)))
            .collect();
        self.next_label = 0;
        self.current_label = None;
        for (key, value) in self.seq.baseline() {
            surface.write(&key.target, &key.prop, value.clone());
            report.writes += 1;
        }
        self.advance_to(Millis::ZERO, surface, report);
    }

    fn advance_to(&mut self, to: Millis, surface: &mut dyn Surface, report: &mut TickReport) {
        while let Some(Reverse((start, idx))) = self.pending.peek().copied() {
            if start > to {
                break;
            }
            self.pending.pop();
            self.active.insert(idx);
        }

        let labels = self.seq.labels();
        while let Some(label) = labels.get(self.next_label) {
            if label.at > to {
                break;
            }
            tracing::debug!(label = %label.name, at = %label.at, "label reached");
            report.labels.push(label.name.clone());
            self.current_label = Some(label.name.clone());
            self.next_label += 1;
        }

        let tweens = self.seq.tweens();
        let mut finished: Vec<usize> = self
            .active
            .iter()
            .copied()
            .filter(|&i| tweens[i].is_complete_at(to))
            .collect();
        finished.sort_by_key(|&i| (tweens[i].end(), tweens[i].key()));
        for i in finished {
            self.active.remove(&i);
            let tw = &tweens[i];
            surface.write(&tw.track.target, &tw.track.prop, tw.final_value());
            report.writes += 1;
        }

        for &i in &self.active {
            let tw = &tweens[i];
            if let Some(v) = tw.sample(to) {
                surface.write(&tw.track.target, &tw.track.prop, v);
                report.writes += 1;
            }
        }

        self.position = to;
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::compile::build;
    use crate::dsl::{SequenceBuilder, to};
    use crate::foundation::core::{Prop, Value};
    use crate::surface::SceneTree;

    fn setup() -> (Player, SceneTree, ManualClock) {
        let tree = SceneTree::new().with_target("modal", [(Prop::Opacity, Value::Num(0.0))]);
        let def = SequenceBuilder::new()
            .repeat_delay(0.5)
            .label("open")
            .step(to(["modal"], [(Prop::Opacity, 1.0)], 1.0))
            .label("close")
            .step(to(["modal"], [(Prop::Opacity, 0.0)], 1.0))
            .build();
        let seq = build(&def, &tree).unwrap();
        let clock = ManualClock::new();
        (Player::new(seq, clock.clone()), tree, clock)
    }

    #[test]
    fn tick_follows_the_clock() {
        let (mut player, mut tree, clock) = setup();
        let report = player.start(&mut tree);
        assert_eq!(report.labels, vec!["open".to_string()]);
        clock.advance(Millis(1000));
        let report = player.tick(&mut tree);
        assert_eq!(report.labels, vec!["close".to_string()]);
        assert_eq!(tree.num("modal", &Prop::Opacity), Some(1.0));
        assert_eq!(player.current_label(), Some("close"));
    }

    #[test]
    fn wraps_after_repeat_delay() {
        let (mut player, mut tree, clock) = setup();
        player.start(&mut tree);
        clock.advance(Millis(2600));
        let report = player.tick(&mut tree);
        assert_eq!(report.loops, 1);
        assert_eq!(player.iteration(), 1);
        assert_eq!(player.position(), Millis(100));
    }

    #[test]
    fn paused_player_writes_nothing() {
        let (mut player, mut tree, clock) = setup();
        player.start(&mut tree);
        clock.advance(Millis(300));
        player.tick(&mut tree);
        player.pause();
        let before = tree.write_count();
        clock.advance(Millis(5000));
        assert!(player.tick(&mut tree).is_empty());
        assert_eq!(tree.write_count(), before);
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn start_twice_is_ignored() {
        let (mut player, mut tree, _clock) = setup();
        player.start(&mut tree);
        assert!(player.start(&mut tree).is_empty());
    }

    #[test]
    fn resume_without_pause_is_noop() {
        let (mut player, mut tree, _clock) = setup();
        player.resume();
        assert_eq!(player.state(), PlaybackState::Idle);
        player.start(&mut tree);
        player.resume();
        assert_eq!(player.state(), PlaybackState::Running);
    }
}
