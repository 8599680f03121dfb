use std::collections::BTreeMap;

use crate::{
    anim::{TrackKey, Tween},
    compile::Sequence,
    foundation::core::{Millis, Value},
    model::PropMap,
    surface::Surface,
};

/// Value of every animated track at one instant.
pub type TrackState = BTreeMap<TrackKey, Value>;

/// Serializable view of a [`TrackState`], grouped by target.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EvaluatedState {
    pub at: Millis,
    pub targets: BTreeMap<String, PropMap>,
}

impl EvaluatedState {
    pub fn new(at: Millis, state: &TrackState) -> Self {
        let mut targets: BTreeMap<String, PropMap> = BTreeMap::new();
        for (key, value) in state {
            targets
                .entry(key.target.clone())
                .or_default()
                .insert(key.prop.clone(), value.clone());
        }
        Self { at, targets }
    }
}

/// Resolve one track at `t` from the tweens in `indices` (ordered by key).
///
/// An active tween wins over completed ones, the last-keyed active tween wins among active
/// ones, and among completed tweens the one that ended last holds its final value. Returns
/// `None` while no tween of the track has started.
pub(crate) fn track_value(tweens: &[Tween], indices: &[usize], t: Millis) -> Option<Value> {
    let mut active: Option<&Tween> = None;
    let mut done: Option<&Tween> = None;
    for tw in indices.iter().map(|&i| &tweens[i]) {
        if tw.start > t {
            break;
        }
        if tw.is_active_at(t) {
            active = Some(tw);
        } else if done.is_none_or(|d| (d.end(), d.key()) <= (tw.end(), tw.key())) {
            done = Some(tw);
        }
    }
    match (active, done) {
        (Some(tw), _) => tw.sample(t),
        (None, Some(tw)) => Some(tw.final_value()),
        (None, None) => None,
    }
}

impl Sequence {
    /// Value of one track at timeline time `t`, falling back to the baseline.
    pub fn value_at(&self, key: &TrackKey, t: Millis) -> Option<Value> {
        let indices = self.tracks.get(key)?;
        track_value(&self.tweens, indices, t).or_else(|| self.baseline.get(key).cloned())
    }

    /// Every animated track at timeline time `t` (clamped to the duration).
    #[tracing::instrument(skip(self))]
    pub fn sample(&self, t: Millis) -> TrackState {
        let t = t.min(self.duration);
        self.tracks
            .iter()
            .filter_map(|(key, indices)| {
                let v = track_value(&self.tweens, indices, t)
                    .or_else(|| self.baseline.get(key).cloned())?;
                Some((key.clone(), v))
            })
            .collect()
    }

    /// Sample at `elapsed` time since start, counting loop iterations and repeat delays.
    pub fn sample_looped(&self, elapsed: Millis) -> TrackState {
        let cycle = self.cycle().0.max(1);
        self.sample(Millis(elapsed.0 % cycle))
    }

    /// State after the last step has played once.
    pub fn terminal_state(&self) -> TrackState {
        self.sample(self.duration)
    }

    pub fn baseline_state(&self) -> TrackState {
        self.baseline.clone()
    }

    pub fn apply_state(state: &TrackState, surface: &mut dyn Surface) {
        for (key, value) in state {
            surface.write(&key.target, &key.prop, value.clone());
        }
    }

    pub fn apply_terminal(&self, surface: &mut dyn Surface) {
        Self::apply_state(&self.terminal_state(), surface);
    }

    pub fn apply_baseline(&self, surface: &mut dyn Surface) {
        Self::apply_state(&self.baseline, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::build;
    use crate::dsl::{SequenceBuilder, count, to};
    use crate::foundation::core::Prop;
    use crate::position::Position;
    use crate::surface::SceneTree;

    fn tree() -> SceneTree {
        SceneTree::new()
            .with_target("modal", [(Prop::Opacity, Value::Num(0.0))])
            .with_target("chip", [(Prop::Text, Value::from("0"))])
    }

    fn opacity(seq: &Sequence, t: u64) -> Option<f64> {
        seq.value_at(&TrackKey::new("modal", Prop::Opacity), Millis(t))?
            .as_num()
    }

    #[test]
    fn modal_sets_sample_in_order() {
        let def = SequenceBuilder::new()
            .set_at(["modal"], [(Prop::Opacity, 0.0)], Position::at(0.0))
            .set_at(["modal"], [(Prop::Opacity, 1.0)], Position::at(0.5))
            .set_at(["modal"], [(Prop::Opacity, 0.0)], Position::at(2.0))
            .hold_at(0.5, Position::at(2.0))
            .build();
        let seq = build(&def, &tree()).unwrap();
        assert_eq!(opacity(&seq, 0), Some(0.0));
        assert_eq!(opacity(&seq, 600), Some(1.0));
        assert_eq!(opacity(&seq, 2100), Some(0.0));
    }

    #[test]
    fn running_tween_overrides_completed_set() {
        let def = SequenceBuilder::new()
            .step(to(["modal"], [(Prop::Opacity, 1.0)], 1.0))
            .step(to(["modal"], [(Prop::Opacity, 0.25)], 0.0).at(Position::with_prev()))
            .build();
        let seq = build(&def, &tree()).unwrap();
        // The set at 0 completes immediately; the longer tween is still running over it.
        let mid = opacity(&seq, 500).unwrap();
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(opacity(&seq, 1000), Some(1.0));
    }

    #[test]
    fn untouched_tracks_keep_baseline_before_start() {
        let def = SequenceBuilder::new()
            .hold(1.0)
            .step(to(["modal"], [(Prop::Opacity, 1.0)], 0.5))
            .build();
        let seq = build(&def, &tree()).unwrap();
        assert_eq!(opacity(&seq, 200), Some(0.0));
    }

    #[test]
    fn counter_snaps_and_lands_exactly() {
        let def = SequenceBuilder::new()
            .step(count(["chip"], 0.0, 12.0, 0.5).snap(1.0))
            .build();
        let seq = build(&def, &tree()).unwrap();
        let key = TrackKey::new("chip", Prop::Text);
        let mid = seq.value_at(&key, Millis(250)).unwrap();
        let n: f64 = mid.as_text().unwrap().parse().unwrap();
        assert!((0.0..=12.0).contains(&n));
        assert_eq!(n.fract(), 0.0);
        assert_eq!(seq.value_at(&key, Millis(500)), Some(Value::from("12")));
    }

    #[test]
    fn terminal_equals_sample_at_duration_and_loops() {
        let def = SequenceBuilder::new()
            .repeat_delay(1.0)
            .step(to(["modal"], [(Prop::Opacity, 1.0)], 0.4))
            .step(count(["chip"], 0.0, 6.0, 0.3).snap(1.0))
            .build();
        let seq = build(&def, &tree()).unwrap();
        assert_eq!(seq.terminal_state(), seq.sample(seq.duration()));
        assert_eq!(seq.sample_looped(Millis(200)), seq.sample_looped(Millis(1900)));
        // Inside the repeat delay the terminal state holds.
        assert_eq!(seq.sample_looped(Millis(1200)), seq.terminal_state());
    }

    #[test]
    fn evaluated_state_groups_by_target() {
        let def = SequenceBuilder::new()
            .step(to(["modal"], [(Prop::Opacity, 1.0), (Prop::Scale, 1.1)], 0.2))
            .build();
        let seq = build(&def, &tree()).unwrap();
        let view = EvaluatedState::new(seq.duration(), &seq.terminal_state());
        assert_eq!(view.targets["modal"].len(), 2);
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"opacity\":1.0"));
    }
}
