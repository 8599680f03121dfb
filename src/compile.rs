use std::collections::{BTreeMap, BTreeSet};

use crate::{
    anim::{Curve, TrackKey, Tween},
    anim_ease::Ease,
    counter::Counter,
    eval::{TrackState, track_value},
    foundation::core::{Millis, Prop, Value},
    foundation::error::{MotionError, MotionResult},
    model::{CountStep, PropMap, SequenceDef, SetStep, StepDef, TweenStep},
    position::Position,
    surface::Surface,
};

/// A label with its resolved timeline time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LabelMark {
    pub name: String,
    pub at: Millis,
}

/// A built, immutable timeline: every step resolved to absolute times.
#[derive(Clone, Debug)]
pub struct Sequence {
    pub(crate) tweens: Vec<Tween>,
    pub(crate) tracks: BTreeMap<TrackKey, Vec<usize>>,
    pub(crate) labels: Vec<LabelMark>,
    pub(crate) baseline: BTreeMap<TrackKey, Value>,
    pub(crate) duration: Millis,
    pub(crate) repeat_delay: Millis,
}

impl Sequence {
    /// End of the last step.
    pub fn duration(&self) -> Millis {
        self.duration
    }

    pub fn repeat_delay(&self) -> Millis {
        self.repeat_delay
    }

    /// One loop iteration including the pause before the next.
    pub fn cycle(&self) -> Millis {
        self.duration.saturating_add(self.repeat_delay)
    }

    /// Labels in timeline order.
    pub fn labels(&self) -> &[LabelMark] {
        &self.labels
    }

    pub fn label_time(&self, name: &str) -> Option<Millis> {
        self.labels.iter().find(|l| l.name == name).map(|l| l.at)
    }

    /// Resolved tweens ordered by `(start, declaration)`.
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn track_keys(&self) -> impl Iterator<Item = &TrackKey> {
        self.tracks.keys()
    }

    /// Target values captured at build, restored at every loop start.
    pub fn baseline(&self) -> &BTreeMap<TrackKey, Value> {
        &self.baseline
    }
}

enum PendingCurve {
    Lerp { to: Value, ease: Ease },
    Counter(Counter),
}

struct Pending {
    order: usize,
    track: TrackKey,
    start: Millis,
    duration: Millis,
    curve: PendingCurve,
}

struct Resolver<'a> {
    def: &'a SequenceDef,
    surface: &'a dyn Surface,
    end: Millis,
    prev: Option<(Millis, Millis)>,
    labels: BTreeMap<String, Millis>,
    marks: Vec<LabelMark>,
    pending: Vec<Pending>,
    next_order: usize,
}

/// Validate `def` against the targets of `surface` and resolve it into a [`Sequence`].
///
/// Nothing is written to the surface; it is only read for the baseline values.
#[tracing::instrument(skip_all, fields(steps = def.steps.len()))]
pub fn build(def: &SequenceDef, surface: &dyn Surface) -> MotionResult<Sequence> {
    let seq = resolve(def, surface)?;
    tracing::debug!(
        duration = %seq.duration,
        tweens = seq.tweens.len(),
        tracks = seq.tracks.len(),
        labels = seq.labels.len(),
        "sequence built"
    );
    Ok(seq)
}

/// End state of `def` against `surface`, for static frames. No sequence is handed out.
pub(crate) fn terminal_state(def: &SequenceDef, surface: &dyn Surface) -> MotionResult<TrackState> {
    Ok(resolve(def, surface)?.terminal_state())
}

fn resolve(def: &SequenceDef, surface: &dyn Surface) -> MotionResult<Sequence> {
    let repeat_delay = duration_ms(def.repeat_delay, "repeat_delay")?;

    let mut r = Resolver {
        def,
        surface,
        end: Millis::ZERO,
        prev: None,
        labels: BTreeMap::new(),
        marks: Vec::new(),
        pending: Vec::new(),
        next_order: 0,
    };
    for (idx, step) in def.steps.iter().enumerate() {
        r.step(idx, step)?;
    }

    let duration = r.end;
    if duration.saturating_add(repeat_delay) == Millis::ZERO {
        return Err(MotionError::configuration(
            "sequence has zero length; add a tween, a hold or a repeat delay",
        ));
    }

    let baseline = capture_baseline(&r.pending, surface)?;

    let mut pending = r.pending;
    pending.sort_by_key(|p| (p.start, p.order));

    let mut tweens: Vec<Tween> = Vec::with_capacity(pending.len());
    let mut tracks: BTreeMap<TrackKey, Vec<usize>> = BTreeMap::new();
    for p in pending {
        let idxs = tracks.entry(p.track.clone()).or_default();
        let curve = match p.curve {
            PendingCurve::Lerp { to, ease } => {
                let from = track_value(&tweens, idxs, p.start)
                    .or_else(|| baseline.get(&p.track).cloned())
                    .unwrap_or_else(|| p.track.prop.default_value());
                Curve::Lerp { from, to, ease }
            }
            PendingCurve::Counter(c) => Curve::Counter(c),
        };
        idxs.push(tweens.len());
        tweens.push(Tween {
            order: p.order,
            track: p.track,
            start: p.start,
            duration: p.duration,
            curve,
        });
    }

    let mut labels = r.marks;
    labels.sort_by_key(|l| l.at);

    Ok(Sequence {
        tweens,
        tracks,
        labels,
        baseline,
        duration,
        repeat_delay,
    })
}

fn duration_ms(secs: f64, what: &str) -> MotionResult<Millis> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(MotionError::configuration(format!(
            "{what} must be a finite number >= 0, got {secs}"
        )));
    }
    Millis::from_secs_f64(secs)
}

fn offset_ms(secs: f64) -> MotionResult<i64> {
    if !secs.is_finite() {
        return Err(MotionError::configuration(format!(
            "position offset must be finite, got {secs}"
        )));
    }
    Ok((secs * 1000.0).round() as i64)
}

fn capture_baseline(
    pending: &[Pending],
    surface: &dyn Surface,
) -> MotionResult<BTreeMap<TrackKey, Value>> {
    let mut baseline = BTreeMap::new();
    for p in pending {
        if baseline.contains_key(&p.track) {
            continue;
        }
        let value = surface
            .read(&p.track.target, &p.track.prop)
            .unwrap_or_else(|| p.track.prop.default_value());
        if value.as_text().is_some() != p.track.prop.is_text() {
            return Err(MotionError::configuration(format!(
                "target '{}' holds {value:?} for '{}', which does not fit the property",
                p.track.target, p.track.prop
            )));
        }
        baseline.insert(p.track.clone(), value);
    }
    Ok(baseline)
}

impl Resolver<'_> {
    fn step(&mut self, idx: usize, step: &StepDef) -> MotionResult<()> {
        let start = self.resolve(idx, step.position())?;
        let end = match step {
            StepDef::Label(l) => {
                self.label(idx, &l.name, start)?;
                return Ok(());
            }
            StepDef::Set(s) => self.set(idx, s, start)?,
            StepDef::To(s) => self.tween(idx, s, start)?,
            StepDef::Hold(h) => start.saturating_add(duration_ms(h.duration, "hold duration")?),
            StepDef::Count(c) => self.count(idx, c, start)?,
        };
        self.prev = Some((start, end));
        self.end = self.end.max(end);
        Ok(())
    }

    fn resolve(&self, idx: usize, pos: Option<&Position>) -> MotionResult<Millis> {
        let Some(pos) = pos else {
            return Ok(self.end);
        };
        let t = match pos {
            Position::Absolute(secs) => Millis::from_secs_f64(*secs)?,
            Position::End(d) => self.end.offset(offset_ms(*d)?),
            Position::PrevStart(d) => {
                let base = self.prev.map_or(Millis::ZERO, |(s, _)| s);
                base.offset(offset_ms(*d)?)
            }
            Position::PrevEnd(d) => {
                let base = self.prev.map_or(Millis::ZERO, |(_, e)| e);
                base.offset(offset_ms(*d)?)
            }
            Position::Label(name, d) => {
                let Some(at) = self.labels.get(name) else {
                    return Err(self.missing_label(idx, name));
                };
                at.offset(offset_ms(*d)?)
            }
        };
        Ok(t)
    }

    fn missing_label(&self, idx: usize, name: &str) -> MotionError {
        let declared_later = self.def.steps[idx + 1..]
            .iter()
            .any(|s| matches!(s, StepDef::Label(l) if l.name == name));
        if declared_later {
            MotionError::configuration(format!(
                "step {idx} references label '{name}' before it is declared"
            ))
        } else {
            MotionError::configuration(format!("step {idx} references unknown label '{name}'"))
        }
    }

    fn label(&mut self, idx: usize, name: &str, at: Millis) -> MotionResult<()> {
        if name.trim().is_empty() {
            return Err(MotionError::configuration(format!(
                "step {idx} declares a label with an empty name"
            )));
        }
        if self.labels.contains_key(name) {
            return Err(MotionError::configuration(format!(
                "step {idx} redeclares label '{name}'"
            )));
        }
        self.labels.insert(name.to_string(), at);
        self.marks.push(LabelMark {
            name: name.to_string(),
            at,
        });
        Ok(())
    }

    fn check_targets(&self, idx: usize, kind: &str, targets: &[String]) -> MotionResult<()> {
        if targets.is_empty() {
            return Err(MotionError::configuration(format!(
                "step {idx} ({kind}) has no targets"
            )));
        }
        let mut seen = BTreeSet::new();
        for t in targets {
            if !self.surface.has_target(t) {
                return Err(MotionError::configuration(format!(
                    "step {idx} ({kind}) references missing target '{t}'"
                )));
            }
            if !seen.insert(t.as_str()) {
                return Err(MotionError::configuration(format!(
                    "step {idx} ({kind}) lists target '{t}' twice"
                )));
            }
        }
        Ok(())
    }

    fn check_props(&self, idx: usize, kind: &str, props: &PropMap) -> MotionResult<()> {
        if props.is_empty() {
            return Err(MotionError::configuration(format!(
                "step {idx} ({kind}) has no properties"
            )));
        }
        for (prop, value) in props {
            if prop.is_text() != value.as_text().is_some() {
                return Err(MotionError::configuration(format!(
                    "step {idx} ({kind}) writes {value:?} to '{prop}'; text goes to 'text', numbers elsewhere"
                )));
            }
            if let Some(v) = value.as_num()
                && !v.is_finite()
            {
                return Err(MotionError::configuration(format!(
                    "step {idx} ({kind}) writes a non-finite value to '{prop}'"
                )));
            }
        }
        Ok(())
    }

    fn push(&mut self, track: TrackKey, start: Millis, duration: Millis, curve: PendingCurve) {
        self.pending.push(Pending {
            order: self.next_order,
            track,
            start,
            duration,
            curve,
        });
        self.next_order += 1;
    }

    fn set(&mut self, idx: usize, s: &SetStep, start: Millis) -> MotionResult<Millis> {
        self.check_targets(idx, "set", &s.targets)?;
        self.check_props(idx, "set", &s.props)?;
        for target in &s.targets {
            for (prop, value) in &s.props {
                self.push(
                    TrackKey::new(target.clone(), prop.clone()),
                    start,
                    Millis::ZERO,
                    PendingCurve::Lerp {
                        to: value.clone(),
                        ease: Ease::Linear,
                    },
                );
            }
        }
        Ok(start)
    }

    fn tween(&mut self, idx: usize, s: &TweenStep, start: Millis) -> MotionResult<Millis> {
        self.check_targets(idx, "to", &s.targets)?;
        self.check_props(idx, "to", &s.props)?;
        let duration = duration_ms(s.duration, "tween duration")?;
        let stagger = duration_ms(s.stagger, "stagger")?;
        let ease = s.ease.unwrap_or(self.def.ease);

        let mut last_start = start;
        for (i, target) in s.targets.iter().enumerate() {
            let t_start = start.saturating_add(Millis(stagger.0.saturating_mul(i as u64)));
            last_start = t_start;
            for (prop, value) in &s.props {
                self.push(
                    TrackKey::new(target.clone(), prop.clone()),
                    t_start,
                    duration,
                    PendingCurve::Lerp {
                        to: value.clone(),
                        ease,
                    },
                );
            }
        }
        Ok(last_start.saturating_add(duration))
    }

    fn count(&mut self, idx: usize, c: &CountStep, start: Millis) -> MotionResult<Millis> {
        self.check_targets(idx, "count", &c.targets)?;
        let counter = Counter {
            from: c.from,
            to: c.to,
            duration: duration_ms(c.duration, "counter duration")?,
            ease: c.ease.unwrap_or(self.def.ease),
            snap: c.snap,
            format: c.format.clone(),
        };
        counter.validate().map_err(|e| match e {
            MotionError::Configuration(msg) => {
                MotionError::configuration(format!("step {idx} (count): {msg}"))
            }
            other => other,
        })?;
        for target in &c.targets {
            self.push(
                TrackKey::new(target.clone(), Prop::Text),
                start,
                counter.duration,
                PendingCurve::Counter(counter.clone()),
            );
        }
        Ok(start.saturating_add(counter.duration))
    }
}
