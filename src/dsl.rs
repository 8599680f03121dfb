use std::collections::BTreeMap;

use crate::{
    anim_ease::Ease,
    counter::CounterFormat,
    foundation::core::{Prop, Value},
    foundation::error::{MotionError, MotionResult},
    model::{
        CountStep, HoldStep, LabelStep, PropMap, SceneDef, SequenceDef, SetStep, StepDef, TweenStep,
    },
    position::Position,
};

/// Fluent construction of a [`SequenceDef`], in the order GSAP timelines are written.
pub struct SequenceBuilder {
    repeat_delay: f64,
    ease: Ease,
    steps: Vec<StepDef>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self {
            repeat_delay: 0.0,
            ease: Ease::default(),
            steps: Vec::new(),
        }
    }

    pub fn repeat_delay(mut self, secs: f64) -> Self {
        self.repeat_delay = secs;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn step(mut self, step: impl Into<StepDef>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn label(self, name: impl Into<String>) -> Self {
        self.step(LabelStep {
            name: name.into(),
            at: None,
        })
    }

    pub fn label_at(self, name: impl Into<String>, at: Position) -> Self {
        self.step(LabelStep {
            name: name.into(),
            at: Some(at),
        })
    }

    pub fn set<T, V>(self, targets: T, props: impl IntoIterator<Item = (Prop, V)>) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        V: Into<Value>,
    {
        self.step(set(targets, props))
    }

    pub fn set_at<T, V>(
        self,
        targets: T,
        props: impl IntoIterator<Item = (Prop, V)>,
        at: Position,
    ) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        V: Into<Value>,
    {
        self.step(set(targets, props).at(at))
    }

    pub fn hold(self, secs: f64) -> Self {
        self.step(HoldStep {
            duration: secs,
            at: None,
        })
    }

    pub fn hold_at(self, secs: f64, at: Position) -> Self {
        self.step(HoldStep {
            duration: secs,
            at: Some(at),
        })
    }

    pub fn build(self) -> SequenceDef {
        SequenceDef {
            repeat_delay: self.repeat_delay,
            ease: self.ease,
            steps: self.steps,
        }
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene targets plus their sequence.
pub struct SceneBuilder {
    name: String,
    targets: BTreeMap<String, PropMap>,
    sequence: SequenceDef,
}

impl SceneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: BTreeMap::new(),
            sequence: SequenceDef::default(),
        }
    }

    pub fn target<V: Into<Value>>(
        mut self,
        name: impl Into<String>,
        props: impl IntoIterator<Item = (Prop, V)>,
    ) -> MotionResult<Self> {
        let name = name.into();
        if self.targets.contains_key(&name) {
            return Err(MotionError::configuration(format!(
                "duplicate target '{name}' in scene '{}'",
                self.name
            )));
        }
        self.targets.insert(name, prop_map(props));
        Ok(self)
    }

    pub fn sequence(mut self, sequence: SequenceDef) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn build(self) -> MotionResult<SceneDef> {
        let scene = SceneDef {
            name: self.name,
            targets: self.targets,
            sequence: self.sequence,
        };
        scene.validate()?;
        Ok(scene)
    }
}

fn prop_map<V: Into<Value>>(props: impl IntoIterator<Item = (Prop, V)>) -> PropMap {
    props.into_iter().map(|(p, v)| (p, v.into())).collect()
}

fn names<T>(targets: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: Into<String>,
{
    targets.into_iter().map(Into::into).collect()
}

/// `tl.set(targets, props)`.
pub fn set<T, V>(targets: T, props: impl IntoIterator<Item = (Prop, V)>) -> SetStep
where
    T: IntoIterator,
    T::Item: Into<String>,
    V: Into<Value>,
{
    SetStep {
        targets: names(targets),
        props: prop_map(props),
        at: None,
    }
}

/// `tl.to(targets, { ...props, duration })`.
pub fn to<T, V>(targets: T, props: impl IntoIterator<Item = (Prop, V)>, duration: f64) -> TweenStep
where
    T: IntoIterator,
    T::Item: Into<String>,
    V: Into<Value>,
{
    TweenStep {
        targets: names(targets),
        props: prop_map(props),
        duration,
        ease: None,
        stagger: 0.0,
        at: None,
    }
}

/// Counter from `from` to `to` shown as text on each target.
pub fn count<T>(targets: T, from: f64, to: f64, duration: f64) -> CountStep
where
    T: IntoIterator,
    T::Item: Into<String>,
{
    CountStep {
        targets: names(targets),
        from,
        to,
        duration,
        ease: None,
        snap: None,
        format: CounterFormat::plain(),
        at: None,
    }
}

impl SetStep {
    pub fn at(mut self, at: Position) -> Self {
        self.at = Some(at);
        self
    }
}

impl TweenStep {
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = secs;
        self
    }

    pub fn at(mut self, at: Position) -> Self {
        self.at = Some(at);
        self
    }
}

impl CountStep {
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn snap(mut self, increment: f64) -> Self {
        self.snap = Some(increment);
        self
    }

    pub fn format(mut self, format: CounterFormat) -> Self {
        self.format = format;
        self
    }

    pub fn at(mut self, at: Position) -> Self {
        self.at = Some(at);
        self
    }
}

impl From<LabelStep> for StepDef {
    fn from(s: LabelStep) -> Self {
        Self::Label(s)
    }
}

impl From<SetStep> for StepDef {
    fn from(s: SetStep) -> Self {
        Self::Set(s)
    }
}

impl From<TweenStep> for StepDef {
    fn from(s: TweenStep) -> Self {
        Self::To(s)
    }
}

impl From<HoldStep> for StepDef {
    fn from(s: HoldStep) -> Self {
        Self::Hold(s)
    }
}

impl From<CountStep> for StepDef {
    fn from(s: CountStep) -> Self {
        Self::Count(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_create_expected_structure() {
        let seq = SequenceBuilder::new()
            .repeat_delay(1.0)
            .label("open")
            .set(["modal"], [(Prop::Opacity, 0.0)])
            .step(
                to(["modal"], [(Prop::Opacity, 1.0)], 0.5)
                    .ease(Ease::OutBack(1.2))
                    .at(Position::label("open")),
            )
            .hold(1.2)
            .step(count(["total"], 0.0, 5759.0, 0.6).snap(1.0))
            .build();
        assert_eq!(seq.steps.len(), 5);
        assert_eq!(seq.repeat_delay, 1.0);
        assert_eq!(
            seq.steps.iter().map(StepDef::kind).collect::<Vec<_>>(),
            vec!["label", "set", "to", "hold", "count"]
        );
        assert_eq!(seq.steps[2].position(), Some(&Position::label("open")));

        let scene = SceneBuilder::new("modal")
            .target("modal", [(Prop::Opacity, 0.0)])
            .unwrap()
            .target("total", [(Prop::Text, "$0")])
            .unwrap()
            .sequence(seq)
            .build()
            .unwrap();
        assert_eq!(scene.targets.len(), 2);
    }

    #[test]
    fn duplicate_target_is_rejected() {
        let err = SceneBuilder::new("s")
            .target("a", [(Prop::X, 0.0)])
            .unwrap()
            .target("a", [(Prop::Y, 0.0)]);
        assert!(err.is_err());
    }
}
