use std::collections::BTreeMap;

use crate::{
    anim_ease::Ease,
    counter::CounterFormat,
    foundation::core::{Prop, Value},
    foundation::error::{MotionError, MotionResult},
    position::Position,
    surface::SceneTree,
};

/// Property writes keyed by property.
pub type PropMap = BTreeMap<Prop, Value>;

/// Declarative, loopable timeline for one scene. Times are seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceDef {
    /// Pause between loop iterations.
    #[serde(default)]
    pub repeat_delay: f64,
    /// Ease for tweens and counters that do not name one.
    #[serde(default)]
    pub ease: Ease,
    pub steps: Vec<StepDef>,
}

impl Default for SequenceDef {
    fn default() -> Self {
        Self {
            repeat_delay: 0.0,
            ease: Ease::default(),
            steps: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepDef {
    Label(LabelStep),
    Set(SetStep),
    To(TweenStep),
    Hold(HoldStep),
    Count(CountStep),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelStep {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Position>,
}

/// Zero-duration write.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SetStep {
    pub targets: Vec<String>,
    pub props: PropMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Position>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenStep {
    pub targets: Vec<String>,
    pub props: PropMap,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    /// Delay between consecutive targets' starts.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub stagger: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Position>,
}

/// Spacer that only extends the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HoldStep {
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Position>,
}

/// Counter that writes its formatted value into each target's text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CountStep {
    pub targets: Vec<String>,
    pub from: f64,
    pub to: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap: Option<f64>,
    #[serde(default)]
    pub format: CounterFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Position>,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl StepDef {
    pub fn position(&self) -> Option<&Position> {
        match self {
            Self::Label(s) => s.at.as_ref(),
            Self::Set(s) => s.at.as_ref(),
            Self::To(s) => s.at.as_ref(),
            Self::Hold(s) => s.at.as_ref(),
            Self::Count(s) => s.at.as_ref(),
        }
    }

    pub fn targets(&self) -> &[String] {
        match self {
            Self::Set(s) => &s.targets,
            Self::To(s) => &s.targets,
            Self::Count(s) => &s.targets,
            Self::Label(_) | Self::Hold(_) => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::Set(_) => "set",
            Self::To(_) => "to",
            Self::Hold(_) => "hold",
            Self::Count(_) => "count",
        }
    }
}

/// One animated mockup: its targets with mount-time values and its sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDef {
    pub name: String,
    pub targets: BTreeMap<String, PropMap>,
    pub sequence: SequenceDef,
}

impl SceneDef {
    pub fn validate(&self) -> MotionResult<()> {
        if self.name.trim().is_empty() {
            return Err(MotionError::configuration("scene name must be non-empty"));
        }
        if let Some(empty) = self.targets.keys().find(|k| k.trim().is_empty()) {
            return Err(MotionError::configuration(format!(
                "scene '{}' has an empty target name ({empty:?})",
                self.name
            )));
        }
        if !self.sequence.repeat_delay.is_finite() || self.sequence.repeat_delay < 0.0 {
            return Err(MotionError::configuration(format!(
                "scene '{}' repeat_delay must be >= 0",
                self.name
            )));
        }
        Ok(())
    }

    /// Fresh target tree holding the mount-time values.
    pub fn tree(&self) -> SceneTree {
        let mut tree = SceneTree::new();
        for (name, props) in &self.targets {
            tree.insert_target(name.clone(), props.clone());
        }
        tree
    }

    pub fn from_json(s: &str) -> MotionResult<Self> {
        let scene: Self = serde_json::from_str(s)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn to_json_pretty(&self) -> MotionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
