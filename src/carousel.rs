use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Millis;
use crate::foundation::error::{MotionError, MotionResult};

/// Mini scenes shown by the hero rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneId {
    Slides,
    Budget,
    Calendar,
    Hq,
    Projects,
}

impl SceneId {
    pub const ALL: [Self; 5] = [
        Self::Slides,
        Self::Budget,
        Self::Calendar,
        Self::Hq,
        Self::Projects,
    ];

    /// How long the scene stays on screen before the rig moves on.
    pub fn dwell(self) -> Millis {
        match self {
            Self::Slides => Millis(3200),
            Self::Budget => Millis(2600),
            Self::Calendar => Millis(2200),
            Self::Hq => Millis(2600),
            Self::Projects => Millis(2400),
        }
    }

    /// Sidebar icon highlighted while the scene shows.
    pub fn nav_index(self) -> usize {
        match self {
            Self::Projects => 0,
            Self::Hq => 1,
            Self::Slides | Self::Budget => 2,
            Self::Calendar => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slides => "slides",
            Self::Budget => "budget",
            Self::Calendar => "calendar",
            Self::Hq => "hq",
            Self::Projects => "projects",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| MotionError::configuration(format!("unknown hero scene '{s}'")))
    }
}

/// Cycles hero scenes on their dwell times.
///
/// Time comes in through [`tick`](Self::tick) as a monotonic timestamp, so the rig runs the
/// same under a real or a manual clock.
#[derive(Clone, Debug)]
pub struct HeroCarousel {
    scenes: Vec<(SceneId, Millis)>,
    index: usize,
    reduced_motion: bool,
    /// Time left on the current scene.
    remaining: Millis,
    last: Option<Millis>,
    hovered: bool,
}

impl HeroCarousel {
    pub fn new(scenes: Vec<(SceneId, Millis)>, reduced_motion: bool) -> MotionResult<Self> {
        if scenes.is_empty() {
            return Err(MotionError::configuration("hero carousel needs at least one scene"));
        }
        if let Some((id, _)) = scenes.iter().find(|(_, d)| *d == Millis::ZERO) {
            return Err(MotionError::configuration(format!(
                "hero scene '{id}' has a zero dwell time"
            )));
        }
        let remaining = scenes[0].1;
        Ok(Self {
            scenes,
            index: 0,
            reduced_motion,
            remaining,
            last: None,
            hovered: false,
        })
    }

    /// The rig as shipped: slides, budget, calendar, hq, projects.
    pub fn standard(reduced_motion: bool) -> Self {
        Self {
            scenes: SceneId::ALL.iter().map(|&id| (id, id.dwell())).collect(),
            index: 0,
            reduced_motion,
            remaining: SceneId::Slides.dwell(),
            last: None,
            hovered: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> SceneId {
        self.scenes[self.index].0
    }

    pub fn active_nav(&self) -> usize {
        self.current().nav_index()
    }

    pub fn remaining(&self) -> Millis {
        self.remaining
    }

    /// Advance to `now`; returns the newly shown scene when it changed.
    pub fn tick(&mut self, now: Millis) -> Option<SceneId> {
        let last = self.last.replace(now).unwrap_or(now);
        if self.reduced_motion || self.hovered {
            return None;
        }
        let mut elapsed = now.saturating_sub(last);
        let start = self.index;
        while elapsed >= self.remaining {
            elapsed = elapsed.saturating_sub(self.remaining);
            self.index = (self.index + 1) % self.scenes.len();
            self.remaining = self.scenes[self.index].1;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        (self.index != start).then(|| {
            tracing::debug!(scene = %self.current(), "hero scene");
            self.current()
        })
    }

    /// Freeze the countdown; the remaining dwell is kept.
    pub fn pointer_enter(&mut self, now: Millis) {
        self.tick(now);
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self, now: Millis) {
        self.hovered = false;
        self.last = Some(now);
    }

    /// Dot click: show scene `index` with a full dwell.
    pub fn jump_to(&mut self, index: usize, now: Millis) -> MotionResult<SceneId> {
        if index >= self.scenes.len() {
            return Err(MotionError::configuration(format!(
                "hero scene index {index} out of range (0..{})",
                self.scenes.len()
            )));
        }
        self.index = index;
        self.remaining = self.scenes[index].1;
        self.last = Some(now);
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_on_dwell_times_and_wraps() {
        let mut rig = HeroCarousel::standard(false);
        rig.tick(Millis(0));
        assert_eq!(rig.tick(Millis(3199)), None);
        assert_eq!(rig.tick(Millis(3200)), Some(SceneId::Budget));
        assert_eq!(rig.active_nav(), 2);
        // budget 2600 + calendar 2200 + hq 2600 + projects 2400
        assert_eq!(rig.tick(Millis(3200 + 9800)), Some(SceneId::Slides));
    }

    #[test]
    fn hover_keeps_remaining_dwell() {
        let mut rig = HeroCarousel::standard(false);
        rig.tick(Millis(0));
        rig.pointer_enter(Millis(1000));
        assert_eq!(rig.remaining(), Millis(2200));
        assert_eq!(rig.tick(Millis(60_000)), None);
        rig.pointer_leave(Millis(60_000));
        assert_eq!(rig.tick(Millis(62_199)), None);
        assert_eq!(rig.tick(Millis(62_200)), Some(SceneId::Budget));
    }

    #[test]
    fn reduced_motion_never_advances() {
        let mut rig = HeroCarousel::standard(true);
        rig.tick(Millis(0));
        assert_eq!(rig.tick(Millis(100_000)), None);
        assert_eq!(rig.current(), SceneId::Slides);
    }

    #[test]
    fn jump_restarts_dwell() {
        let mut rig = HeroCarousel::standard(false);
        rig.tick(Millis(0));
        assert_eq!(rig.jump_to(3, Millis(500)).unwrap(), SceneId::Hq);
        assert_eq!(rig.active_nav(), 1);
        assert_eq!(rig.tick(Millis(3099)), None);
        assert_eq!(rig.tick(Millis(3100)), Some(SceneId::Projects));
        assert!(rig.jump_to(9, Millis(0)).is_err());
    }

    #[test]
    fn rejects_empty_rig() {
        assert!(HeroCarousel::new(Vec::new(), false).is_err());
        assert_eq!("hq".parse::<SceneId>().unwrap(), SceneId::Hq);
    }
}
