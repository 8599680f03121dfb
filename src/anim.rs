use crate::{
    anim_ease::Ease,
    counter::Counter,
    foundation::core::{Millis, Prop, Value},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Value {
    // Text has no in-between: it switches as soon as the tween starts.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Value::Num(a), Value::Num(b)) => Value::Num(<f64 as Lerp>::lerp(a, b, t)),
            _ => b.clone(),
        }
    }
}

/// A `(target, property)` channel on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TrackKey {
    pub target: String,
    pub prop: Prop,
}

impl TrackKey {
    pub fn new(target: impl Into<String>, prop: Prop) -> Self {
        Self {
            target: target.into(),
            prop,
        }
    }
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.target, self.prop)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Curve {
    Lerp { from: Value, to: Value, ease: Ease },
    Counter(Counter),
}

/// One resolved write channel: a single target and property over `[start, start + duration]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    /// Declaration order; breaks ties between equal start times.
    pub order: usize,
    pub track: TrackKey,
    pub start: Millis,
    pub duration: Millis,
    pub curve: Curve,
}

impl Tween {
    pub fn end(&self) -> Millis {
        self.start.saturating_add(self.duration)
    }

    /// Sort key used everywhere writes are ordered: earlier start first, then declaration.
    pub fn key(&self) -> (Millis, usize) {
        (self.start, self.order)
    }

    pub fn is_active_at(&self, t: Millis) -> bool {
        self.start <= t && t < self.end()
    }

    pub fn is_complete_at(&self, t: Millis) -> bool {
        self.end() <= t
    }

    pub fn final_value(&self) -> Value {
        match &self.curve {
            Curve::Lerp { to, .. } => to.clone(),
            Curve::Counter(c) => Value::Text(c.format.render(c.to)),
        }
    }

    /// Value at timeline time `t`; `None` before the tween starts.
    pub fn sample(&self, t: Millis) -> Option<Value> {
        if t < self.start {
            return None;
        }
        if self.is_complete_at(t) {
            return Some(self.final_value());
        }
        let elapsed = t.saturating_sub(self.start);
        match &self.curve {
            Curve::Lerp { from, to, ease } => {
                let p = elapsed.0 as f64 / self.duration.0 as f64;
                Some(Value::lerp(from, to, ease.apply(p)))
            }
            Curve::Counter(c) => Some(Value::Text(c.display_at(elapsed))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterFormat;

    fn fade(start: u64, duration: u64, from: f64, to: f64) -> Tween {
        Tween {
            order: 0,
            track: TrackKey::new("modal", Prop::Opacity),
            start: Millis(start),
            duration: Millis(duration),
            curve: Curve::Lerp {
                from: Value::Num(from),
                to: Value::Num(to),
                ease: Ease::Linear,
            },
        }
    }

    #[test]
    fn linear_tween_interpolates() {
        let t = fade(100, 200, 0.0, 1.0);
        assert_eq!(t.sample(Millis(50)), None);
        assert_eq!(t.sample(Millis(100)), Some(Value::Num(0.0)));
        assert_eq!(t.sample(Millis(200)), Some(Value::Num(0.5)));
        assert_eq!(t.sample(Millis(300)), Some(Value::Num(1.0)));
        assert!(t.is_active_at(Millis(299)));
        assert!(t.is_complete_at(Millis(300)));
    }

    #[test]
    fn zero_duration_is_complete_at_start() {
        let t = fade(500, 0, 0.0, 1.0);
        assert!(!t.is_active_at(Millis(500)));
        assert_eq!(t.sample(Millis(500)), Some(Value::Num(1.0)));
    }

    #[test]
    fn text_switches_at_start() {
        let t = Tween {
            order: 0,
            track: TrackKey::new("label", Prop::Text),
            start: Millis(0),
            duration: Millis(100),
            curve: Curve::Lerp {
                from: Value::from("–"),
                to: Value::from("$5,759"),
                ease: Ease::Linear,
            },
        };
        assert_eq!(t.sample(Millis(0)), Some(Value::from("$5,759")));
    }

    #[test]
    fn counter_tween_formats() {
        let counter = Counter::new(0.0, 5759.0, Millis(600))
            .snap(1.0)
            .format(CounterFormat::currency("$"));
        let t = Tween {
            order: 0,
            track: TrackKey::new("budgeted", Prop::Text),
            start: Millis(1000),
            duration: Millis(600),
            curve: Curve::Counter(counter),
        };
        assert_eq!(t.sample(Millis(1000)), Some(Value::from("$0")));
        assert_eq!(t.sample(Millis(1600)), Some(Value::from("$5,759")));
        assert_eq!(t.final_value(), Value::from("$5,759"));
    }
}
