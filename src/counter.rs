use crate::{
    anim_ease::Ease,
    foundation::core::Millis,
    foundation::error::{MotionError, MotionResult},
};

/// How a counter's numeric value is rendered into a target's text.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CounterFormat {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    /// Group the integer part in thousands with `,`.
    #[serde(default)]
    pub grouping: bool,
    /// Fractional digits; `0` prints integers.
    #[serde(default)]
    pub decimals: u8,
}

impl CounterFormat {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn currency(symbol: impl Into<String>) -> Self {
        Self {
            prefix: symbol.into(),
            grouping: true,
            ..Self::default()
        }
    }

    pub fn suffixed(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    pub fn render(&self, value: f64) -> String {
        let mut digits = format!("{:.*}", usize::from(self.decimals), value.abs());
        if self.grouping {
            let (int_part, frac_part) = match digits.split_once('.') {
                Some((i, f)) => (i.to_string(), Some(f.to_string())),
                None => (digits.clone(), None),
            };
            let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
            for (i, ch) in int_part.chars().enumerate() {
                if i > 0 && (int_part.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(ch);
            }
            digits = match frac_part {
                Some(f) => format!("{grouped}.{f}"),
                None => grouped,
            };
        }
        // "-0" after rounding is still zero.
        let negative = value < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if negative { "-" } else { "" };
        format!("{sign}{}{digits}{}", self.prefix, self.suffix)
    }
}

/// A numeric scratch value interpolated from `from` to `to` and shown as text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Counter {
    pub from: f64,
    pub to: f64,
    pub duration: Millis,
    pub ease: Ease,
    /// Snap increment (GSAP `snap`); `Some(1.0)` for whole numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap: Option<f64>,
    #[serde(default)]
    pub format: CounterFormat,
}

impl Counter {
    pub fn new(from: f64, to: f64, duration: Millis) -> Self {
        Self {
            from,
            to,
            duration,
            ease: Ease::default(),
            snap: None,
            format: CounterFormat::plain(),
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
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

    pub fn validate(&self) -> MotionResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(MotionError::configuration(
                "counter bounds must be finite numbers",
            ));
        }
        if let Some(snap) = self.snap
            && (!snap.is_finite() || snap <= 0.0)
        {
            return Err(MotionError::configuration(format!(
                "counter snap increment must be > 0, got {snap}"
            )));
        }
        if !self.ease.is_monotonic() {
            return Err(MotionError::configuration(format!(
                "counter ease '{}' overshoots; counters need a monotonic ease",
                self.ease
            )));
        }
        Ok(())
    }

    /// Numeric value after `elapsed` of this counter's own time.
    ///
    /// Reaching the end always yields `to` exactly, snapped or not.
    pub fn value_at(&self, elapsed: Millis) -> f64 {
        if elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.0 as f64 / self.duration.0 as f64;
        let raw = self.from + (self.to - self.from) * self.ease.apply(t);
        let snapped = match self.snap {
            Some(inc) => (raw / inc).round() * inc,
            None => raw,
        };
        // Rounding can step past an endpoint that is not a snap multiple.
        let (lo, hi) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        snapped.clamp(lo, hi)
    }

    pub fn display_at(&self, elapsed: Millis) -> String {
        self.format.render(self.value_at(elapsed))
    }

    /// Begin advancing this counter on its own clock.
    pub fn start(&self) -> CounterRun<'_> {
        CounterRun {
            counter: self,
            elapsed: Millis::ZERO,
            finished: false,
        }
    }
}

/// One in-flight advance of a [`Counter`].
#[derive(Debug)]
pub struct CounterRun<'a> {
    counter: &'a Counter,
    elapsed: Millis,
    finished: bool,
}

impl CounterRun<'_> {
    /// Advance by `dt`, returning the display string for the new position.
    ///
    /// Returns `None` once the end value has been emitted.
    pub fn advance(&mut self, dt: Millis) -> Option<String> {
        if self.finished {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.counter.duration {
            self.finished = true;
        }
        Some(self.counter.display_at(self.elapsed))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Run a counter to completion on a fixed tick, calling `on_update` with every display value.
///
/// The first call shows the start value; the last call always shows the exact end value.
pub fn run_counter(
    counter: &Counter,
    tick: Millis,
    mut on_update: impl FnMut(f64, &str),
) -> MotionResult<()> {
    counter.validate()?;
    if tick == Millis::ZERO {
        return Err(MotionError::configuration("counter tick must be > 0ms"));
    }
    on_update(counter.value_at(Millis::ZERO), &counter.display_at(Millis::ZERO));
    let mut elapsed = Millis::ZERO;
    while elapsed < counter.duration {
        elapsed = elapsed.saturating_add(tick).min(counter.duration);
        on_update(counter.value_at(elapsed), &counter.display_at(elapsed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        let f = CounterFormat::currency("$");
        assert_eq!(f.render(5759.0), "$5,759");
        assert_eq!(f.render(286_455.0), "$286,455");
        assert_eq!(f.render(12.0), "$12");
        assert_eq!(f.render(0.0), "$0");
    }

    #[test]
    fn suffix_and_decimals() {
        assert_eq!(CounterFormat::suffixed("%").render(21.0), "21%");
        assert_eq!(CounterFormat::suffixed(" tasks").render(12.0), "12 tasks");
        let f = CounterFormat {
            decimals: 1,
            grouping: true,
            ..CounterFormat::default()
        };
        assert_eq!(f.render(1234.56), "1,234.6");
        assert_eq!(f.render(-1234.56), "-1,234.6");
    }

    #[test]
    fn snapped_values_are_integers_and_end_exactly() {
        let c = Counter::new(0.0, 12.0, Millis(500)).snap(1.0);
        let mid = c.value_at(Millis(250));
        assert_eq!(mid.fract(), 0.0);
        assert!((0.0..=12.0).contains(&mid));
        assert_eq!(c.value_at(Millis(500)), 12.0);
        assert_eq!(c.value_at(Millis(9_000)), 12.0);
    }

    #[test]
    fn run_counter_is_monotonic_descending() {
        let c = Counter::new(100.0, 40.0, Millis(300)).snap(1.0);
        let mut seen = Vec::new();
        run_counter(&c, Millis(16), |v, _| seen.push(v)).unwrap();
        assert!(seen.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(seen.first().copied(), Some(100.0));
        assert_eq!(seen.last().copied(), Some(40.0));
    }

    #[test]
    fn counter_run_stops_after_end() {
        let c = Counter::new(0.0, 6.0, Millis(100))
            .snap(1.0)
            .format(CounterFormat::plain());
        let mut run = c.start();
        assert!(run.advance(Millis(50)).is_some());
        assert_eq!(run.advance(Millis(60)).as_deref(), Some("6"));
        assert!(run.is_finished());
        assert_eq!(run.advance(Millis(10)), None);
    }

    #[test]
    fn overshooting_ease_is_rejected() {
        let c = Counter::new(0.0, 5.0, Millis(100)).ease(Ease::OutBack(2.0));
        assert!(c.validate().unwrap_err().is_configuration());
    }
}
