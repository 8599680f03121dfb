use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MotionError, MotionResult};

/// Where a step lands on the timeline, in GSAP position-parameter terms.
///
/// Offsets are in seconds. A step without a position goes to the timeline end.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "PositionRepr", into = "String")]
pub enum Position {
    /// `1.5`: absolute time.
    Absolute(f64),
    /// `+=0.3` / `-=0.05`: relative to the current end of the timeline.
    End(f64),
    /// `<` / `<+=0.1`: relative to the start of the previous step.
    PrevStart(f64),
    /// `>` / `>-=0.1`: relative to the end of the previous step.
    PrevEnd(f64),
    /// `label` / `label+=0.06`: relative to a label declared earlier.
    Label(String, f64),
}

impl Position {
    pub fn at(secs: f64) -> Self {
        Self::Absolute(secs)
    }

    pub fn after(secs: f64) -> Self {
        Self::End(secs)
    }

    pub fn overlap(secs: f64) -> Self {
        Self::End(-secs)
    }

    pub fn with_prev() -> Self {
        Self::PrevStart(0.0)
    }

    pub fn with_prev_offset(secs: f64) -> Self {
        Self::PrevStart(secs)
    }

    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into(), 0.0)
    }

    pub fn label_offset(name: impl Into<String>, secs: f64) -> Self {
        Self::Label(name.into(), secs)
    }

    pub fn label_ref(&self) -> Option<&str> {
        match self {
            Self::Label(name, _) => Some(name),
            _ => None,
        }
    }

    pub fn offset_secs(&self) -> f64 {
        match self {
            Self::Absolute(v) => *v,
            Self::End(d) | Self::PrevStart(d) | Self::PrevEnd(d) | Self::Label(_, d) => *d,
        }
    }
}

fn parse_offset(rest: &str, whole: &str) -> MotionResult<f64> {
    let bad = || MotionError::configuration(format!("malformed position '{whole}'"));
    if rest.is_empty() {
        return Ok(0.0);
    }
    let (sign, num) = if let Some(n) = rest.strip_prefix("+=") {
        (1.0, n)
    } else if let Some(n) = rest.strip_prefix("-=") {
        (-1.0, n)
    } else {
        return Err(bad());
    };
    let v = num.trim().parse::<f64>().map_err(|_| bad())?;
    if !v.is_finite() || v < 0.0 {
        return Err(bad());
    }
    Ok(sign * v)
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MotionError::configuration("empty position"));
        }
        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::PrevStart(parse_offset(rest, s)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::PrevEnd(parse_offset(rest, s)?));
        }
        if s.starts_with("+=") || s.starts_with("-=") {
            return Ok(Self::End(parse_offset(s, s)?));
        }
        if let Ok(v) = s.parse::<f64>() {
            if !v.is_finite() || v < 0.0 {
                return Err(MotionError::configuration(format!(
                    "absolute position must be >= 0, got '{s}'"
                )));
            }
            return Ok(Self::Absolute(v));
        }

        let split = s.find("+=").or_else(|| s.find("-="));
        let (name, rest) = match split {
            Some(i) => (&s[..i], &s[i..]),
            None => (s, ""),
        };
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(MotionError::configuration(format!(
                "malformed label reference '{s}'"
            )));
        }
        Ok(Self::Label(name.to_string(), parse_offset(rest, s)?))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn off(f: &mut fmt::Formatter<'_>, d: f64) -> fmt::Result {
            if d > 0.0 {
                write!(f, "+={d}")
            } else if d < 0.0 {
                write!(f, "-={}", -d)
            } else {
                Ok(())
            }
        }
        match self {
            Self::Absolute(v) => write!(f, "{v}"),
            Self::End(d) => {
                if *d == 0.0 {
                    f.write_str("+=0")
                } else {
                    off(f, *d)
                }
            }
            Self::PrevStart(d) => {
                f.write_str("<")?;
                off(f, *d)
            }
            Self::PrevEnd(d) => {
                f.write_str(">")?;
                off(f, *d)
            }
            Self::Label(name, d) => {
                f.write_str(name)?;
                off(f, *d)
            }
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Secs(f64),
    Expr(String),
}

impl TryFrom<PositionRepr> for Position {
    type Error = MotionError;

    fn try_from(repr: PositionRepr) -> MotionResult<Self> {
        match repr {
            PositionRepr::Secs(v) if v.is_finite() && v >= 0.0 => Ok(Self::Absolute(v)),
            PositionRepr::Secs(v) => Err(MotionError::configuration(format!(
                "absolute position must be >= 0, got {v}"
            ))),
            PositionRepr::Expr(s) => s.parse(),
        }
    }
}

impl From<Position> for String {
    fn from(p: Position) -> Self {
        p.to_string()
    }
}
