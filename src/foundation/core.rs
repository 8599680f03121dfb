use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::foundation::error::{MotionError, MotionResult};

/// Whole milliseconds on a sequence timeline.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Self = Self(0);

    /// Convert GSAP-style seconds, rounding to the nearest millisecond.
    ///
    /// Negative inputs clamp to zero; non-finite inputs are rejected.
    pub fn from_secs_f64(secs: f64) -> MotionResult<Self> {
        if !secs.is_finite() {
            return Err(MotionError::configuration(format!(
                "time must be finite, got {secs}"
            )));
        }
        Ok(Self((secs * 1000.0).round().max(0.0) as u64))
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Shift by a signed millisecond delta, clamping at zero.
    pub fn offset(self, delta_ms: i64) -> Self {
        if delta_ms >= 0 {
            Self(self.0.saturating_add(delta_ms as u64))
        } else {
            Self(self.0.saturating_sub(delta_ms.unsigned_abs()))
        }
    }
}

impl From<Duration> for Millis {
    fn from(d: Duration) -> Self {
        Self(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl From<Millis> for Duration {
    fn from(m: Millis) -> Self {
        Duration::from_millis(m.0)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A mutable visual property of a target.
///
/// Serialized as a short string: `x`, `y`, `scale`, `scaleX`, `scaleY`, `rotation`, `opacity`,
/// `text`, or `attr:<name>` for numeric element attributes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Prop {
    X,
    Y,
    Scale,
    ScaleX,
    ScaleY,
    Rotation,
    Opacity,
    Attr(String),
    Text,
}

impl Prop {
    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Value assumed for a property the scene never initialized.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Opacity | Self::Scale | Self::ScaleX | Self::ScaleY => Value::Num(1.0),
            Self::X | Self::Y | Self::Rotation | Self::Attr(_) => Value::Num(0.0),
            Self::Text => Value::Text(String::new()),
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
            Self::Scale => f.write_str("scale"),
            Self::ScaleX => f.write_str("scaleX"),
            Self::ScaleY => f.write_str("scaleY"),
            Self::Rotation => f.write_str("rotation"),
            Self::Opacity => f.write_str("opacity"),
            Self::Attr(name) => write!(f, "attr:{name}"),
            Self::Text => f.write_str("text"),
        }
    }
}

impl FromStr for Prop {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        let prop = match s {
            "x" => Self::X,
            "y" => Self::Y,
            "scale" => Self::Scale,
            "scaleX" => Self::ScaleX,
            "scaleY" => Self::ScaleY,
            "rotation" => Self::Rotation,
            "opacity" => Self::Opacity,
            "text" | "textContent" => Self::Text,
            other => match other.strip_prefix("attr:") {
                Some(name) if !name.trim().is_empty() => Self::Attr(name.to_string()),
                _ => {
                    return Err(MotionError::configuration(format!(
                        "unknown property '{other}'"
                    )));
                }
            },
        };
        Ok(prop)
    }
}

impl TryFrom<String> for Prop {
    type Error = MotionError;

    fn try_from(s: String) -> MotionResult<Self> {
        s.parse()
    }
}

impl From<Prop> for String {
    fn from(p: Prop) -> Self {
        p.to_string()
    }
}

/// A property value: numbers interpolate, text switches.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Num(f64),
    Text(String),
}

impl Value {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Num(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    pub fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Num(_), Self::Num(_)) | (Self::Text(_), Self::Text(_))
        )
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_from_secs_rounds_and_clamps() {
        assert_eq!(Millis::from_secs_f64(0.05).unwrap(), Millis(50));
        assert_eq!(Millis::from_secs_f64(0.0004).unwrap(), Millis(0));
        assert_eq!(Millis::from_secs_f64(-1.0).unwrap(), Millis(0));
        assert!(Millis::from_secs_f64(f64::NAN).is_err());
    }

    #[test]
    fn millis_offset_saturates() {
        assert_eq!(Millis(100).offset(-250), Millis(0));
        assert_eq!(Millis(100).offset(50), Millis(150));
    }

    #[test]
    fn prop_string_form_roundtrips() {
        for s in ["x", "scaleY", "opacity", "text", "attr:stroke-dashoffset"] {
            let p: Prop = s.parse().unwrap();
            assert_eq!(p.to_string(), s);
        }
        assert!("attr:".parse::<Prop>().is_err());
        assert!("colour".parse::<Prop>().is_err());
    }

    #[test]
    fn value_json_is_untagged() {
        let v: Value = serde_json::from_str("0.5").unwrap();
        assert_eq!(v, Value::Num(0.5));
        let t: Value = serde_json::from_str("\"$1,200\"").unwrap();
        assert_eq!(t.as_text(), Some("$1,200"));
    }
}
