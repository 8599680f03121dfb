use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MotionError, MotionResult};

const DEFAULT_OVERSHOOT: f64 = 1.70158;

/// Easing curves, named and serialized the way GSAP spells them (`power2.inOut`,
/// `back.out(1.2)`, `cubic-bezier(0.25,0.1,0.25,1)`).
///
/// GSAP numbering is one below the polynomial degree: `power1` is quadratic,
/// `power2` cubic, `power3` quartic, `power4` quintic.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InBack(f64),
    OutBack(f64),
    InOutBack(f64),
    CubicBezier(f64, f64, f64, f64),
}

impl Default for Ease {
    fn default() -> Self {
        Self::InOutCubic
    }
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => pow_in(t, 2),
            Self::OutQuad => pow_out(t, 2),
            Self::InOutQuad => pow_in_out(t, 2),
            Self::InCubic => pow_in(t, 3),
            Self::OutCubic => pow_out(t, 3),
            Self::InOutCubic => pow_in_out(t, 3),
            Self::InQuart => pow_in(t, 4),
            Self::OutQuart => pow_out(t, 4),
            Self::InOutQuart => pow_in_out(t, 4),
            Self::InQuint => pow_in(t, 5),
            Self::OutQuint => pow_out(t, 5),
            Self::InOutQuint => pow_in_out(t, 5),
            Self::InSine => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            Self::OutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
            Self::InOutSine => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::InBack(s) => {
                let c3 = s + 1.0;
                c3 * t * t * t - s * t * t
            }
            Self::OutBack(s) => {
                let c3 = s + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + s * u.powi(2)
            }
            Self::InOutBack(s) => {
                let c2 = s * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }

    /// Whether progress never moves backwards. Overshooting curves fail this.
    pub fn is_monotonic(self) -> bool {
        match self {
            Self::InBack(s) | Self::OutBack(s) | Self::InOutBack(s) => s <= 0.0,
            Self::CubicBezier(_, y1, _, y2) => (0.0..=1.0).contains(&y1) && (0.0..=1.0).contains(&y2),
            _ => true,
        }
    }
}

fn pow_in(t: f64, n: i32) -> f64 {
    t.powi(n)
}

fn pow_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

fn pow_in_out(t: f64, n: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(n - 1) * t.powi(n)
    } else {
        1.0 - ((-2.0 * t + 2.0).powi(n) / 2.0)
    }
}

fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    fn coord(u: f64, p1: f64, p2: f64) -> f64 {
        let v = 1.0 - u;
        3.0 * v * v * u * p1 + 3.0 * v * u * u * p2 + u * u * u
    }
    fn slope(u: f64, p1: f64, p2: f64) -> f64 {
        let v = 1.0 - u;
        3.0 * v * v * p1 + 6.0 * v * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
    }

    // Newton first, bisection when the slope is too flat to trust.
    let mut u = t;
    for _ in 0..8 {
        let err = coord(u, x1, x2) - t;
        if err.abs() < 1e-7 {
            return coord(u, y1, y2);
        }
        let d = slope(u, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        u = (u - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    u = t;
    for _ in 0..64 {
        let x = coord(u, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    coord(u, y1, y2)
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "none",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::InQuart => "power3.in",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::InQuint => "power4.in",
            Self::OutQuint => "power4.out",
            Self::InOutQuint => "power4.inOut",
            Self::InSine => "sine.in",
            Self::OutSine => "sine.out",
            Self::InOutSine => "sine.inOut",
            Self::InExpo => "expo.in",
            Self::OutExpo => "expo.out",
            Self::InOutExpo => "expo.inOut",
            Self::InBack(s) => return write!(f, "back.in({s})"),
            Self::OutBack(s) => return write!(f, "back.out({s})"),
            Self::InOutBack(s) => return write!(f, "back.inOut({s})"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                return write!(f, "cubic-bezier({x1},{y1},{x2},{y2})");
            }
        };
        f.write_str(name)
    }
}

impl FromStr for Ease {
    type Err = MotionError;

    fn from_str(s: &str) -> MotionResult<Self> {
        let s = s.trim();
        let bad = || MotionError::configuration(format!("unknown ease '{s}'"));

        if let Some(args) = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let nums = args
                .split(',')
                .map(|p| p.trim().parse::<f64>().map_err(|_| bad()))
                .collect::<MotionResult<Vec<_>>>()?;
            let [x1, y1, x2, y2] = nums[..] else {
                return Err(bad());
            };
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(MotionError::configuration(format!(
                    "cubic-bezier x control points must be within [0, 1] in '{s}'"
                )));
            }
            return Ok(Self::CubicBezier(x1, y1, x2, y2));
        }

        let (family, rest) = s.split_once('.').unwrap_or((s, "out"));
        let (dir, arg) = match rest.split_once('(') {
            Some((dir, arg)) => {
                let arg = arg.strip_suffix(')').ok_or_else(bad)?;
                let v = arg.trim().parse::<f64>().map_err(|_| bad())?;
                (dir, Some(v))
            }
            None => (rest, None),
        };

        let pick = |a: Self, b: Self, c: Self| -> MotionResult<Self> {
            match dir {
                "in" => Ok(a),
                "out" => Ok(b),
                "inOut" => Ok(c),
                _ => Err(bad()),
            }
        };

        if arg.is_some() && family != "back" {
            return Err(bad());
        }

        match family {
            "none" | "linear" | "power0" => Ok(Self::Linear),
            "power1" | "quad" => pick(Self::InQuad, Self::OutQuad, Self::InOutQuad),
            "power2" | "cubic" => pick(Self::InCubic, Self::OutCubic, Self::InOutCubic),
            "power3" | "quart" => pick(Self::InQuart, Self::OutQuart, Self::InOutQuart),
            "power4" | "quint" | "strong" => pick(Self::InQuint, Self::OutQuint, Self::InOutQuint),
            "sine" => pick(Self::InSine, Self::OutSine, Self::InOutSine),
            "expo" => pick(Self::InExpo, Self::OutExpo, Self::InOutExpo),
            "back" => {
                let s = arg.unwrap_or(DEFAULT_OVERSHOOT);
                pick(Self::InBack(s), Self::OutBack(s), Self::InOutBack(s))
            }
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = MotionError;

    fn try_from(s: String) -> MotionResult<Self> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}
