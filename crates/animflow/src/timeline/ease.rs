//! Easing curves for scheduled operations.

use std::f64::consts::PI;

/// Progress curve applied to an operation's linear time fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    InQuad,
    #[default]
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    OutBack,
    OutBounce,
    InOutSine,
}

impl Ease {
    /// Maps tween vocabulary (`power2.inOut`, `back.out`, `sine`) to a curve.
    ///
    /// `power1` is quadratic and `power2`/`power3` are cubic. A family
    /// without a direction eases out. Unknown names use the default curve.
    pub fn from_name(name: &str) -> Self {
        let (family, direction) = name.split_once('.').unwrap_or((name, "out"));
        match (family, direction) {
            ("linear" | "none", _) => Self::Linear,
            ("power1" | "quad", "in") => Self::InQuad,
            ("power1" | "quad", "inOut") => Self::InOutQuad,
            ("power1" | "quad", _) => Self::OutQuad,
            ("power2" | "power3" | "cubic", "in") => Self::InCubic,
            ("power2" | "power3" | "cubic", "inOut") => Self::InOutCubic,
            ("power2" | "power3" | "cubic", _) => Self::OutCubic,
            ("back", _) => Self::OutBack,
            ("bounce", _) => Self::OutBounce,
            ("sine", _) => Self::InOutSine,
            _ => Self::default(),
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Self::OutBounce => out_bounce(t),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

fn out_bounce(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    const ALL: [Ease; 10] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::OutBack,
        Ease::OutBounce,
        Ease::InOutSine,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert!(approx_eq!(f64, ease.apply(0.0), 0.0, epsilon = 1e-9), "{ease:?}");
            assert!(approx_eq!(f64, ease.apply(1.0), 1.0, epsilon = 1e-9), "{ease:?}");
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in &ALL[..7] {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Ease::from_name("linear"), Ease::Linear);
        assert_eq!(Ease::from_name("power1.in"), Ease::InQuad);
        assert_eq!(Ease::from_name("power2.inOut"), Ease::InOutCubic);
        assert_eq!(Ease::from_name("power3"), Ease::OutCubic);
        assert_eq!(Ease::from_name("back.out"), Ease::OutBack);
        assert_eq!(Ease::from_name("elastic.out"), Ease::OutQuad);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
        assert_eq!(Ease::OutQuad.apply(2.0), 1.0);
    }
}
