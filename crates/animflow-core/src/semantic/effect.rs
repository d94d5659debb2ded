//! Named visual effects.
//!
//! Effects only change how the renderer draws a transition; they never
//! affect scheduling. Unknown names fall back to the default variant of each
//! family so that a typo degrades to a plain animation.

use std::fmt;

/// Entrance motion used by `show`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntranceEffect {
    #[default]
    FadeIn,
    SlideInLeft,
    SlideInRight,
    SlideInTop,
    SlideInBottom,
    ScaleIn,
    BounceIn,
    FlipIn,
    RotateIn,
}

impl EntranceEffect {
    /// Resolves an effect name, falling back to [`EntranceEffect::FadeIn`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "slideInLeft" => Self::SlideInLeft,
            "slideInRight" => Self::SlideInRight,
            "slideInTop" => Self::SlideInTop,
            "slideInBottom" => Self::SlideInBottom,
            "scaleIn" => Self::ScaleIn,
            "bounceIn" => Self::BounceIn,
            "flipIn" => Self::FlipIn,
            "rotateIn" => Self::RotateIn,
            _ => Self::FadeIn,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::SlideInLeft => "slideInLeft",
            Self::SlideInRight => "slideInRight",
            Self::SlideInTop => "slideInTop",
            Self::SlideInBottom => "slideInBottom",
            Self::ScaleIn => "scaleIn",
            Self::BounceIn => "bounceIn",
            Self::FlipIn => "flipIn",
            Self::RotateIn => "rotateIn",
        }
    }
}

impl fmt::Display for EntranceEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit motion used by `hide`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitEffect {
    #[default]
    FadeOut,
    SlideOutLeft,
    SlideOutRight,
    ScaleOut,
    BounceOut,
}

impl ExitEffect {
    /// Resolves an effect name, falling back to [`ExitEffect::FadeOut`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "slideOutLeft" => Self::SlideOutLeft,
            "slideOutRight" => Self::SlideOutRight,
            "scaleOut" => Self::ScaleOut,
            "bounceOut" => Self::BounceOut,
            _ => Self::FadeOut,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FadeOut => "fadeOut",
            Self::SlideOutLeft => "slideOutLeft",
            Self::SlideOutRight => "slideOutRight",
            Self::ScaleOut => "scaleOut",
            Self::BounceOut => "bounceOut",
        }
    }
}

impl fmt::Display for ExitEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draw strategy used by `connect`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowEffect {
    #[default]
    Particles,
    Dash,
    Glow,
    Wave,
    Arrow,
    Lightning,
}

impl FlowEffect {
    /// Resolves a flow name, falling back to [`FlowEffect::Particles`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "dash" => Self::Dash,
            "glow" => Self::Glow,
            "wave" => Self::Wave,
            "arrow" => Self::Arrow,
            "lightning" => Self::Lightning,
            _ => Self::Particles,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::Dash => "dash",
            Self::Glow => "glow",
            Self::Wave => "wave",
            Self::Arrow => "arrow",
            Self::Lightning => "lightning",
        }
    }
}

impl fmt::Display for FlowEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_names_fall_back() {
        assert_eq!(EntranceEffect::from_name("sparkle"), EntranceEffect::FadeIn);
        assert_eq!(ExitEffect::from_name(""), ExitEffect::FadeOut);
        assert_eq!(FlowEffect::from_name("smoke"), FlowEffect::Particles);
    }

    #[test]
    fn test_names_round_trip() {
        for name in ["slideInLeft", "bounceIn", "rotateIn"] {
            assert_eq!(EntranceEffect::from_name(name).as_str(), name);
        }
        assert_eq!(ExitEffect::from_name("scaleOut").to_string(), "scaleOut");
        assert_eq!(FlowEffect::from_name("lightning").to_string(), "lightning");
    }
}
