//! Color handling for Animflow diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Fill, stroke, highlight and glow colors all flow
//! through it, and highlight tweens blend between two colors with
//! [`Color::mix`].

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use animflow_core::color::Color;
    ///
    /// let gold = Color::new("#FFD700").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert_ne!(gold, blue);
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str.trim()) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Blends this color towards `other` by `t` in sRGB space.
    ///
    /// `t` is clamped to `[0, 1]`. The end points return the inputs
    /// unchanged, so a finished blend compares equal to its target.
    ///
    /// # Examples
    ///
    /// ```
    /// use animflow_core::color::Color;
    ///
    /// let white = Color::new("#ffffff").unwrap();
    /// let black = Color::new("#000000").unwrap();
    ///
    /// assert_eq!(white.mix(black, 0.0), white);
    /// assert_eq!(white.mix(black, 1.0), black);
    /// ```
    pub fn mix(self, other: Color, t: f32) -> Self {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }

        let from = self.color.to_alpha_color::<Srgb>().components;
        let to = other.color.to_alpha_color::<Srgb>().components;
        let mut blended = [0.0_f32; 4];
        for (i, channel) in blended.iter_mut().enumerate() {
            *channel = from[i] + (to[i] - from[i]) * t;
        }

        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::new(blended)),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}
