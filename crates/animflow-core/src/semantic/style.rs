//! Per-node visual overrides from the `@style` block.

use crate::color::Color;

/// Visual overrides for a node.
///
/// Every field is optional; unset fields fall back to the renderer's theme.
/// `fill` is also the base color that `highlight` blends away from and
/// `unhighlight` restores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f32>,
    /// Label text color (`color` in the source).
    pub text_color: Option<Color>,
    pub font_size: Option<f32>,
    pub font_weight: Option<String>,
    pub border_radius: Option<f32>,
    pub shadow: Option<String>,
}

impl NodeStyle {
    /// Overlays every field that is set in `other` onto `self`.
    pub fn merge(&mut self, other: &NodeStyle) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.stroke.is_some() {
            self.stroke = other.stroke;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.text_color.is_some() {
            self.text_color = other.text_color;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_weight.is_some() {
            self.font_weight.clone_from(&other.font_weight);
        }
        if other.border_radius.is_some() {
            self.border_radius = other.border_radius;
        }
        if other.shadow.is_some() {
            self.shadow.clone_from(&other.shadow);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
