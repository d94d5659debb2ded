//! Application configuration for Animflow playback.
//!
//! These settings belong to the host application. A document's own
//! `@config` block ([`DiagramConfig`]) takes precedence where both define a
//! value.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`PlaybackConfig`] - Tick rate, default speed and narration switch.
//! - [`ThemeConfig`] - Colors and camera defaults used by the compiler.
//! - [`NarrationConfig`] - Pacing of the simulated narration engine.
//! - [`LayoutConfig`] - Spacing of the built-in layered layout.
//!
//! # Example
//!
//! ```
//! # use animflow::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.playback().tick_rate(), 30.0);
//! assert!(config.theme().highlight_color().is_ok());
//! ```
//!
//! [`DiagramConfig`]: animflow_core::semantic::DiagramConfig

use serde::Deserialize;

use animflow_core::{color::Color, semantic::DiagramConfig};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    playback: PlaybackConfig,

    #[serde(default)]
    theme: ThemeConfig,

    #[serde(default)]
    narration: NarrationConfig,

    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    pub fn new(
        playback: PlaybackConfig,
        theme: ThemeConfig,
        narration: NarrationConfig,
        layout: LayoutConfig,
    ) -> Self {
        Self {
            playback,
            theme,
            narration,
            layout,
        }
    }

    pub fn playback(&self) -> &PlaybackConfig {
        &self.playback
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn narration(&self) -> &NarrationConfig {
        &self.narration
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns a copy with the playback speed replaced.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.playback.speed = speed;
        self
    }

    /// Returns a copy with narration switched on or off.
    pub fn with_narration(mut self, enabled: bool) -> Self {
        self.playback.narration = enabled;
        self
    }
}

/// Playback defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Ticks per second of the host loop.
    tick_rate: f64,
    speed: f64,
    narration: bool,
    looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            speed: 1.0,
            narration: true,
            looping: false,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn narration(&self) -> bool {
        self.narration
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Applies the document's own options on top of these defaults.
    pub fn merged_with(&self, document: &DiagramConfig) -> Self {
        Self {
            tick_rate: document.fps().filter(|fps| *fps > 0.0).unwrap_or(self.tick_rate),
            speed: document.speed().unwrap_or(self.speed),
            narration: document.narration().unwrap_or(self.narration),
            looping: document.looping().unwrap_or(self.looping),
        }
    }
}

/// Colors and camera defaults applied when a step does not set them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    node_fill: String,
    edge_stroke: String,
    highlight_color: String,
    camera_padding: f32,
    focus_zoom: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            node_fill: "#ffffff".to_string(),
            edge_stroke: "#555555".to_string(),
            highlight_color: "#FFD700".to_string(),
            camera_padding: 50.0,
            focus_zoom: 2.0,
        }
    }
}

impl ThemeConfig {
    /// Fill of nodes without a style override.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn node_fill(&self) -> Result<Color, String> {
        parse_color("node_fill", &self.node_fill)
    }

    /// Stroke of edges before any step recolors them.
    pub fn edge_stroke(&self) -> Result<Color, String> {
        parse_color("edge_stroke", &self.edge_stroke)
    }

    /// Color of `highlight` steps without a `color` property.
    pub fn highlight_color(&self) -> Result<Color, String> {
        parse_color("highlight_color", &self.highlight_color)
    }

    pub fn camera_padding(&self) -> f32 {
        self.camera_padding
    }

    pub fn focus_zoom(&self) -> f32 {
        self.focus_zoom
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {key} in config: {err}"))
}

/// Pacing of the simulated narration engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    chars_per_second: f64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            chars_per_second: 15.0,
        }
    }
}

impl NarrationConfig {
    pub fn chars_per_second(&self) -> f64 {
        self.chars_per_second
    }
}

/// Spacing of the built-in layered layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_spacing: f32,
    rank_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 80.0,
            rank_spacing: 120.0,
        }
    }
}

impl LayoutConfig {
    /// Gap between nodes of the same rank.
    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// Gap between consecutive ranks.
    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }
}
