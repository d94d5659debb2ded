//! Document level options from the `@config` block.

use indexmap::IndexMap;

use crate::semantic::step::PropertyValue;

/// Playback options declared by the document itself.
///
/// Options the document leaves unset stay `None` so that the host
/// application's own configuration can fill them in. Keys this type does not
/// know are kept verbatim in [`DiagramConfig::extra`].
///
/// # Examples
///
/// ```
/// use animflow_core::semantic::{DiagramConfig, PropertyValue};
///
/// let mut config = DiagramConfig::default();
/// config.apply("loop", PropertyValue::Bool(true)).unwrap();
/// config.apply("speed", PropertyValue::Number(1.5)).unwrap();
/// assert!(config.apply("autoplay", PropertyValue::Number(3.0)).is_err());
///
/// assert_eq!(config.looping(), Some(true));
/// assert_eq!(config.speed(), Some(1.5));
/// assert!(config.autoplay());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramConfig {
    autoplay: Option<bool>,
    looping: Option<bool>,
    controls: Option<bool>,
    timeline: Option<bool>,
    narration: Option<bool>,
    speed: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    fps: Option<f64>,
    background: Option<String>,
    padding: Option<String>,
    quality: Option<String>,
    tts: Option<bool>,
    tts_voice: Option<String>,
    tts_rate: Option<f64>,
    extra: IndexMap<String, PropertyValue>,
}

impl DiagramConfig {
    /// Sets one option from a `key: value` line.
    ///
    /// # Errors
    ///
    /// Returns a message when a known key carries a value of the wrong type.
    /// The option is left untouched in that case.
    pub fn apply(&mut self, key: &str, value: PropertyValue) -> Result<(), String> {
        match key {
            "autoplay" => self.autoplay = Some(expect_bool(key, &value)?),
            "loop" => self.looping = Some(expect_bool(key, &value)?),
            "controls" => self.controls = Some(expect_bool(key, &value)?),
            "timeline" => self.timeline = Some(expect_bool(key, &value)?),
            "narration" => self.narration = Some(expect_bool(key, &value)?),
            "tts" => self.tts = Some(expect_bool(key, &value)?),
            "speed" => {
                let speed = expect_number(key, &value)?;
                if speed <= 0.0 {
                    return Err(format!("`speed` must be positive, found {speed}"));
                }
                self.speed = Some(speed);
            }
            "width" => self.width = Some(expect_number(key, &value)?),
            "height" => self.height = Some(expect_number(key, &value)?),
            "fps" => self.fps = Some(expect_number(key, &value)?),
            "tts-rate" => self.tts_rate = Some(expect_number(key, &value)?),
            "background" => self.background = Some(value.to_string()),
            "padding" => self.padding = Some(value.to_string()),
            "quality" => self.quality = Some(value.to_string()),
            "tts-voice" => self.tts_voice = Some(value.to_string()),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Start playing as soon as the diagram loads. Defaults to `true`.
    pub fn autoplay(&self) -> bool {
        self.autoplay.unwrap_or(true)
    }

    /// Whether the document asks to restart after the last step.
    pub fn looping(&self) -> Option<bool> {
        self.looping
    }

    /// Show transport controls. Defaults to `true`.
    pub fn controls(&self) -> bool {
        self.controls.unwrap_or(true)
    }

    /// Show the step timeline. Defaults to `true`.
    pub fn timeline(&self) -> bool {
        self.timeline.unwrap_or(true)
    }

    /// Whether the document asks for spoken narration.
    pub fn narration(&self) -> Option<bool> {
        self.narration.or(self.tts)
    }

    /// Playback speed multiplier requested by the document.
    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn padding(&self) -> Option<&str> {
        self.padding.as_deref()
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    pub fn tts_voice(&self) -> Option<&str> {
        self.tts_voice.as_deref()
    }

    pub fn tts_rate(&self) -> Option<f64> {
        self.tts_rate
    }

    /// Keys the document set that have no dedicated option.
    pub fn extra(&self) -> &IndexMap<String, PropertyValue> {
        &self.extra
    }
}

fn expect_bool(key: &str, value: &PropertyValue) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("`{key}` expects true or false, found `{value}`"))
}

fn expect_number(key: &str, value: &PropertyValue) -> Result<f64, String> {
    value
        .as_number()
        .ok_or_else(|| format!("`{key}` expects a number, found `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiagramConfig::default();
        assert!(config.autoplay());
        assert!(config.controls());
        assert!(config.timeline());
        assert_eq!(config.looping(), None);
        assert_eq!(config.narration(), None);
        assert_eq!(config.speed(), None);
    }

    #[test]
    fn test_wrong_type_leaves_option_unset() {
        let mut config = DiagramConfig::default();
        let err = config
            .apply("loop", PropertyValue::Str("sometimes".to_string()))
            .unwrap_err();
        assert!(err.contains("loop"));
        assert_eq!(config.looping(), None);

        assert!(config.apply("speed", PropertyValue::Number(0.0)).is_err());
        assert_eq!(config.speed(), None);
    }

    #[test]
    fn test_tts_enables_narration() {
        let mut config = DiagramConfig::default();
        config.apply("tts", PropertyValue::Bool(true)).unwrap();
        config
            .apply("tts-voice", PropertyValue::Str("female".to_string()))
            .unwrap();
        assert_eq!(config.narration(), Some(true));
        assert_eq!(config.tts_voice(), Some("female"));

        config.apply("narration", PropertyValue::Bool(false)).unwrap();
        assert_eq!(config.narration(), Some(false));
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let mut config = DiagramConfig::default();
        config.apply("theme", PropertyValue::Str("dark".to_string())).unwrap();
        assert_eq!(
            config.extra().get("theme"),
            Some(&PropertyValue::Str("dark".to_string()))
        );
    }

    #[test]
    fn test_numbers_display_as_text() {
        let mut config = DiagramConfig::default();
        config.apply("padding", PropertyValue::Number(20.0)).unwrap();
        assert_eq!(config.padding(), Some("20"));
    }
}
