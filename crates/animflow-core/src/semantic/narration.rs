//! Per-step narration captions from the `@narration` block.

/// Caption attached to a step number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationItem {
    step: u32,
    title: String,
    text: String,
}

impl NarrationItem {
    pub fn new(step: u32, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            step,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text handed to the speech engine: the body, or the title when
    /// the body is empty. `None` when both are empty.
    pub fn spoken_text(&self) -> Option<&str> {
        [self.text.trim(), self.title.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
    }
}
