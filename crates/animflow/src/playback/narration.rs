//! The narration seam.
//!
//! Every utterance carries an [`UtteranceToken`]. The controller hands out
//! strictly increasing tokens and only honours a completion for the token
//! it is waiting on, so a completion that arrives after `cancel` is inert.

use std::fmt;

use log::{debug, trace};

use crate::error::NarrationError;

/// Identifies one `speak` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtteranceToken(u64);

impl UtteranceToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for UtteranceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A speech engine.
///
/// Engines that finish asynchronously report completion through
/// [`PlaybackController::on_narration_end`](super::PlaybackController::on_narration_end)
/// or the callback of a [`SharedPlayer`](super::SharedPlayer). Engines
/// driven by the playback clock return the finished token from
/// [`advance`](Narrator::advance) instead.
pub trait Narrator: Send {
    /// Starts speaking `text`, replacing any utterance in progress.
    fn speak(&mut self, token: UtteranceToken, text: &str) -> Result<(), NarrationError>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stops the current utterance. Its completion must never be reported.
    fn cancel(&mut self);

    /// Advances a clock-driven engine by `elapsed` wall seconds and returns
    /// the token of an utterance that finished.
    fn advance(&mut self, _elapsed: f64) -> Option<UtteranceToken> {
        None
    }
}

/// Narrator that "speaks" at a fixed reading speed.
#[derive(Debug, Clone)]
pub struct SimulatedNarrator {
    chars_per_second: f64,
    current: Option<(UtteranceToken, f64)>,
    paused: bool,
}

impl SimulatedNarrator {
    /// `chars_per_second` must be positive; anything else falls back to 15.
    pub fn new(chars_per_second: f64) -> Self {
        let chars_per_second = if chars_per_second > 0.0 && chars_per_second.is_finite() {
            chars_per_second
        } else {
            15.0
        };
        Self {
            chars_per_second,
            current: None,
            paused: false,
        }
    }

    /// Seconds needed to read `text` aloud.
    pub fn estimate(&self, text: &str) -> f64 {
        text.trim().chars().count() as f64 / self.chars_per_second
    }

    pub fn is_speaking(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds left in the current utterance.
    pub fn remaining(&self) -> Option<f64> {
        self.current.map(|(_, remaining)| remaining)
    }
}

impl Narrator for SimulatedNarrator {
    fn speak(&mut self, token: UtteranceToken, text: &str) -> Result<(), NarrationError> {
        let seconds = self.estimate(text);
        debug!(token:%, seconds; "Speaking");
        self.current = Some((token, seconds));
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn cancel(&mut self) {
        if let Some((token, _)) = self.current.take() {
            trace!(token:%; "Utterance cancelled");
        }
        self.paused = false;
    }

    fn advance(&mut self, elapsed: f64) -> Option<UtteranceToken> {
        if self.paused {
            return None;
        }
        let (token, remaining) = self.current.as_mut()?;
        *remaining -= elapsed;
        if *remaining > 0.0 {
            return None;
        }
        let token = *token;
        self.current = None;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_estimate() {
        let narrator = SimulatedNarrator::new(10.0);
        assert!(approx_eq!(f64, narrator.estimate("  0123456789  "), 1.0));
        assert!(approx_eq!(f64, SimulatedNarrator::new(-1.0).estimate("abc"), 0.2));
    }

    #[test]
    fn test_finishes_after_estimate() {
        let mut narrator = SimulatedNarrator::new(10.0);
        let token = UtteranceToken::new(3);
        narrator.speak(token, "0123456789").unwrap();

        assert_eq!(narrator.advance(0.5), None);
        assert_eq!(narrator.advance(0.5), Some(token));
        assert!(!narrator.is_speaking());
        assert_eq!(narrator.advance(1.0), None);
    }

    #[test]
    fn test_pause_holds_progress() {
        let mut narrator = SimulatedNarrator::new(10.0);
        narrator.speak(UtteranceToken::new(1), "0123456789").unwrap();
        narrator.pause();
        assert_eq!(narrator.advance(5.0), None);
        narrator.resume();
        assert_eq!(narrator.advance(1.0), Some(UtteranceToken::new(1)));
    }

    #[test]
    fn test_cancel_never_completes() {
        let mut narrator = SimulatedNarrator::new(10.0);
        narrator.speak(UtteranceToken::new(1), "hello").unwrap();
        narrator.cancel();
        assert_eq!(narrator.advance(10.0), None);
    }

    #[test]
    fn test_speak_replaces_current() {
        let mut narrator = SimulatedNarrator::new(10.0);
        narrator.speak(UtteranceToken::new(1), "0123456789").unwrap();
        narrator.speak(UtteranceToken::new(2), "01234").unwrap();
        assert_eq!(narrator.advance(0.5), Some(UtteranceToken::new(2)));
    }

    #[test]
    fn test_token_order() {
        let first = UtteranceToken::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next().to_string(), "#2");
    }
}
