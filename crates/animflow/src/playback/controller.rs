//! Transport state machine with narration pacing.

use std::{collections::HashMap, fmt, mem};

use log::{debug, info, trace, warn};

use animflow_core::semantic::Diagram;

use crate::{
    error::AnimflowError,
    playback::{Narrator, Renderer, UtteranceToken},
    scheduler::{Scheduler, TimelineClock},
    timeline::{CompiledTimeline, Frame, StepBoundary},
};

/// Transport state of a [`PlaybackController`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Notifications collected by the controller, drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// The cursor entered the boundary at `index`.
    StepChanged { step: u32, index: usize },
    StateChanged(TransportState),
    /// Visuals of `step` finished before its narration did.
    AutoPaused { step: u32 },
    /// Narration finished and auto-paused playback continued.
    Resumed,
    /// The cursor reached the end of the timeline.
    Finished,
    Progress { time: f64, duration: f64 },
    NarrationStarted { step: u32, token: UtteranceToken },
}

/// Drives a [`CompiledTimeline`] through a [`Scheduler`], pushes frames to a
/// [`Renderer`] and keeps step boundaries in sync with a [`Narrator`].
///
/// The controller is cooperative: the host calls [`tick`](Self::tick) at its
/// frame rate and reports asynchronous narration completion through
/// [`on_narration_end`](Self::on_narration_end).
///
/// # Auto-pause
///
/// When a step is entered while playing, its caption is spoken. If the
/// cursor reaches the end of the step while that utterance is still
/// pending, the controller pauses itself and raises the auto-pause flag.
/// Completion of the pending utterance resumes playback only while the flag
/// is set; `pause`, `seek`, `stop` and restarts clear it.
pub struct PlaybackController<S: Scheduler = TimelineClock> {
    timeline: CompiledTimeline,
    scheduler: S,
    renderer: Option<Box<dyn Renderer>>,
    narrator: Option<Box<dyn Narrator>>,
    captions: HashMap<u32, String>,
    narration_enabled: bool,
    looping: bool,
    state: TransportState,
    current: Option<usize>,
    spoken: Option<usize>,
    auto_paused: bool,
    pending: Option<UtteranceToken>,
    last_token: UtteranceToken,
    events: Vec<PlaybackEvent>,
}

impl PlaybackController<TimelineClock> {
    /// Creates a stopped controller on the built-in clock.
    pub fn new(diagram: &Diagram, timeline: CompiledTimeline) -> Self {
        Self::with_scheduler(diagram, timeline, TimelineClock::new())
    }
}

impl<S: Scheduler> PlaybackController<S> {
    /// Creates a stopped controller that installs `timeline` into `scheduler`.
    pub fn with_scheduler(diagram: &Diagram, timeline: CompiledTimeline, mut scheduler: S) -> Self {
        timeline.install(&mut scheduler);
        scheduler.pause();
        scheduler.seek(0.0);

        let mut captions = HashMap::new();
        for item in diagram.narration() {
            if let Some(text) = item.spoken_text() {
                captions.entry(item.step()).or_insert_with(|| text.to_string());
            }
        }

        Self {
            timeline,
            scheduler,
            renderer: None,
            narrator: None,
            captions,
            narration_enabled: true,
            looping: false,
            state: TransportState::Stopped,
            current: None,
            spoken: None,
            auto_paused: false,
            pending: None,
            last_token: UtteranceToken::new(0),
            events: Vec::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self.render_frame(&self.timeline.initial_frame());
        self
    }

    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    /// Sets the initial speed. Invalid factors keep the default.
    pub fn with_speed(mut self, speed: f64) -> Self {
        if let Err(err) = self.set_speed(speed) {
            warn!(err:%; "Ignoring playback speed");
        }
        self
    }

    pub fn with_narration(mut self, enabled: bool) -> Self {
        self.narration_enabled = enabled;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.scheduler.current_time()
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    pub fn speed(&self) -> f64 {
        self.scheduler.speed()
    }

    /// The step number of the boundary the cursor is in.
    pub fn current_step(&self) -> Option<u32> {
        self.current_boundary().map(|b| b.step())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// True while playback waits for narration of the current step.
    pub fn is_auto_paused(&self) -> bool {
        self.auto_paused
    }

    /// Token of the utterance the controller is waiting on.
    pub fn pending_utterance(&self) -> Option<UtteranceToken> {
        self.pending
    }

    /// True when a narrator is attached and narration is enabled.
    pub fn narration_active(&self) -> bool {
        self.narration_enabled && self.narrator.is_some()
    }

    pub fn caption(&self, step: u32) -> Option<&str> {
        self.captions.get(&step).map(String::as_str)
    }

    pub fn timeline(&self) -> &CompiledTimeline {
        &self.timeline
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The frame at the cursor.
    pub fn frame(&self) -> Frame {
        self.timeline.sample(self.scheduler.current_time())
    }

    /// Takes every event collected since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        mem::take(&mut self.events)
    }

    /// Starts or resumes playback. At the end of the timeline this restarts
    /// from the beginning.
    pub fn play(&mut self) {
        if self.state == TransportState::Playing {
            return;
        }
        if self.scheduler.current_time() >= self.timeline.duration() {
            self.rewind();
        }

        // A user resume stops waiting on the current utterance.
        if self.auto_paused {
            self.auto_paused = false;
            self.pending = None;
        }

        self.scheduler.play();
        self.set_state(TransportState::Playing);
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.resume();
        }

        match self.current {
            None => {
                if let Some(index) = self.timeline.boundary_at(self.scheduler.current_time()) {
                    self.enter(index);
                }
            }
            Some(index) if self.spoken != Some(index) => self.speak(index),
            Some(_) => {}
        }
        // A narrated zero-length step waits here before the next one starts.
        let now = self.scheduler.current_time();
        self.sync(now);
        self.render();
    }

    /// Freezes the clock and the narrator, keeping the cursor.
    pub fn pause(&mut self) {
        self.auto_paused = false;
        if self.state == TransportState::Stopped {
            return;
        }
        self.scheduler.pause();
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.pause();
        }
        self.set_state(TransportState::Paused);
    }

    /// Freezes the clock, rewinds to 0 and re-applies initial visibility.
    pub fn stop(&mut self) {
        self.cancel_narration();
        self.scheduler.pause();
        self.scheduler.seek(0.0);
        self.current = None;
        self.spoken = None;
        self.set_state(TransportState::Stopped);
        self.render_frame(&self.timeline.initial_frame());
    }

    /// Jumps to `time`, clamped into the timeline, and reports the step it
    /// lands in. Narration of that step starts only while playing.
    pub fn seek(&mut self, time: f64) {
        let time = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, self.timeline.duration())
        };
        let index = self.timeline.boundary_at(time);
        self.seek_to(time, index);
    }

    /// Moves the cursor to `time` inside the boundary at `index`.
    fn seek_to(&mut self, time: f64, index: Option<usize>) {
        debug!(time; "Seeking");

        self.cancel_narration();
        self.scheduler.seek(time);
        if self.state == TransportState::Stopped {
            self.set_state(TransportState::Paused);
        }

        self.current = None;
        self.spoken = None;
        if let Some(index) = index {
            self.enter(index);
        }
        self.render();
    }

    /// Seeks to the start of `step`. Returns false for an unknown step.
    pub fn seek_step(&mut self, step: u32) -> bool {
        match self.timeline.boundary_of_step(step) {
            Some(index) => {
                self.seek_boundary(index);
                true
            }
            None => false,
        }
    }

    /// Seeks to the start of the following step. Returns false at the last
    /// step.
    pub fn next_step(&mut self) -> bool {
        let next = self.current.map_or(0, |index| index + 1);
        if next >= self.timeline.boundaries().len() {
            return false;
        }
        self.seek_boundary(next);
        true
    }

    /// Seeks to the start of the preceding step, or of the first step.
    pub fn previous_step(&mut self) -> bool {
        if self.timeline.boundaries().is_empty() {
            return false;
        }
        let previous = self.current.map_or(0, |index| index.saturating_sub(1));
        self.seek_boundary(previous);
        true
    }

    /// Rescales the clock without moving the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`AnimflowError::Playback`] for a non-positive or non-finite
    /// factor.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), AnimflowError> {
        if !(speed > 0.0 && speed.is_finite()) {
            return Err(AnimflowError::Playback(format!(
                "speed must be a positive number, got {speed}"
            )));
        }
        self.scheduler.set_speed(speed);
        debug!(speed; "Playback speed changed");
        Ok(())
    }

    /// Advances playback by `elapsed` wall seconds.
    pub fn tick(&mut self, elapsed: f64) {
        let finished = self
            .narrator
            .as_mut()
            .and_then(|narrator| narrator.advance(elapsed));
        if let Some(token) = finished {
            self.on_narration_end(token);
        }

        if self.state != TransportState::Playing {
            return;
        }

        let now = self.scheduler.advance(elapsed);
        self.sync(now);
        self.events.push(PlaybackEvent::Progress {
            time: self.scheduler.current_time(),
            duration: self.timeline.duration(),
        });
        self.render();
    }

    /// Reports that the utterance `token` finished speaking.
    ///
    /// Tokens other than the pending one are ignored. Playback resumes only
    /// if it was auto-paused for this utterance.
    pub fn on_narration_end(&mut self, token: UtteranceToken) {
        if self.pending != Some(token) {
            debug!(token:%; "Ignoring stale narration completion");
            return;
        }
        self.pending = None;
        if !self.auto_paused {
            trace!(token:%; "Narration finished");
            return;
        }

        self.auto_paused = false;
        info!(token:%; "Narration finished, resuming");
        self.scheduler.play();
        self.set_state(TransportState::Playing);
        self.events.push(PlaybackEvent::Resumed);

        let now = self.scheduler.current_time();
        self.sync(now);
        self.render();
    }

    fn current_boundary(&self) -> Option<StepBoundary> {
        self.current
            .and_then(|index| self.timeline.boundaries().get(index))
            .copied()
    }

    /// Walks boundaries up to `now`, auto-pausing at the end of a step whose
    /// narration is still running.
    fn sync(&mut self, now: f64) {
        loop {
            if let Some(boundary) = self.current_boundary() {
                if self.pending.is_some() && now >= boundary.end() {
                    self.scheduler.seek(boundary.end());
                    self.scheduler.pause();
                    self.auto_paused = true;
                    self.set_state(TransportState::Paused);
                    self.events.push(PlaybackEvent::AutoPaused { step: boundary.step() });
                    info!(step = boundary.step(); "Waiting for narration");
                    return;
                }
            }

            let next = self.current.map_or(0, |index| index + 1);
            match self.timeline.boundaries().get(next) {
                Some(boundary) if now >= boundary.start() => self.enter(next),
                _ => break,
            }
        }

        if now >= self.timeline.duration() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        info!(looping = self.looping; "Playback finished");
        self.events.push(PlaybackEvent::Finished);
        if self.looping {
            self.rewind();
            self.scheduler.play();
            if let Some(index) = self.timeline.boundary_at(0.0) {
                self.enter(index);
            }
        } else {
            self.scheduler.pause();
            self.set_state(TransportState::Paused);
        }
    }

    fn seek_boundary(&mut self, index: usize) {
        if let Some(boundary) = self.timeline.boundaries().get(index).copied() {
            self.seek_to(boundary.start(), Some(index));
        }
    }

    /// Back to time 0 with narration cancelled.
    fn rewind(&mut self) {
        debug!("Restarting from the beginning");
        self.cancel_narration();
        self.scheduler.seek(0.0);
        self.current = None;
        self.spoken = None;
        self.render_frame(&self.timeline.initial_frame());
    }

    fn enter(&mut self, index: usize) {
        let Some(boundary) = self.timeline.boundaries().get(index).copied() else {
            return;
        };
        self.current = Some(index);
        debug!(step = boundary.step(), index; "Entered step");
        self.events.push(PlaybackEvent::StepChanged {
            step: boundary.step(),
            index,
        });
        if self.state == TransportState::Playing {
            self.speak(index);
        }
    }

    fn speak(&mut self, index: usize) {
        self.spoken = Some(index);
        self.pending = None;
        if !self.narration_enabled {
            return;
        }
        let Some(step) = self.timeline.boundaries().get(index).map(StepBoundary::step) else {
            return;
        };
        let (Some(text), Some(narrator)) = (self.captions.get(&step), self.narrator.as_mut()) else {
            return;
        };

        let token = self.last_token.next();
        self.last_token = token;
        match narrator.speak(token, text) {
            Ok(()) => {
                self.pending = Some(token);
                self.events.push(PlaybackEvent::NarrationStarted { step, token });
            }
            Err(err) => warn!(step, err:%; "Narration failed, continuing without it"),
        }
    }

    fn cancel_narration(&mut self) {
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.cancel();
        }
        self.pending = None;
        self.auto_paused = false;
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            info!(from = self.state.to_string(), to = state.to_string(); "Transport state changed");
            self.state = state;
            self.events.push(PlaybackEvent::StateChanged(state));
        }
    }

    fn render(&mut self) {
        if self.renderer.is_some() {
            let frame = self.frame();
            self.render_frame(&frame);
        }
    }

    fn render_frame(&mut self, frame: &Frame) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let viewport = match frame.camera() {
            Some(camera) => {
                let viewport = camera.viewport(&**renderer);
                if viewport.is_none() {
                    warn!(time = frame.time(); "No bounds for camera target, skipping camera");
                }
                viewport
            }
            None => None,
        };
        if let Err(err) = renderer.render(frame, viewport) {
            warn!(err:%; "Render failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::{
        playback::SimulatedNarrator,
        timeline::{CompileOptions, compile},
    };

    const SOURCE: &str = "flowchart LR
A[x]
B[y]
A-->B
@animation
step 1: show A
  duration: 1s
step 2: connect A->B
  speed: 2s
@end
@narration
step 1:
  text: \"0123456789\"
@end
";

    fn controller() -> PlaybackController {
        let diagram = animflow_parser::parse(SOURCE).unwrap().into_parts().0;
        let timeline = compile(&diagram, &CompileOptions::default());
        PlaybackController::new(&diagram, timeline)
    }

    #[test]
    fn test_transport_states() {
        let mut player = controller();
        assert_eq!(player.state(), TransportState::Stopped);

        player.play();
        assert_eq!(player.state(), TransportState::Playing);
        assert_eq!(player.current_step(), Some(1));

        player.tick(0.5);
        player.pause();
        assert_eq!(player.state(), TransportState::Paused);
        assert!(approx_eq!(f64, player.current_time(), 0.5));

        player.stop();
        assert_eq!(player.state(), TransportState::Stopped);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.current_step(), None);
    }

    #[test]
    fn test_plays_to_the_end() {
        let mut player = controller();
        player.play();
        for _ in 0..40 {
            player.tick(0.1);
        }
        let events = player.drain_events();
        assert!(events.contains(&PlaybackEvent::StepChanged { step: 2, index: 1 }));
        assert!(events.contains(&PlaybackEvent::Finished));
        assert_eq!(player.state(), TransportState::Paused);
        assert!(approx_eq!(f64, player.current_time(), 3.0));

        // Playing again restarts.
        player.play();
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.current_step(), Some(1));
    }

    #[test]
    fn test_seek_while_stopped_pauses() {
        let mut player = controller();
        player.seek(1.5);
        assert_eq!(player.state(), TransportState::Paused);
        assert_eq!(player.current_step(), Some(2));

        player.seek(99.0);
        assert!(approx_eq!(f64, player.current_time(), 3.0));
        player.seek(f64::NAN);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn test_set_speed_rejects_invalid_values() {
        let mut player = controller();
        assert!(player.set_speed(0.0).is_err());
        assert!(player.set_speed(f64::INFINITY).is_err());
        player.set_speed(2.0).unwrap();

        player.play();
        player.tick(0.25);
        assert!(approx_eq!(f64, player.current_time(), 0.5));
    }

    #[test]
    fn test_step_navigation() {
        let mut player = controller();
        assert!(player.next_step());
        assert_eq!(player.current_step(), Some(1));
        assert!(player.next_step());
        assert_eq!(player.current_step(), Some(2));
        assert!(!player.next_step());
        assert!(player.previous_step());
        assert_eq!(player.current_step(), Some(1));
        assert!(player.seek_step(2));
        assert!(approx_eq!(f64, player.current_time(), 1.0));
        assert!(!player.seek_step(9));
    }

    #[test]
    fn test_narration_disabled_never_waits() {
        let mut player = controller()
            .with_narrator(SimulatedNarrator::new(1.0))
            .with_narration(false);
        assert!(!player.narration_active());

        player.play();
        player.tick(1.5);
        assert!(!player.is_auto_paused());
        assert_eq!(player.current_step(), Some(2));
    }

    #[test]
    fn test_looping_restarts() {
        let mut player = controller().with_looping(true);
        player.play();
        player.tick(3.0);
        assert_eq!(player.state(), TransportState::Playing);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.current_step(), Some(1));
    }
}
