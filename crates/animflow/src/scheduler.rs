//! The scheduler seam between a compiled timeline and whatever drives it.
//!
//! A [`Scheduler`] owns the clock: it accepts operations at absolute
//! offsets and advances, pauses, seeks and rescales time. The playback
//! controller talks only to this trait, so a host can swap in its own tween
//! runtime. [`TimelineClock`] is the built-in simulated clock.

use log::trace;

use crate::timeline::{Ease, OpKind, ScheduledOp};

/// Minimal capability set of a timeline runtime.
pub trait Scheduler {
    /// Places an operation at `start` seconds for `duration` seconds.
    fn schedule(&mut self, op: OpKind, start: f64, duration: f64, ease: Ease);

    /// Drops every scheduled operation and rewinds to 0.
    fn clear(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    /// Moves the clock to `time`, clamped into `[0, duration]`.
    fn seek(&mut self, time: f64);

    /// Rescales how fast time advances. Non-positive factors are ignored.
    fn set_speed(&mut self, speed: f64);

    /// Advances the clock by `elapsed` wall seconds if playing, scaled by the
    /// speed and stopping at the end. Returns the new time.
    fn advance(&mut self, elapsed: f64) -> f64;

    fn current_time(&self) -> f64;

    /// End of the last scheduled operation.
    fn duration(&self) -> f64;

    fn speed(&self) -> f64;

    fn is_playing(&self) -> bool;
}

/// Simulated clock that keeps the scheduled operations and a cursor.
#[derive(Debug, Clone)]
pub struct TimelineClock {
    ops: Vec<ScheduledOp>,
    time: f64,
    speed: f64,
    playing: bool,
    duration: f64,
}

impl Default for TimelineClock {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            time: 0.0,
            speed: 1.0,
            playing: false,
            duration: 0.0,
        }
    }
}

impl TimelineClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[ScheduledOp] {
        &self.ops
    }
}

impl Scheduler for TimelineClock {
    fn schedule(&mut self, op: OpKind, start: f64, duration: f64, ease: Ease) {
        let op = ScheduledOp::new(op, start, duration, ease);
        self.duration = self.duration.max(op.end());
        self.ops.push(op);
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.time = 0.0;
        self.duration = 0.0;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration);
    }

    fn set_speed(&mut self, speed: f64) {
        if speed > 0.0 && speed.is_finite() {
            self.speed = speed;
        }
    }

    fn advance(&mut self, elapsed: f64) -> f64 {
        if self.playing && elapsed > 0.0 {
            self.time = (self.time + elapsed * self.speed).min(self.duration);
            trace!(time = self.time; "Clock advanced");
        }
        self.time
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
