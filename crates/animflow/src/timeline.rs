//! Compiled timelines.
//!
//! A [`CompiledTimeline`] is the single continuous program produced from a
//! diagram's steps: primitive operations with absolute start times, the
//! step boundary table used for seeking, and the initial visual state of
//! every entity.

mod compiler;
mod ease;
mod frame;
mod op;

pub use compiler::{CompileOptions, compile};
pub use ease::Ease;
pub use frame::{Frame, Motion, VisualState};
pub use op::{OpKind, ScheduledOp};

use indexmap::IndexMap;

use animflow_core::{color::Color, identifier::Id};

use crate::scheduler::Scheduler;

/// The time interval one step group occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBoundary {
    step: u32,
    start: f64,
    end: f64,
}

impl StepBoundary {
    pub fn new(step: u32, start: f64, end: f64) -> Self {
        Self { step, start, end }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Operations, boundaries and initial state of one compiled diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTimeline {
    ops: Vec<ScheduledOp>,
    boundaries: Vec<StepBoundary>,
    initial: IndexMap<Id, VisualState>,
    original_colors: IndexMap<Id, Color>,
    duration: f64,
}

impl CompiledTimeline {
    pub(crate) fn new(
        ops: Vec<ScheduledOp>,
        boundaries: Vec<StepBoundary>,
        initial: IndexMap<Id, VisualState>,
        original_colors: IndexMap<Id, Color>,
    ) -> Self {
        let duration = boundaries.last().map_or(0.0, StepBoundary::end);
        Self {
            ops,
            boundaries,
            initial,
            original_colors,
            duration,
        }
    }

    /// Operations sorted by start time.
    pub fn ops(&self) -> &[ScheduledOp] {
        &self.ops
    }

    /// One boundary per distinct step number, in play order.
    pub fn boundaries(&self) -> &[StepBoundary] {
        &self.boundaries
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn initial_state(&self, id: Id) -> Option<&VisualState> {
        self.initial.get(&id)
    }

    /// Color a node had before its first highlight.
    pub fn original_color(&self, id: Id) -> Option<Color> {
        self.original_colors.get(&id).copied()
    }

    /// The state before any operation runs.
    pub fn initial_frame(&self) -> Frame {
        Frame::new(0.0, self.initial.clone())
    }

    /// The frame at `time`, clamped into `[0, duration]`.
    pub fn sample(&self, time: f64) -> Frame {
        Frame::sample(time.clamp(0.0, self.duration), &self.initial, &self.ops)
    }

    /// Index of the boundary that `time` falls into.
    ///
    /// Boundaries are half-open `[start, end)`, so the exact start of a step
    /// belongs to that step; the end of the timeline belongs to the last
    /// step. When several groups start at `time`, the first one wins, so a
    /// zero-length group is entered before the step that follows it.
    pub fn boundary_at(&self, time: f64) -> Option<usize> {
        if self.boundaries.is_empty() {
            return None;
        }
        let time = time.clamp(0.0, self.duration);
        let last = self.boundaries.partition_point(|b| b.start <= time).saturating_sub(1);
        let shared = self.boundaries[..last]
            .iter()
            .rev()
            .take_while(|b| b.start == time)
            .count();
        Some(last - shared)
    }

    /// Index of the first boundary of a step number.
    pub fn boundary_of_step(&self, step: u32) -> Option<usize> {
        self.boundaries.iter().position(|b| b.step == step)
    }

    /// Hands every operation to `scheduler`, replacing what it held.
    pub fn install(&self, scheduler: &mut dyn Scheduler) {
        scheduler.clear();
        for op in &self.ops {
            scheduler.schedule(op.kind().clone(), op.start(), op.duration(), op.ease());
        }
    }
}
