//! Primitive operations of a compiled timeline.

use std::fmt;

use animflow_core::{
    color::Color,
    geometry::Point,
    identifier::Id,
    semantic::{EntranceEffect, ExitEffect, FlowEffect},
};

use crate::{camera::CameraMove, timeline::Ease};

/// What an operation does to its target.
#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    /// Zero-length marker at the start of a step group.
    StepMarker { step: u32 },
    /// Fades a node in with an entrance motion.
    Enter { target: Id, effect: EntranceEffect },
    /// Fades a node or edge out with an exit motion.
    Exit { target: Id, effect: ExitEffect },
    /// Blends the fill towards `color`.
    Recolor { target: Id, color: Color },
    Glow { target: Id },
    /// Briefly swells the node and settles back.
    Pulse { target: Id },
    /// Undoes a highlight: fill back to `color` when one was recorded,
    /// glow off, scale back to 1.
    Restore { target: Id, color: Option<Color> },
    /// Draws an edge along its path.
    Draw { edge: Id, flow: FlowEffect },
    RevealLabel { edge: Id },
    Camera(CameraMove),
    /// Translates by `offset` (relative) or to `offset` from the layout
    /// position (absolute).
    Move { target: Id, offset: Point, relative: bool },
    Transform {
        target: Id,
        scale: Option<f32>,
        rotate: Option<f32>,
    },
}

impl OpKind {
    /// The entity this operation changes, if any.
    pub fn target(&self) -> Option<Id> {
        match *self {
            Self::Enter { target, .. }
            | Self::Exit { target, .. }
            | Self::Recolor { target, .. }
            | Self::Glow { target }
            | Self::Pulse { target }
            | Self::Restore { target, .. }
            | Self::Move { target, .. }
            | Self::Transform { target, .. } => Some(target),
            Self::Draw { edge, .. } | Self::RevealLabel { edge } => Some(edge),
            Self::StepMarker { .. } | Self::Camera(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StepMarker { .. } => "step",
            Self::Enter { .. } => "enter",
            Self::Exit { .. } => "exit",
            Self::Recolor { .. } => "recolor",
            Self::Glow { .. } => "glow",
            Self::Pulse { .. } => "pulse",
            Self::Restore { .. } => "restore",
            Self::Draw { .. } => "draw",
            Self::RevealLabel { .. } => "reveal-label",
            Self::Camera(_) => "camera",
            Self::Move { .. } => "move",
            Self::Transform { .. } => "transform",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepMarker { step } => write!(f, "step {step}"),
            Self::Enter { target, effect } => write!(f, "enter {target} ({effect})"),
            Self::Exit { target, effect } => write!(f, "exit {target} ({effect})"),
            Self::Recolor { target, color } => write!(f, "recolor {target} -> {color}"),
            Self::Draw { edge, flow } => write!(f, "draw {edge} ({flow})"),
            Self::Camera(camera) => write!(f, "camera {:?}", camera.mode()),
            other => match other.target() {
                Some(target) => write!(f, "{} {target}", other.name()),
                None => f.write_str(other.name()),
            },
        }
    }
}

/// An operation placed on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledOp {
    kind: OpKind,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl ScheduledOp {
    pub fn new(kind: OpKind, start: f64, duration: f64, ease: Ease) -> Self {
        Self {
            kind,
            start,
            duration: duration.max(0.0),
            ease,
        }
    }

    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Eased progress at `time`: 0 before the start, 1 from the end on.
    /// Zero-length operations jump to 1 at their start.
    pub fn progress(&self, time: f64) -> f64 {
        if time < self.start {
            0.0
        } else if time >= self.end() {
            1.0
        } else {
            self.ease.apply((time - self.start) / self.duration)
        }
    }
}

impl fmt::Display for ScheduledOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>7.3}s +{:.3}s  {}", self.start, self.duration, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let op = ScheduledOp::new(
            OpKind::Glow { target: Id::new("a") },
            1.0,
            2.0,
            Ease::Linear,
        );
        assert_eq!(op.end(), 3.0);
        assert_eq!(op.progress(0.5), 0.0);
        assert_eq!(op.progress(2.0), 0.5);
        assert_eq!(op.progress(3.0), 1.0);
    }

    #[test]
    fn test_zero_length() {
        let op = ScheduledOp::new(OpKind::StepMarker { step: 1 }, 1.0, 0.0, Ease::Linear);
        assert_eq!(op.progress(0.99), 0.0);
        assert_eq!(op.progress(1.0), 1.0);
        assert_eq!(op.kind().target(), None);
    }

    #[test]
    fn test_display() {
        let op = ScheduledOp::new(
            OpKind::Enter {
                target: Id::new("api"),
                effect: EntranceEffect::SlideInLeft,
            },
            0.5,
            1.0,
            Ease::default(),
        );
        assert_eq!(op.to_string(), "  0.500s +1.000s  enter api (slideInLeft)");
    }
}
