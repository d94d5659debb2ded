//! Visual state of every entity at one instant.

use std::f32::consts::PI;

use indexmap::IndexMap;

use animflow_core::{
    color::Color,
    geometry::Point,
    identifier::Id,
    semantic::{EntranceEffect, ExitEffect},
};

use crate::{
    camera::CameraState,
    timeline::{OpKind, ScheduledOp},
};

/// Peak extra scale of a pulse.
const PULSE_AMPLITUDE: f32 = 0.1;

/// An entrance or exit motion that is still running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Enter(EntranceEffect, f32),
    Exit(ExitEffect, f32),
}

/// Render directives for one node or edge.
///
/// Nodes ignore `draw` and `label_opacity`. For an edge, `fill` is its
/// stroke color.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub fill: Option<Color>,
    pub glow: f32,
    pub scale: f32,
    /// Temporary extra scale of a running pulse.
    pub pulse: f32,
    pub offset: Point,
    /// Rotation in degrees.
    pub rotation: f32,
    pub motion: Option<Motion>,
    /// Drawn fraction of an edge path.
    pub draw: f32,
    pub label_opacity: f32,
}

impl VisualState {
    pub fn node(visible: bool, fill: Color) -> Self {
        Self {
            opacity: if visible { 1.0 } else { 0.0 },
            fill: Some(fill),
            ..Self::hidden()
        }
    }

    /// Edges start hidden and undrawn.
    pub fn edge(stroke: Color) -> Self {
        Self {
            fill: Some(stroke),
            ..Self::hidden()
        }
    }

    fn hidden() -> Self {
        Self {
            opacity: 0.0,
            fill: None,
            glow: 0.0,
            scale: 1.0,
            pulse: 0.0,
            offset: Point::default(),
            rotation: 0.0,
            motion: None,
            draw: 0.0,
            label_opacity: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Scale including any running pulse.
    pub fn effective_scale(&self) -> f32 {
        self.scale * (1.0 + self.pulse)
    }

    /// Applies `kind` at eased `progress`. Each tween starts from the value
    /// the state holds when the operation begins.
    pub(crate) fn apply(&mut self, kind: &OpKind, progress: f32) {
        let running = progress > 0.0 && progress < 1.0;
        match kind {
            OpKind::Enter { effect, .. } => {
                self.opacity = lerp(self.opacity, 1.0, progress);
                self.motion = running.then_some(Motion::Enter(*effect, progress));
            }
            OpKind::Exit { effect, .. } => {
                self.opacity = lerp(self.opacity, 0.0, progress);
                self.motion = running.then_some(Motion::Exit(*effect, progress));
            }
            OpKind::Recolor { color, .. } => {
                self.fill = Some(self.fill.unwrap_or(*color).mix(*color, progress));
            }
            OpKind::Glow { .. } => self.glow = lerp(self.glow, 1.0, progress),
            OpKind::Pulse { .. } => {
                self.pulse = if running {
                    PULSE_AMPLITUDE * (PI * progress).sin()
                } else {
                    0.0
                };
            }
            OpKind::Restore { color, .. } => {
                if let Some(color) = color {
                    self.fill = Some(self.fill.unwrap_or(*color).mix(*color, progress));
                }
                self.glow = lerp(self.glow, 0.0, progress);
                self.scale = lerp(self.scale, 1.0, progress);
                self.pulse = 0.0;
            }
            OpKind::Draw { .. } => {
                if progress > 0.0 {
                    self.opacity = 1.0;
                }
                self.draw = lerp(self.draw, 1.0, progress);
            }
            OpKind::RevealLabel { .. } => self.label_opacity = lerp(self.label_opacity, 1.0, progress),
            OpKind::Move { offset, relative, .. } => {
                let target = if *relative {
                    self.offset.add_point(*offset)
                } else {
                    *offset
                };
                self.offset = if progress >= 1.0 {
                    target
                } else {
                    self.offset.lerp(target, progress)
                };
            }
            OpKind::Transform { scale, rotate, .. } => {
                if let Some(scale) = scale {
                    self.scale = lerp(self.scale, *scale, progress);
                }
                if let Some(rotate) = rotate {
                    self.rotation = lerp(self.rotation, *rotate, progress);
                }
            }
            OpKind::StepMarker { .. } | OpKind::Camera(_) => {}
        }
    }
}

/// Interpolation that lands exactly on `to` once complete.
fn lerp(from: f32, to: f32, progress: f32) -> f32 {
    if progress >= 1.0 {
        to
    } else {
        from + (to - from) * progress
    }
}

/// Everything a renderer needs to draw one instant of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    time: f64,
    step: Option<u32>,
    states: IndexMap<Id, VisualState>,
    camera: Option<CameraState>,
}

impl Frame {
    pub(crate) fn new(time: f64, states: IndexMap<Id, VisualState>) -> Self {
        Self {
            time,
            step: None,
            states,
            camera: None,
        }
    }

    /// Folds every operation that has started by `time` over the initial
    /// states. `ops` must be sorted by start time.
    pub(crate) fn sample(time: f64, initial: &IndexMap<Id, VisualState>, ops: &[ScheduledOp]) -> Self {
        let mut frame = Self::new(time, initial.clone());
        for op in ops.iter().take_while(|op| op.start() <= time) {
            let progress = op.progress(time) as f32;
            match op.kind() {
                OpKind::StepMarker { step } => frame.step = Some(*step),
                OpKind::Camera(camera) => {
                    let previous = frame.camera.take().map(|state| state.current().clone());
                    frame.camera = Some(CameraState::new(camera.clone(), previous, progress));
                }
                kind => {
                    if let Some(state) = kind.target().and_then(|id| frame.states.get_mut(&id)) {
                        state.apply(kind, progress);
                    }
                }
            }
        }
        frame
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// The step whose group the frame falls into.
    pub fn step(&self) -> Option<u32> {
        self.step
    }

    pub fn state(&self, id: Id) -> Option<&VisualState> {
        self.states.get(&id)
    }

    pub fn states(&self) -> impl Iterator<Item = (Id, &VisualState)> {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::timeline::Ease;

    fn red() -> Color {
        Color::new("red").unwrap()
    }

    #[test]
    fn test_enter_tween() {
        let mut state = VisualState::node(false, red());
        let kind = OpKind::Enter {
            target: Id::new("a"),
            effect: EntranceEffect::ScaleIn,
        };

        state.apply(&kind, 0.5);
        assert_eq!(state.opacity, 0.5);
        assert_eq!(state.motion, Some(Motion::Enter(EntranceEffect::ScaleIn, 0.5)));

        state.apply(&kind, 1.0);
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.motion, None);
    }

    #[test]
    fn test_pulse_settles() {
        let mut state = VisualState::node(true, red());
        let kind = OpKind::Pulse { target: Id::new("a") };

        state.apply(&kind, 0.5);
        assert!(approx_eq!(f32, state.effective_scale(), 1.1, epsilon = 1e-6));
        state.apply(&kind, 1.0);
        assert_eq!(state.effective_scale(), 1.0);
    }

    #[test]
    fn test_relative_moves_accumulate() {
        let mut state = VisualState::node(true, red());
        let by = OpKind::Move {
            target: Id::new("a"),
            offset: Point::new(10.0, 0.0),
            relative: true,
        };
        state.apply(&by, 1.0);
        state.apply(&by, 1.0);
        assert_eq!(state.offset, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_sample_uses_start_order() {
        let a = Id::new("a");
        let mut initial = IndexMap::new();
        initial.insert(a, VisualState::node(false, red()));
        let ops = vec![
            ScheduledOp::new(OpKind::StepMarker { step: 1 }, 0.0, 0.0, Ease::Linear),
            ScheduledOp::new(
                OpKind::Enter {
                    target: a,
                    effect: EntranceEffect::FadeIn,
                },
                0.0,
                1.0,
                Ease::Linear,
            ),
            ScheduledOp::new(OpKind::StepMarker { step: 2 }, 1.0, 0.0, Ease::Linear),
        ];

        let frame = Frame::sample(0.25, &initial, &ops);
        assert_eq!(frame.step(), Some(1));
        assert_eq!(frame.state(a).unwrap().opacity, 0.25);

        let frame = Frame::sample(1.0, &initial, &ops);
        assert_eq!(frame.step(), Some(2));
        assert!(frame.state(a).unwrap().is_visible());
    }
}
