//! The renderer seam.

use animflow_core::{geometry::Bounds, semantic::Layout};

use crate::{
    camera::{BoundsProvider, BoundsQuery},
    error::RenderError,
    timeline::Frame,
};

/// Draws frames and answers bounding-box queries for camera moves.
pub trait Renderer: BoundsProvider + Send {
    /// Draws `frame`. `viewport` is the camera's visible region, `None`
    /// while no camera move has run.
    fn render(&mut self, frame: &Frame, viewport: Option<Bounds>) -> Result<(), RenderError>;
}

/// Renderer without output. It answers bounds from a layout and keeps the
/// most recent frame, which is what headless playback and tests need.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    layout: Layout,
    frames: usize,
    last_frame: Option<Frame>,
    last_viewport: Option<Bounds>,
}

impl HeadlessRenderer {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn last_viewport(&self) -> Option<Bounds> {
        self.last_viewport
    }
}

impl BoundsProvider for HeadlessRenderer {
    fn bounding_box(&self, query: BoundsQuery<'_>) -> Option<Bounds> {
        self.layout.bounding_box(query)
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, frame: &Frame, viewport: Option<Bounds>) -> Result<(), RenderError> {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
        self.last_viewport = viewport;
        Ok(())
    }
}
