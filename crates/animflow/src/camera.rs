//! Camera moves and viewport math.
//!
//! A camera operation names what to frame; the viewport itself depends on
//! where the renderer put things, so it is resolved at render time through
//! a [`BoundsProvider`].

use animflow_core::{
    geometry::{Bounds, Insets, Point},
    identifier::Id,
    semantic::{DEFAULT_CAMERA_PADDING, DEFAULT_CAMERA_ZOOM, Layout},
};

/// What a camera operation frames.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraMode {
    /// Every entity of the diagram.
    FitAll,
    /// The union of the named entities.
    FitNodes(Vec<Id>),
    /// One entity, magnified.
    Focus(Id),
}

/// A camera operation's target with its framing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraMove {
    mode: CameraMode,
    padding: f32,
    zoom: f32,
}

impl CameraMove {
    pub fn new(mode: CameraMode, padding: f32, zoom: f32) -> Self {
        Self { mode, padding, zoom }
    }

    pub fn mode(&self) -> &CameraMode {
        &self.mode
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Viewport this move ends on, or `None` when the provider cannot place
    /// its target.
    pub fn target_viewport(&self, provider: &dyn BoundsProvider) -> Option<Bounds> {
        let padding = Insets::uniform(self.padding);
        match &self.mode {
            CameraMode::FitAll => provider
                .bounding_box(BoundsQuery::All)
                .map(|b| b.add_padding(padding)),
            CameraMode::FitNodes(ids) => provider
                .bounding_box(BoundsQuery::Entities(ids))
                .map(|b| b.add_padding(padding)),
            CameraMode::Focus(id) => {
                let target = provider.bounding_box(BoundsQuery::Entities(std::slice::from_ref(id)))?;
                let scene = provider
                    .bounding_box(BoundsQuery::All)
                    .map_or(target, |all| all.add_padding(padding));
                Some(scene.translate(target.center().sub_point(scene.center())).zoom(self.zoom))
            }
        }
    }
}

impl Default for CameraMove {
    fn default() -> Self {
        Self::new(CameraMode::FitAll, DEFAULT_CAMERA_PADDING, DEFAULT_CAMERA_ZOOM)
    }
}

/// The camera as of one instant: the move in progress and the one before it.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    current: CameraMove,
    previous: Option<CameraMove>,
    progress: f32,
}

impl CameraState {
    pub fn new(current: CameraMove, previous: Option<CameraMove>, progress: f32) -> Self {
        Self {
            current,
            previous,
            progress,
        }
    }

    pub fn current(&self) -> &CameraMove {
        &self.current
    }

    pub fn previous(&self) -> Option<&CameraMove> {
        self.previous.as_ref()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Interpolated viewport. The starting viewport is the previous move's
    /// target, or the whole scene for the first move.
    pub fn viewport(&self, provider: &dyn BoundsProvider) -> Option<Bounds> {
        let target = self.current.target_viewport(provider)?;
        let start = self
            .previous
            .as_ref()
            .unwrap_or(&CameraMove::default())
            .target_viewport(provider)
            .unwrap_or(target);
        Some(start.lerp(&target, self.progress.clamp(0.0, 1.0)))
    }
}

/// Entities whose bounding box is requested.
#[derive(Debug, Clone, Copy)]
pub enum BoundsQuery<'a> {
    All,
    Entities(&'a [Id]),
}

/// Source of entity bounding boxes, typically the renderer.
pub trait BoundsProvider {
    /// Smallest box around the queried entities, or `None` when none of them
    /// is placed.
    fn bounding_box(&self, query: BoundsQuery<'_>) -> Option<Bounds>;
}

impl BoundsProvider for Layout {
    fn bounding_box(&self, query: BoundsQuery<'_>) -> Option<Bounds> {
        match query {
            BoundsQuery::All => self.bounds(),
            BoundsQuery::Entities(ids) => ids
                .iter()
                .filter_map(|id| self.node(*id).or_else(|| self.edge(*id).and_then(points_bounds)))
                .reduce(|acc, b| acc.merge(&b)),
        }
    }
}

fn points_bounds(points: &[Point]) -> Option<Bounds> {
    points
        .iter()
        .map(|p| Bounds::new_from_top_left(*p, Default::default()))
        .reduce(|acc, b| acc.merge(&b))
}

#[cfg(test)]
mod tests {
    use animflow_core::geometry::Size;
    use float_cmp::approx_eq;
    use indexmap::IndexMap;

    use super::*;

    fn layout() -> Layout {
        let mut nodes = IndexMap::new();
        nodes.insert(
            Id::new("a"),
            Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0)),
        );
        nodes.insert(
            Id::new("b"),
            Bounds::new_from_top_left(Point::new(300.0, 150.0), Size::new(100.0, 50.0)),
        );
        let mut edges = IndexMap::new();
        edges.insert(
            Id::new("a_to_b"),
            vec![Point::new(50.0, 25.0), Point::new(350.0, 175.0)],
        );
        Layout::new(nodes, edges)
    }

    #[test]
    fn test_fit_all_adds_padding() {
        let viewport = CameraMove::new(CameraMode::FitAll, 10.0, 2.0)
            .target_viewport(&layout())
            .unwrap();
        assert_eq!(viewport.min_x(), -10.0);
        assert_eq!(viewport.max_y(), 210.0);
    }

    #[test]
    fn test_fit_nodes_includes_edges() {
        let viewport = CameraMove::new(CameraMode::FitNodes(vec![Id::new("a_to_b")]), 0.0, 1.0)
            .target_viewport(&layout())
            .unwrap();
        assert_eq!(viewport.min_x(), 50.0);
        assert_eq!(viewport.width(), 300.0);
    }

    #[test]
    fn test_focus_centers_on_target() {
        let viewport = CameraMove::new(CameraMode::Focus(Id::new("b")), 0.0, 2.0)
            .target_viewport(&layout())
            .unwrap();
        let center = viewport.center();
        assert!(approx_eq!(f32, center.x(), 350.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, center.y(), 175.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, viewport.width(), 200.0, epsilon = 1e-3));
    }

    #[test]
    fn test_unknown_target_has_no_viewport() {
        let camera = CameraMove::new(CameraMode::Focus(Id::new("ghost")), 0.0, 2.0);
        assert!(camera.target_viewport(&layout()).is_none());
    }

    #[test]
    fn test_state_interpolates_from_previous() {
        let layout = layout();
        let previous = CameraMove::new(CameraMode::FitNodes(vec![Id::new("a")]), 0.0, 1.0);
        let current = CameraMove::new(CameraMode::FitNodes(vec![Id::new("b")]), 0.0, 1.0);

        let state = CameraState::new(current, Some(previous), 0.5);
        let viewport = state.viewport(&layout).unwrap();
        assert_eq!(viewport.min_x(), 150.0);
        assert_eq!(viewport.min_y(), 75.0);
    }
}
