//! Positions produced by a layout engine.

use indexmap::IndexMap;

use crate::{
    geometry::{Bounds, Point},
    identifier::Id,
};

/// Node boxes and edge polylines keyed by entity id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    nodes: IndexMap<Id, Bounds>,
    edges: IndexMap<Id, Vec<Point>>,
}

impl Layout {
    pub fn new(nodes: IndexMap<Id, Bounds>, edges: IndexMap<Id, Vec<Point>>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: Id) -> Option<Bounds> {
        self.nodes.get(&id).copied()
    }

    pub fn edge(&self, id: Id) -> Option<&[Point]> {
        self.edges.get(&id).map(Vec::as_slice)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (Id, Bounds)> + '_ {
        self.nodes.iter().map(|(id, bounds)| (*id, *bounds))
    }

    /// Smallest box containing every node, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes.values().copied().reduce(|acc, b| acc.merge(&b))
    }
}
