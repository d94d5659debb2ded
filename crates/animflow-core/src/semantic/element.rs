//! Structural diagram entities.
//!
//! - [`Node`] - A box on the canvas with a [`NodeShape`] and a label
//! - [`Edge`] - A connection between two nodes with an [`EdgeStyle`] and [`ArrowKind`]

use std::fmt;

use crate::{
    geometry::{Bounds, Point},
    identifier::Id,
    semantic::style::NodeStyle,
};

/// The six node shapes, each selected by its bracket pair in the source.
///
/// | shape | brackets |
/// |-------|----------|
/// | terminator | `([ ])` |
/// | rectangle | `[ ]` |
/// | diamond | `{ }` |
/// | parallelogram | `[/ /]` |
/// | database | `[( )]` |
/// | document | `[[ ]]` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    Terminator,
    Rectangle,
    Diamond,
    Parallelogram,
    Database,
    Document,
}

impl NodeShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terminator => "terminator",
            Self::Rectangle => "rectangle",
            Self::Diamond => "diamond",
            Self::Parallelogram => "parallelogram",
            Self::Database => "database",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A diagram node.
///
/// Nodes are created by the structural parser. Style overrides are attached
/// afterwards from the `@style` block, and bounds once a layout engine has run.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    shape: NodeShape,
    label: String,
    subtitle: Option<String>,
    style: NodeStyle,
    bounds: Option<Bounds>,
}

impl Node {
    pub fn new(id: Id, shape: NodeShape, label: impl Into<String>, subtitle: Option<String>) -> Self {
        Self {
            id,
            shape,
            label: label.into(),
            subtitle,
            style: NodeStyle::default(),
            bounds: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// Position and size assigned by the layout engine, if any.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Returns the node with `style` merged over its current overrides.
    pub fn with_style(mut self, style: &NodeStyle) -> Self {
        self.style.merge(style);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.id, self.shape, self.label)
    }
}

/// Stroke style of an edge, selected by its connector token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    /// `-->` and `---`
    #[default]
    Solid,
    /// `-.->`
    Dashed,
    /// `==>`
    Thick,
}

/// Whether an edge ends in an arrowhead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKind {
    #[default]
    Directed,
    /// `---` draws a plain link without an arrowhead.
    Undirected,
}

/// A connection between two nodes.
///
/// Parallel edges between the same pair get distinct ids so each stays
/// individually addressable (see [`Id::edge`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: Id,
    from: Id,
    to: Id,
    label: Option<String>,
    style: EdgeStyle,
    arrow: ArrowKind,
    points: Vec<Point>,
}

impl Edge {
    pub fn new(
        id: Id,
        from: Id,
        to: Id,
        label: Option<String>,
        style: EdgeStyle,
        arrow: ArrowKind,
    ) -> Self {
        Self {
            id,
            from,
            to,
            label,
            style,
            arrow,
            points: Vec::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    pub fn arrow(&self) -> ArrowKind {
        self.arrow
    }

    /// Polyline assigned by the layout engine; empty before layout.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns true if this edge joins `from` to `to`.
    ///
    /// Undirected edges also match the reversed pair.
    pub fn connects(&self, from: Id, to: Id) -> bool {
        (self.from == from && self.to == to)
            || (self.arrow == ArrowKind::Undirected && self.from == to && self.to == from)
    }

    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_edge_connects_both_ways() {
        let a = Id::new("a");
        let b = Id::new("b");

        let directed = Edge::new(Id::edge(a, b, 0), a, b, None, EdgeStyle::Solid, ArrowKind::Directed);
        assert!(directed.connects(a, b));
        assert!(!directed.connects(b, a));

        let link = Edge::new(Id::edge(a, b, 0), a, b, None, EdgeStyle::Solid, ArrowKind::Undirected);
        assert!(link.connects(a, b));
        assert!(link.connects(b, a));
    }

    #[test]
    fn test_node_display() {
        let node = Node::new(Id::new("db"), NodeShape::Database, "Users", None);
        assert_eq!(node.to_string(), "db (database: Users)");
    }
}
