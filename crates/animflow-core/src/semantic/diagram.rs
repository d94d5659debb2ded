//! The root diagram type.
//!
//! - [`Direction`] - Flow direction declared by the header line
//! - [`Diagram`] - Nodes, edges, animation steps, narration and config of one document

use std::{fmt, str::FromStr};

use crate::{
    identifier::Id,
    semantic::{
        config::DiagramConfig,
        element::{Edge, Node},
        layout::Layout,
        narration::NarrationItem,
        step::AnimationStep,
    },
};

/// Layout direction of a flowchart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right (default)
    #[default]
    LR,
    /// Right to left
    RL,
    /// Top down
    TD,
    /// Bottom to top
    BT,
}

impl Direction {
    /// Returns true for the left-right directions.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// Returns true when ranks run against the axis (right to left or bottom to top).
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RL | Self::BT)
    }
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            // `TB` is the common alias of top-down
            "TD" | "TB" => Ok(Self::TD),
            "BT" => Ok(Self::BT),
            _ => Err("Unsupported flowchart direction"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LR => "LR",
            Self::RL => "RL",
            Self::TD => "TD",
            Self::BT => "BT",
        };
        f.write_str(s)
    }
}

/// A parsed Animflow document.
///
/// The diagram carries no generated id or timestamp, so parsing the same
/// source twice yields equal values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    direction: Direction,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    steps: Vec<AnimationStep>,
    narration: Vec<NarrationItem>,
    config: DiagramConfig,
}

impl Diagram {
    pub fn new(direction: Direction, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            direction,
            nodes,
            edges,
            ..Self::default()
        }
    }

    pub fn with_steps(mut self, steps: Vec<AnimationStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_narration(mut self, narration: Vec<NarrationItem>) -> Self {
        self.narration = narration;
        self
    }

    pub fn with_config(mut self, config: DiagramConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a copy of this diagram with node bounds and edge polylines
    /// taken from `layout`. Entities the layout does not cover keep their
    /// current geometry.
    pub fn with_layout(&self, layout: &Layout) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|node| match layout.node(node.id()) {
                Some(bounds) => node.clone().with_bounds(bounds),
                None => node.clone(),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| match layout.edge(edge.id()) {
                Some(points) => edge.clone().with_points(points.to_vec()),
                None => edge.clone(),
            })
            .collect();
        Self {
            nodes,
            edges,
            ..self.clone()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    pub fn narration(&self) -> &[NarrationItem] {
        &self.narration
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn edge(&self, id: Id) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id() == id)
    }

    /// Returns true if `id` names a node or an edge.
    pub fn contains(&self, id: Id) -> bool {
        self.node(id).is_some() || self.edge(id).is_some()
    }

    /// First narration entry for a step number.
    pub fn narration_for(&self, step: u32) -> Option<&NarrationItem> {
        self.narration.iter().find(|item| item.step() == step)
    }
}
