//! Layout oracle.
//!
//! Positions are an input to playback, not something the timeline decides.
//! [`LayoutEngine`] is the seam; [`LayeredLayout`] is a small deterministic
//! engine for hosts and tools without a layout of their own.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use log::debug;
use petgraph::{
    Direction as GraphDirection,
    graph::{DiGraph, NodeIndex},
};

use animflow_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::{Direction, Edge, Layout, Node},
};

use crate::{config::LayoutConfig, error::AnimflowError};

/// Turns nodes, edges and a direction into positions.
pub trait LayoutEngine {
    /// # Errors
    ///
    /// Returns [`AnimflowError::Layout`] when the engine cannot place the
    /// diagram.
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Result<Layout, AnimflowError>;
}

/// Ranks nodes by breadth-first discovery from the roots and lines ranks up
/// along the diagram direction.
#[derive(Debug, Clone)]
pub struct LayeredLayout {
    node_spacing: f32,
    rank_spacing: f32,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl LayeredLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            node_spacing: config.node_spacing(),
            rank_spacing: config.rank_spacing(),
        }
    }

    /// Box size estimated from the label: 8 units per character and 24 per
    /// text line, with a floor of 120x60.
    pub fn node_size(node: &Node) -> Size {
        let lines: Vec<&str> = std::iter::once(node.label())
            .chain(node.subtitle().into_iter().flat_map(str::lines))
            .collect();
        let chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            (chars as f32 * 8.0 + 40.0).max(120.0),
            (lines.len() as f32 * 24.0 + 30.0).max(60.0),
        )
    }

    /// Assigns ranks. Roots (no incoming edges) start at rank 0; nodes that
    /// no root reaches, as in a pure cycle, seed their own search.
    fn ranks(graph: &DiGraph<Id, ()>) -> Vec<Vec<NodeIndex>> {
        let mut ranks: Vec<Vec<NodeIndex>> = Vec::new();
        let mut visited = HashSet::new();

        let roots: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&idx| graph.neighbors_directed(idx, GraphDirection::Incoming).count() == 0)
            .collect();
        let seeds = roots.into_iter().chain(graph.node_indices());

        for seed in seeds {
            if visited.contains(&seed) {
                continue;
            }
            let mut queue = VecDeque::from([(seed, 0)]);
            while let Some((idx, rank)) = queue.pop_front() {
                if !visited.insert(idx) {
                    continue;
                }
                if ranks.len() <= rank {
                    ranks.resize_with(rank + 1, Vec::new);
                }
                ranks[rank].push(idx);

                let mut children: Vec<NodeIndex> = graph.neighbors(idx).collect();
                // petgraph yields neighbours newest first.
                children.reverse();
                for child in children {
                    queue.push_back((child, rank + 1));
                }
            }
        }

        ranks
    }
}

impl LayoutEngine for LayeredLayout {
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Result<Layout, AnimflowError> {
        let mut graph = DiGraph::<Id, ()>::new();
        let mut indices = HashMap::new();
        let mut sizes = HashMap::new();
        for node in nodes {
            let idx = graph.add_node(node.id());
            indices.insert(node.id(), idx);
            sizes.insert(idx, Self::node_size(node));
        }
        for edge in edges {
            match (indices.get(&edge.from()), indices.get(&edge.to())) {
                (Some(&from), Some(&to)) => {
                    graph.add_edge(from, to, ());
                }
                _ => {
                    return Err(AnimflowError::Layout(format!(
                        "edge `{}` references an unknown node",
                        edge.id()
                    )));
                }
            }
        }

        let ranks = Self::ranks(&graph);
        debug!(ranks = ranks.len(), nodes = nodes.len(); "Ranked nodes");

        let horizontal = direction.is_horizontal();
        let main = |size: Size| if horizontal { size.width() } else { size.height() };
        let cross = |size: Size| if horizontal { size.height() } else { size.width() };
        let size_of = |idx: &NodeIndex| sizes.get(idx).copied().unwrap_or_default();

        let mut centers = HashMap::new();
        let mut rank_start = 0.0;
        for rank in &ranks {
            let depth = rank.iter().map(|idx| main(size_of(idx))).fold(0.0, f32::max);
            let breadth: f32 = rank.iter().map(|idx| cross(size_of(idx))).sum::<f32>()
                + self.node_spacing * rank.len().saturating_sub(1) as f32;

            let mut offset = -breadth / 2.0;
            for idx in rank {
                let extent = cross(size_of(idx));
                let along = rank_start + depth / 2.0;
                let across = offset + extent / 2.0;
                let along = if direction.is_reversed() { -along } else { along };
                let center = if horizontal {
                    Point::new(along, across)
                } else {
                    Point::new(across, along)
                };
                centers.insert(*idx, center);
                offset += extent + self.node_spacing;
            }
            rank_start += depth + self.rank_spacing;
        }

        let node_bounds: IndexMap<Id, Bounds> = nodes
            .iter()
            .filter_map(|node| {
                let idx = indices.get(&node.id())?;
                let center = centers.get(idx)?;
                Some((node.id(), Bounds::new_from_center(*center, size_of(idx))))
            })
            .collect();

        // Shift everything so the diagram starts at the origin.
        let origin = node_bounds
            .values()
            .copied()
            .reduce(|acc, b| acc.merge(&b))
            .map_or(Point::default(), |b| Point::new(-b.min_x(), -b.min_y()));
        let node_bounds: IndexMap<Id, Bounds> = node_bounds
            .into_iter()
            .map(|(id, bounds)| (id, bounds.translate(origin)))
            .collect();

        let edge_points = edges
            .iter()
            .filter_map(|edge| {
                let from = node_bounds.get(&edge.from())?.center();
                let to = node_bounds.get(&edge.to())?.center();
                Some((edge.id(), vec![from, to]))
            })
            .collect();

        Ok(Layout::new(node_bounds, edge_points))
    }
}

#[cfg(test)]
mod tests {
    use animflow_core::semantic::{ArrowKind, EdgeStyle, NodeShape};

    use super::*;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter()
            .map(|id| Node::new(Id::new(id), NodeShape::Rectangle, *id, None))
            .collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs
            .iter()
            .map(|(from, to)| {
                let (from, to) = (Id::new(from), Id::new(to));
                Edge::new(Id::edge(from, to, 0), from, to, None, EdgeStyle::Solid, ArrowKind::Directed)
            })
            .collect()
    }

    #[test]
    fn test_left_to_right_ranks() {
        let layout = LayeredLayout::default()
            .layout(
                &nodes(&["a", "b", "c"]),
                &edges(&[("a", "b"), ("b", "c")]),
                Direction::LR,
            )
            .unwrap();

        let xs: Vec<f32> = ["a", "b", "c"]
            .iter()
            .map(|id| layout.node(Id::new(id)).unwrap().center().x())
            .collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert_eq!(layout.bounds().unwrap().min_x(), 0.0);
        assert_eq!(layout.edge(Id::new("a_to_b")).unwrap().len(), 2);
    }

    #[test]
    fn test_bottom_to_top_reverses() {
        let layout = LayeredLayout::default()
            .layout(&nodes(&["a", "b"]), &edges(&[("a", "b")]), Direction::BT)
            .unwrap();

        let a = layout.node(Id::new("a")).unwrap().center();
        let b = layout.node(Id::new("b")).unwrap().center();
        assert!(b.y() < a.y());
        assert_eq!(a.x(), b.x());
    }

    #[test]
    fn test_cycles_and_isolated_nodes_are_placed() {
        let layout = LayeredLayout::default()
            .layout(
                &nodes(&["a", "b", "lonely"]),
                &edges(&[("a", "b"), ("b", "a")]),
                Direction::TD,
            )
            .unwrap();
        assert_eq!(layout.nodes().count(), 3);
    }

    #[test]
    fn test_unknown_endpoint_is_an_error() {
        let result = LayeredLayout::default().layout(&nodes(&["a"]), &edges(&[("a", "ghost")]), Direction::LR);
        assert!(matches!(result, Err(AnimflowError::Layout(_))));
    }

    #[test]
    fn test_node_size_grows_with_label() {
        let small = Node::new(Id::new("s"), NodeShape::Rectangle, "ok", None);
        let large = Node::new(
            Id::new("l"),
            NodeShape::Rectangle,
            "a much longer label here",
            Some("and a subtitle".to_string()),
        );
        assert_eq!(LayeredLayout::node_size(&small), Size::new(120.0, 60.0));
        assert_eq!(LayeredLayout::node_size(&large), Size::new(232.0, 78.0));
    }
}
