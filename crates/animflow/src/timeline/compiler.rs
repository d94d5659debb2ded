//! Turns a diagram's steps into a [`CompiledTimeline`].
//!
//! Steps are grouped by step number in order of first appearance. Each group
//! opens with a zero-length step marker, then every step of the group is
//! scheduled from the group's start using its own `delay`, `duration` and
//! `stagger`. Steps of one group may overlap; the group ends when its last
//! operation ends and the next group starts there.
//!
//! Targets that name nothing in the diagram are skipped.

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace};

use animflow_core::{
    color::Color,
    geometry::Point,
    identifier::Id,
    semantic::{
        Action, AnimationStep, DEFAULT_CAMERA_PADDING, DEFAULT_CAMERA_ZOOM, DEFAULT_HIGHLIGHT_COLOR, Diagram, Edge,
        Target,
    },
};

use crate::{
    camera::{CameraMode, CameraMove},
    config::ThemeConfig,
    timeline::{CompiledTimeline, Ease, OpKind, ScheduledOp, StepBoundary, VisualState},
};

/// Share of a connect draw during which the edge label fades in.
const LABEL_REVEAL_SHARE: f64 = 0.15;

/// Defaults for values a step does not set.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    node_fill: Color,
    edge_stroke: Color,
    highlight_color: Color,
    camera_padding: f32,
    focus_zoom: f32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            node_fill: Color::new("#ffffff").unwrap_or_default(),
            edge_stroke: Color::new("#555555").unwrap_or_default(),
            highlight_color: Color::new(DEFAULT_HIGHLIGHT_COLOR).unwrap_or_default(),
            camera_padding: DEFAULT_CAMERA_PADDING,
            focus_zoom: DEFAULT_CAMERA_ZOOM,
        }
    }
}

impl CompileOptions {
    /// Options from the application theme.
    ///
    /// # Errors
    ///
    /// Returns an error if a theme color is invalid.
    pub fn from_theme(theme: &ThemeConfig) -> Result<Self, String> {
        Ok(Self {
            node_fill: theme.node_fill()?,
            edge_stroke: theme.edge_stroke()?,
            highlight_color: theme.highlight_color()?,
            camera_padding: theme.camera_padding(),
            focus_zoom: theme.focus_zoom(),
        })
    }

    pub fn with_node_fill(mut self, color: Color) -> Self {
        self.node_fill = color;
        self
    }

    pub fn with_edge_stroke(mut self, color: Color) -> Self {
        self.edge_stroke = color;
        self
    }

    pub fn with_highlight_color(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }

    pub fn node_fill(&self) -> Color {
        self.node_fill
    }

    pub fn edge_stroke(&self) -> Color {
        self.edge_stroke
    }

    pub fn highlight_color(&self) -> Color {
        self.highlight_color
    }
}

/// Compiles the steps of `diagram`. Compilation never fails.
pub fn compile(diagram: &Diagram, options: &CompileOptions) -> CompiledTimeline {
    let mut compiler = Compiler {
        diagram,
        options,
        ops: Vec::new(),
        original_colors: IndexMap::new(),
    };

    let mut groups: IndexMap<u32, Vec<&AnimationStep>> = IndexMap::new();
    for step in diagram.steps() {
        groups.entry(step.number()).or_default().push(step);
    }

    let mut boundaries = Vec::with_capacity(groups.len());
    let mut cursor = 0.0;
    for (number, steps) in &groups {
        let start = cursor;
        compiler.push(OpKind::StepMarker { step: *number }, start, 0.0, Ease::Linear);

        let mut end = start;
        for step in steps {
            end = compiler.schedule(step, start).max(end);
        }
        debug!(step = *number, start, end; "Scheduled step group");
        boundaries.push(StepBoundary::new(*number, start, end));
        cursor = end;
    }

    let initial = compiler.initial_states();
    let Compiler {
        mut ops,
        original_colors,
        ..
    } = compiler;
    ops.sort_by(|a, b| a.start().total_cmp(&b.start()));

    let timeline = CompiledTimeline::new(ops, boundaries, initial, original_colors);
    info!(
        ops = timeline.ops().len(),
        steps = timeline.boundaries().len(),
        duration = timeline.duration();
        "Compiled timeline"
    );
    trace!(timeline:?; "Compiled timeline");
    timeline
}

struct Compiler<'a> {
    diagram: &'a Diagram,
    options: &'a CompileOptions,
    ops: Vec<ScheduledOp>,
    /// Fill of each node before its first highlight. First write wins.
    original_colors: IndexMap<Id, Color>,
}

impl<'a> Compiler<'a> {
    fn push(&mut self, kind: OpKind, start: f64, duration: f64, ease: Ease) -> f64 {
        let op = ScheduledOp::new(kind, start, duration, ease);
        let end = op.end();
        self.ops.push(op);
        end
    }

    /// Schedules one step from `group_start` and returns the end of its
    /// last operation.
    fn schedule(&mut self, step: &AnimationStep, group_start: f64) -> f64 {
        let props = step.properties();
        let start = group_start + props.delay();
        let duration = props.duration();
        let stagger = props.stagger();
        let ease = props.text("easing").map_or_else(Ease::default, Ease::from_name);
        let at = |index: usize| start + index as f64 * stagger;
        let mut end = group_start;

        match step.action() {
            Action::Show => {
                let effect = props.entrance_effect();
                for (i, target) in self.node_targets(step).into_iter().enumerate() {
                    end = end.max(self.push(OpKind::Enter { target, effect }, at(i), duration, ease));
                }
            }
            Action::Hide => {
                let effect = props.exit_effect();
                for (i, target) in self.entity_targets(step).into_iter().enumerate() {
                    end = end.max(self.push(OpKind::Exit { target, effect }, at(i), duration, ease));
                }
            }
            Action::Highlight => {
                let color = props.color().unwrap_or(self.options.highlight_color);
                let (glow, pulse) = (props.flag("glow"), props.flag("pulse"));
                for (i, target) in self.node_targets(step).into_iter().enumerate() {
                    let base = self.base_color(target);
                    self.original_colors.entry(target).or_insert(base);
                    end = end.max(self.push(OpKind::Recolor { target, color }, at(i), duration, ease));
                    if glow {
                        self.push(OpKind::Glow { target }, at(i), duration, ease);
                    }
                    if pulse {
                        self.push(OpKind::Pulse { target }, at(i), duration, Ease::InOutSine);
                    }
                }
            }
            Action::Unhighlight => {
                for (i, target) in self.node_targets(step).into_iter().enumerate() {
                    let color = self.original_colors.get(&target).copied();
                    end = end.max(self.push(OpKind::Restore { target, color }, at(i), duration, ease));
                }
            }
            Action::Connect => {
                let speed = props.speed();
                let flow = props.flow_effect();
                let draw_ease = props.text("easing").map_or(Ease::Linear, Ease::from_name);
                for (i, edge) in self.edge_targets(step).into_iter().enumerate() {
                    let draw_start = at(i);
                    end = end.max(self.push(OpKind::Draw { edge: edge.id(), flow }, draw_start, speed, draw_ease));
                    if edge.label().is_some() {
                        let reveal = speed * LABEL_REVEAL_SHARE;
                        self.push(
                            OpKind::RevealLabel { edge: edge.id() },
                            draw_start + speed - reveal,
                            reveal,
                            Ease::Linear,
                        );
                    }
                }
            }
            Action::Camera => {
                if let Some(camera) = self.camera(step) {
                    end = end.max(self.push(OpKind::Camera(camera), start, duration, ease));
                }
            }
            Action::Move => {
                for (i, target) in self.entity_targets(step).into_iter().enumerate() {
                    let Some((offset, relative)) = self.motion(step, target) else {
                        continue;
                    };
                    end = end.max(self.push(
                        OpKind::Move {
                            target,
                            offset,
                            relative,
                        },
                        at(i),
                        duration,
                        ease,
                    ));
                }
            }
            Action::Transform => {
                let (scale, rotate) = (props.scale(), props.rotate());
                for (i, target) in self.entity_targets(step).into_iter().enumerate() {
                    if scale.is_some() || rotate.is_some() {
                        end = end.max(self.push(OpKind::Transform { target, scale, rotate }, at(i), duration, ease));
                    }
                    if let Some((offset, relative)) = self.motion(step, target) {
                        end = end.max(self.push(
                            OpKind::Move {
                                target,
                                offset,
                                relative,
                            },
                            at(i),
                            duration,
                            ease,
                        ));
                    }
                }
            }
            Action::Annotate => debug!(step = step.number(); "Annotate steps compile to nothing"),
        }

        end
    }

    /// Offset of a `move`: `by` is relative, `to` is converted into an
    /// offset from the node's layout position when one is known.
    fn motion(&self, step: &AnimationStep, target: Id) -> Option<(Point, bool)> {
        let props = step.properties();
        let Some(to) = props.to() else {
            return props.by().map(|by| (by, true));
        };
        let origin = self
            .diagram
            .node(target)
            .and_then(|node| node.bounds())
            .map(|bounds| bounds.center());
        if origin.is_none() {
            debug!(target = target.to_string(); "No layout position, moving to an absolute offset");
        }
        Some((origin.map_or(to, |origin| to.sub_point(origin)), false))
    }

    fn base_color(&self, id: Id) -> Color {
        self.diagram
            .node(id)
            .and_then(|node| node.style().fill)
            .unwrap_or(self.options.node_fill)
    }

    /// Nodes and edges a target names, with `all`, `nodes` and `edges`
    /// expanded.
    fn expand(&self, target: &Target) -> Vec<Id> {
        match *target {
            Target::Entity(id) if id == "all" => self
                .diagram
                .nodes()
                .iter()
                .map(|n| n.id())
                .chain(self.diagram.edges().iter().map(Edge::id))
                .collect(),
            Target::Entity(id) if id == "nodes" => self.diagram.nodes().iter().map(|n| n.id()).collect(),
            Target::Entity(id) if id == "edges" => self.diagram.edges().iter().map(Edge::id).collect(),
            Target::Entity(id) if self.diagram.contains(id) => vec![id],
            Target::Pair { from, to } => self.find_edge(from, to).map(Edge::id).into_iter().collect(),
            Target::Entity(id) => {
                debug!(target = id.to_string(); "Skipping unknown target");
                Vec::new()
            }
        }
    }

    fn entity_targets(&self, step: &AnimationStep) -> Vec<Id> {
        let mut ids = IndexSet::new();
        for target in step.targets() {
            ids.extend(self.expand(target));
        }
        ids.into_iter().collect()
    }

    /// Targets that are nodes; edges only change through `connect`.
    fn node_targets(&self, step: &AnimationStep) -> Vec<Id> {
        self.entity_targets(step)
            .into_iter()
            .filter(|id| {
                let is_node = self.diagram.node(*id).is_some();
                if !is_node {
                    debug!(target = id.to_string(), action = step.action().as_str(); "Skipping edge target");
                }
                is_node
            })
            .collect()
    }

    fn edge_targets(&self, step: &AnimationStep) -> Vec<&'a Edge> {
        step.targets()
            .iter()
            .filter_map(|target| {
                let edge = match *target {
                    Target::Pair { from, to } => self.find_edge(from, to),
                    Target::Entity(id) => self.diagram.edge(id),
                };
                if edge.is_none() {
                    debug!(target = target.to_string(); "No edge to connect");
                }
                edge
            })
            .collect()
    }

    /// The edge for `from->to`: an exact match first, then an undirected edge
    /// declared the other way round.
    fn find_edge(&self, from: Id, to: Id) -> Option<&'a Edge> {
        let edges = self.diagram.edges();
        edges
            .iter()
            .find(|e| e.from() == from && e.to() == to)
            .or_else(|| edges.iter().find(|e| e.connects(from, to)))
    }

    fn camera(&self, step: &AnimationStep) -> Option<CameraMove> {
        let props = step.properties();
        let mut ids = self.entity_targets(step);
        for key in ["target", "targets"] {
            if let Some(list) = props.text(key) {
                ids.extend(
                    list.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(Id::new)
                        .filter(|id| self.diagram.contains(*id)),
                );
            }
        }

        let padding = props.padding().unwrap_or(self.options.camera_padding);
        let zoom = props.zoom().unwrap_or(self.options.focus_zoom);
        let mode = match (props.text("cameraAction"), ids.as_slice()) {
            (Some("fitAll"), _) | (None, []) => CameraMode::FitAll,
            (Some("focus" | "zoom"), [first, ..]) => CameraMode::Focus(*first),
            (Some("pan"), [first, ..]) => return Some(CameraMove::new(CameraMode::Focus(*first), padding, 1.0)),
            (Some("fitNodes"), [_, ..]) | (None, [_, _, ..]) => CameraMode::FitNodes(ids.clone()),
            (None, [only]) => CameraMode::Focus(*only),
            (Some(action), _) => {
                debug!(step = step.number(), action; "Camera step has no usable target");
                return None;
            }
        };
        Some(CameraMove::new(mode, padding, zoom))
    }

    /// Nodes targeted by any `show` start hidden; all other nodes start
    /// visible. Edges always start hidden.
    fn initial_states(&self) -> IndexMap<Id, VisualState> {
        let shown: IndexSet<Id> = self
            .diagram
            .steps()
            .iter()
            .filter(|step| step.action() == Action::Show)
            .flat_map(|step| self.node_targets(step))
            .collect();

        let nodes = self
            .diagram
            .nodes()
            .iter()
            .map(|node| (node.id(), VisualState::node(!shown.contains(&node.id()), self.base_color(node.id()))));
        let edges = self.diagram.edges().iter().map(|edge| (edge.id(), VisualState::edge(self.options.edge_stroke)));
        nodes.chain(edges).collect()
    }
}
