//! GraphEngine - graph state and the per-tick pipeline.
//!
//! The GraphEngine stores the topology using petgraph's StableGraph and
//! wires the cursor, animation controller, and frame scheduler around it.
//! Hosts feed it pointer events and drive ticks; it pushes geometry to a
//! render sink and reports hover transitions as events.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::Topology;
use super::edge::{Edge, EdgeId};
use super::node::{Node, NodeId};
use crate::animate::{AnimationController, Behavior, GraphEvent};
use crate::error::GraphError;
use crate::geom::Vec2;
use crate::input::{Cursor, PointerEvent};
use crate::physics::StretchPhysics;
use crate::render::{CirclePaint, LinePaint, RenderSink};
use crate::scheduler::{FrameRate, FrameScheduler};
use crate::style::{Style, StylePatch};

/// Bulk-load description: surface dimensions, node positions, and edges
/// given as pairs of indices into the node list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphDescription {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDescription>,
    pub edges: Vec<EdgeDescription>,
}

/// A node's initial (and rest) position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub x: f64,
    pub y: f64,
}

/// An edge between two positions in the description's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub n1: usize,
    pub n2: usize,
}

/// Cursor, controller, and scheduler. Created together, lazily, the first
/// time a behavior or physics model is enabled.
#[derive(Debug, Default)]
struct AnimationRuntime {
    cursor: Cursor,
    controller: AnimationController,
    scheduler: FrameScheduler,
}

/// The graph composition root.
///
/// This struct manages:
/// - Graph topology via petgraph (nodes and edges carry their weights)
/// - ID mapping between stable IDs and internal indices
/// - Surface dimensions and the style snapshot read at tick/draw time
/// - The lazily initialized animation runtime
pub struct GraphEngine {
    /// The underlying graph structure.
    /// Nodes store their full state, edges store their rest length.
    graph: Topology,

    /// Map from stable NodeId to petgraph NodeIndex
    node_id_to_index: HashMap<NodeId, NodeIndex>,

    /// Map from stable EdgeId to petgraph EdgeIndex
    edge_id_to_index: HashMap<EdgeId, EdgeIndex>,

    /// Reverse map from petgraph EdgeIndex to stable EdgeId (for O(1) lookup during cascade removal)
    edge_index_to_id: HashMap<EdgeIndex, EdgeId>,

    /// Next node ID to assign
    next_node_id: u32,

    /// Next edge ID to assign
    next_edge_id: u32,

    /// Rendering surface dimensions, replayed to the sink on every redraw
    width: f64,
    height: f64,

    /// Visual and threshold parameters; read-only during a tick
    style: Style,

    /// Nominal tick rate, shared with the scheduler once one exists
    frame_rate: FrameRate,

    /// Animation state; `None` until a behavior or physics is enabled
    animation: Option<AnimationRuntime>,
}

impl GraphEngine {
    /// Create a new empty graph engine with the stock style.
    pub fn new() -> Self {
        Self {
            graph: Topology::default(),
            node_id_to_index: HashMap::new(),
            edge_id_to_index: HashMap::new(),
            edge_index_to_id: HashMap::new(),
            next_node_id: 0,
            next_edge_id: 0,
            width: 0.0,
            height: 0.0,
            style: Style::default(),
            frame_rate: FrameRate::default(),
            animation: None,
        }
    }

    /// Create a graph engine with a caller-supplied style.
    pub fn with_style(style: Style) -> Result<Self, GraphError> {
        style.validate()?;
        let mut engine = Self::new();
        engine.style = style;
        Ok(engine)
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the specified position.
    ///
    /// The position doubles as the node's origin, and the radius starts at
    /// the style's base radius.
    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;

        let node = Node::new(id, Vec2::new(x, y), self.style.node_radius);
        let index = self.graph.add_node(node);
        self.node_id_to_index.insert(id, index);
        id
    }

    /// Remove a node and cascade-remove every edge referencing it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if let Some(index) = self.node_id_to_index.remove(&id) {
            // Drop incident edges first so the id maps never hold a
            // dangling reference.
            let edges: Vec<EdgeIndex> = self.graph.edges(index).map(|e| e.id()).collect();
            for edge_index in edges {
                if let Some(edge_id) = self.edge_index_to_id.remove(&edge_index) {
                    self.edge_id_to_index.remove(&edge_id);
                }
                self.graph.remove_edge(edge_index);
            }

            self.graph.remove_node(index);
            true
        } else {
            false
        }
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Look up a node by its stable id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_id_to_index
            .get(&id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let index = *self.node_id_to_index.get(&id)?;
        self.graph.node_weight_mut(index)
    }

    /// Stable ids of all live nodes.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index).map(|node| node.id()))
            .collect()
    }

    /// Move a node. Its origin stays where it was, so the origin force
    /// will pull it back.
    pub fn set_node_position(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.set_position(Vec2::new(x, y));
                true
            }
            None => false,
        }
    }

    /// Check if a node is currently hovered.
    pub fn is_node_hovered(&self, id: NodeId) -> bool {
        self.node(id).map(|node| node.is_hovered()).unwrap_or(false)
    }

    /// Check if a node is pinned to the cursor.
    pub fn is_node_pinned(&self, id: NodeId) -> bool {
        self.node(id).map(|node| node.is_pinned()).unwrap_or(false)
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge between two existing nodes.
    ///
    /// The rest length is fixed here, as the distance between the two
    /// origins. Fails with a referential error if either id is unknown,
    /// leaving the edge collection unchanged.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeId, GraphError> {
        let a_index = *self
            .node_id_to_index
            .get(&a)
            .ok_or(GraphError::UnknownNode(a))?;
        let b_index = *self
            .node_id_to_index
            .get(&b)
            .ok_or(GraphError::UnknownNode(b))?;

        let rest_length = self.graph[a_index]
            .origin()
            .distance_to(self.graph[b_index].origin());

        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;

        let index = self.graph.add_edge(a_index, b_index, Edge::new(rest_length));
        self.edge_id_to_index.insert(id, index);
        self.edge_index_to_id.insert(index, id);
        Ok(id)
    }

    /// Remove an edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        if let Some(index) = self.edge_id_to_index.remove(&id) {
            self.edge_index_to_id.remove(&index);
            self.graph.remove_edge(index);
            true
        } else {
            false
        }
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// An edge's rest length, if the edge exists.
    pub fn edge_rest_length(&self, id: EdgeId) -> Option<f64> {
        self.edge_id_to_index
            .get(&id)
            .and_then(|&index| self.graph.edge_weight(index))
            .map(|edge| edge.rest_length())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the graph contents from a description.
    ///
    /// Every edge reference is validated before any mutation, so a bad
    /// description leaves the current graph intact.
    pub fn load_description(&mut self, description: &GraphDescription) -> Result<(), GraphError> {
        let count = description.nodes.len();
        for edge in &description.edges {
            for index in [edge.n1, edge.n2] {
                if index >= count {
                    return Err(GraphError::EdgeIndexOutOfRange { index, count });
                }
            }
        }

        self.clear();
        self.width = description.width;
        self.height = description.height;

        let mut created = Vec::with_capacity(count);
        for node in &description.nodes {
            created.push(self.add_node(node.x, node.y));
        }
        for edge in &description.edges {
            self.add_edge(created[edge.n1], created[edge.n2])?;
        }

        info!(
            "loaded graph: {} nodes, {} edges, surface {}x{}",
            self.node_count(),
            self.edge_count(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Remove every node and edge, resetting id assignment. Style, frame
    /// rate, surface size, and animation state are kept.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_id_to_index.clear();
        self.edge_id_to_index.clear();
        self.edge_index_to_id.clear();
        self.next_node_id = 0;
        self.next_edge_id = 0;
    }

    // =========================================================================
    // Style & Timing
    // =========================================================================

    /// The active style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the style wholesale. The replacement is validated first.
    pub fn set_style(&mut self, style: Style) -> Result<(), GraphError> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    /// Apply a partial style update.
    ///
    /// The merged result is validated before it replaces the active style;
    /// a bad patch leaves the active style untouched.
    pub fn merge_style(&mut self, patch: StylePatch) -> Result<(), GraphError> {
        let mut merged = self.style.clone();
        merged.apply(patch);
        merged.validate()?;
        self.style = merged;
        Ok(())
    }

    /// The nominal tick rate.
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Set the tick rate, rejecting non-positive or non-finite values.
    pub fn set_frame_rate(&mut self, per_second: f64) -> Result<(), GraphError> {
        let rate = FrameRate::new(per_second)?;
        self.frame_rate = rate;
        if let Some(runtime) = &mut self.animation {
            runtime.scheduler.set_rate(rate);
        }
        Ok(())
    }

    /// Milliseconds between ticks at the nominal rate.
    pub fn interval_ms(&self) -> f64 {
        self.frame_rate.interval_ms()
    }

    /// Rendering surface width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Rendering surface height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set the rendering surface dimensions.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // =========================================================================
    // Animation
    // =========================================================================

    fn runtime_mut(&mut self) -> &mut AnimationRuntime {
        let rate = self.frame_rate;
        self.animation.get_or_insert_with(|| {
            info!("animation runtime initialized at {} ticks/s", rate.per_second());
            AnimationRuntime {
                scheduler: FrameScheduler::new(rate),
                ..Default::default()
            }
        })
    }

    /// Enable a behavior by name.
    ///
    /// The first enablement initializes the cursor/controller/scheduler
    /// trio. Unknown names leave the engine untouched; duplicates are
    /// no-ops. Returns whether the active set changed.
    pub fn enable_behavior(&mut self, name: &str) -> bool {
        let Some(behavior) = Behavior::from_name(name) else {
            debug!("ignoring unknown behavior {name:?}");
            return false;
        };
        let changed = self.runtime_mut().controller.enable(behavior);
        if changed {
            info!("behavior {} enabled", behavior.name());
        }
        changed
    }

    /// Attach the force model with the stock factors.
    pub fn enable_physics(&mut self) {
        self.runtime_mut()
            .controller
            .attach_physics(StretchPhysics::default());
        info!("physics model attached");
    }

    /// Attach a caller-supplied force model. Factors are validated first.
    pub fn enable_physics_with(&mut self, physics: StretchPhysics) -> Result<(), GraphError> {
        physics.validate()?;
        self.runtime_mut().controller.attach_physics(physics);
        info!("physics model attached");
        Ok(())
    }

    /// Apply one pointer event to the cursor and scheduler.
    ///
    /// Enter starts the frame stream, leave stops it. Returns whether the
    /// scheduler newly transitioned to Running, so the host can arm its
    /// callback chain exactly once.
    pub fn apply_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(runtime) = self.animation.as_mut() else {
            // No runtime yet: nothing to animate or schedule.
            return false;
        };
        runtime.cursor.apply(event);
        match event {
            PointerEvent::Entered => {
                let started = runtime.scheduler.start();
                if started {
                    info!("frame stream started");
                }
                started
            }
            PointerEvent::Left => {
                if runtime.scheduler.stop() {
                    info!("frame stream stopped");
                }
                false
            }
            _ => false,
        }
    }

    /// Whether the frame stream is currently running.
    pub fn is_animating(&self) -> bool {
        self.animation
            .as_ref()
            .map(|runtime| runtime.scheduler.is_running())
            .unwrap_or(false)
    }

    /// Evaluate one tick over every node and edge, then redraw.
    ///
    /// Returns the tick's hover transitions. Without an animation runtime
    /// this is just a redraw.
    pub fn tick(&mut self, sink: &mut dyn RenderSink) -> Vec<GraphEvent> {
        let mut events = Vec::new();
        if let Some(runtime) = &self.animation {
            runtime.controller.tick(
                &mut self.graph,
                &runtime.cursor,
                &self.style,
                self.frame_rate,
                &mut events,
            );
        }
        self.redraw(sink);
        events
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Push current geometry to the sink: surface size first, then edges,
    /// then nodes, so nodes draw on top.
    pub fn redraw(&self, sink: &mut dyn RenderSink) {
        sink.resize(self.width, self.height);

        let edge_paint = LinePaint {
            color: &self.style.edge_color,
            width: self.style.edge_width,
        };
        for edge in self.graph.edge_references() {
            let Some(a) = self.graph.node_weight(edge.source()) else {
                continue;
            };
            let Some(b) = self.graph.node_weight(edge.target()) else {
                continue;
            };
            sink.draw_line(a.position(), b.position(), &edge_paint);
        }

        for index in self.graph.node_indices() {
            let Some(node) = self.graph.node_weight(index) else {
                continue;
            };
            let stroke = if node.is_hovered() {
                &self.style.node_hovered_stroke_color
            } else {
                &self.style.node_stroke_color
            };
            let paint = CirclePaint {
                fill: &self.style.node_fill_color,
                stroke,
                stroke_width: self.style.node_stroke_width,
            };
            sink.draw_circle(node.position(), node.radius(), &paint);
        }
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new()
    }
}
