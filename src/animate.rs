//! Per-tick animation orchestration.
//!
//! The controller owns the ordered list of active behaviors and the
//! optional physics model. One `tick` walks every node (behaviors first,
//! then cursor and origin forces), then every edge (stretch force), in
//! that order so edge-length correction sees the node positions this tick
//! produced. Hover transitions are reported as `GraphEvent`s; the owning
//! graph drains them after its redraw.

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::graph::{Node, NodeId, Topology};
use crate::input::Cursor;
use crate::physics::StretchPhysics;
use crate::scheduler::FrameRate;
use crate::style::Style;

/// Something that happened to the graph during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    /// A node's hovered flag flipped on.
    HoverStart(NodeId),
    /// A node's hovered flag flipped off.
    HoverEnd(NodeId),
}

/// A named per-tick procedure applied to each node.
///
/// The set is closed: names resolve through [`Behavior::from_name`], and
/// an unrecognized name resolves to nothing rather than failing, so a host
/// can ask for behaviors this build does not ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Grow a node's radius while the cursor is near, shrink it back when
    /// the cursor moves away.
    Hover,
}

impl Behavior {
    /// Resolve a behavior name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hover" | "hoverAnimation" => Some(Self::Hover),
            _ => None,
        }
    }

    /// Canonical name of this behavior.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hover => "hover",
        }
    }

    /// Run one behavior step for one node. `distance` is the node's
    /// current distance to the cursor.
    pub fn apply(
        self,
        node: &mut Node,
        distance: f64,
        step: f64,
        style: &Style,
        events: &mut Vec<GraphEvent>,
    ) {
        match self {
            Self::Hover => hover(node, distance, step, style, events),
        }
    }
}

/// Radius change per tick, sized so a full transition takes the configured
/// duration at the nominal frame rate. Changing the rate changes the step,
/// not the duration.
fn hover_step(style: &Style, rate: FrameRate) -> f64 {
    (style.node_hover_radius - style.node_radius)
        / (rate.per_second() * style.node_hover_animation_secs)
}

fn hover(node: &mut Node, distance: f64, step: f64, style: &Style, events: &mut Vec<GraphEvent>) {
    if distance < style.node_hover_distance && node.radius() < style.node_hover_radius {
        // The last step saturates at the target, so the radius never
        // leaves [node_radius, node_hover_radius].
        node.set_radius((node.radius() + step).min(style.node_hover_radius));
        if !node.is_hovered() {
            node.set_hovered(true);
            events.push(GraphEvent::HoverStart(node.id()));
        }
    } else if distance >= style.node_hover_distance && node.radius() > style.node_radius {
        node.set_radius((node.radius() - step).max(style.node_radius));
        if node.is_hovered() {
            node.set_hovered(false);
            events.push(GraphEvent::HoverEnd(node.id()));
        }
    }
}

/// Ordered active behaviors plus the optional force model.
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    behaviors: Vec<Behavior>,
    physics: Option<StretchPhysics>,
}

impl AnimationController {
    /// Controller with no behaviors and no physics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a behavior to the active list.
    ///
    /// Insertion order is execution order. Enabling a behavior twice is a
    /// no-op; returns whether the list changed.
    pub fn enable(&mut self, behavior: Behavior) -> bool {
        if self.behaviors.contains(&behavior) {
            return false;
        }
        self.behaviors.push(behavior);
        true
    }

    /// Active behaviors in execution order.
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Attach (or replace) the force model.
    pub fn attach_physics(&mut self, physics: StretchPhysics) {
        self.physics = Some(physics);
    }

    /// The attached force model, if any.
    pub fn physics(&self) -> Option<&StretchPhysics> {
        self.physics.as_ref()
    }

    /// Evaluate one tick over the whole topology.
    pub fn tick(
        &self,
        graph: &mut Topology,
        cursor: &Cursor,
        style: &Style,
        rate: FrameRate,
        events: &mut Vec<GraphEvent>,
    ) {
        let step = hover_step(style, rate);

        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for index in indices {
            let Some(node) = graph.node_weight_mut(index) else {
                continue;
            };
            let distance = node.position().distance_to(cursor.position());
            for behavior in &self.behaviors {
                behavior.apply(node, distance, step, style, events);
            }
            if let Some(physics) = &self.physics {
                physics.apply_cursor_force(node, cursor, distance, style);
                physics.apply_origin_force(node);
            }
        }

        if let Some(physics) = &self.physics {
            let edges: Vec<(NodeIndex, NodeIndex, f64)> = graph
                .edge_references()
                .map(|edge| (edge.source(), edge.target(), edge.weight().rest_length()))
                .collect();
            for (a, b, rest_length) in edges {
                // index_twice_mut needs distinct indices; a self-loop has
                // zero length and produces no force anyway.
                if a == b {
                    continue;
                }
                let (n1, n2) = graph.index_twice_mut(a, b);
                physics.apply_edge_stretch_force(n1, n2, rest_length);
            }
        }
    }
}
