//! Node type and related structures.
//!
//! Nodes are the vertices in the graph. Each node has:
//! - A stable unique identifier (survives graph mutations)
//! - A mutable position, moved by forces every tick
//! - An immutable origin (rest position, fixed at creation)
//! - An animated radius plus hovered/pinned flags

use std::fmt;

use crate::geom::Vec2;

/// Stable node identifier.
///
/// This ID remains valid even after other nodes are removed from the graph.
/// It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Node state flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const PINNED: u8 = 0b0000_0001;
    const HOVERED: u8 = 0b0000_0010;

    /// Create a new default node state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node is pinned (attached to the cursor for dragging).
    #[inline]
    pub fn is_pinned(self) -> bool {
        self.flags & Self::PINNED != 0
    }

    /// Set the pinned state.
    #[inline]
    pub fn set_pinned(&mut self, pinned: bool) {
        if pinned {
            self.flags |= Self::PINNED;
        } else {
            self.flags &= !Self::PINNED;
        }
    }

    /// Check if the node is hovered.
    #[inline]
    pub fn is_hovered(self) -> bool {
        self.flags & Self::HOVERED != 0
    }

    /// Set the hovered state.
    #[inline]
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered {
            self.flags |= Self::HOVERED;
        } else {
            self.flags &= !Self::HOVERED;
        }
    }
}

/// One vertex of the graph.
///
/// `origin` is fixed for the node's lifetime; the origin spring pulls
/// `position` back toward it whenever other forces let go. The radius
/// animates between the style's base and hover radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    id: NodeId,
    position: Vec2,
    origin: Vec2,
    radius: f64,
    state: NodeState,
}

impl Node {
    /// Create a node at rest: position and origin coincide.
    pub fn new(id: NodeId, position: Vec2, radius: f64) -> Self {
        Self {
            id,
            position,
            origin: position,
            radius,
            state: NodeState::new(),
        }
    }

    /// Stable identifier of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current rendered position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Rest position, fixed at creation.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Current animated radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the animated radius.
    #[inline]
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Accumulate a displacement into the position.
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Move the node to an absolute position. The origin stays put, so the
    /// origin spring will pull the node back from here.
    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Check if the node is hovered.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.state.is_hovered()
    }

    /// Set the hovered state.
    #[inline]
    pub fn set_hovered(&mut self, hovered: bool) {
        self.state.set_hovered(hovered);
    }

    /// Check if the node is pinned to the cursor.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.state.is_pinned()
    }

    /// Set the pinned state.
    #[inline]
    pub fn set_pinned(&mut self, pinned: bool) {
        self.state.set_pinned(pinned);
    }
}
