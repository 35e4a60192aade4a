//! Edge type and related structures.
//!
//! Edges are elastic connections between nodes. Each edge has:
//! - A stable unique identifier
//! - A rest length, the distance between its endpoints' origins at
//!   creation, never recomputed
//!
//! Endpoints live in the owning graph's topology; the edge itself never
//! holds node references, so removals cannot leave it dangling.

use std::fmt;

/// Stable edge identifier.
///
/// This ID remains valid even after other edges are removed from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Create a new EdgeId from a raw u32.
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

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.0)
    }
}

impl From<u32> for EdgeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<EdgeId> for u32 {
    #[inline]
    fn from(id: EdgeId) -> Self {
        id.0
    }
}

/// One elastic connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    rest_length: f64,
}

impl Edge {
    /// Create an edge with its stretch baseline.
    #[inline]
    pub fn new(rest_length: f64) -> Self {
        Self { rest_length }
    }

    /// The endpoint distance this edge relaxes toward.
    #[inline]
    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Edge(42)");
    }

    #[test]
    fn test_edge_id_conversion() {
        let id: EdgeId = 7.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_rest_length() {
        let edge = Edge::new(12.5);
        assert_eq!(edge.rest_length(), 12.5);
    }
}
