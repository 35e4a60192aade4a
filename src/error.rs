//! Error taxonomy for the engine.
//!
//! Two families surface to callers: configuration errors (bad frame rate,
//! malformed style, out-of-range force factor) and referential errors (an
//! edge naming a node the graph does not contain). Both are rejected
//! synchronously at the call that introduces them. Numeric degeneracies
//! inside a tick (zero-length edges) are recovered locally by skipping the
//! affected force term and never become errors.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors surfaced by graph construction and configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The frame rate would make per-tick step sizes divide by zero or
    /// produce non-finite values.
    #[error("frame rate must be a positive, finite number of ticks per second, got {value}")]
    InvalidFrameRate { value: f64 },

    /// A style option failed validation.
    #[error("invalid style: {reason}")]
    InvalidStyle { reason: String },

    /// A physics force factor is outside the per-tick interpolation range.
    #[error("force factor {name} must lie in (0, 1], got {value}")]
    InvalidForceFactor { name: &'static str, value: f64 },

    /// An operation referenced a node id the graph does not contain.
    #[error("{0} is not part of this graph")]
    UnknownNode(NodeId),

    /// A graph description's edge referenced a node index beyond the
    /// description's node list.
    #[error("edge references node index {index}, but the description defines {count} nodes")]
    EdgeIndexOutOfRange { index: usize, count: usize },
}
