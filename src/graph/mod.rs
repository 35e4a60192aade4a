//! Graph data structures and operations.
//!
//! This module provides the core graph structure using petgraph's
//! StableGraph for stable node/edge indices. Node positions, radii, and
//! flags live directly in the node weights; edges carry their rest length.
//! Host-facing u32 ids stay valid across removals.

use petgraph::Undirected;
use petgraph::stable_graph::StableGraph;

mod edge;
mod engine;
mod node;

pub use edge::{Edge, EdgeId};
pub use engine::{EdgeDescription, GraphDescription, GraphEngine, NodeDescription};
pub use node::{Node, NodeId};

/// The topology storage shared by the engine and the animation pipeline.
pub type Topology = StableGraph<Node, Edge, Undirected>;
