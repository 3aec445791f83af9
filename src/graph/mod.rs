//! Stitch graphs compiled from patterns.
//!
//! [`PatternGraph`] turns a [`PatternDef`](crate::pattern::PatternDef) into
//! nodes, distance edges, joints and faces. Nodes are stored in an arena and
//! addressed by [`NodeId`].

mod index;
mod pattern_graph;

pub use index::NodeId;
pub use pattern_graph::{Edge, Face, GraphStats, Joint, Node, PatternGraph};
