//! # Amigurumi
//!
//! Compiles crochet stitch patterns into stitch graphs and relaxes them into
//! 3D shapes.
//!
//! ## Pipeline
//!
//! 1. **Patterns** ([`pattern`]): rounds of stitch operations (`LP`, `SC`,
//!    `INC`, `DEC`, `MR`, `SLST`, `FO`, ...)
//! 2. **Graphs** ([`graph`]): each stitch becomes a node with distance edges
//!    to its neighbours, joints for sewn stitches, and faces for rendering
//! 3. **Simulation** ([`sim`]): a Verlet solver with stuffing pressure pulls
//!    the graph into shape
//! 4. **Output** ([`view`], [`io`]): render frames, STL and PLY export
//!
//! ## Quick Start
//!
//! ```
//! use amigurumi::prelude::*;
//!
//! let mut inc = Vec::new();
//! for _ in 0..6 {
//!     inc.push(Operation::SingleCrochet);
//!     inc.push(Operation::Increase);
//! }
//!
//! let def = PatternDef::with_loop()
//!     .round(expand(Operation::MagicRing, 6))
//!     .round(inc)
//!     .round(expand(Operation::SingleCrochet, 12))
//!     .round(expand(Operation::Decrease, 6))
//!     .round(vec![Operation::FinishOff]);
//!
//! let graph = PatternGraph::from_pattern(&def).unwrap();
//! assert_eq!(graph.num_nodes(), 37);
//!
//! let mut solver = MeshSolver::new(&graph, &[], SolverOptions::default()).unwrap();
//! solver.run(100, 1.0 / 60.0);
//! ```
//!
//! ## Documents
//!
//! Multi-part figures are described as JSON documents; see
//! [`io::Amigurumi`].
//!
//! ```no_run
//! use amigurumi::io::Amigurumi;
//!
//! let doll = Amigurumi::load("demos/bear.json").unwrap();
//! for (id, part) in doll.parts() {
//!     println!("part {}: {} stitches", id, part.num_nodes());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod io;
pub mod pattern;
pub mod sim;
pub mod view;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use amigurumi::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{PatternError, Result};
    pub use crate::graph::{NodeId, PatternGraph};
    pub use crate::pattern::{expand, Operation, OperationKind, PatternDef};
    pub use crate::sim::{Anchor, MeshSolver, SolverOptions};
    pub use crate::view::{PatternView, RenderSettings};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
