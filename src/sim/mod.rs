//! Physical relaxation of stitch graphs.
//!
//! - [`MeshSolver`]: Verlet integration with distance constraints, stuffing
//!   pressure, pins and joints
//! - [`SolverOptions`]: tunable parameters, loadable from JSON
//! - [`Anchor`]: a node pinned to a world position
//! - [`FixedTimestep`]: converts frame time into fixed solver ticks
//! - [`Progress`]: callback for long runs

mod anchor;
mod clock;
mod options;
mod progress;
mod solver;

pub use anchor::{Anchor, AnchorSpec};
pub use clock::FixedTimestep;
pub use options::SolverOptions;
pub use progress::Progress;
pub use solver::{EdgeStats, MeshSolver};
