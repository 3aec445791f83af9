//! Render adapter for a relaxing pattern.
//!
//! [`PatternView`] owns a compiled graph and its solver, drives the solver
//! from wall-clock time, and produces [`RenderFrame`]s: flat `f32` vertex
//! data and `u32` triangle indices ready for a GPU buffer, plus optional
//! debug overlays.
//!
//! ```
//! use std::time::Duration;
//!
//! use amigurumi::graph::PatternGraph;
//! use amigurumi::pattern::{expand, Operation, PatternDef};
//! use amigurumi::sim::SolverOptions;
//! use amigurumi::view::{PatternView, RenderSettings};
//!
//! let def = PatternDef::with_loop().round(expand(Operation::SingleCrochet, 6));
//! let graph = PatternGraph::from_pattern(&def).unwrap();
//! let mut view = PatternView::new(graph, &[], SolverOptions::default()).unwrap();
//!
//! view.advance(Duration::from_millis(20));
//! let frame = view.render(&RenderSettings::default().with_outline(true));
//! assert_eq!(frame.positions.len(), 7);
//! assert!(frame.outline.is_some());
//! ```

use std::time::Duration;

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::graph::{NodeId, PatternGraph};
use crate::sim::{Anchor, FixedTimestep, MeshSolver, SolverOptions};

/// Which overlays to produce.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Include the live-stitch path.
    pub show_outline: bool,
    /// Include expansion force vectors.
    pub show_forces: bool,
    /// Include node id labels.
    pub show_labels: bool,
    /// Length multiplier for force vectors.
    pub force_scale: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_outline: false,
            show_forces: false,
            show_labels: false,
            force_scale: 1.0,
        }
    }
}

impl RenderSettings {
    /// Toggle the outline overlay.
    pub fn with_outline(mut self, show: bool) -> Self {
        self.show_outline = show;
        self
    }

    /// Toggle the force overlay.
    pub fn with_forces(mut self, show: bool) -> Self {
        self.show_forces = show;
        self
    }

    /// Toggle node labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Set the force vector scale.
    pub fn with_force_scale(mut self, scale: f32) -> Self {
        self.force_scale = scale;
        self
    }
}

/// A text label pinned to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// The labelled node.
    pub node: NodeId,
    /// Where to draw it.
    pub position: [f32; 3],
    /// The text.
    pub text: String,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    /// Vertex positions, indexed by node id.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Triangle list, three indices per face.
    pub indices: Vec<u32>,
    /// Live stitches in outline order.
    pub outline: Option<Vec<[f32; 3]>>,
    /// Force vectors as `(start, end)` segments.
    pub forces: Option<Vec<([f32; 3], [f32; 3])>>,
    /// Node labels.
    pub labels: Option<Vec<Label>>,
}

impl RenderFrame {
    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A graph and its solver, with run/pause controls.
#[derive(Debug)]
pub struct PatternView {
    graph: PatternGraph,
    solver: MeshSolver,
    clock: FixedTimestep,
    running: bool,
}

impl PatternView {
    /// Build the solver for `graph`. The view starts running.
    pub fn new(graph: PatternGraph, anchors: &[Anchor], options: SolverOptions) -> Result<Self> {
        let clock = FixedTimestep::from_secs(options.time_step);
        let solver = MeshSolver::new(&graph, anchors, options)?;
        Ok(Self {
            graph,
            solver,
            clock,
            running: true,
        })
    }

    /// The compiled graph.
    pub fn graph(&self) -> &PatternGraph {
        &self.graph
    }

    /// The solver.
    pub fn solver(&self) -> &MeshSolver {
        &self.solver
    }

    /// Whether [`advance`](Self::advance) moves the simulation.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume the simulation.
    pub fn run(&mut self) {
        self.running = true;
    }

    /// Pause the simulation.
    pub fn pause(&mut self) {
        self.running = false;
        self.clock.reset();
    }

    /// Switch between running and paused.
    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.run();
        }
        debug!("simulation {}", if self.running { "running" } else { "paused" });
    }

    /// Forward a raw time step to the solver.
    pub fn update(&mut self, dt: f64) {
        self.solver.update(dt);
    }

    /// Feed elapsed wall time. Returns the number of ticks run, zero while
    /// paused.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.running {
            return 0;
        }
        let steps = self.clock.advance(elapsed);
        let dt = self.clock.step_secs();
        for _ in 0..steps {
            self.solver.update(dt);
        }
        steps
    }

    /// Run exactly one tick, even while paused.
    pub fn step(&mut self) {
        self.solver.update(self.clock.step_secs());
    }

    /// Build a frame from the current solver state.
    pub fn render(&self, settings: &RenderSettings) -> RenderFrame {
        let positions = self.solver.positions();

        let outline = settings.show_outline.then(|| {
            self.graph
                .outline()
                .iter()
                .map(|id| to_f32(&positions[id.index()]))
                .collect()
        });

        let forces = settings.show_forces.then(|| {
            let scale = f64::from(settings.force_scale);
            positions
                .iter()
                .zip(self.solver.forces())
                .map(|(p, f)| (to_f32(p), to_f32(&(p + f * scale))))
                .collect()
        });

        let labels = settings.show_labels.then(|| {
            self.graph
                .nodes()
                .iter()
                .map(|node| Label {
                    node: node.id,
                    position: to_f32(&positions[node.id.index()]),
                    text: format!("{}:{}", node.id, node.op),
                })
                .collect()
        });

        RenderFrame {
            positions: positions.iter().map(to_f32).collect(),
            normals: self.solver.normals().iter().map(vec_to_f32).collect(),
            indices: self
                .solver
                .triangles()
                .iter()
                .flat_map(|tri| tri.map(|i| i as u32))
                .collect(),
            outline,
            forces,
            labels,
        }
    }
}

fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

fn vec_to_f32(v: &Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{expand, Operation, PatternDef};

    fn view() -> PatternView {
        let def = PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(expand(Operation::SingleCrochet, 6));
        let graph = PatternGraph::from_pattern(&def).unwrap();
        PatternView::new(graph, &[], SolverOptions::default()).unwrap()
    }

    #[test]
    fn test_frame_matches_graph() {
        let view = view();
        let frame = view.render(&RenderSettings::default());

        assert_eq!(frame.positions.len(), view.graph().num_nodes());
        assert_eq!(frame.normals.len(), view.graph().num_nodes());
        assert_eq!(frame.num_triangles(), view.graph().num_faces());
        assert!(frame.outline.is_none());
        assert!(frame.forces.is_none());
        assert!(frame.labels.is_none());

        for (face, tri) in view.graph().faces().iter().zip(frame.indices.chunks(3)) {
            let ids: Vec<u32> = face.ids.iter().map(|id| id.raw()).collect();
            assert_eq!(ids, tri);
        }
    }

    #[test]
    fn test_overlays() {
        let mut view = view();
        view.step();
        let settings = RenderSettings::default()
            .with_outline(true)
            .with_forces(true)
            .with_labels(true);
        let frame = view.render(&settings);

        assert_eq!(frame.outline.map(|o| o.len()), Some(6));
        assert_eq!(frame.forces.map(|f| f.len()), Some(13));
        let labels = frame.labels.unwrap();
        assert_eq!(labels[0].text, "0:LP");
        assert_eq!(labels[7].text, "7:SC");
    }

    #[test]
    fn test_pause_and_step() {
        let mut view = view();
        assert!(view.is_running());
        assert_eq!(view.advance(Duration::from_millis(40)), 2);

        view.pause();
        assert_eq!(view.advance(Duration::from_millis(40)), 0);
        assert_eq!(view.solver().tick_count(), 2);

        view.step();
        assert_eq!(view.solver().tick_count(), 3);

        view.toggle();
        assert!(view.is_running());
        assert_eq!(view.advance(Duration::from_millis(20)), 1);
    }
}
