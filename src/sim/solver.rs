//! Verlet mesh solver.
//!
//! [`MeshSolver`] turns a [`PatternGraph`] into a relaxed 3D shape. Each tick
//! it:
//!
//! 1. Recomputes vertex normals from the faces
//! 2. Pushes every vertex outward along its neighbours' normals (stuffing)
//! 3. Integrates positions with Verlet, velocity coming from the previous
//!    position
//! 4. Relaxes distance constraints for a fixed number of passes, re-applying
//!    pins and joints after each pass
//!
//! # Example
//!
//! ```
//! use amigurumi::graph::PatternGraph;
//! use amigurumi::pattern::{expand, Operation, PatternDef};
//! use amigurumi::sim::{MeshSolver, SolverOptions};
//!
//! let def = PatternDef::with_loop().round(expand(Operation::SingleCrochet, 6));
//! let graph = PatternGraph::from_pattern(&def).unwrap();
//!
//! let mut solver = MeshSolver::new(&graph, &[], SolverOptions::default()).unwrap();
//! solver.run(50, 1.0 / 60.0);
//! assert_eq!(solver.tick_count(), 50);
//! ```

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use super::{Anchor, Progress, SolverOptions};
use crate::error::{PatternError, Result};
use crate::graph::{NodeId, PatternGraph};

/// Lengths below this are treated as zero.
const EPSILON: f64 = 1e-9;

/// A rest-length constraint between two vertices.
#[derive(Debug, Clone, Copy)]
struct Constraint {
    a: usize,
    b: usize,
    rest: f64,
}

/// Vertices that must share one position.
#[derive(Debug, Clone)]
struct JointGroup {
    representative: usize,
    members: Vec<usize>,
}

/// Distribution of structural edge lengths relative to their rest length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeStats {
    /// Number of edges measured.
    ///
    /// Seams are excluded, as are edges between joined stitches: a joint
    /// holds both ends on one point, so those edges stay at zero length.
    pub count: usize,
    /// Mean of `length / rest`.
    pub mean: f64,
    /// Standard deviation of `length / rest`.
    pub std_dev: f64,
    /// Largest `|length / rest - 1|`.
    pub max_error: f64,
}

/// Position-based solver for a compiled stitch graph.
#[derive(Debug, Clone)]
pub struct MeshSolver {
    options: SolverOptions,
    positions: Vec<Point3<f64>>,
    previous: Vec<Point3<f64>>,
    forces: Vec<Vector3<f64>>,
    normals: Vec<Vector3<f64>>,
    neighbors: Vec<Vec<usize>>,
    constraints: Vec<Constraint>,
    triangles: Vec<[usize; 3]>,
    groups: Vec<JointGroup>,
    pins: Vec<(usize, Point3<f64>)>,
    ticks: u64,
}

impl MeshSolver {
    /// Build a solver for `graph`.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `options` do not validate
    /// - `InvalidReference` if an anchor names a node outside the graph
    /// - `InvalidAnchor` if an anchor position is not finite
    pub fn new(graph: &PatternGraph, anchors: &[Anchor], options: SolverOptions) -> Result<Self> {
        options.validate()?;
        let n = graph.num_nodes();
        let spacing = options.spacing();

        let pins = collect_pins(anchors, n)?;

        let positions: Vec<Point3<f64>> = graph
            .nodes()
            .iter()
            .map(|node| helix_seed(node.round, node.progress, spacing))
            .collect();

        let constraints: Vec<Constraint> = graph
            .edges()
            .iter()
            .map(|edge| Constraint {
                a: edge.from.index(),
                b: edge.to.index(),
                rest: edge.distance * spacing,
            })
            .collect();

        let mut neighbors = vec![Vec::new(); n];
        for c in &constraints {
            if !neighbors[c.a].contains(&c.b) {
                neighbors[c.a].push(c.b);
            }
            if !neighbors[c.b].contains(&c.a) {
                neighbors[c.b].push(c.a);
            }
        }

        let triangles = graph
            .faces()
            .iter()
            .map(|face| face.ids.map(NodeId::index))
            .collect();

        let groups = joint_groups(graph, &pins);

        let mut solver = Self {
            options,
            previous: positions.clone(),
            positions,
            forces: vec![Vector3::zeros(); n],
            normals: vec![Vector3::zeros(); n],
            neighbors,
            constraints,
            triangles,
            groups,
            pins,
            ticks: 0,
        };

        // Start from a consistent state.
        solver.apply_pins();
        solver.apply_joints();
        solver.previous.clone_from(&solver.positions);
        solver.update_normals();

        debug!(
            "solver ready: {} vertices, {} constraints, {} joint groups, {} pins",
            n,
            solver.constraints.len(),
            solver.groups.len(),
            solver.pins.len()
        );
        Ok(solver)
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Current positions, indexed by node id.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Current position of a node.
    ///
    /// # Panics
    /// Panics if the id is out of range.
    #[inline]
    pub fn position(&self, id: NodeId) -> &Point3<f64> {
        &self.positions[id.index()]
    }

    /// Vertex normals from the last tick.
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Expansion forces from the last tick.
    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }

    /// Triangles, one per graph face.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Pinned nodes and their positions.
    pub fn pins(&self) -> &[(usize, Point3<f64>)] {
        &self.pins
    }

    /// The solver parameters.
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Number of ticks run.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Centroid of all vertices, or the origin for an empty mesh.
    pub fn centroid(&self) -> Point3<f64> {
        if self.positions.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .positions
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.positions.len() as f64)
    }

    /// Structural edge lengths relative to rest. Seams (rest 0) are skipped.
    pub fn edge_length_stats(&self) -> EdgeStats {
        let ratios: Vec<f64> = self
            .constraints
            .iter()
            .filter(|c| c.rest > 0.0 && !self.joined(c.a, c.b))
            .map(|c| (self.positions[c.b] - self.positions[c.a]).norm() / c.rest)
            .collect();

        if ratios.is_empty() {
            return EdgeStats::default();
        }
        let count = ratios.len();
        let mean = ratios.iter().sum::<f64>() / count as f64;
        let variance = ratios.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / count as f64;
        let max_error = ratios.iter().map(|r| (r - 1.0).abs()).fold(0.0, f64::max);

        EdgeStats {
            count,
            mean,
            std_dev: variance.sqrt(),
            max_error,
        }
    }

    fn joined(&self, a: usize, b: usize) -> bool {
        self.groups
            .iter()
            .any(|g| g.members.contains(&a) && g.members.contains(&b))
    }

    // ==================== Simulation ====================

    /// Advance the simulation by `dt` seconds.
    ///
    /// Non-finite or non-positive `dt` is ignored.
    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        self.update_normals();
        self.update_forces();
        self.integrate(dt);

        for _ in 0..self.options.iterations {
            self.relax_constraints();
            self.apply_pins();
            self.apply_joints();
        }

        if self.options.recenter && self.pins.is_empty() {
            self.recenter(dt);
        }

        for &(i, pin) in &self.pins {
            self.previous[i] = pin;
        }
        self.ticks += 1;
    }

    /// Run `ticks` updates of length `dt`.
    pub fn run(&mut self, ticks: usize, dt: f64) {
        for _ in 0..ticks {
            self.update(dt);
        }
    }

    /// Run `ticks` updates, reporting after each.
    pub fn run_with_progress(&mut self, ticks: usize, dt: f64, progress: &Progress) {
        progress.report(0, ticks, "Relaxing");
        for tick in 1..=ticks {
            self.update(dt);
            progress.tick(tick, ticks, "Relaxing");
        }
    }

    fn update_normals(&mut self) {
        let mut sums = vec![Vector3::zeros(); self.positions.len()];
        for &[a, b, c] in &self.triangles {
            let pa = self.positions[a];
            let normal = (self.positions[b] - pa).cross(&(self.positions[c] - pa));
            let Some(unit) = normal.try_normalize(EPSILON) else {
                continue;
            };
            sums[a] += unit;
            sums[b] += unit;
            sums[c] += unit;
        }
        for (normal, sum) in self.normals.iter_mut().zip(sums) {
            *normal = sum.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);
        }
    }

    fn update_forces(&mut self) {
        let stiffness = self.options.stiffness;
        for (i, force) in self.forces.iter_mut().enumerate() {
            let neighbors = &self.neighbors[i];
            *force = if neighbors.is_empty() {
                Vector3::zeros()
            } else {
                let sum = neighbors
                    .iter()
                    .fold(Vector3::zeros(), |acc, &j| acc + self.normals[j]);
                sum * (stiffness / neighbors.len() as f64)
            };
        }
    }

    fn integrate(&mut self, dt: f64) {
        let damping = self.options.damping;
        let dt2 = dt * dt;
        for ((p, prev), f) in self
            .positions
            .iter_mut()
            .zip(self.previous.iter_mut())
            .zip(&self.forces)
        {
            let velocity = (*p - *prev) * damping;
            let next = *p + velocity + f * dt2;
            *prev = *p;
            *p = next;
        }
    }

    /// One Gauss-Seidel pass over all constraints.
    fn relax_constraints(&mut self) {
        for c in &self.constraints {
            let delta = self.positions[c.b] - self.positions[c.a];
            let length = delta.norm();
            let (direction, length) = if length < EPSILON {
                (Vector3::x(), EPSILON)
            } else {
                (delta / length, length)
            };
            let correction = direction * ((length - c.rest) * 0.5);
            self.positions[c.a] += correction;
            self.positions[c.b] -= correction;
        }
    }

    fn apply_pins(&mut self) {
        for &(i, pin) in &self.pins {
            self.positions[i] = pin;
        }
    }

    fn apply_joints(&mut self) {
        for group in &self.groups {
            let target = self.positions[group.representative];
            for &member in &group.members {
                self.positions[member] = target;
            }
        }
    }

    fn recenter(&mut self, dt: f64) {
        let centroid = self.centroid();
        let shift = Vector3::new(centroid.x, 0.0, centroid.z) * dt.min(1.0);
        for (p, prev) in self.positions.iter_mut().zip(self.previous.iter_mut()) {
            *p -= shift;
            *prev -= shift;
        }
    }
}

/// Initial position of a stitch on a widening helix around +Y.
fn helix_seed(round: usize, progress: f64, spacing: f64) -> Point3<f64> {
    let turn = round as f64 + progress;
    let radius = spacing * (1.0 + turn);
    let height = spacing * turn;
    let angle = TAU * progress;
    Point3::new(radius * angle.sin(), height, -radius * angle.cos())
}

/// Validate anchors. Later anchors for the same node replace earlier ones.
fn collect_pins(anchors: &[Anchor], len: usize) -> Result<Vec<(usize, Point3<f64>)>> {
    let mut pins: BTreeMap<usize, Point3<f64>> = BTreeMap::new();
    for anchor in anchors {
        let node = anchor.node.index();
        if node >= len {
            return Err(PatternError::InvalidReference { node, len });
        }
        if !anchor.position.coords.iter().all(|v| v.is_finite()) {
            return Err(PatternError::InvalidAnchor {
                node,
                reason: "position must be finite",
            });
        }
        if pins.insert(node, anchor.position).is_some() {
            warn!("node {} is anchored more than once; using the last anchor", node);
        }
    }
    Ok(pins.into_iter().collect())
}

/// Union the graph's joints into groups of two or more vertices.
fn joint_groups(graph: &PatternGraph, pins: &[(usize, Point3<f64>)]) -> Vec<JointGroup> {
    let n = graph.num_nodes();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for joint in graph.joints() {
        let a = find(&mut parent, joint.from.index());
        let b = find(&mut parent, joint.to.index());
        if a != b {
            parent[a.max(b)] = a.min(b);
        }
    }

    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        members.entry(root).or_default().push(i);
    }

    members
        .into_values()
        .filter(|group| group.len() > 1)
        .map(|members| {
            let pinned: Vec<usize> = members
                .iter()
                .copied()
                .filter(|m| pins.iter().any(|&(p, _)| p == *m))
                .collect();
            if pinned.len() > 1 {
                warn!(
                    "joined nodes {:?} are all anchored; node {} wins",
                    pinned, pinned[0]
                );
            }
            let representative = pinned.first().copied().unwrap_or(members[0]);
            JointGroup {
                representative,
                members,
            }
        })
        .collect()
}
