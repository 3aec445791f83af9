//! Compilation of stitch patterns into a stitch graph.
//!
//! # Structure
//!
//! - Every stitch that adds fabric becomes a [`Node`] in a flat arena.
//! - Each node remembers the previous stitch (`last`), the following stitch
//!   (`next`) and the stitch of the previous round it was worked into
//!   (`under`).
//! - [`Edge`]s carry rest distances between stitches, [`Joint`]s force two
//!   stitches onto the same spot, and [`Face`]s triangulate the fabric for
//!   rendering.
//!
//! # Outline
//!
//! The outline is the queue of live stitches: new stitches are pushed to the
//! back, and operations that work into the fabric pop from the front. The
//! compiler also tracks the stitch it is currently working into (the
//! *anchor*). A [`Loop`](OperationKind::Loop) node is a ring that can take any
//! number of stitches during the round that works into it; it leaves the
//! outline when that round ends.

use std::collections::VecDeque;

use log::{debug, trace};

use super::index::NodeId;
use crate::error::{PatternError, Result};
use crate::pattern::{Operation, OperationKind, PatternDef};

/// One stitch of the fabric.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Dense id, equal to the node's position in the arena.
    pub id: NodeId,
    /// Previous stitch in creation order.
    pub last: NodeId,
    /// Following stitch, or the node itself until one is made.
    pub next: NodeId,
    /// Previous-round stitch this one sits on.
    pub under: NodeId,
    /// Operation that created the node.
    pub op: OperationKind,
    /// Round that created the node, counted across appends.
    pub round: usize,
    /// Share of the round's stitches made before this node, in `[0, 1)`.
    pub progress: f64,
}

impl Node {
    /// Whether this node is a base ring.
    #[inline]
    pub fn is_ring(&self) -> bool {
        self.op == OperationKind::Loop
    }
}

/// A desired distance between two stitches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// First endpoint.
    pub from: NodeId,
    /// Second endpoint.
    pub to: NodeId,
    /// Rest length in units of point spacing. Zero marks a seam.
    pub distance: f64,
}

/// Two stitches that must share a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joint {
    /// First stitch.
    pub from: NodeId,
    /// Second stitch.
    pub to: NodeId,
}

/// A rendering triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// The three corners, pairwise distinct.
    pub ids: [NodeId; 3],
}

/// Element counts of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of edges.
    pub edges: usize,
    /// Number of joints.
    pub joints: usize,
    /// Number of faces.
    pub faces: usize,
    /// Number of live stitches.
    pub outline: usize,
}

/// Where the compiler is within the pattern.
#[derive(Debug, Clone, Default)]
struct Cursor {
    /// Stitch currently being worked into.
    anchor: Option<NodeId>,
    /// The anchor is finished; the next stitch moves on.
    anchor_spent: bool,
    /// A ring at the outline front has taken stitches this round.
    ring_worked: bool,
    /// Rounds started so far.
    round: usize,
    /// Operations in the current round, or 0 outside `append`.
    round_len: usize,
    /// Nodes created since the round began.
    created: usize,
}

/// A compiled stitch pattern.
///
/// # Example
///
/// ```
/// use amigurumi::graph::PatternGraph;
/// use amigurumi::pattern::{expand, Operation, PatternDef};
///
/// let def = PatternDef::with_loop().round(expand(Operation::SingleCrochet, 6));
/// let graph = PatternGraph::from_pattern(&def).unwrap();
///
/// assert_eq!(graph.num_nodes(), 7);
/// assert_eq!(graph.num_edges(), 18);
/// assert_eq!(graph.outline().len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    joints: Vec<Joint>,
    faces: Vec<Face>,
    outline: VecDeque<NodeId>,
    cursor: Cursor,
    consumed: usize,
}

impl PatternGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a pattern into a new graph.
    pub fn from_pattern(pattern: &PatternDef) -> Result<Self> {
        let mut graph = Self::new();
        graph.append(pattern)?;
        Ok(graph)
    }

    // ==================== Accessors ====================

    /// Get the number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of joints.
    #[inline]
    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a node by id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node by id, if it exists.
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All joints.
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// All faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The live stitches, oldest first.
    pub fn outline(&self) -> &VecDeque<NodeId> {
        &self.outline
    }

    /// Number of stitches worked into so far.
    ///
    /// Working into a ring counts even though the ring stays live.
    pub fn stitches_consumed(&self) -> usize {
        self.consumed
    }

    /// Element counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            joints: self.joints.len(),
            faces: self.faces.len(),
            outline: self.outline.len(),
        }
    }

    /// Check that an id belongs to this graph.
    pub fn check_node(&self, index: usize) -> Result<NodeId> {
        if index < self.nodes.len() {
            Ok(NodeId::new(index))
        } else {
            Err(PatternError::InvalidReference {
                node: index,
                len: self.nodes.len(),
            })
        }
    }

    // ==================== Compilation ====================

    /// Compile every round of `pattern` onto this graph.
    ///
    /// Errors are reported with the round and operation they occurred in.
    /// A graph whose `append` failed should be discarded.
    pub fn append(&mut self, pattern: &PatternDef) -> Result<()> {
        for (round_index, round) in pattern.rounds().iter().enumerate() {
            self.begin_round(round.len());
            for (operation_index, op) in round.iter().enumerate() {
                self.add_operation(*op)
                    .map_err(|e| e.at(round_index, operation_index))?;
            }
            self.end_round();
            debug!(
                "round {} compiled: {} nodes, {} live stitches",
                round_index,
                self.nodes.len(),
                self.outline.len()
            );
        }
        Ok(())
    }

    /// Apply one operation.
    pub fn add_operation(&mut self, op: Operation) -> Result<()> {
        trace!("applying {} at round {}", op, self.cursor.round);
        match op {
            Operation::Loop => {
                let id = self.add_node(OperationKind::Loop);
                let node = &mut self.nodes[id.index()];
                node.last = id;
                node.next = id;
                node.under = id;
                self.outline.push_back(id);
                self.cursor.anchor = Some(id);
                self.cursor.anchor_spent = false;
                Ok(())
            }
            Operation::SingleCrochet => self.single_crochet(OperationKind::SingleCrochet),
            Operation::Increase => self.increase(),
            Operation::Decrease => self.decrease(),
            Operation::SlipStitch => self.slip_stitch(),
            Operation::FinishOff => {
                self.finish_off();
                Ok(())
            }
            Operation::Join { node, with } => {
                let a = self.check_node(node)?;
                let b = self.check_node(with)?;
                self.add_joint(a, b);
                Ok(())
            }
            Operation::MagicRing => {
                // Increases that follow share the current stitch.
                self.cursor.anchor_spent = false;
                Ok(())
            }
            Operation::Chain => Ok(()),
        }
    }

    /// Join another graph onto a copy of this one.
    ///
    /// Every id contributed by `other` is shifted by `self.num_nodes()`, so
    /// the two parts never collide. Neither input is modified. The result
    /// keeps compiling from where `self` left off.
    ///
    /// # Example
    ///
    /// ```
    /// use amigurumi::graph::PatternGraph;
    /// use amigurumi::pattern::{expand, Operation, PatternDef};
    ///
    /// let def = PatternDef::with_loop().round(expand(Operation::MagicRing, 6));
    /// let head = PatternGraph::from_pattern(&def).unwrap();
    /// let ear = PatternGraph::from_pattern(&def).unwrap();
    ///
    /// let joined = head.join(&ear);
    /// assert_eq!(joined.num_nodes(), head.num_nodes() + ear.num_nodes());
    /// ```
    pub fn join(&self, other: &PatternGraph) -> PatternGraph {
        let mut joined = self.clone();
        let offset = self.nodes.len();
        let round_offset = self.rounds_used();

        joined.nodes.extend(other.nodes.iter().map(|node| Node {
            id: node.id.offset(offset),
            last: node.last.offset(offset),
            next: node.next.offset(offset),
            under: node.under.offset(offset),
            op: node.op,
            round: node.round + round_offset,
            progress: node.progress,
        }));
        joined.edges.extend(other.edges.iter().map(|edge| Edge {
            from: edge.from.offset(offset),
            to: edge.to.offset(offset),
            distance: edge.distance,
        }));
        joined.joints.extend(other.joints.iter().map(|joint| Joint {
            from: joint.from.offset(offset),
            to: joint.to.offset(offset),
        }));
        joined.faces.extend(other.faces.iter().map(|face| Face {
            ids: face.ids.map(|id| id.offset(offset)),
        }));
        joined
            .outline
            .extend(other.outline.iter().map(|id| id.offset(offset)));
        joined.consumed += other.consumed;

        debug!(
            "joined graphs: {} + {} nodes",
            offset,
            other.nodes.len()
        );
        joined
    }

    // ==================== Stitches ====================

    fn single_crochet(&mut self, kind: OperationKind) -> Result<()> {
        self.require(kind, 1)?;
        let under = self.consume();
        let prev = self.cursor.anchor.unwrap_or(under);

        let id = self.add_node(kind);
        let last = self.nodes[id.index()].last;
        self.nodes[id.index()].under = under;

        // Worked into a ring, `under` and `prev` (and `last` for the first
        // stitch) are the ring itself. Repeated edges are kept, so the fan of
        // `[LP], [SC x6]` has 18.
        self.add_edge(id, last, 1.0);
        self.add_edge(id, under, 1.0);
        self.add_edge(id, prev, 1.0);

        self.add_face(id, last, prev);
        self.add_face(id, prev, under);

        self.finish_stitch(id, under);
        Ok(())
    }

    fn increase(&mut self) -> Result<()> {
        let anchor = match self.cursor.anchor {
            Some(anchor) if !self.cursor.anchor_spent => anchor,
            // First stitch of a round: move on to the next stitch.
            _ => return self.single_crochet(OperationKind::Increase),
        };
        if self.nodes[anchor.index()].is_ring() {
            self.cursor.ring_worked = true;
        }

        let id = self.add_node(OperationKind::Increase);
        let last = self.nodes[id.index()].last;
        self.nodes[id.index()].under = anchor;

        self.add_edge(id, last, 1.0);
        self.add_edge(id, anchor, 1.0);

        self.add_face(id, last, anchor);

        self.finish_stitch(id, anchor);
        Ok(())
    }

    fn decrease(&mut self) -> Result<()> {
        self.require(OperationKind::Decrease, 2)?;
        let middle = self.consume();
        let under = self.consume();
        let prev = self.cursor.anchor.unwrap_or(middle);

        let id = self.add_node(OperationKind::Decrease);
        let last = self.nodes[id.index()].last;
        self.nodes[id.index()].under = under;

        self.add_edge(id, last, 1.0);
        self.add_edge(id, prev, 1.0);
        self.add_edge(id, middle, 1.0);
        self.add_edge(id, under, 1.0);

        self.add_face(id, last, prev);
        self.add_face(id, prev, middle);
        self.add_face(id, middle, under);

        self.finish_stitch(id, under);
        Ok(())
    }

    fn slip_stitch(&mut self) -> Result<()> {
        match (self.outline.back(), self.outline.front()) {
            (Some(&newest), Some(&next)) if newest != next => {
                self.add_edge(newest, next, 0.0);
                Ok(())
            }
            _ => Err(PatternError::InsufficientStitches {
                op: OperationKind::SlipStitch,
                required: 2,
                available: self.outline.len(),
            }),
        }
    }

    fn finish_off(&mut self) {
        let live: Vec<NodeId> = self.outline.drain(..).collect();
        self.consumed += live.len();

        if !live.is_empty() {
            let (mut front, mut back) = (0, live.len() - 1);
            while front < back {
                self.add_joint(live[front], live[back]);
                front += 1;
                back -= 1;
            }
        }

        self.cursor.anchor_spent = true;
        self.cursor.ring_worked = false;
    }

    // ==================== Building blocks ====================

    fn begin_round(&mut self, len: usize) {
        // Stitches added outside `append` form a round of their own.
        if self.cursor.created > 0 {
            self.cursor.round += 1;
        }
        self.cursor.anchor_spent = true;
        self.cursor.round_len = len;
        self.cursor.created = 0;
    }

    fn end_round(&mut self) {
        if self.cursor.ring_worked {
            if let Some(&front) = self.outline.front() {
                if self.nodes[front.index()].is_ring() {
                    self.outline.pop_front();
                }
            }
            self.cursor.ring_worked = false;
        }
        self.cursor.round += 1;
        self.cursor.round_len = 0;
        self.cursor.created = 0;
    }

    /// Rounds used by existing nodes, including an open one.
    fn rounds_used(&self) -> usize {
        self.cursor.round + usize::from(self.cursor.created > 0)
    }

    /// Stitches that can be consumed; a ring anywhere in the outline never
    /// runs out.
    fn available(&self) -> usize {
        if self.outline.iter().any(|id| self.nodes[id.index()].is_ring()) {
            usize::MAX
        } else {
            self.outline.len()
        }
    }

    fn require(&self, op: OperationKind, required: usize) -> Result<()> {
        let available = self.available();
        if available < required {
            return Err(PatternError::InsufficientStitches {
                op,
                required,
                available,
            });
        }
        Ok(())
    }

    /// Take the next live stitch. Callers check availability first.
    fn consume(&mut self) -> NodeId {
        let front = self.outline[0];
        self.consumed += 1;
        if self.nodes[front.index()].is_ring() {
            self.cursor.ring_worked = true;
        } else {
            self.outline.pop_front();
        }
        front
    }

    fn add_node(&mut self, op: OperationKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let last = self.nodes.last().map_or(id, |node| node.id);
        // An open round never reaches 1, so its seeds stay below the next round.
        let created = self.cursor.created;
        let progress = created as f64 / self.cursor.round_len.max(created + 1) as f64;
        self.cursor.created += 1;

        if op != OperationKind::Loop && last != id && !self.nodes[last.index()].is_ring() {
            self.nodes[last.index()].next = id;
        }

        self.nodes.push(Node {
            id,
            last,
            next: id,
            under: id,
            op,
            round: self.cursor.round,
            progress,
        });
        id
    }

    fn finish_stitch(&mut self, id: NodeId, under: NodeId) {
        self.outline.push_back(id);
        self.cursor.anchor = Some(under);
        self.cursor.anchor_spent = false;
    }

    /// Self-edges carry no constraint and are skipped.
    fn add_edge(&mut self, from: NodeId, to: NodeId, distance: f64) {
        if from != to {
            self.edges.push(Edge { from, to, distance });
        }
    }

    fn add_joint(&mut self, from: NodeId, to: NodeId) {
        if from != to {
            self.joints.push(Joint { from, to });
        }
    }

    /// Add a triangle; triples with a repeated id are dropped.
    pub fn add_face(&mut self, a: NodeId, b: NodeId, c: NodeId) {
        if a == b || a == c || b == c {
            return;
        }
        self.faces.push(Face { ids: [a, b, c] });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::expand;

    fn ring_of(n: usize) -> PatternDef {
        PatternDef::with_loop().round(expand(Operation::SingleCrochet, n))
    }

    fn ball_start() -> PatternDef {
        PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(expand(Operation::SingleCrochet, 6))
    }

    #[test]
    fn test_loop_then_six_single_crochet() {
        let graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();

        assert_eq!(graph.num_nodes(), 7);
        let base = graph.node(NodeId::new(0));
        assert_eq!(base.last, NodeId::new(0));
        assert_eq!(base.next, NodeId::new(0));
        assert_eq!(base.under, NodeId::new(0));
        assert!(base.is_ring());

        assert_eq!(graph.num_edges(), 18);
        assert_eq!(graph.outline().len(), 6);
        assert_eq!(graph.stitches_consumed(), 6);
        // The first stitch has only the ring to connect to.
        assert_eq!(graph.num_faces(), 5);

        for node in &graph.nodes()[1..] {
            assert_eq!(node.under, NodeId::new(0));
        }
        let live: Vec<usize> = graph.outline().iter().map(|id| id.index()).collect();
        assert_eq!(live, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_loose_stitches_form_their_own_round() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        for _ in 0..3 {
            graph.add_operation(Operation::SingleCrochet).unwrap();
        }
        graph
            .append(&PatternDef::from_rounds(vec![vec![Operation::SingleCrochet; 6]]))
            .unwrap();

        let loose: Vec<(usize, f64)> = graph.nodes()[7..10]
            .iter()
            .map(|n| (n.round, n.progress))
            .collect();
        assert!(loose.iter().all(|&(round, _)| round == 2));
        assert!(loose.windows(2).all(|w| w[0].1 < w[1].1));
        assert!(loose.iter().all(|&(_, progress)| progress < 1.0));

        assert!(graph.nodes()[10..].iter().all(|n| n.round == 3));
        assert_eq!(graph.nodes()[10].progress, 0.0);
    }

    #[test]
    fn test_cylinder_outline_accounting() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        let consumed_before = graph.stitches_consumed();

        let round = vec![Operation::SingleCrochet; 6];
        let def = PatternDef::from_rounds(vec![round.clone(), round.clone(), round]);
        graph.begin_round(6);
        for _ in 0..6 {
            graph.add_operation(Operation::SingleCrochet).unwrap();
            assert_eq!(graph.outline().len(), 6);
        }
        graph.end_round();
        graph.append(&def).unwrap();

        assert_eq!(graph.outline().len(), 6);
        assert_eq!(graph.stitches_consumed() - consumed_before, 24);
        assert_eq!(graph.num_nodes(), 7 + 24);
    }

    #[test]
    fn test_next_round_works_into_previous() {
        let graph = PatternGraph::from_pattern(&ring_of(6).round(expand(Operation::SingleCrochet, 6)))
            .unwrap();

        for (offset, node) in graph.nodes()[7..].iter().enumerate() {
            assert_eq!(node.under, NodeId::new(offset + 1));
        }
        // The first stitch of the round closes the wedge left open by round one.
        assert!(graph
            .faces()
            .contains(&Face { ids: [NodeId::new(7), NodeId::new(0), NodeId::new(1)] }));
        assert_eq!(graph.num_faces(), 5 + 12);
        assert_eq!(graph.node(NodeId::new(6)).next, NodeId::new(7));
    }

    #[test]
    fn test_decrease_accounting() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        graph.begin_round(6);
        graph.add_operation(Operation::SingleCrochet).unwrap();

        let before = graph.stats();
        let consumed = graph.stitches_consumed();
        graph.add_operation(Operation::Decrease).unwrap();
        let after = graph.stats();

        assert_eq!(graph.stitches_consumed() - consumed, 2);
        assert_eq!(after.edges - before.edges, 4);
        assert_eq!(after.faces - before.faces, 3);
        assert_eq!(after.outline + 1, before.outline);
        assert_eq!(graph.node(NodeId::new(8)).under, NodeId::new(3));
    }

    #[test]
    fn test_increase_accounting() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        graph.begin_round(12);
        graph.add_operation(Operation::SingleCrochet).unwrap();

        let before = graph.stats();
        let consumed = graph.stitches_consumed();
        graph.add_operation(Operation::Increase).unwrap();
        let after = graph.stats();

        assert_eq!(graph.stitches_consumed(), consumed);
        assert_eq!(after.edges - before.edges, 2);
        assert_eq!(after.faces - before.faces, 1);
        assert_eq!(after.outline, before.outline + 1);
        // Shares the stitch the single crochet went into.
        assert_eq!(graph.node(NodeId::new(8)).under, graph.node(NodeId::new(7)).under);
    }

    #[test]
    fn test_magic_ring_works_into_loop() {
        let graph = PatternGraph::from_pattern(&ball_start()).unwrap();

        assert_eq!(graph.num_nodes(), 13);
        for node in &graph.nodes()[1..7] {
            assert_eq!(node.op, OperationKind::Increase);
            assert_eq!(node.under, NodeId::new(0));
        }
        // The ring is retired after the magic ring round.
        assert_eq!(graph.node(NodeId::new(7)).under, NodeId::new(1));
        assert_eq!(graph.outline().len(), 6);
    }

    #[test]
    fn test_unexpanded_magic_ring() {
        let def = PatternDef::with_loop().round(vec![
            Operation::MagicRing,
            Operation::Increase,
            Operation::Increase,
            Operation::Increase,
        ]);
        let graph = PatternGraph::from_pattern(&def).unwrap();

        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.outline().len(), 3);
        assert!(graph.nodes()[1..].iter().all(|n| n.under == NodeId::new(0)));
    }

    #[test]
    fn test_round_start_increase_moves_on() {
        let mut round = vec![Operation::Increase, Operation::Increase];
        round.extend(expand(Operation::SingleCrochet, 5));
        let def = ball_start().round(round);
        assert!(def.check_valid());
        let graph = PatternGraph::from_pattern(&def).unwrap();

        // The opening increase lands in the first live stitch, the second
        // shares it.
        assert_eq!(graph.node(NodeId::new(13)).under, NodeId::new(7));
        assert_eq!(graph.node(NodeId::new(14)).under, NodeId::new(7));
        assert_eq!(graph.node(NodeId::new(15)).under, NodeId::new(8));
        assert_eq!(graph.outline().len(), 7);
    }

    #[test]
    fn test_insufficient_stitches() {
        let def = PatternDef::from_rounds(vec![vec![Operation::SingleCrochet]]);
        let err = PatternGraph::from_pattern(&def).unwrap_err();
        match err {
            PatternError::Compile { round, operation, source } => {
                assert_eq!((round, operation), (0, 0));
                assert!(matches!(
                    *source,
                    PatternError::InsufficientStitches { op: OperationKind::SingleCrochet, .. }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decrease_needs_two() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6).round(vec![Operation::FinishOff]))
            .unwrap();
        let before = graph.stats();
        let err = graph.add_operation(Operation::Decrease).unwrap_err();
        assert!(matches!(
            err,
            PatternError::InsufficientStitches { required: 2, available: 0, .. }
        ));
        assert_eq!(graph.stats(), before);
    }

    #[test]
    fn test_error_carries_position() {
        let def = ring_of(6)
            .round(expand(Operation::Decrease, 3))
            .round(vec![Operation::SingleCrochet, Operation::FinishOff, Operation::Decrease]);
        let err = PatternGraph::from_pattern(&def).unwrap_err();
        assert!(matches!(err, PatternError::Compile { round: 3, operation: 2, .. }));
        assert!(err.to_string().starts_with("round 3, operation 2 failed: not enough points to apply DEC"));
    }

    #[test]
    fn test_finish_off_pairs_outline() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6).round(expand(Operation::SingleCrochet, 6)))
            .unwrap();
        graph.add_operation(Operation::FinishOff).unwrap();

        assert!(graph.outline().is_empty());
        assert_eq!(graph.num_joints(), 3);
        let pairs: Vec<(usize, usize)> = graph
            .joints()
            .iter()
            .map(|j| (j.from.index(), j.to.index()))
            .collect();
        assert_eq!(pairs, vec![(7, 12), (8, 11), (9, 10)]);
    }

    #[test]
    fn test_finish_off_odd_outline() {
        let def = ring_of(6)
            .round(vec![Operation::SingleCrochet, Operation::Increase, Operation::SingleCrochet]);
        let mut graph = PatternGraph::from_pattern(&def).unwrap();
        let live = graph.outline().len();
        assert_eq!(live, 7);

        graph.add_operation(Operation::FinishOff).unwrap();
        assert_eq!(graph.num_joints(), live / 2);
        assert!(graph.outline().is_empty());

        // Nothing left to close.
        graph.add_operation(Operation::FinishOff).unwrap();
        assert_eq!(graph.num_joints(), live / 2);
    }

    #[test]
    fn test_slip_stitch_seam() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6).round(vec![Operation::SingleCrochet; 2]))
            .unwrap();
        let edges = graph.num_edges();
        graph.add_operation(Operation::SlipStitch).unwrap();

        assert_eq!(graph.num_nodes(), 9);
        let seam = graph.edges()[edges];
        assert_eq!(seam.distance, 0.0);
        assert_eq!(seam.from, NodeId::new(8));
        assert_eq!(seam.to, NodeId::new(3));
    }

    #[test]
    fn test_join_operation() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        graph.add_operation(Operation::Join { node: 2, with: 5 }).unwrap();
        assert_eq!(graph.joints(), &[Joint { from: NodeId::new(2), to: NodeId::new(5) }]);

        let err = graph.add_operation(Operation::Join { node: 2, with: 7 }).unwrap_err();
        assert!(matches!(err, PatternError::InvalidReference { node: 7, len: 7 }));
        assert_eq!(graph.num_joints(), 1);
    }

    #[test]
    fn test_chain_is_noop() {
        let mut graph = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        let before = graph.stats();
        graph.add_operation(Operation::Chain).unwrap();
        assert_eq!(graph.stats(), before);
    }

    #[test]
    fn test_degenerate_faces_rejected() {
        let mut graph = PatternGraph::new();
        let a = NodeId::new(0);
        let b = NodeId::new(1);
        let c = NodeId::new(2);
        graph.add_face(a, a, b);
        graph.add_face(a, b, a);
        graph.add_face(b, a, a);
        graph.add_face(c, c, c);
        assert_eq!(graph.num_faces(), 0);
        graph.add_face(a, b, c);
        assert_eq!(graph.num_faces(), 1);
    }

    #[test]
    fn test_join_offsets_ids() {
        let a = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        let b = PatternGraph::from_pattern(&ball_start()).unwrap();
        let joined = a.join(&b);

        assert_eq!(joined.num_nodes(), 7 + 13);
        for (i, node) in joined.nodes().iter().enumerate() {
            assert_eq!(node.id.index(), i);
        }
        let offset = a.num_nodes();
        for (mine, theirs) in joined.edges()[a.num_edges()..].iter().zip(b.edges()) {
            assert_eq!(mine.from.index(), theirs.from.index() + offset);
            assert_eq!(mine.to.index(), theirs.to.index() + offset);
        }
        assert!(joined.edges()[a.num_edges()..]
            .iter()
            .all(|e| e.from.index() >= offset && e.to.index() >= offset));
        assert_eq!(joined.outline().len(), a.outline().len() + b.outline().len());

        // Inputs are untouched.
        assert_eq!(a.num_nodes(), 7);
        assert_eq!(b.num_nodes(), 13);
    }

    #[test]
    fn test_join_is_associative() {
        let a = PatternGraph::from_pattern(&ring_of(6)).unwrap();
        let b = PatternGraph::from_pattern(&ball_start()).unwrap();
        let mut c = PatternGraph::from_pattern(&ring_of(4)).unwrap();
        c.add_operation(Operation::FinishOff).unwrap();

        let left = a.join(&b).join(&c);
        let right = a.join(&b.join(&c));

        assert_eq!(left.stats(), right.stats());
        assert_eq!(left.edges(), right.edges());
        assert_eq!(left.faces(), right.faces());
        assert_eq!(left.joints(), right.joints());

        let c_start = a.num_nodes() + b.num_nodes();
        for joint in &left.joints()[a.num_joints() + b.num_joints()..] {
            assert!(joint.from.index() >= c_start && joint.to.index() >= c_start);
        }
    }
}
