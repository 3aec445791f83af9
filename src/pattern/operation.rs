//! Stitch operations.
//!
//! An [`Operation`] is one instruction of a crochet pattern. Most operations
//! are bare tags; [`Operation::Join`] carries the two stitches it sews
//! together. Counted instructions such as "6 sc" or "MR 6" are turned into
//! flat operation lists with [`expand`].

use std::fmt;
use std::str::FromStr;

use crate::error::{PatternError, Result};

/// The kind of a stitch operation, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    /// Base loop that a piece starts from.
    Loop,
    /// Chain stitch.
    Chain,
    /// Single crochet.
    SingleCrochet,
    /// Increase: an extra stitch into the current stitch.
    Increase,
    /// Decrease: one stitch worked over two.
    Decrease,
    /// Magic ring.
    MagicRing,
    /// Slip stitch.
    SlipStitch,
    /// Sew two existing stitches together.
    Join,
    /// Close the remaining live stitches.
    FinishOff,
}

impl OperationKind {
    /// All operation kinds, in declaration order.
    pub const ALL: [OperationKind; 9] = [
        OperationKind::Loop,
        OperationKind::Chain,
        OperationKind::SingleCrochet,
        OperationKind::Increase,
        OperationKind::Decrease,
        OperationKind::MagicRing,
        OperationKind::SlipStitch,
        OperationKind::Join,
        OperationKind::FinishOff,
    ];

    /// The pattern-notation abbreviation for this kind.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OperationKind::Loop => "LP",
            OperationKind::Chain => "CH",
            OperationKind::SingleCrochet => "SC",
            OperationKind::Increase => "INC",
            OperationKind::Decrease => "DEC",
            OperationKind::MagicRing => "MR",
            OperationKind::SlipStitch => "SLST",
            OperationKind::Join => "JOIN",
            OperationKind::FinishOff => "FO",
        }
    }

    /// Number of previous-round stitches this kind works into.
    ///
    /// Returns `None` for kinds where the count is not meaningful.
    pub fn required_stitches(self) -> Option<usize> {
        match self {
            OperationKind::Loop => Some(0),
            OperationKind::SingleCrochet => Some(1),
            OperationKind::Increase => Some(0),
            OperationKind::Decrease => Some(2),
            _ => None,
        }
    }

    /// Whether compiling this kind creates a new stitch node.
    pub fn creates_node(self) -> bool {
        matches!(
            self,
            OperationKind::Loop
                | OperationKind::SingleCrochet
                | OperationKind::Increase
                | OperationKind::Decrease
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for OperationKind {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        OperationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.mnemonic() == upper)
            .ok_or_else(|| PatternError::UnknownOperation(s.to_string()))
    }
}

/// A single resolved stitch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Base loop.
    Loop,
    /// Chain stitch.
    Chain,
    /// Single crochet.
    SingleCrochet,
    /// Increase.
    Increase,
    /// Decrease.
    Decrease,
    /// Magic ring (normally expanded to increases before compilation).
    MagicRing,
    /// Slip stitch.
    SlipStitch,
    /// Sew stitch `node` to stitch `with`.
    Join {
        /// First stitch id.
        node: usize,
        /// Second stitch id.
        with: usize,
    },
    /// Finish off.
    FinishOff,
}

impl Operation {
    /// The payload-free kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Loop => OperationKind::Loop,
            Operation::Chain => OperationKind::Chain,
            Operation::SingleCrochet => OperationKind::SingleCrochet,
            Operation::Increase => OperationKind::Increase,
            Operation::Decrease => OperationKind::Decrease,
            Operation::MagicRing => OperationKind::MagicRing,
            Operation::SlipStitch => OperationKind::SlipStitch,
            Operation::Join { .. } => OperationKind::Join,
            Operation::FinishOff => OperationKind::FinishOff,
        }
    }

    /// Build an operation from its kind and the optional join payload.
    ///
    /// `node` and `with` are only read for [`OperationKind::Join`], where both
    /// are required.
    pub fn from_kind(kind: OperationKind, node: Option<usize>, with: Option<usize>) -> Result<Self> {
        Ok(match kind {
            OperationKind::Loop => Operation::Loop,
            OperationKind::Chain => Operation::Chain,
            OperationKind::SingleCrochet => Operation::SingleCrochet,
            OperationKind::Increase => Operation::Increase,
            OperationKind::Decrease => Operation::Decrease,
            OperationKind::MagicRing => Operation::MagicRing,
            OperationKind::SlipStitch => Operation::SlipStitch,
            OperationKind::FinishOff => Operation::FinishOff,
            OperationKind::Join => Operation::Join {
                node: node.ok_or(PatternError::MissingField {
                    context: "JOIN operation",
                    field: "node",
                })?,
                with: with.ok_or(PatternError::MissingField {
                    context: "JOIN operation",
                    field: "with",
                })?,
            },
        })
    }

    /// Shorthand for [`OperationKind::required_stitches`].
    pub fn required_stitches(&self) -> Option<usize> {
        self.kind().required_stitches()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Join { node, with } => write!(f, "JOIN({}, {})", node, with),
            other => f.write_str(other.kind().mnemonic()),
        }
    }
}

/// Expand a counted operation into a flat list.
///
/// A magic ring of `count` is built from `count` increases with nothing
/// before them; every other operation is simply repeated `count` times.
///
/// # Example
///
/// ```
/// use amigurumi::pattern::{expand, Operation};
///
/// let ops = expand(Operation::MagicRing, 6);
/// assert_eq!(ops, vec![Operation::Increase; 6]);
///
/// let ops = expand(Operation::SingleCrochet, 3);
/// assert_eq!(ops.len(), 3);
/// ```
pub fn expand(op: Operation, count: usize) -> Vec<Operation> {
    match op {
        Operation::MagicRing => vec![Operation::Increase; count],
        other => vec![other; count],
    }
}
