//! Stitch operations and pattern definitions.
//!
//! A pattern is written as rounds of stitch operations, the way crochet
//! patterns are usually published:
//!
//! ```text
//! R1: MR 6
//! R2: (sc, inc) x6
//! R3: sc x12
//! ```
//!
//! [`Operation`] is one stitch instruction, [`expand`] turns counted
//! instructions into flat lists, and [`PatternDef`] holds the rounds.
//!
//! ```
//! use amigurumi::pattern::{expand, Operation, PatternDef};
//!
//! let def = PatternDef::with_loop()
//!     .round(expand(Operation::MagicRing, 6))
//!     .round(expand(Operation::SingleCrochet, 6));
//!
//! assert_eq!(def.num_rounds(), 3);
//! assert!(def.check_valid());
//! ```

mod def;
mod operation;

pub use def::{PatternDef, Round};
pub use operation::{expand, Operation, OperationKind};
