//! Multi-part amigurumi documents.
//!
//! A document is a JSON list of commands. `pattern` commands compile rounds
//! into a part; `join` commands merge two parts into a new one.
//!
//! ```
//! use amigurumi::io::Amigurumi;
//!
//! let json = r#"{ "commands": [
//!     { "type": "pattern", "id": 0, "rounds": [
//!         [ { "op": "LP" } ],
//!         [ { "op": "MR", "count": 6 } ] ] },
//!     { "type": "pattern", "id": 1, "rounds": [
//!         [ { "op": "LP" } ],
//!         [ { "op": "SC", "count": 6 } ] ] },
//!     { "type": "join", "pattern": 0, "with": 1, "make": 2 }
//! ] }"#;
//!
//! let doll = Amigurumi::from_json(json).unwrap();
//! assert_eq!(doll.current_id(), Some(2));
//! assert_eq!(doll.current().unwrap().num_nodes(), 14);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{PatternError, Result};
use crate::graph::PatternGraph;
use crate::pattern::{expand, Operation, OperationKind, PatternDef, Round};

/// A parsed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Commands, executed in order.
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One document command.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    /// Compile rounds into part `id`, appending if it exists.
    Pattern {
        /// Part id.
        id: Option<u32>,
        /// Rounds of counted operations.
        #[serde(default)]
        rounds: Vec<Vec<OperationSpec>>,
    },
    /// Store `pattern` joined with `with` as `make`.
    Join {
        /// First part.
        pattern: Option<u32>,
        /// Second part, renumbered after the first.
        with: Option<u32>,
        /// Id of the result.
        make: Option<u32>,
    },
}

/// A counted operation as written in a document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationSpec {
    /// Mnemonic such as `"SC"` or `"MR"`.
    pub op: Option<String>,
    /// Repeat count, 1 if absent.
    pub count: Option<usize>,
    /// First stitch of a `JOIN`.
    pub node: Option<usize>,
    /// Second stitch of a `JOIN`.
    pub with: Option<usize>,
}

impl OperationSpec {
    /// Resolve into a flat list of operations.
    pub fn to_operations(&self) -> Result<Vec<Operation>> {
        let name = self.op.as_deref().ok_or(PatternError::MissingField {
            context: "operation",
            field: "op",
        })?;
        let kind: OperationKind = name.parse()?;
        let op = Operation::from_kind(kind, self.node, self.with)?;
        Ok(expand(op, self.count.unwrap_or(1)))
    }
}

/// Resolve the rounds of a `pattern` command into a pattern definition.
pub fn build_pattern(rounds: &[Vec<OperationSpec>]) -> Result<PatternDef> {
    let mut def = PatternDef::new();
    for specs in rounds {
        let mut round = Round::new();
        for spec in specs {
            round.extend(spec.to_operations()?);
        }
        def.add_round(round);
    }
    Ok(def)
}

/// The parts built by a document.
#[derive(Debug, Clone, Default)]
pub struct Amigurumi {
    parts: BTreeMap<u32, PatternGraph>,
    current: Option<u32>,
}

impl Amigurumi {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute every command of a document.
    ///
    /// Errors are reported with the index of the failing command.
    pub fn from_document(document: &Document) -> Result<Self> {
        if document.commands.is_empty() {
            warn!("document has no commands");
        }
        let mut amigurumi = Self::new();
        for (index, command) in document.commands.iter().enumerate() {
            amigurumi
                .execute(command)
                .map_err(|e| e.in_command(index))?;
        }
        Ok(amigurumi)
    }

    /// Parse and execute a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(&Document::from_json(json)?)
    }

    /// Read and execute a JSON document file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Execute one command.
    ///
    /// A failed `pattern` command leaves any existing part unchanged.
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Pattern { id, rounds } => {
                let id = id.ok_or(PatternError::MissingField {
                    context: "pattern command",
                    field: "id",
                })?;
                let def = build_pattern(rounds)?;
                let graph = match self.parts.get(&id) {
                    Some(existing) => {
                        let mut graph = existing.clone();
                        graph.append(&def)?;
                        graph
                    }
                    None => PatternGraph::from_pattern(&def)?,
                };
                debug!("part {} compiled: {} nodes", id, graph.num_nodes());
                self.parts.insert(id, graph);
                self.current = Some(id);
            }
            Command::Join {
                pattern,
                with,
                make,
            } => {
                let missing = |field| PatternError::MissingField {
                    context: "join command",
                    field,
                };
                let pattern = pattern.ok_or_else(|| missing("pattern"))?;
                let with = with.ok_or_else(|| missing("with"))?;
                let make = make.ok_or_else(|| missing("make"))?;

                let first = self.part(pattern).ok_or(PatternError::UnknownPart { id: pattern })?;
                let second = self.part(with).ok_or(PatternError::UnknownPart { id: with })?;
                let joined = first.join(second);
                debug!(
                    "parts {} and {} joined into {}: {} nodes",
                    pattern,
                    with,
                    make,
                    joined.num_nodes()
                );
                self.parts.insert(make, joined);
                self.current = Some(make);
            }
        }
        Ok(())
    }

    /// A part by id.
    pub fn part(&self, id: u32) -> Option<&PatternGraph> {
        self.parts.get(&id)
    }

    /// All parts, by id.
    pub fn parts(&self) -> &BTreeMap<u32, PatternGraph> {
        &self.parts
    }

    /// Id of the most recently built part.
    pub fn current_id(&self) -> Option<u32> {
        self.current
    }

    /// The most recently built part.
    pub fn current(&self) -> Option<&PatternGraph> {
        self.current.and_then(|id| self.parts.get(&id))
    }

    /// Take ownership of the most recently built part.
    pub fn into_current(mut self) -> Option<PatternGraph> {
        self.current.and_then(|id| self.parts.remove(&id))
    }
}
