//! Reading documents and configuration, writing meshes.
//!
//! # Inputs
//!
//! - Amigurumi documents ([`Amigurumi`], [`Document`])
//! - Anchor lists ([`load_anchors`], [`parse_anchors`])
//! - Solver options ([`load_options`])
//!
//! # Outputs
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | STL | `.stl` | Binary |
//! | PLY | `.ply` | ASCII |
//!
//! ```no_run
//! use amigurumi::io::{export, Amigurumi};
//! use amigurumi::sim::{MeshSolver, SolverOptions};
//!
//! let doll = Amigurumi::load("ball.json").unwrap();
//! let mut solver = MeshSolver::new(doll.current().unwrap(), &[], SolverOptions::default()).unwrap();
//! solver.run(500, 1.0 / 60.0);
//! export(&solver, "ball.stl").unwrap();
//! ```

pub mod document;
pub mod ply;
pub mod stl;

pub use document::{build_pattern, Amigurumi, Command, Document, OperationSpec};

use std::path::Path;

use log::warn;

use crate::error::{PatternError, Result};
use crate::sim::{Anchor, AnchorSpec, MeshSolver, SolverOptions};

/// Supported mesh output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Write the solver's current mesh, choosing the format by extension.
pub fn export<P: AsRef<Path>>(solver: &MeshSolver, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| PatternError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    if solver.triangles().is_empty() {
        warn!("exporting a mesh with no faces to {}", path.display());
    }

    match format {
        Format::Stl => stl::save(solver.positions(), solver.triangles(), path),
        Format::Ply => ply::save(solver.positions(), solver.triangles(), path),
    }
}

/// Parse a JSON list of anchors.
///
/// ```
/// use amigurumi::io::parse_anchors;
///
/// let anchors = parse_anchors(r#"[ { "node": 0, "position": [0, 0, 0] } ]"#).unwrap();
/// assert_eq!(anchors.len(), 1);
/// ```
pub fn parse_anchors(json: &str) -> Result<Vec<Anchor>> {
    let specs: Vec<AnchorSpec> = serde_json::from_str(json)?;
    specs.into_iter().map(Anchor::try_from).collect()
}

/// Read a JSON anchor file.
pub fn load_anchors<P: AsRef<Path>>(path: P) -> Result<Vec<Anchor>> {
    let text = std::fs::read_to_string(path)?;
    parse_anchors(&text)
}

/// Read and validate a JSON solver configuration file.
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<SolverOptions> {
    let text = std::fs::read_to_string(path)?;
    let options: SolverOptions = serde_json::from_str(&text)?;
    options.validate()?;
    Ok(options)
}
