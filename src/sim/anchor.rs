//! Pinned node positions.

use nalgebra::Point3;
use serde::Deserialize;

use crate::error::{PatternError, Result};
use crate::graph::NodeId;

/// A node held at a fixed world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// The pinned node.
    pub node: NodeId,
    /// Where it is held.
    pub position: Point3<f64>,
}

impl Anchor {
    /// Pin `node` at `position`.
    pub fn new(node: impl Into<NodeId>, position: Point3<f64>) -> Self {
        Self {
            node: node.into(),
            position,
        }
    }
}

/// An anchor as written in configuration, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnchorSpec {
    /// Node id.
    pub node: Option<usize>,
    /// `[x, y, z]`.
    pub position: Option<[f64; 3]>,
}

impl TryFrom<AnchorSpec> for Anchor {
    type Error = PatternError;

    fn try_from(spec: AnchorSpec) -> Result<Self> {
        let node = spec.node.ok_or(PatternError::MissingField {
            context: "anchor",
            field: "node",
        })?;
        let [x, y, z] = spec.position.ok_or(PatternError::MissingField {
            context: "anchor",
            field: "position",
        })?;
        Ok(Anchor::new(node, Point3::new(x, y, z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spec() {
        let spec: AnchorSpec = serde_json::from_str(r#"{ "node": 3, "position": [1, 2, 3] }"#).unwrap();
        let anchor = Anchor::try_from(spec).unwrap();
        assert_eq!(anchor.node, NodeId::new(3));
        assert_eq!(anchor.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_missing_fields() {
        let spec: AnchorSpec = serde_json::from_str(r#"{ "position": [0, 0, 0] }"#).unwrap();
        assert!(matches!(
            Anchor::try_from(spec),
            Err(PatternError::MissingField { field: "node", .. })
        ));

        let spec: AnchorSpec = serde_json::from_str(r#"{ "node": 1 }"#).unwrap();
        assert!(matches!(
            Anchor::try_from(spec),
            Err(PatternError::MissingField { field: "position", .. })
        ));
    }
}
