//! Node identifiers.
//!
//! Stitch nodes live in a flat, append-only arena and are referred to by
//! [`NodeId`]. Ids are dense, start at zero, and stay valid for the lifetime
//! of the graph that issued them.

use std::fmt::{self, Debug};

/// A type-safe stitch node index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new id from a raw index.
    ///
    /// # Panics
    /// Panics in debug builds if the index does not fit in 32 bits.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "node index {} too large", index);
        Self(index as u32)
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw value as stored.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// This id shifted by `offset`, used when graphs are joined.
    #[inline]
    pub fn offset(self, offset: usize) -> Self {
        Self::new(self.index() + offset)
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(v: usize) -> Self {
        Self::new(v)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let n = NodeId::new(42);
        assert_eq!(n.index(), 42);
        assert_eq!(n.raw(), 42u32);
        assert_eq!(usize::from(n), 42);
    }

    #[test]
    fn test_offset() {
        let n: NodeId = 5.into();
        assert_eq!(n.offset(10), NodeId::new(15));
        assert_eq!(n.offset(0), n);
    }

    #[test]
    fn test_debug_format() {
        let n = NodeId::new(7);
        assert_eq!(format!("{:?}", n), "N(7)");
        assert_eq!(format!("{}", n), "7");
    }
}
