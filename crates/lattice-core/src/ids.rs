//! Identifier types for syntax nodes, graph nodes and build units.
//!
//! All ids are plain indices. A [`NodeId`] is handed out by whoever allocates
//! the syntax tree; [`ScopeId`] and [`VertexId`] index the graph and vertex
//! arenas; a [`UnitId`] names an external build unit returned by an import
//! loader.

use std::fmt;

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Create a new id with the given index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Get the underlying index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

index_id!(
    /// Identity of one syntax node.
    ///
    /// Two distinct nodes never share an id within one syntax tree, so the id
    /// can key per-build caches without relying on pointer identity.
    NodeId,
    "node"
);

index_id!(
    /// Index of a record, lambda or package in a [`Graph`](crate::adt::Graph).
    ScopeId,
    "scope"
);

index_id!(
    /// Index of a [`Vertex`](crate::adt::Vertex) in a
    /// [`Vertices`](crate::adt::Vertices) arena.
    VertexId,
    "vertex"
);

index_id!(
    /// Identifies an external build unit.
    ///
    /// Returned by an import loader and handed back to it when the unit's root
    /// value is needed.
    ///
    /// # Example
    ///
    /// ```
    /// use lattice_core::UnitId;
    ///
    /// let unit = UnitId::new(0);
    /// assert_eq!(unit.index(), 0);
    /// ```
    UnitId,
    "unit"
);
