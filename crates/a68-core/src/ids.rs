//! Typed arena indices.
//!
//! Modes, syntax nodes, symbol-table tags and scopes all live in arenas
//! owned by one checking session. These newtypes keep the four index
//! spaces from being mixed up.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            /// The index as a `usize`, for slicing into the owning arena.
            #[inline]
            pub const fn slot(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }
    };
}

arena_id!(
    /// A canonical mode in a `ModeRegistry`.
    ///
    /// After interning, two structurally equal modes share one `ModeId`, so
    /// `p == q` is a complete type-equality test.
    ModeId,
    "mode"
);

arena_id!(
    /// A node in a `SyntaxTree`.
    NodeId,
    "node"
);

arena_id!(
    /// A declared identifier, operator or label in a `SymbolTable`.
    TagId,
    "tag"
);

arena_id!(
    /// A lexical range in a `SymbolTable`.
    ScopeId,
    "scope"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_their_index() {
        assert_eq!(ModeId::new(7).index(), 7);
        assert_eq!(NodeId::from(3).slot(), 3);
    }

    #[test]
    fn ids_display_with_their_arena_prefix() {
        assert_eq!(ModeId::new(4).to_string(), "mode#4");
        assert_eq!(format!("{:?}", ScopeId::new(0)), "scope#0");
    }

    #[test]
    fn ids_order_by_index() {
        assert!(TagId::new(1) < TagId::new(2));
    }
}
