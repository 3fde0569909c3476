//! Type-context descriptors.
//!
//! A [`Soid`] pairs a sort with a mode. Passed down the tree it says what a
//! position requires; returned up it says what a unit yields. Both
//! directions use the same value, built fresh at every step.

use a68_core::{ClauseKind, ModeId, Sort};
use a68_registry::standard::{ERROR, UNDEFINED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Soid {
    pub sort: Sort,
    pub mode: ModeId,
    pub clause: ClauseKind,
    /// Set on the operand of a cast, which relaxes voiding warnings.
    pub cast: bool,
}

impl Soid {
    pub fn new(sort: Sort, mode: ModeId) -> Self {
        Self {
            sort,
            mode,
            clause: ClauseKind::Unit,
            cast: false,
        }
    }

    /// A requirement of the given strength whose mode the unit decides.
    pub fn open(sort: Sort) -> Self {
        Self::new(sort, UNDEFINED)
    }

    /// The yield of a unit whose failure has been diagnosed.
    pub fn error(sort: Sort) -> Self {
        Self::new(sort, ERROR)
    }

    pub fn strong(mode: ModeId) -> Self {
        Self::new(Sort::Strong, mode)
    }

    pub fn with_clause(mut self, clause: ClauseKind) -> Self {
        self.clause = clause;
        self
    }

    pub fn as_cast(mut self) -> Self {
        self.cast = true;
        self
    }

    /// Whether the required mode is still to be determined.
    pub fn is_open(&self) -> bool {
        self.mode == UNDEFINED
    }

    /// A strong context with a known mode; enclosed clauses hand it down
    /// to their branches instead of balancing.
    pub fn is_strong_and_known(&self) -> bool {
        self.sort == Sort::Strong && !self.is_open()
    }

    /// The same context yielding `mode`.
    pub fn yielding(&self, mode: ModeId) -> Soid {
        Soid {
            sort: self.sort,
            mode,
            clause: self.clause,
            cast: self.cast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a68_registry::standard::INT;

    #[test]
    fn open_soids_have_no_mode_yet() {
        assert!(Soid::open(Sort::Firm).is_open());
        assert!(!Soid::strong(INT).is_open());
    }

    #[test]
    fn strong_known_requires_both() {
        assert!(Soid::strong(INT).is_strong_and_known());
        assert!(!Soid::open(Sort::Strong).is_strong_and_known());
        assert!(!Soid::new(Sort::Meek, INT).is_strong_and_known());
    }

    #[test]
    fn yielding_keeps_context() {
        let x = Soid::new(Sort::Firm, INT).with_clause(ClauseKind::Operand);
        let y = x.yielding(ERROR);
        assert_eq!(y.sort, Sort::Firm);
        assert_eq!(y.clause, ClauseKind::Operand);
        assert_eq!(y.mode, ERROR);
    }
}
