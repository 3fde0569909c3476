//! Coercion contexts.
//!
//! ## Sorts
//!
//! Every position in a program imposes a *sort* on the unit standing there.
//! The sorts form a chain; each permits every coercion of the weaker ones:
//!
//! ```text
//! SOFT    deprocedure (niladic PROC)
//! WEAK    + dereference, repeatedly
//! MEEK    same operations as WEAK, unrestricted
//! FIRM    + unite
//! STRONG  + row, widen, void
//! ```
//!
//! ## Deflexing
//!
//! Orthogonal to the sort, a [`Deflex`] policy decides whether `FLEX [] T`
//! and `[] T` compare equal in one particular test.

use std::fmt;

use bitflags::bitflags;

/// Strength of a syntactic position, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Sort {
    /// No coercion at all; only identical modes match.
    #[default]
    NoSort,
    Soft,
    Weak,
    Meek,
    Firm,
    Strong,
}

bitflags! {
    /// Coercion steps a context permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Operations: u8 {
        const DEPROCEDURE = 0b0000_0001;
        const DEREFERENCE = 0b0000_0010;
        const UNITE       = 0b0000_0100;
        const ROW         = 0b0000_1000;
        const WIDEN       = 0b0001_0000;
        const VOID        = 0b0010_0000;
    }
}

impl Sort {
    /// All sorts from weakest to strongest, excluding `NoSort`.
    pub const CONTEXTS: [Sort; 5] = [Sort::Soft, Sort::Weak, Sort::Meek, Sort::Firm, Sort::Strong];

    /// The coercion steps this sort allows.
    pub fn operations(self) -> Operations {
        match self {
            Sort::NoSort => Operations::empty(),
            Sort::Soft => Operations::DEPROCEDURE,
            Sort::Weak | Sort::Meek => Operations::DEPROCEDURE | Operations::DEREFERENCE,
            Sort::Firm => Sort::Meek.operations() | Operations::UNITE,
            Sort::Strong => Operations::all(),
        }
    }

    /// Whether this sort permits the given step.
    #[inline]
    pub fn allows(self, op: Operations) -> bool {
        self.operations().contains(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sort::NoSort => "no",
            Sort::Soft => "soft",
            Sort::Weak => "weak",
            Sort::Meek => "meek",
            Sort::Firm => "firm",
            Sort::Strong => "strong",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How fixed and flexible rows compare in one equality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deflex {
    /// `FLEX` is ignored at every level, names included.
    Force,
    /// `FLEX` is ignored between values; names must agree exactly.
    Alias,
    /// `FLEX` is ignored between values. A name of a flexible row may stand
    /// where a name of a fixed row is required, never the reverse.
    Safe,
    /// `FLEX` always matters.
    None,
}

/// The construct a yielded mode came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClauseKind {
    #[default]
    Unit,
    Serial,
    Closed,
    Collateral,
    Conditional,
    IntCase,
    Conformity,
    Loop,
    Enquiry,
    Argument,
    Operand,
    Declaration,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKind::Unit => "unit",
            ClauseKind::Serial => "serial clause",
            ClauseKind::Closed => "closed clause",
            ClauseKind::Collateral => "collateral clause",
            ClauseKind::Conditional => "conditional clause",
            ClauseKind::IntCase => "case clause",
            ClauseKind::Conformity => "conformity clause",
            ClauseKind::Loop => "loop clause",
            ClauseKind::Enquiry => "enquiry clause",
            ClauseKind::Argument => "argument",
            ClauseKind::Operand => "operand",
            ClauseKind::Declaration => "declaration",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
