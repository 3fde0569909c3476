//! Mode and symbol registries for the Algol 68 mode checker.
//!
//! - [`modes`]: canonicalizing mode arena with derived relations
//! - [`standard`]: ids of the modes every registry is seeded with
//! - [`symbols`]: tags declared in nested ranges
//! - [`prelude`]: the standard environ
//!
//! Each compilation owns one [`ModeRegistry`]; ids from one registry mean
//! nothing in another.

mod equivalence;
pub mod modes;
pub mod prelude;
pub mod standard;
pub mod symbols;

pub use a68_core::TagId;
pub use equivalence::are_equivalent;
pub use modes::{Mode, ModeRegistry};
pub use prelude::StandardEnviron;
pub use symbols::{ScopeData, ScopeEdge, SymbolTable, Tag, TagKind};
