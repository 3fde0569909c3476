//! Shared vocabulary of the Algol 68 mode checker.
//!
//! ## Modules
//!
//! - [`span`]: source locations
//! - [`ids`]: typed arena indices for modes, nodes, tags and scopes
//! - [`mode`]: structural description of modes
//! - [`sort`]: coercion contexts, deflexing policies, clause kinds
//! - [`tree`]: the syntax tree both checking passes walk
//! - [`error`]: diagnostics

pub mod error;
pub mod ids;
pub mod mode;
pub mod sort;
pub mod span;
pub mod tree;

pub use error::{Diagnostic, DiagnosticKind, Diagnostics, ModeError, RegistryError, Severity};
pub use ids::{ModeId, NodeId, ScopeId, TagId};
pub use mode::{ModeKind, Pack, PackEntry, Primitive, Standard};
pub use sort::{ClauseKind, Deflex, Operations, Sort};
pub use span::Span;
pub use tree::{
    BoolFunction, CoercionKind, ConformityArm, Indexer, Literal, Node, NodeKind, SyntaxTree,
};
