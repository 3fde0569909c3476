//! Algol 68 mode checking.
//!
//! Given a parsed program whose declarations have been collected, a
//! [`Session`] derives the mode of every unit, reports what does not fit
//! its context, and rewrites the tree so that every coercion is an
//! explicit node.
//!
//! ```
//! use a68_modes::{Literal, NodeKind, Session, Span, SyntaxTree, standard};
//!
//! let mut session = Session::new();
//! let scope = session.symbols().standard_scope();
//!
//! let mut tree = SyntaxTree::new();
//! let one = tree.push(NodeKind::Denotation(Literal::Int { value: 1, size: 0 }), Span::default(), scope);
//! let real = tree.push(NodeKind::Cast { mode: standard::REAL, operand: one }, Span::default(), scope);
//! tree.set_root(real);
//!
//! let program = session.check_program(tree).unwrap();
//! assert!(!program.has_errors());
//! ```
//!
//! The passes themselves live in [`a68_checker`]; modes and symbols in
//! [`a68_registry`]; the shared vocabulary in [`a68_core`].

mod error;
mod session;

pub use error::{Result, SessionError};
pub use session::{CheckedProgram, Session};

pub use a68_checker::{CallShape, CheckerOptions, SideTables, Soid};
pub use a68_core::{
    ClauseKind, CoercionKind, Deflex, Diagnostic, DiagnosticKind, Diagnostics, Literal, ModeError,
    ModeId, ModeKind, NodeId, NodeKind, ScopeId, Severity, Sort, Span, SyntaxTree, TagId,
};
pub use a68_registry::{ModeRegistry, SymbolTable, standard};

pub use a68_checker;
pub use a68_core;
pub use a68_registry;
