//! Diagnostics produced while checking modes.
//!
//! ## Hierarchy
//!
//! ```text
//! ModeError        - one finding of the mode checker (error or warning)
//! ├── Diagnostic   - a ModeError with its severity and offending node
//! └── Diagnostics  - the per-session sink
//! RegistryError    - misuse of the mode registry or symbol table API
//! ```
//!
//! Checking never stops at the first problem. Each finding is pushed into
//! [`Diagnostics`] and the offending node gets the error mode, which every
//! later coercion test treats as compatible with anything.

use std::fmt;

use thiserror::Error;

use crate::{ClauseKind, ModeId, NodeId, ScopeId, Sort, Span};

fn reasons_suffix(reasons: &[String]) -> String {
    if reasons.is_empty() {
        String::new()
    } else {
        format!(" ({})", reasons.join("; "))
    }
}

// ============================================================================
// Mode errors
// ============================================================================

/// A finding of the mode checker.
///
/// Modes are rendered to text when the error is created, so a `ModeError`
/// outlives the registry that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModeError {
    /// The yielded mode cannot be coerced to the required one.
    #[error("at {span}: {found} cannot be coerced to {expected} in a {sort} context{}", reasons_suffix(.reasons))]
    ModeMismatch {
        found: String,
        expected: String,
        sort: Sort,
        clause: ClauseKind,
        reasons: Vec<String>,
        span: Span,
    },

    /// The branches of a clause have no common mode.
    #[error("at {span}: no unique mode for the {clause} yielding {modes}")]
    NoUniqueMode {
        clause: ClauseKind,
        modes: String,
        span: Span,
    },

    #[error("at {span}: {what} '{name}' has not been declared")]
    UndeclaredTag {
        what: &'static str,
        name: String,
        span: Span,
    },

    #[error("at {span}: no operator {operator} for {operands}")]
    NoOperator {
        operator: String,
        operands: String,
        span: Span,
    },

    #[error("at {span}: expected {expected} arguments, found {found}")]
    ArgumentCount {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("at {span}: row has {expected} dimensions but {found} indexers were given")]
    IndexerCount {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("at {span}: {mode} has no field '{field}'")]
    UnknownField {
        field: String,
        mode: String,
        span: Span,
    },

    #[error("at {span}: {mode} is not a name")]
    NotAName { mode: String, span: Span },

    #[error("at {span}: {mode} cannot be called")]
    NotAProcedure { mode: String, span: Span },

    #[error("at {span}: {mode} cannot be sliced")]
    NotARow { mode: String, span: Span },

    #[error("at {span}: {mode} has no fields")]
    NotAStructure { mode: String, span: Span },

    #[error("at {span}: conformity clause needs a united mode, found {mode}")]
    NotAUnion { mode: String, span: Span },

    #[error("at {span}: {specifier} is not a member of {union}")]
    SpecifierNotInUnion {
        specifier: String,
        union: String,
        span: Span,
    },

    #[error("at {span}: NIL cannot stand where {expected} is required")]
    NilNeedsName { expected: String, span: Span },

    #[error("at {span}: a display needs a strong context")]
    DisplayContext { span: Span },

    /// A warning: a value is computed and thrown away.
    #[error("at {span}: value of mode {mode} will be voided")]
    ValueVoided { mode: String, span: Span },

    /// A tree shape the grammar rules out.
    #[error("at {span}: internal error: {message}")]
    Internal { message: String, span: Span },
}

impl ModeError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ModeError::ModeMismatch { span, .. }
            | ModeError::NoUniqueMode { span, .. }
            | ModeError::UndeclaredTag { span, .. }
            | ModeError::NoOperator { span, .. }
            | ModeError::ArgumentCount { span, .. }
            | ModeError::IndexerCount { span, .. }
            | ModeError::UnknownField { span, .. }
            | ModeError::NotAName { span, .. }
            | ModeError::NotAProcedure { span, .. }
            | ModeError::NotARow { span, .. }
            | ModeError::NotAStructure { span, .. }
            | ModeError::NotAUnion { span, .. }
            | ModeError::SpecifierNotInUnion { span, .. }
            | ModeError::NilNeedsName { span, .. }
            | ModeError::DisplayContext { span }
            | ModeError::ValueVoided { span, .. }
            | ModeError::Internal { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ModeError::ModeMismatch { .. }
            | ModeError::NilNeedsName { .. }
            | ModeError::DisplayContext { .. } => DiagnosticKind::ModeMismatch,
            ModeError::NoUniqueMode { .. } => DiagnosticKind::NoUniqueMode,
            ModeError::UndeclaredTag { .. } => DiagnosticKind::UndeclaredTag,
            ModeError::NoOperator { .. } => DiagnosticKind::NoOperator,
            ModeError::ArgumentCount { .. }
            | ModeError::IndexerCount { .. }
            | ModeError::UnknownField { .. } => DiagnosticKind::Arity,
            ModeError::NotAName { .. }
            | ModeError::NotAProcedure { .. }
            | ModeError::NotARow { .. }
            | ModeError::NotAStructure { .. }
            | ModeError::NotAUnion { .. }
            | ModeError::SpecifierNotInUnion { .. } => DiagnosticKind::Shape,
            ModeError::ValueVoided { .. } => DiagnosticKind::Voided,
            ModeError::Internal { .. } => DiagnosticKind::Internal,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ModeError::ValueVoided { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Coarse classification of a [`ModeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    ModeMismatch,
    NoUniqueMode,
    UndeclaredTag,
    NoOperator,
    /// Argument count, indexer count or field name.
    Arity,
    /// An operation applied to a mode of the wrong shape.
    Shape,
    Voided,
    Internal,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::ModeMismatch => "mode-mismatch",
            DiagnosticKind::NoUniqueMode => "no-unique-mode",
            DiagnosticKind::UndeclaredTag => "undeclared-tag",
            DiagnosticKind::NoOperator => "no-operator",
            DiagnosticKind::Arity => "arity",
            DiagnosticKind::Shape => "shape",
            DiagnosticKind::Voided => "voided",
            DiagnosticKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

// ============================================================================
// Diagnostics sink
// ============================================================================

/// A [`ModeError`] attached to the node it was found at.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub node: Option<NodeId>,
    pub error: ModeError,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        self.error.kind()
    }

    pub fn span(&self) -> Span {
        self.error.span()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.error)
    }
}

/// Collects diagnostics for one checking session.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    errors: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding; the severity comes from the error itself.
    pub fn push(&mut self, node: Option<NodeId>, error: ModeError) {
        let severity = error.severity();
        if severity == Severity::Error {
            self.errors += 1;
        }
        self.items.push(Diagnostic {
            severity,
            node,
            error,
        });
    }

    /// Number of errors so far; warnings are not counted.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

// ============================================================================
// Registry errors
// ============================================================================

/// Misuse of the registry or symbol-table building API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("scope {0} does not exist")]
    UnknownScope(ScopeId),

    #[error("{0} is not a mode indicant")]
    NotAnIndicant(ModeId),

    #[error("mode indicant '{name}' is already defined")]
    IndicantRedefined { name: String },

    #[error("mode indicant '{name}' is defined as itself")]
    CyclicIndicant { name: String },
}
