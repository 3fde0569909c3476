//! The mode-check pass.
//!
//! [`ModeCheckPass`] walks the tree top-down, handing each unit the context
//! ([`Soid`]) its position imposes and getting back the mode it yields:
//!
//! - `x` known: the unit is checked against it and the requirement is
//!   recorded for the insertion pass
//! - `x` open: the unit decides its own mode, and the parent records a
//!   requirement later (balancing, operator identification)
//!
//! Checking carries on past every error. A failed unit yields the error
//! mode, which every later test accepts, so one mistake is reported once.
//!
//! # Example
//!
//! ```ignore
//! let output = ModeCheckPass::new(&mut modes, &symbols, options).run(&mut tree);
//! for diagnostic in output.diagnostics.iter() {
//!     eprintln!("{diagnostic}");
//! }
//! ```

mod calls;
mod clauses;
mod declarations;
mod formulas;
mod units;

use a68_core::{
    ClauseKind, Deflex, Diagnostics, ModeError, ModeId, NodeId, NodeKind, ScopeId, Sort, Span,
    SyntaxTree,
};
use a68_registry::standard::{BOOL, ERROR, FORMAT, HIP, VOID};
use a68_registry::{ModeRegistry, SymbolTable};
use tracing::{debug, trace};

use crate::coercion::{explain, is_coercible};
use crate::options::CheckerOptions;
use crate::soid::Soid;
use crate::tables::SideTables;

/// What the check pass hands on.
#[derive(Debug, Clone, Default)]
pub struct CheckOutput {
    pub tables: SideTables,
    pub diagnostics: Diagnostics,
}

/// Entry point of the mode-check pass.
pub struct ModeCheckPass<'a> {
    modes: &'a mut ModeRegistry,
    symbols: &'a SymbolTable,
    options: CheckerOptions,
}

impl<'a> ModeCheckPass<'a> {
    pub fn new(modes: &'a mut ModeRegistry, symbols: &'a SymbolTable, options: CheckerOptions) -> Self {
        Self {
            modes,
            symbols,
            options,
        }
    }

    /// Checks the whole program, which stands in a strong `VOID` context.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self, tree: &mut SyntaxTree) -> CheckOutput {
        let mut checker = ModeChecker {
            modes: self.modes,
            symbols: self.symbols,
            tree,
            options: self.options,
            tables: SideTables::new(),
            diagnostics: Diagnostics::new(),
        };
        match checker.tree.root() {
            Some(root) => {
                checker.unit(root, Soid::strong(VOID));
            }
            None => checker.diagnostics.push(
                None,
                ModeError::Internal {
                    message: "program has no root".to_string(),
                    span: Span::default(),
                },
            ),
        }
        debug!(
            nodes = checker.tree.len(),
            requirements = checker.tables.required.len(),
            errors = checker.diagnostics.error_count(),
            "mode check finished"
        );
        CheckOutput {
            tables: checker.tables,
            diagnostics: checker.diagnostics,
        }
    }
}

/// Walks one tree; the per-construct rules live in the submodules.
pub(crate) struct ModeChecker<'a> {
    pub(crate) modes: &'a mut ModeRegistry,
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) tree: &'a mut SyntaxTree,
    pub(crate) options: CheckerOptions,
    pub(crate) tables: SideTables,
    pub(crate) diagnostics: Diagnostics,
}

/// Where a node is and what it is, copied out of the tree.
#[derive(Debug, Clone)]
pub(crate) struct Site {
    pub(crate) node: NodeId,
    pub(crate) span: Span,
    pub(crate) scope: ScopeId,
}

impl ModeChecker<'_> {
    /// Checks `node` in context `x` and returns what it yields.
    pub(crate) fn unit(&mut self, node: NodeId, x: Soid) -> Soid {
        let Some(n) = self.tree.get(node) else {
            self.diagnostics.push(
                None,
                ModeError::Internal {
                    message: format!("{node} is not in the tree"),
                    span: Span::default(),
                },
            );
            return Soid::error(x.sort);
        };
        let kind = n.kind.clone();
        let site = Site {
            node,
            span: n.span,
            scope: n.scope,
        };
        let errors_before = self.diagnostics.error_count();

        let y = self.dispatch(&site, kind, x);
        let y = if !x.is_open() && !is_coercible(self.modes, y.mode, x.mode, x.sort, Deflex::Safe) {
            self.mismatch(&site, y.mode, x);
            Soid::error(x.sort)
        } else {
            y
        };

        if !x.is_open() {
            self.tables.required.insert(node, x);
        }
        self.tree.set_mode(node, y.mode);
        if self.diagnostics.error_count() > errors_before {
            self.tables.poisoned.insert(node);
        }
        y
    }

    fn dispatch(&mut self, site: &Site, kind: NodeKind, x: Soid) -> Soid {
        match kind {
            NodeKind::Closed { body } => clauses::check_closed(self, body, x),
            NodeKind::Serial { units } => clauses::check_serial(self, site, &units, x),
            NodeKind::Collateral { units } => clauses::check_collateral(self, site, &units, x),
            NodeKind::Conditional {
                condition,
                then,
                otherwise,
            } => clauses::check_conditional(self, site, condition, then, otherwise, x),
            NodeKind::IntCase {
                selector,
                branches,
                out,
            } => clauses::check_int_case(self, site, selector, &branches, out, x),
            NodeKind::Conformity { selector, arms, out } => {
                clauses::check_conformity(self, site, selector, &arms, out, x)
            }
            NodeKind::Loop {
                from,
                by,
                to,
                condition,
                body,
            } => clauses::check_loop(self, [from, by, to], condition, body, x),

            NodeKind::IdentityDeclaration { mode, source, .. }
            | NodeKind::OperatorDeclaration { mode, source, .. } => {
                declarations::check_source(self, mode, Some(source), x)
            }
            NodeKind::VariableDeclaration { mode, initial, .. } => {
                declarations::check_source(self, mode, initial, x)
            }
            NodeKind::ModeDeclaration { .. } => x.yielding(VOID),

            NodeKind::Assignation {
                destination,
                source,
            } => units::check_assignation(self, site, destination, source, x),
            NodeKind::IdentityRelation { left, right, .. } => {
                units::check_identity_relation(self, site, left, right, x)
            }
            NodeKind::Cast { mode, operand } => units::check_cast(self, mode, operand, x),
            NodeKind::Slice { primary, indexers } => {
                units::check_slice(self, site, primary, &indexers, x)
            }
            NodeKind::Selection { field, secondary } => {
                units::check_selection(self, site, &field, secondary, x)
            }
            NodeKind::Generator { mode, .. } => x.yielding(self.modes.name_of(mode)),
            NodeKind::RoutineText { mode, body } => units::check_routine_text(self, site, mode, body, x),
            NodeKind::FormatText => x.yielding(FORMAT),
            NodeKind::Jump { label } => units::check_jump(self, site, &label, x),
            NodeKind::Skip => x.yielding(HIP),
            NodeKind::Nihil => units::check_nihil(self, site, x),
            NodeKind::Denotation(literal) => units::check_denotation(self, &literal, x),
            NodeKind::Identifier { name, tag } => units::check_identifier(self, site, &name, tag, x),

            NodeKind::Call { primary, args } => calls::check_call(self, site, primary, &args, x),
            NodeKind::Formula {
                operator,
                tag,
                left,
                right,
            } => formulas::check_formula(self, site, &operator, tag, left, right, x),
            NodeKind::MonadicFormula {
                operator,
                tag,
                operand,
            } => formulas::check_monadic(self, site, &operator, tag, operand, x),
            NodeKind::BoolFunction { left, right, .. } => {
                formulas::check_bool_function(self, left, right, x)
            }
            NodeKind::Assertion { condition } => {
                let bool_context = Soid::new(Sort::Meek, BOOL).with_clause(ClauseKind::Enquiry);
                self.unit(condition, bool_context);
                x.yielding(VOID)
            }
            NodeKind::Coercion { .. } => self.internal(site, "coercion node before insertion", x),
        }
    }

    /// The yield of a clause that handed its own context `x` down to the
    /// unit yielding `y`.
    pub(crate) fn passed_down(&self, x: Soid, y: Soid) -> Soid {
        if x.is_open() || self.modes.is_ill(y.mode) {
            y
        } else {
            x.yielding(x.mode)
        }
    }

    /// Records the context a unit checked open turned out to need.
    pub(crate) fn require(&mut self, node: NodeId, soid: Soid) {
        self.tables.required.insert(node, soid);
    }

    pub(crate) fn display(&self, m: ModeId) -> String {
        self.modes.display(m)
    }

    pub(crate) fn report(&mut self, site: &Site, error: ModeError) {
        trace!(node = %site.node, %error, "diagnostic");
        self.diagnostics.push(Some(site.node), error);
    }

    /// Reports `error` and yields the error mode.
    pub(crate) fn fail(&mut self, site: &Site, error: ModeError, x: Soid) -> Soid {
        self.report(site, error);
        x.yielding(ERROR)
    }

    pub(crate) fn internal(&mut self, site: &Site, message: &str, x: Soid) -> Soid {
        let error = ModeError::Internal {
            message: message.to_string(),
            span: site.span,
        };
        self.fail(site, error, x)
    }

    fn mismatch(&mut self, site: &Site, found: ModeId, x: Soid) {
        let reasons = explain(self.modes, found, x.mode, x.sort, Deflex::Safe);
        let error = ModeError::ModeMismatch {
            found: self.display(found),
            expected: self.display(x.mode),
            sort: x.sort,
            clause: x.clause,
            reasons,
            span: site.span,
        };
        self.report(site, error);
    }
}
