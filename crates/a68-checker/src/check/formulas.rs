//! Formulas and the boolean functions `ANDF` and `ORF`.

use a68_core::{ClauseKind, ModeError, ModeId, ModeKind, NodeId, Sort, Span, TagId};
use a68_registry::standard::{BOOL, ERROR};

use super::{ModeChecker, Site};
use crate::operators::{find_operator, OperatorMatch};
use crate::soid::Soid;

pub(super) fn check_formula(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    operator: &str,
    tag: Option<TagId>,
    left: NodeId,
    right: NodeId,
    x: Soid,
) -> Soid {
    apply(checker, site, operator, tag, &[left, right], x)
}

pub(super) fn check_monadic(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    operator: &str,
    tag: Option<TagId>,
    operand: NodeId,
    x: Soid,
) -> Soid {
    apply(checker, site, operator, tag, &[operand], x)
}

pub(super) fn check_bool_function(
    checker: &mut ModeChecker<'_>,
    left: NodeId,
    right: NodeId,
    x: Soid,
) -> Soid {
    let operand = Soid::new(Sort::Meek, BOOL).with_clause(ClauseKind::Operand);
    checker.unit(left, operand);
    checker.unit(right, operand);
    x.yielding(BOOL)
}

fn apply(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    operator: &str,
    tag: Option<TagId>,
    operands: &[NodeId],
    x: Soid,
) -> Soid {
    if let Some(tag) = tag {
        return apply_declared(checker, site, tag, operands, x);
    }

    let open = Soid::open(Sort::Firm).with_clause(ClauseKind::Operand);
    let found: Vec<ModeId> = operands.iter().map(|&o| checker.unit(o, open).mode).collect();
    let (first, second) = (found[0], found.get(1).copied());
    match find_operator(checker.modes, checker.symbols, site.scope, operator, first, second) {
        OperatorMatch::Found { tag, promoted } => {
            let Some((params, result)) = signature(checker, tag) else {
                return checker.internal(site, "operator is not a procedure", x);
            };
            let sort = if promoted { Sort::Strong } else { Sort::Firm };
            for (&operand, param) in operands.iter().zip(params) {
                checker.require(operand, Soid::new(sort, param).with_clause(ClauseKind::Operand));
            }
            checker.tables.operators.insert(site.node, tag);
            x.yielding(result)
        }
        OperatorMatch::NotFound => {
            let shown = found
                .iter()
                .map(|&m| checker.display(m))
                .collect::<Vec<_>>()
                .join(" and ");
            let span = operands_span(checker, site, operands);
            let error = ModeError::NoOperator {
                operator: operator.to_string(),
                operands: shown,
                span,
            };
            checker.fail(site, error, x)
        }
        OperatorMatch::Poisoned => x.yielding(ERROR),
    }
}

/// An operator the parser already identified: the operands only have to
/// fit its parameters.
fn apply_declared(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    tag: TagId,
    operands: &[NodeId],
    x: Soid,
) -> Soid {
    let Some((params, result)) = signature(checker, tag) else {
        return checker.internal(site, "operator is not a procedure", x);
    };
    if params.len() != operands.len() {
        return checker.internal(site, "operator arity does not match the formula", x);
    }
    for (&operand, param) in operands.iter().zip(params) {
        checker.unit(operand, Soid::new(Sort::Firm, param).with_clause(ClauseKind::Operand));
    }
    checker.tables.operators.insert(site.node, tag);
    x.yielding(result)
}

/// The formula's span stretched over its operands.
fn operands_span(checker: &ModeChecker<'_>, site: &Site, operands: &[NodeId]) -> Span {
    operands
        .iter()
        .fold(site.span, |span, &o| span.cover(checker.tree.span(o)))
}

fn signature(checker: &ModeChecker<'_>, tag: TagId) -> Option<(Vec<ModeId>, ModeId)> {
    match checker.modes.kind(checker.symbols.tag(tag).mode) {
        ModeKind::Proc { params, result } => Some((params.modes().collect(), *result)),
        _ => None,
    }
}
