//! Enclosed clauses: serial, collateral, choice and loop clauses.

use a68_core::{ClauseKind, ConformityArm, Deflex, ModeError, ModeId, NodeId, NodeKind, Sort};
use a68_registry::standard::{BOOL, ERROR, HIP, INT, VACUUM, VOID};

use super::{ModeChecker, Site};
use crate::balance::balance;
use crate::coercion::is_unitable;
use crate::soid::Soid;

pub(super) fn check_closed(checker: &mut ModeChecker<'_>, body: NodeId, x: Soid) -> Soid {
    let y = checker.unit(body, x);
    checker.passed_down(x, y)
}

pub(super) fn check_serial(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    units: &[NodeId],
    x: Soid,
) -> Soid {
    let Some((&last, init)) = units.split_last() else {
        return checker.internal(site, "empty serial clause", x);
    };
    for &unit in init {
        let y = checker.unit(unit, Soid::strong(VOID).with_clause(ClauseKind::Serial));
        warn_if_voided(checker, unit, y.mode);
    }
    let y = checker.unit(last, x);
    checker.passed_down(x, y)
}

/// Warns when a unit whose only purpose is its value is thrown away.
fn warn_if_voided(checker: &mut ModeChecker<'_>, unit: NodeId, yielded: ModeId) {
    if !checker.options.warn_on_voiding
        || checker.modes.depref_completely(yielded) == VOID
        || checker.modes.is_absorbing(yielded)
    {
        return;
    }
    let Some(node) = checker.tree.get(unit) else {
        return;
    };
    let exempt = matches!(
        node.kind,
        NodeKind::Cast { .. }
            | NodeKind::Call { .. }
            | NodeKind::Assignation { .. }
            | NodeKind::Jump { .. }
            | NodeKind::Skip
            | NodeKind::IdentityDeclaration { .. }
            | NodeKind::VariableDeclaration { .. }
            | NodeKind::OperatorDeclaration { .. }
            | NodeKind::ModeDeclaration { .. }
            | NodeKind::Loop { .. }
    );
    if exempt {
        return;
    }
    let error = ModeError::ValueVoided {
        mode: checker.display(yielded),
        span: node.span,
    };
    checker.diagnostics.push(Some(unit), error);
}

pub(super) fn check_collateral(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    units: &[NodeId],
    x: Soid,
) -> Soid {
    let element = |m: ModeId| Soid::strong(m).with_clause(ClauseKind::Collateral);

    if x.sort != Sort::Strong {
        for &unit in units {
            checker.unit(unit, Soid::open(x.sort));
        }
        return checker.fail(site, ModeError::DisplayContext { span: site.span }, x);
    }
    if units.is_empty() {
        return x.yielding(VACUUM);
    }
    if x.mode == VOID {
        for &unit in units {
            checker.unit(unit, element(VOID));
        }
        return x.yielding(VOID);
    }
    if checker.modes.is_row(x.mode) {
        if let Some(slice) = checker.modes.slice(x.mode) {
            for &unit in units {
                checker.unit(unit, element(slice));
            }
            return x.yielding(x.mode);
        }
    }
    if checker.modes.is_struct(x.mode) {
        let fields: Vec<ModeId> = checker
            .modes
            .pack(x.mode)
            .map(|p| p.modes().collect())
            .unwrap_or_default();
        if fields.len() != units.len() {
            let error = ModeError::ModeMismatch {
                found: format!("display of {} units", units.len()),
                expected: checker.display(x.mode),
                sort: x.sort,
                clause: ClauseKind::Collateral,
                reasons: vec![format!("{} fields are required", fields.len())],
                span: site.span,
            };
            return checker.fail(site, error, x);
        }
        for (&unit, field) in units.iter().zip(fields) {
            checker.unit(unit, element(field));
        }
        return x.yielding(x.mode);
    }

    let members: Vec<ModeId> = units
        .iter()
        .map(|&unit| checker.unit(unit, Soid::open(Sort::Strong)).mode)
        .collect();
    x.yielding(checker.modes.stowed_of(members))
}

/// The branches of a choice clause; `None` is a missing `ELSE` or `OUT`.
///
/// In an open context each branch is required to yield the balanced mode
/// after it has been checked, so the coercion lands on the branch node
/// itself. A branch that is a closed or serial clause is coerced as a
/// whole, not at its last unit.
fn check_choice(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    branches: &[Option<NodeId>],
    clause: ClauseKind,
    x: Soid,
) -> Soid {
    if x.is_strong_and_known() {
        for &branch in branches.iter().flatten() {
            checker.unit(branch, x.with_clause(clause));
        }
        return x.yielding(x.mode);
    }

    let open = Soid::open(x.sort).with_clause(clause);
    let mut yields = Vec::with_capacity(branches.len());
    let mut checked = Vec::with_capacity(branches.len());
    for branch in branches {
        match branch {
            Some(node) => {
                let y = checker.unit(*node, open);
                yields.push(y.mode);
                checked.push(*node);
            }
            None => yields.push(HIP),
        }
    }
    if yields.iter().any(|&m| checker.modes.is_ill(m)) {
        return x.yielding(ERROR);
    }

    match balance(checker.modes, &yields) {
        Some(balanced) => {
            for node in checked {
                checker.require(node, Soid::strong(balanced).with_clause(clause));
            }
            x.yielding(balanced)
        }
        None => {
            let modes = yields
                .iter()
                .map(|&m| checker.display(m))
                .collect::<Vec<_>>()
                .join(", ");
            let error = ModeError::NoUniqueMode {
                clause,
                modes,
                span: site.span,
            };
            checker.fail(site, error, x)
        }
    }
}

fn enquiry(mode: ModeId) -> Soid {
    Soid::new(Sort::Meek, mode).with_clause(ClauseKind::Enquiry)
}

pub(super) fn check_conditional(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    condition: NodeId,
    then: NodeId,
    otherwise: Option<NodeId>,
    x: Soid,
) -> Soid {
    checker.unit(condition, enquiry(BOOL));
    check_choice(
        checker,
        site,
        &[Some(then), otherwise],
        ClauseKind::Conditional,
        x,
    )
}

pub(super) fn check_int_case(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    selector: NodeId,
    branches: &[NodeId],
    out: Option<NodeId>,
    x: Soid,
) -> Soid {
    checker.unit(selector, enquiry(INT));
    let all: Vec<Option<NodeId>> = branches.iter().copied().map(Some).chain([out]).collect();
    check_choice(checker, site, &all, ClauseKind::IntCase, x)
}

pub(super) fn check_conformity(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    selector: NodeId,
    arms: &[ConformityArm],
    out: Option<NodeId>,
    x: Soid,
) -> Soid {
    let y = checker.unit(selector, Soid::open(Sort::Meek).with_clause(ClauseKind::Enquiry));
    let united = united_selector(checker, y.mode);

    let mut valid = true;
    match united {
        Some(union) => {
            if union != y.mode {
                checker.require(selector, enquiry(union));
            }
            for arm in arms {
                if !is_unitable(checker.modes, arm.specifier, union, Deflex::Safe)
                    && !checker.modes.is_absorbing(arm.specifier)
                {
                    let error = ModeError::SpecifierNotInUnion {
                        specifier: checker.display(arm.specifier),
                        union: checker.display(union),
                        span: checker.tree.span(arm.body),
                    };
                    checker.report(site, error);
                    valid = false;
                }
            }
        }
        None if checker.modes.is_ill(y.mode) => valid = false,
        None => {
            let error = ModeError::NotAUnion {
                mode: checker.display(y.mode),
                span: site.span,
            };
            checker.report(site, error);
            valid = false;
        }
    }

    let all: Vec<Option<NodeId>> = arms.iter().map(|arm| Some(arm.body)).chain([out]).collect();
    let y = check_choice(checker, site, &all, ClauseKind::Conformity, x);
    if valid { y } else { x.yielding(ERROR) }
}

/// The union a conformity selector reaches by dereferencing.
fn united_selector(checker: &ModeChecker<'_>, mode: ModeId) -> Option<ModeId> {
    let mut m = mode;
    for _ in 0..checker.modes.len() {
        if checker.modes.is_union(m) {
            return Some(m);
        }
        m = checker.modes.depref_once(m)?;
    }
    None
}

pub(super) fn check_loop(
    checker: &mut ModeChecker<'_>,
    bounds: [Option<NodeId>; 3],
    condition: Option<NodeId>,
    body: NodeId,
    x: Soid,
) -> Soid {
    for bound in bounds.into_iter().flatten() {
        checker.unit(bound, Soid::new(Sort::Meek, INT).with_clause(ClauseKind::Loop));
    }
    if let Some(condition) = condition {
        checker.unit(condition, enquiry(BOOL));
    }
    checker.unit(body, Soid::strong(VOID).with_clause(ClauseKind::Loop));
    x.yielding(VOID)
}
