//! Units that are neither clauses nor applications: assignations, identity
//! relations, slices, selections and the primaries.

use a68_core::{
    ClauseKind, Deflex, Indexer, Literal, ModeError, ModeId, ModeKind, NodeId, Primitive, Sort,
    Standard, TagId,
};
use a68_registry::standard::{BOOL, CHAR, ERROR, HIP, INT, ROW_CHAR, VOID};

use super::{ModeChecker, Site};
use crate::coercion::is_coercible;
use crate::soid::Soid;

pub(super) fn check_assignation(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    destination: NodeId,
    source: NodeId,
    x: Soid,
) -> Soid {
    let d = checker.unit(destination, Soid::open(Sort::Soft));
    let name = if checker.modes.is_niladic_proc(d.mode) {
        checker.modes.sub(d.mode).unwrap_or(d.mode)
    } else {
        d.mode
    };
    let referent = if checker.modes.is_ill(name) {
        None
    } else if checker.modes.is_ref(name) {
        checker.require(destination, Soid::new(Sort::Soft, name));
        checker.modes.sub(name)
    } else {
        let error = ModeError::NotAName {
            mode: checker.display(name),
            span: checker.tree.span(destination),
        };
        checker.report(site, error);
        None
    };

    match referent {
        Some(referent) => {
            checker.unit(source, Soid::strong(referent));
            x.yielding(name)
        }
        None => {
            checker.unit(source, Soid::open(Sort::Strong));
            x.yielding(ERROR)
        }
    }
}

pub(super) fn check_identity_relation(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    left: NodeId,
    right: NodeId,
    x: Soid,
) -> Soid {
    let l = checker.unit(left, Soid::open(Sort::Soft)).mode;
    let r = checker.unit(right, Soid::open(Sort::Soft)).mode;
    if checker.modes.is_ill(l) || checker.modes.is_ill(r) {
        return x.yielding(ERROR);
    }
    if l == HIP && r == HIP {
        return x.yielding(BOOL);
    }

    let weak = |p: ModeId, q: ModeId| is_coercible(checker.modes, p, q, Sort::Weak, Deflex::Safe);
    let target = if l == HIP {
        Some(r)
    } else if r == HIP || weak(r, l) {
        Some(l)
    } else if weak(l, r) {
        Some(r)
    } else {
        None
    };
    let Some(target) = target else {
        let error = ModeError::ModeMismatch {
            found: checker.display(r),
            expected: checker.display(l),
            sort: Sort::Weak,
            clause: ClauseKind::Unit,
            reasons: vec!["the sides of an identity relation must be names of one mode".into()],
            span: site.span,
        };
        return checker.fail(site, error, x);
    };
    let target = checker.modes.deproc_completely(target);
    if !checker.modes.is_ref(target) {
        let error = ModeError::NotAName {
            mode: checker.display(target),
            span: site.span,
        };
        return checker.fail(site, error, x);
    }
    checker.require(left, Soid::new(Sort::Weak, target));
    checker.require(right, Soid::new(Sort::Weak, target));
    x.yielding(BOOL)
}

pub(super) fn check_cast(checker: &mut ModeChecker<'_>, mode: ModeId, operand: NodeId, x: Soid) -> Soid {
    checker.unit(operand, Soid::strong(mode).as_cast());
    x.yielding(mode)
}

pub(super) fn check_selection(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    field: &str,
    secondary: NodeId,
    x: Soid,
) -> Soid {
    let y = checker.unit(secondary, Soid::open(Sort::Weak));
    if checker.modes.is_ill(y.mode) {
        return x.yielding(ERROR);
    }

    let mut m = y.mode;
    for _ in 0..checker.modes.len() {
        let selected = match checker.modes.kind(m).clone() {
            ModeKind::Ref(sub) => match structure_of(checker, sub) {
                Some(_) => select(checker, site, sub, field, x).map(|f| checker.modes.name_of(f)),
                None => {
                    m = sub;
                    continue;
                }
            },
            ModeKind::Proc { params, result } if params.is_empty() => {
                m = result;
                continue;
            }
            _ if structure_of(checker, m).is_some() => select(checker, site, m, field, x),
            _ => {
                let error = ModeError::NotAStructure {
                    mode: checker.display(y.mode),
                    span: site.span,
                };
                return checker.fail(site, error, x);
            }
        };
        return match selected {
            Ok(result) => {
                checker.require(secondary, Soid::new(Sort::Weak, m));
                x.yielding(result)
            }
            Err(failed) => failed,
        };
    }
    checker.internal(site, "selection does not reach a structure", x)
}

/// The structure a selection looks into: `m` itself, or the element of a
/// row of structures.
fn structure_of(checker: &ModeChecker<'_>, m: ModeId) -> Option<ModeId> {
    if checker.modes.is_struct(m) {
        return Some(m);
    }
    checker
        .modes
        .row_shape(m)
        .map(|(_, elem)| elem)
        .filter(|&elem| checker.modes.is_struct(elem))
}

/// The mode of `field` in `m`, rowed when `m` is a row of structures.
fn select(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    m: ModeId,
    field: &str,
    x: Soid,
) -> Result<ModeId, Soid> {
    let Some(structure) = structure_of(checker, m) else {
        return Err(checker.internal(site, "selection from a non-structure", x));
    };
    let Some(selected) = checker.modes.field(structure, field) else {
        let error = ModeError::UnknownField {
            field: field.to_string(),
            mode: checker.display(structure),
            span: site.span,
        };
        return Err(checker.fail(site, error, x));
    };
    Ok(match checker.modes.row_shape(m) {
        Some((dim, _)) => checker.modes.row_of(dim, selected),
        None => selected,
    })
}

pub(super) fn check_slice(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    primary: NodeId,
    indexers: &[Indexer],
    x: Soid,
) -> Soid {
    let y = checker.unit(primary, Soid::open(Sort::Weak));
    let bounds = Soid::new(Sort::Meek, INT);
    for indexer in indexers {
        match indexer {
            Indexer::Subscript(id) => {
                checker.unit(*id, bounds);
            }
            Indexer::Trimmer { lower, upper } => {
                for bound in lower.iter().chain(upper.iter()) {
                    checker.unit(*bound, bounds);
                }
            }
        }
    }
    if checker.modes.is_ill(y.mode) {
        return x.yielding(ERROR);
    }

    let Some((m, name)) = sliceable(checker, y.mode) else {
        let error = ModeError::NotARow {
            mode: checker.display(y.mode),
            span: site.span,
        };
        return checker.fail(site, error, x);
    };
    let row = if name {
        checker.modes.sub(m).unwrap_or(m)
    } else {
        m
    };
    let Some((dim, elem)) = checker.modes.row_shape(row) else {
        return checker.internal(site, "sliceable mode without a row shape", x);
    };
    if usize::from(dim) != indexers.len() {
        let error = ModeError::IndexerCount {
            expected: usize::from(dim),
            found: indexers.len(),
            span: site.span,
        };
        return checker.fail(site, error, x);
    }
    checker.require(primary, Soid::new(Sort::Weak, m));

    let trimmers = indexers
        .iter()
        .filter(|i| matches!(i, Indexer::Trimmer { .. }))
        .count();
    let result = if trimmers == 0 {
        elem
    } else {
        checker.modes.row_of(trimmers as u8, elem)
    };
    let result = if name {
        checker.modes.name_of(result)
    } else {
        result
    };
    x.yielding(result)
}

/// The mode a slice applies to, and whether it is a name of a row.
fn sliceable(checker: &ModeChecker<'_>, mode: ModeId) -> Option<(ModeId, bool)> {
    let modes = &checker.modes;
    let mut m = mode;
    for _ in 0..modes.len() {
        if modes.is_row(m) {
            return Some((m, false));
        }
        if modes.is_ref(m) && modes.sub(m).is_some_and(|s| modes.is_row(s)) {
            return Some((m, true));
        }
        m = modes.depref_once(m)?;
    }
    None
}

pub(super) fn check_routine_text(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    mode: ModeId,
    body: NodeId,
    x: Soid,
) -> Soid {
    let result = match checker.modes.kind(mode) {
        ModeKind::Proc { result, .. } => *result,
        _ => return checker.internal(site, "routine text without a procedure mode", x),
    };
    checker.unit(body, Soid::strong(result));
    x.yielding(mode)
}

pub(super) fn check_jump(checker: &mut ModeChecker<'_>, site: &Site, label: &str, x: Soid) -> Soid {
    if checker.symbols.lookup_label(site.scope, label).is_none() {
        let error = ModeError::UndeclaredTag {
            what: "label",
            name: label.to_string(),
            span: site.span,
        };
        return checker.fail(site, error, x);
    }
    x.yielding(HIP)
}

pub(super) fn check_nihil(checker: &mut ModeChecker<'_>, site: &Site, x: Soid) -> Soid {
    let wants_value = x.is_strong_and_known()
        && x.mode != VOID
        && !checker.modes.is_ref(x.mode)
        && !checker.modes.is_absorbing(x.mode);
    if wants_value {
        let error = ModeError::NilNeedsName {
            expected: checker.display(x.mode),
            span: site.span,
        };
        checker.report(site, error);
        return x.yielding(ERROR);
    }
    x.yielding(HIP)
}

pub(super) fn check_denotation(checker: &mut ModeChecker<'_>, literal: &Literal, x: Soid) -> Soid {
    let standard = |primitive, size| Standard::long(primitive, size);
    let mode = match literal {
        Literal::Int { size, .. } => checker.modes.standard(standard(Primitive::Int, *size)),
        Literal::Real { size, .. } => checker.modes.standard(standard(Primitive::Real, *size)),
        Literal::Bits { size, .. } => checker.modes.standard(standard(Primitive::Bits, *size)),
        Literal::Bool(_) => BOOL,
        Literal::Char(_) => CHAR,
        Literal::String(_) => ROW_CHAR,
    };
    x.yielding(mode)
}

pub(super) fn check_identifier(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    name: &str,
    tag: Option<TagId>,
    x: Soid,
) -> Soid {
    let Some(tag) = tag.or_else(|| checker.symbols.lookup_identifier(site.scope, name)) else {
        let error = ModeError::UndeclaredTag {
            what: "identifier",
            name: name.to_string(),
            span: site.span,
        };
        return checker.fail(site, error, x);
    };
    checker.tables.identifiers.insert(site.node, tag);
    x.yielding(checker.symbols.tag(tag).mode)
}

#[cfg(test)]
mod tests {
    use super::super::tests::Fixture;
    use a68_core::{DiagnosticKind, Indexer, NodeKind};
    use a68_registry::standard::*;

    use crate::soid::Soid;
    use a68_core::Sort;

    #[test]
    fn assignation_widens_the_source() {
        let mut f = Fixture::new();
        let var = f.modes.name_of(REAL);
        f.symbols.declare_identifier(f.scope, "x", var).unwrap();
        let dest = f.ident("x");
        let one = f.int(1);
        let assign = f.push(NodeKind::Assignation {
            destination: dest,
            source: one,
        });
        let output = f.run(assign);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(output.tables.required(one), Some(&Soid::strong(REAL)));
        assert_eq!(output.tables.required(dest), Some(&Soid::new(Sort::Soft, var)));
        assert_eq!(f.tree.mode(assign), Some(var));
    }

    #[test]
    fn assigning_to_a_value_is_rejected() {
        let mut f = Fixture::new();
        let one = f.int(1);
        let two = f.int(2);
        let assign = f.push(NodeKind::Assignation {
            destination: one,
            source: two,
        });
        let output = f.run(assign);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::Shape]);
    }

    #[test]
    fn destination_is_deprocedured_once() {
        let mut f = Fixture::new();
        let var = f.modes.name_of(REAL);
        let getter = f.modes.proc_of([], var);
        f.symbols.declare_identifier(f.scope, "x", getter).unwrap();

        let x = f.ident("x");
        let one = f.int(1);
        let assign = f.push(NodeKind::Assignation {
            destination: x,
            source: one,
        });
        let output = f.run(assign);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(f.tree.mode(assign), Some(var));

        let mut f2 = Fixture::new();
        let var = f2.modes.name_of(REAL);
        let getter = f2.modes.proc_of([], var);
        let nested = f2.modes.proc_of([], getter);
        f2.symbols.declare_identifier(f2.scope, "y", nested).unwrap();
        let y = f2.ident("y");
        let two = f2.int(2);
        let assign = f2.push(NodeKind::Assignation {
            destination: y,
            source: two,
        });
        let output = f2.run(assign);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::Shape]);
    }

    #[test]
    fn identity_relation_compares_names() {
        let mut f = Fixture::new();
        let var = f.modes.name_of(INT);
        let ref_var = f.modes.name_of(var);
        f.symbols.declare_identifier(f.scope, "a", var).unwrap();
        f.symbols.declare_identifier(f.scope, "p", ref_var).unwrap();
        let a = f.ident("a");
        let p = f.ident("p");
        let is = f.push(NodeKind::IdentityRelation {
            left: p,
            right: a,
            negated: false,
        });
        let output = f.run(is);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(output.tables.required(p).map(|s| s.mode), Some(var));
        assert_eq!(f.tree.mode(is), Some(BOOL));
    }

    #[test]
    fn nil_compares_with_any_name() {
        let mut f = Fixture::new();
        let var = f.modes.name_of(INT);
        f.symbols.declare_identifier(f.scope, "a", var).unwrap();
        let a = f.ident("a");
        let nil = f.push(NodeKind::Nihil);
        let isnt = f.push(NodeKind::IdentityRelation {
            left: a,
            right: nil,
            negated: true,
        });
        let output = f.run(isnt);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(output.tables.required(nil).map(|s| s.mode), Some(var));
    }

    #[test]
    fn nil_needs_a_name_context() {
        let mut f = Fixture::new();
        let nil = f.push(NodeKind::Nihil);
        let cast = f.push(NodeKind::Cast {
            mode: INT,
            operand: nil,
        });
        let output = f.run(cast);
        let kinds = Fixture::kinds(&output);
        assert_eq!(kinds, vec![DiagnosticKind::ModeMismatch]);
        assert!(matches!(
            output.diagnostics.errors().next().map(|d| &d.error),
            Some(a68_core::ModeError::NilNeedsName { .. })
        ));
    }

    #[test]
    fn selection_through_a_name_yields_a_name() {
        let mut f = Fixture::new();
        let point = f.modes.struct_of([(REAL, "x"), (REAL, "y")]);
        let var = f.modes.name_of(point);
        f.symbols.declare_identifier(f.scope, "p", var).unwrap();
        let p = f.ident("p");
        let sel = f.push(NodeKind::Selection {
            field: "y".into(),
            secondary: p,
        });
        let output = f.run(sel);
        assert!(!output.diagnostics.has_errors());
        let ref_real = f.modes.name_of(REAL);
        assert_eq!(f.tree.mode(sel), Some(ref_real));
    }

    #[test]
    fn multiple_selection_rows_the_field() {
        let mut f = Fixture::new();
        let point = f.modes.struct_of([(REAL, "x"), (REAL, "y")]);
        let points = f.modes.row_of(1, point);
        f.symbols.declare_identifier(f.scope, "ps", points).unwrap();
        let ps = f.ident("ps");
        let sel = f.push(NodeKind::Selection {
            field: "x".into(),
            secondary: ps,
        });
        let output = f.run(sel);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(f.tree.mode(sel), Some(ROW_REAL));
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut f = Fixture::new();
        let point = f.modes.struct_of([(REAL, "x")]);
        f.symbols.declare_identifier(f.scope, "p", point).unwrap();
        let p = f.ident("p");
        let sel = f.push(NodeKind::Selection {
            field: "z".into(),
            secondary: p,
        });
        let output = f.run(sel);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::Arity]);
    }

    #[test]
    fn slicing_a_name_yields_a_name() {
        let mut f = Fixture::new();
        let matrix = f.modes.row_of(2, INT);
        let var = f.modes.name_of(matrix);
        f.symbols.declare_identifier(f.scope, "m", var).unwrap();
        let m = f.ident("m");
        let i = f.int(1);
        let j = f.int(2);
        let slice = f.push(NodeKind::Slice {
            primary: m,
            indexers: vec![Indexer::Subscript(i), Indexer::Subscript(j)],
        });
        let output = f.run(slice);
        assert!(!output.diagnostics.has_errors());
        let ref_int = f.modes.name_of(INT);
        assert_eq!(f.tree.mode(slice), Some(ref_int));
    }

    #[test]
    fn trimming_keeps_a_dimension() {
        let mut f = Fixture::new();
        let matrix = f.modes.row_of(2, INT);
        f.symbols.declare_identifier(f.scope, "m", matrix).unwrap();
        let m = f.ident("m");
        let i = f.int(1);
        let slice = f.push(NodeKind::Slice {
            primary: m,
            indexers: vec![
                Indexer::Subscript(i),
                Indexer::Trimmer {
                    lower: None,
                    upper: None,
                },
            ],
        });
        let output = f.run(slice);
        assert!(!output.diagnostics.has_errors());
        let row_int = f.modes.row_of(1, INT);
        assert_eq!(f.tree.mode(slice), Some(row_int));
    }

    #[test]
    fn wrong_indexer_count() {
        let mut f = Fixture::new();
        f.symbols.declare_identifier(f.scope, "v", ROW_REAL).unwrap();
        let v = f.ident("v");
        let i = f.int(1);
        let j = f.int(2);
        let slice = f.push(NodeKind::Slice {
            primary: v,
            indexers: vec![Indexer::Subscript(i), Indexer::Subscript(j)],
        });
        let output = f.run(slice);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::Arity]);
    }

    #[test]
    fn jumps_need_labels() {
        let mut f = Fixture::new();
        let jump = f.push(NodeKind::Jump {
            label: "done".into(),
        });
        let output = f.run(jump);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::UndeclaredTag]);
    }

    #[test]
    fn string_denotations_are_rows_of_char() {
        let mut f = Fixture::new();
        let s = f.push(NodeKind::Denotation(a68_core::Literal::String("hi".into())));
        let cast = f.push(NodeKind::Cast {
            mode: STRING,
            operand: s,
        });
        let output = f.run(cast);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(f.tree.mode(s), Some(ROW_CHAR));
    }
}
