//! Calls, including partial parametrisation.
//!
//! A call may leave parameters out, either explicitly (an empty argument
//! position) or by stopping early. It then yields a procedure over the
//! omitted parameters instead of calling anything:
//!
//! ```text
//! PROC (INT, REAL) BOOL f;
//! f(1, )      # PROC (REAL) BOOL #
//! f(1)        # PROC (REAL) BOOL #
//! f(1, 2.0)   # BOOL #
//! ```

use a68_core::{ClauseKind, ModeError, ModeId, ModeKind, NodeId, Sort};
use a68_registry::standard::{ERROR, VOID};

use super::{ModeChecker, Site};
use crate::soid::Soid;
use crate::tables::CallShape;

pub(super) fn check_call(
    checker: &mut ModeChecker<'_>,
    site: &Site,
    primary: NodeId,
    args: &[Option<NodeId>],
    x: Soid,
) -> Soid {
    let y = checker.unit(primary, Soid::open(Sort::Meek));
    let procedure = if checker.modes.is_ill(y.mode) {
        None
    } else {
        match callable(checker, y.mode, !args.is_empty()) {
            Some(procedure) => Some(procedure),
            None => {
                let error = ModeError::NotAProcedure {
                    mode: checker.display(y.mode),
                    span: site.span,
                };
                checker.report(site, error);
                None
            }
        }
    };
    let Some(procedure) = procedure else {
        check_open(checker, args);
        return x.yielding(ERROR);
    };

    let (params, result) = match checker.modes.kind(procedure) {
        ModeKind::Proc { params, result } => (params.modes().collect::<Vec<_>>(), *result),
        _ => return checker.internal(site, "callable mode is not a procedure", x),
    };
    if args.len() > params.len() {
        check_open(checker, args);
        let error = ModeError::ArgumentCount {
            expected: params.len(),
            found: args.len(),
            span: site.span,
        };
        return checker.fail(site, error, x);
    }
    checker.require(primary, Soid::new(Sort::Meek, procedure));

    let mut supplied = Vec::new();
    let mut omitted = Vec::new();
    for (i, &param) in params.iter().enumerate() {
        match args.get(i).copied().flatten() {
            Some(arg) => {
                checker.unit(arg, Soid::strong(param).with_clause(ClauseKind::Argument));
                supplied.push(i);
            }
            None => omitted.push(param),
        }
    }

    let (locale, partial) = if omitted.is_empty() {
        (None, None)
    } else {
        let given: Vec<ModeId> = supplied.iter().map(|&i| params[i]).collect();
        let locale = checker.modes.proc_of(given, VOID);
        let partial = checker.modes.proc_of(omitted, result);
        (Some(locale), Some(partial))
    };
    checker.tables.calls.insert(
        site.node,
        CallShape {
            procedure,
            locale,
            partial,
            supplied,
        },
    );
    x.yielding(partial.unwrap_or(result))
}

/// Dereferences (and, when arguments are given, deprocedures) until a
/// procedure that takes parameters, or a niladic one when none are given.
fn callable(checker: &ModeChecker<'_>, mode: ModeId, has_args: bool) -> Option<ModeId> {
    let modes = &checker.modes;
    let mut m = mode;
    for _ in 0..modes.len() {
        match modes.kind(m) {
            ModeKind::Proc { params, result } if params.is_empty() && has_args => m = *result,
            ModeKind::Proc { .. } => return Some(m),
            ModeKind::Ref(sub) => m = *sub,
            _ => return None,
        }
    }
    None
}

/// Checks arguments that have nothing to be checked against.
fn check_open(checker: &mut ModeChecker<'_>, args: &[Option<NodeId>]) {
    for &arg in args.iter().flatten() {
        checker.unit(arg, Soid::open(Sort::Strong).with_clause(ClauseKind::Argument));
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::Fixture;
    use a68_core::{DiagnosticKind, NodeKind};
    use a68_registry::standard::*;

    fn declare_f(f: &mut Fixture) -> a68_core::ModeId {
        let mode = f.modes.proc_of([INT, REAL], BOOL);
        f.symbols.declare_identifier(f.scope, "f", mode).unwrap();
        mode
    }

    #[test]
    fn full_call_yields_the_result() {
        let mut f = Fixture::new();
        declare_f(&mut f);
        let callee = f.ident("f");
        let a = f.int(1);
        let b = f.int(2);
        let call = f.push(NodeKind::Call {
            primary: callee,
            args: vec![Some(a), Some(b)],
        });
        let output = f.run(call);
        assert!(output.diagnostics.warnings().count() == 0);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(f.tree.mode(call), Some(BOOL));
        assert_eq!(output.tables.required(b).map(|s| s.mode), Some(REAL));
        assert_eq!(output.tables.calls[&call].partial, None);
    }

    #[test]
    fn missing_arguments_make_a_partial_call() {
        let mut f = Fixture::new();
        let mode = declare_f(&mut f);
        let callee = f.ident("f");
        let a = f.int(1);
        let call = f.push(NodeKind::Call {
            primary: callee,
            args: vec![Some(a)],
        });
        let output = f.run(call);
        assert!(!output.diagnostics.has_errors());
        let partial = f.modes.proc_of([REAL], BOOL);
        let locale = f.modes.proc_of([INT], VOID);
        assert_eq!(f.tree.mode(call), Some(partial));
        let shape = &output.tables.calls[&call];
        assert_eq!(shape.procedure, mode);
        assert_eq!(shape.locale, Some(locale));
        assert_eq!(shape.supplied, vec![0]);
    }

    #[test]
    fn explicit_gaps_are_omitted_too() {
        let mut f = Fixture::new();
        declare_f(&mut f);
        let callee = f.ident("f");
        let b = f.int(2);
        let call = f.push(NodeKind::Call {
            primary: callee,
            args: vec![None, Some(b)],
        });
        let output = f.run(call);
        assert!(!output.diagnostics.has_errors());
        let partial = f.modes.proc_of([INT], BOOL);
        assert_eq!(f.tree.mode(call), Some(partial));
    }

    #[test]
    fn too_many_arguments() {
        let mut f = Fixture::new();
        declare_f(&mut f);
        let callee = f.ident("f");
        let args = (0..3).map(|i| Some(f.int(i))).collect();
        let call = f.push(NodeKind::Call {
            primary: callee,
            args,
        });
        let output = f.run(call);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::Arity]);
    }

    #[test]
    fn values_cannot_be_called() {
        let mut f = Fixture::new();
        let one = f.int(1);
        let two = f.int(2);
        let call = f.push(NodeKind::Call {
            primary: one,
            args: vec![Some(two)],
        });
        let output = f.run(call);
        assert_eq!(Fixture::kinds(&output), vec![DiagnosticKind::Shape]);
    }

    #[test]
    fn procedure_variables_are_dereferenced() {
        let mut f = Fixture::new();
        let sqrt = f.modes.proc_of([REAL], REAL);
        let var = f.modes.name_of(sqrt);
        f.symbols.declare_identifier(f.scope, "g", var).unwrap();
        let callee = f.ident("g");
        let one = f.int(1);
        let call = f.push(NodeKind::Call {
            primary: callee,
            args: vec![Some(one)],
        });
        let output = f.run(call);
        assert!(!output.diagnostics.has_errors());
        assert_eq!(output.tables.required(callee).map(|s| s.mode), Some(sqrt));
        assert_eq!(f.tree.mode(call), Some(REAL));
    }
}
