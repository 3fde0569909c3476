//! Integration tests running whole programs through a [`Session`].
//!
//! Programs are built node by node, the way the parser would hand them
//! over, and checked with both passes.

use a68_modes::{
    CheckedProgram, CoercionKind, DiagnosticKind, Literal, ModeError, ModeId, NodeId, NodeKind,
    ScopeId, Session, Severity, Span, SyntaxTree, TagId, standard::*,
};
use ordered_float::OrderedFloat;

/// A program under construction.
struct Program {
    session: Session,
    tree: SyntaxTree,
    scope: ScopeId,
}

impl Program {
    fn new() -> Self {
        let mut session = Session::new();
        let environ = session.symbols().standard_scope();
        let scope = session.symbols_mut().open_scope(environ).unwrap();
        Self {
            session,
            tree: SyntaxTree::new(),
            scope,
        }
    }

    fn node(&mut self, kind: NodeKind) -> NodeId {
        self.tree.push(kind, Span::default(), self.scope)
    }

    fn node_in(&mut self, scope: ScopeId, kind: NodeKind) -> NodeId {
        self.tree.push(kind, Span::default(), scope)
    }

    fn int(&mut self, value: i64) -> NodeId {
        self.node(NodeKind::Denotation(Literal::Int { value, size: 0 }))
    }

    fn real(&mut self, value: f64) -> NodeId {
        self.node(NodeKind::Denotation(Literal::Real {
            value: OrderedFloat(value),
            size: 0,
        }))
    }

    fn truth(&mut self) -> NodeId {
        self.node(NodeKind::Denotation(Literal::Bool(true)))
    }

    fn ident(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::Identifier {
            name: name.to_string(),
            tag: None,
        })
    }

    fn declare(&mut self, name: &str, mode: ModeId) -> TagId {
        self.session
            .symbols_mut()
            .declare_identifier(self.scope, name, mode)
            .unwrap()
    }

    fn conditional(&mut self, then: NodeId, otherwise: NodeId) -> NodeId {
        let condition = self.truth();
        self.node(NodeKind::Conditional {
            condition,
            then,
            otherwise: Some(otherwise),
        })
    }

    fn formula(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::Formula {
            operator: operator.to_string(),
            tag: None,
            left,
            right,
        })
    }

    fn check(&mut self, root: NodeId) -> CheckedProgram {
        self.tree.set_root(root);
        self.session
            .check_program(std::mem::take(&mut self.tree))
            .unwrap()
    }
}

fn error_kinds(program: &CheckedProgram) -> Vec<DiagnosticKind> {
    program.diagnostics.errors().map(|d| d.kind()).collect()
}

/// Coercions stacked on `node`, outermost first.
fn coercions(program: &CheckedProgram, mut node: NodeId) -> Vec<(CoercionKind, ModeId)> {
    let mut out = Vec::new();
    while let NodeKind::Coercion { kind, operand } = program.tree.kind(node) {
        out.push((*kind, program.tree.mode(node).unwrap()));
        node = *operand;
    }
    out
}

// =============================================================================
// Balancing
// =============================================================================

#[test]
fn conditional_branches_balance_to_real() {
    let mut p = Program::new();
    let one = p.int(1);
    let half = p.real(0.5);
    let choice = p.conditional(one, half);
    let closed = p.node(NodeKind::Closed { body: choice });
    let two = p.real(2.0);
    let product = p.formula("*", closed, two);

    let program = p.check(product);
    assert!(!program.has_errors(), "{:?}", program.diagnostics);
    assert_eq!(program.tree.mode(program.node_map[&choice]), Some(REAL));
    assert_eq!(program.tree.mode(program.node_map[&product]), Some(REAL));
    // The INT branch is a denotation, so it is widened in place.
    let one = program.node_map[&one];
    assert_eq!(program.tree.mode(one), Some(REAL));
    assert!(matches!(
        program.tree.kind(one),
        NodeKind::Denotation(Literal::Real { .. })
    ));
}

#[test]
fn structures_with_different_fields_do_not_balance() {
    let mut p = Program::new();
    let a = p.session.modes_mut().struct_of([(INT, "a")]);
    let b = p.session.modes_mut().struct_of([(INT, "b")]);
    p.declare("sa", a);
    p.declare("sb", b);
    let sa = p.ident("sa");
    let sb = p.ident("sb");
    let choice = p.conditional(sa, sb);
    let one = p.int(1);
    let sum = p.formula("+", choice, one);

    let program = p.check(sum);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::NoUniqueMode]);
}

#[test]
fn strong_context_is_not_balanced() {
    let mut p = Program::new();
    let one = p.int(1);
    let two = p.int(2);
    let choice = p.conditional(one, two);
    let cast = p.node(NodeKind::Cast {
        mode: LONG_REAL,
        operand: choice,
    });

    let program = p.check(cast);
    assert!(!program.has_errors());
    assert_eq!(program.tree.mode(program.node_map[&one]), Some(LONG_REAL));
    assert_eq!(program.tree.mode(program.node_map[&two]), Some(LONG_REAL));
}

// =============================================================================
// Coercion insertion
// =============================================================================

#[test]
fn integer_assigned_to_real_variable_is_widened_once() {
    let mut p = Program::new();
    let ref_real = p.session.modes_mut().name_of(REAL);
    p.declare("x", ref_real);
    p.declare("n", INT);
    let x = p.ident("x");
    let n = p.ident("n");
    let assign = p.node(NodeKind::Assignation {
        destination: x,
        source: n,
    });

    let program = p.check(assign);
    assert!(!program.has_errors());
    let NodeKind::Assignation { source, .. } = program.tree.kind(program.node_map[&assign]) else {
        panic!("assignation expected");
    };
    assert_eq!(
        coercions(&program, *source),
        vec![(CoercionKind::Widening, REAL)]
    );
}

#[test]
fn variable_is_dereferenced_before_widening() {
    let mut p = Program::new();
    let ref_int = p.session.modes_mut().name_of(INT);
    p.declare("i", ref_int);
    let i = p.ident("i");
    let cast = p.node(NodeKind::Cast {
        mode: REAL,
        operand: i,
    });

    let program = p.check(cast);
    let NodeKind::Cast { operand, .. } = program.tree.kind(program.node_map[&cast]) else {
        panic!("cast expected");
    };
    assert_eq!(
        coercions(&program, *operand),
        vec![
            (CoercionKind::Widening, REAL),
            (CoercionKind::Dereferencing, INT)
        ]
    );
}

#[test]
fn united_value_in_union_variable() {
    let mut p = Program::new();
    let union = p.session.modes_mut().union_of([INT, BOOL]);
    let var = p.session.modes_mut().name_of(union);
    p.declare("u", var);
    let u = p.ident("u");
    let yes = p.truth();
    let assign = p.node(NodeKind::Assignation {
        destination: u,
        source: yes,
    });

    let program = p.check(assign);
    assert!(!program.has_errors());
    let NodeKind::Assignation { source, .. } = program.tree.kind(program.node_map[&assign]) else {
        panic!("assignation expected");
    };
    assert_eq!(
        coercions(&program, *source),
        vec![(CoercionKind::Uniting, union)]
    );
}

#[test]
fn procedure_is_called_when_voided() {
    let mut p = Program::new();
    let proc_void = p.session.modes_mut().proc_of([], VOID);
    p.declare("tick", proc_void);
    let tick = p.ident("tick");
    let zero = p.int(0);
    let serial = p.node(NodeKind::Serial {
        units: vec![tick, zero],
    });
    let closed = p.node(NodeKind::Closed { body: serial });

    let program = p.check(closed);
    assert!(!program.has_errors());
    assert_eq!(program.diagnostics.warnings().count(), 0);
    let NodeKind::Serial { units } = program.tree.kind(program.node_map[&serial]) else {
        panic!("serial clause expected");
    };
    assert_eq!(
        coercions(&program, units[0]),
        vec![(CoercionKind::Deproceduring, VOID)]
    );
}

// =============================================================================
// Calls and operators
// =============================================================================

#[test]
fn partial_call_yields_a_procedure() {
    let mut p = Program::new();
    let f = p.session.modes_mut().proc_of([INT, REAL], BOOL);
    p.declare("f", f);
    let callee = p.ident("f");
    let one = p.int(1);
    let call = p.node(NodeKind::Call {
        primary: callee,
        args: vec![Some(one)],
    });

    let program = p.check(call);
    assert!(!program.has_errors());
    let partial = p.session.modes_mut().proc_of([REAL], BOOL);
    let locale = p.session.modes_mut().proc_of([INT], VOID);
    let call = program.node_map[&call];
    assert_eq!(program.tree.mode(call), Some(partial));
    let shape = &program.tables.calls[&call];
    assert_eq!(shape.partial, Some(partial));
    assert_eq!(shape.locale, Some(locale));
}

#[test]
fn inner_operator_shadows_outer_one() {
    let mut p = Program::new();
    let outer = p.scope;
    let inner = p.session.symbols_mut().open_scope(outer).unwrap();
    let mode = p.session.modes_mut().proc_of([INT, INT], INT);
    let outer_plus = p
        .session
        .symbols_mut()
        .declare_operator(outer, "+", mode, 6)
        .unwrap();
    let inner_plus = p
        .session
        .symbols_mut()
        .declare_operator(inner, "+", mode, 6)
        .unwrap();

    let (a, b) = (p.int(1), p.int(2));
    let outer_sum = p.formula("+", a, b);
    let c = p.node_in(inner, NodeKind::Denotation(Literal::Int { value: 3, size: 0 }));
    let d = p.node_in(inner, NodeKind::Denotation(Literal::Int { value: 4, size: 0 }));
    let inner_sum = p.node_in(
        inner,
        NodeKind::Formula {
            operator: "+".into(),
            tag: None,
            left: c,
            right: d,
        },
    );
    let both = p.node(NodeKind::Collateral {
        units: vec![outer_sum, inner_sum],
    });

    let program = p.check(both);
    assert!(!program.has_errors());
    let operators = &program.tables.operators;
    assert_eq!(operators[&program.node_map[&outer_sum]], outer_plus);
    assert_eq!(operators[&program.node_map[&inner_sum]], inner_plus);
}

#[test]
fn mixed_formula_widens_its_integer_operand() {
    let mut p = Program::new();
    p.declare("n", INT);
    p.declare("r", REAL);
    let n = p.ident("n");
    let r = p.ident("r");
    let sum = p.formula("+", n, r);
    let cast = p.node(NodeKind::Cast {
        mode: REAL,
        operand: sum,
    });

    let program = p.check(cast);
    assert!(!program.has_errors());
    let NodeKind::Formula { left, .. } = program.tree.kind(program.node_map[&sum]) else {
        panic!("formula expected");
    };
    assert_eq!(coercions(&program, *left), vec![(CoercionKind::Widening, REAL)]);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn undeclared_identifier() {
    let mut p = Program::new();
    let ghost = p.ident("ghost");
    let program = p.check(ghost);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::UndeclaredTag]);
    let message = program.diagnostics.errors().next().unwrap().to_string();
    assert!(message.contains("ghost"), "{message}");
}

#[test]
fn mismatch_explains_itself() {
    let mut p = Program::new();
    let union = p.session.modes_mut().union_of([INT, BOOL]);
    let ch = p.node(NodeKind::Denotation(Literal::Char('x')));
    let cast = p.node(NodeKind::Cast {
        mode: union,
        operand: ch,
    });

    let program = p.check(cast);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::ModeMismatch]);
    let message = program.diagnostics.errors().next().unwrap().to_string();
    assert!(message.contains("CHAR"), "{message}");
}

/// The reasons of the first mode mismatch reported.
fn mismatch_reasons(program: &CheckedProgram) -> Vec<String> {
    program
        .diagnostics
        .errors()
        .find_map(|d| match &d.error {
            ModeError::ModeMismatch { reasons, .. } => Some(reasons.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

#[test]
fn structure_mismatch_names_the_field() {
    let mut p = Program::new();
    let from = p.session.modes_mut().struct_of([(INT, "a"), (REAL, "b")]);
    let to = p.session.modes_mut().struct_of([(BOOL, "a"), (REAL, "b")]);
    p.declare("s", from);
    let s = p.ident("s");
    let cast = p.node(NodeKind::Cast { mode: to, operand: s });

    let program = p.check(cast);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::ModeMismatch]);
    assert_eq!(
        mismatch_reasons(&program),
        vec!["field 'a': INT cannot be coerced to BOOL".to_string()]
    );
}

#[test]
fn union_mismatch_names_the_stray_member() {
    let mut p = Program::new();
    let from = p.session.modes_mut().union_of([INT, BOOL]);
    let to = p.session.modes_mut().union_of([INT, REAL]);
    p.declare("u", from);
    let u = p.ident("u");
    let cast = p.node(NodeKind::Cast { mode: to, operand: u });

    let program = p.check(cast);
    let reasons = mismatch_reasons(&program);
    assert_eq!(reasons.len(), 1, "{reasons:?}");
    assert!(reasons[0].starts_with("BOOL is not a member of"), "{reasons:?}");
}

#[test]
fn display_cast_to_a_union_is_explained() {
    let mut p = Program::new();
    let row_int = p.session.modes_mut().row_of(1, INT);
    let target = p.session.modes_mut().union_of([row_int, BOOL]);
    let one = p.int(1);
    let two = p.int(2);
    let display = p.node(NodeKind::Collateral { units: vec![one, two] });
    let cast = p.node(NodeKind::Cast {
        mode: target,
        operand: display,
    });

    let program = p.check(cast);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::ModeMismatch]);
    let reasons = mismatch_reasons(&program);
    assert!(reasons.iter().any(|r| r.contains("cast it")), "{reasons:?}");
}

#[test]
fn unknown_field() {
    let mut p = Program::new();
    let point = p.session.modes_mut().struct_of([(REAL, "x"), (REAL, "y")]);
    p.declare("origin", point);
    let origin = p.ident("origin");
    let z = p.node(NodeKind::Selection {
        field: "z".into(),
        secondary: origin,
    });
    let program = p.check(z);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::Arity]);
}

#[test]
fn too_many_arguments() {
    let mut p = Program::new();
    let f = p.session.modes_mut().proc_of([INT], INT);
    p.declare("f", f);
    let callee = p.ident("f");
    let (a, b) = (p.int(1), p.int(2));
    let call = p.node(NodeKind::Call {
        primary: callee,
        args: vec![Some(a), Some(b)],
    });
    let program = p.check(call);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::Arity]);
}

#[test]
fn no_operator_for_operands() {
    let mut p = Program::new();
    let yes = p.truth();
    let one = p.int(1);
    let sum = p.formula("+", yes, one);
    let program = p.check(sum);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::NoOperator]);
}

#[test]
fn discarded_value_is_a_warning() {
    let mut p = Program::new();
    let (one, two) = (p.int(1), p.int(2));
    let serial = p.node(NodeKind::Serial {
        units: vec![one, two],
    });
    let program = p.check(serial);
    assert!(!program.has_errors());
    let warnings: Vec<_> = program.diagnostics.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].kind(), DiagnosticKind::Voided);
}

#[test]
fn one_mistake_one_diagnostic() {
    let mut p = Program::new();
    let ghost = p.ident("ghost");
    let one = p.int(1);
    let sum = p.formula("+", ghost, one);
    let two = p.int(2);
    let product = p.formula("*", sum, two);
    let cast = p.node(NodeKind::Cast {
        mode: REAL,
        operand: product,
    });
    let program = p.check(cast);
    assert_eq!(error_kinds(&program), vec![DiagnosticKind::UndeclaredTag]);
    assert_eq!(program.coercions, 0);
}

#[test]
fn recursive_modes_are_usable() {
    let mut p = Program::new();
    let scope = p.scope;
    let list = p.session.declare_mode(scope, "LIST").unwrap();
    let next = p.session.modes_mut().name_of(list);
    let body = p.session.modes_mut().struct_of([(INT, "value"), (next, "next")]);
    p.session.define_mode(list, body).unwrap();
    p.declare("cell", body);

    let cell = p.ident("cell");
    let next = p.node(NodeKind::Selection {
        field: "next".into(),
        secondary: cell,
    });
    let value = p.node(NodeKind::Selection {
        field: "value".into(),
        secondary: next,
    });
    let cast = p.node(NodeKind::Cast {
        mode: INT,
        operand: value,
    });
    let program = p.check(cast);
    assert!(!program.has_errors(), "{:?}", program.diagnostics);
    let ref_int = p.session.modes_mut().name_of(INT);
    assert_eq!(program.tree.mode(program.node_map[&value]), Some(ref_int));
}
