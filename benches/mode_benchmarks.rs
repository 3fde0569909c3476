//! Benchmarks for mode checking.
//!
//! - Predicates: coercibility and balancing over a fixed set of modes
//! - Programs: whole sessions over generated formula chains and serial clauses

use a68_modes::a68_checker::{balance, is_coercible};
use a68_modes::{
    Deflex, Literal, ModeId, ModeRegistry, NodeId, NodeKind, ScopeId, Session, Sort, Span,
    SyntaxTree,
    standard::*,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ordered_float::OrderedFloat;
use std::hint::black_box;

/// A registry holding a spread of derived modes next to the standard ones.
fn sample_modes() -> (ModeRegistry, Vec<ModeId>) {
    let mut reg = ModeRegistry::new();
    let ref_int = reg.name_of(INT);
    let ref_ref_int = reg.name_of(ref_int);
    let proc_real = reg.proc_of([], REAL);
    let ref_proc_real = reg.name_of(proc_real);
    let row_int = reg.row_of(1, INT);
    let ref_row_int = reg.name_of(row_int);
    let flex_row_int = reg.flex_of(row_int);
    let ref_flex_row_int = reg.name_of(flex_row_int);
    let pair = reg.struct_of([(INT, "re"), (REAL, "im")]);
    let number = reg.union_of([INT, REAL, COMPLEX]);
    let row_number = reg.row_of(1, number);
    let modes = vec![
        INT, LONG_INT, REAL, LONG_LONG_REAL, COMPLEX, BOOL, CHAR, BITS, STRING, VOID, SIMPLOUT,
        ROW_SIMPLOUT, ROW_BOOL, ROW_ROW_REAL, ref_int, ref_ref_int, proc_real, ref_proc_real,
        row_int, ref_row_int, flex_row_int, ref_flex_row_int, pair, number, row_number,
    ];
    (reg, modes)
}

fn coercibility_benchmarks(c: &mut Criterion) {
    let (reg, modes) = sample_modes();
    let mut group = c.benchmark_group("coercion/all_pairs");
    group.throughput(Throughput::Elements((modes.len() * modes.len()) as u64));

    for sort in [Sort::Soft, Sort::Meek, Sort::Firm, Sort::Strong] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{sort:?}")), &sort, |b, &sort| {
            b.iter(|| {
                let mut count = 0usize;
                for &p in &modes {
                    for &q in &modes {
                        if is_coercible(&reg, p, q, sort, Deflex::Safe) {
                            count += 1;
                        }
                    }
                }
                black_box(count)
            });
        });
    }
    group.finish();
}

fn balancing_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("coercion/balance");

    group.bench_function("numeric_tower", |b| {
        b.iter(|| {
            let mut reg = ModeRegistry::new();
            let ref_int = reg.name_of(INT);
            black_box(balance(&mut reg, black_box(&[ref_int, REAL, LONG_REAL, INT])))
        });
    });

    group.bench_function("unrelated_rows", |b| {
        b.iter(|| {
            let mut reg = ModeRegistry::new();
            let row_int = reg.row_of(1, INT);
            let row_char = reg.row_of(1, CHAR);
            black_box(balance(&mut reg, black_box(&[row_int, row_char, STRING])))
        });
    });
    group.finish();
}

/// `0 + 0.0 + 1 + 2.0 ...`, nested to the left.
fn formula_chain(scope: ScopeId, length: usize) -> SyntaxTree {
    let mut tree = SyntaxTree::new();
    let mut acc = tree.push(NodeKind::Denotation(Literal::Int { value: 0, size: 0 }), Span::default(), scope);
    for i in 0..length {
        let operand = if i % 2 == 0 {
            NodeKind::Denotation(Literal::Real { value: OrderedFloat(i as f64), size: 0 })
        } else {
            NodeKind::Denotation(Literal::Int { value: i as i64, size: 0 })
        };
        let right = tree.push(operand, Span::default(), scope);
        acc = tree.push(
            NodeKind::Formula {
                operator: "+".to_string(),
                tag: None,
                left: acc,
                right,
            },
            Span::default(),
            scope,
        );
    }
    tree.set_root(acc);
    tree
}

/// A serial clause of casts, each widening an integer to `LONG REAL`.
fn serial_casts(scope: ScopeId, length: usize) -> SyntaxTree {
    let mut tree = SyntaxTree::new();
    let units: Vec<NodeId> = (0..length)
        .map(|i| {
            let one = tree.push(NodeKind::Denotation(Literal::Int { value: i as i64, size: 0 }), Span::default(), scope);
            tree.push(NodeKind::Cast { mode: LONG_REAL, operand: one }, Span::default(), scope)
        })
        .collect();
    let serial = tree.push(NodeKind::Serial { units }, Span::default(), scope);
    tree.set_root(serial);
    tree
}

fn program_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("session/check_program");

    for length in [10, 100, 1000] {
        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::new("formula_chain", length), &length, |b, &length| {
            let mut session = Session::new();
            let scope = session.symbols().standard_scope();
            b.iter_batched(
                || formula_chain(scope, length),
                |tree| black_box(session.check_program(tree).map(|p| p.coercions)),
                criterion::BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("serial_casts", length), &length, |b, &length| {
            let mut session = Session::new();
            let scope = session.symbols().standard_scope();
            b.iter_batched(
                || serial_casts(scope, length),
                |tree| black_box(session.check_program(tree).map(|p| p.coercions)),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    coercibility_benchmarks,
    balancing_benchmarks,
    program_benchmarks
);
criterion_main!(benches);
