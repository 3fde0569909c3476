//! Building coercion chains.
//!
//! [`coercion_steps`] follows the same decisions as
//! [`is_coercible`](crate::coercion::is_coercible), but instead of
//! answering yes or no it returns the steps taken, innermost first, each
//! with the mode it yields.

use a68_core::{CoercionKind, Deflex, ModeId, Sort};
use a68_registry::ModeRegistry;
use a68_registry::standard::{ROW_SIMPLIN, ROW_SIMPLOUT, ROWS, SIMPLIN, SIMPLOUT, VOID};

use crate::coercion::{
    flex_sub, is_equal, is_printable, is_readable, is_rows_type, is_strong_name, is_unitable,
    is_widenable, widening_path,
};

/// One coercion and the mode it yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub kind: CoercionKind,
    pub mode: ModeId,
}

impl Step {
    pub fn new(kind: CoercionKind, mode: ModeId) -> Self {
        Self { kind, mode }
    }
}

/// The steps that take a `p` to a `q` in a context of sort `sort`, or
/// `None` if there are none.
pub fn coercion_steps(reg: &ModeRegistry, p: ModeId, q: ModeId, sort: Sort) -> Option<Vec<Step>> {
    let (p, q) = (reg.resolve(p), reg.resolve(q));
    let mut steps = Vec::new();
    let mut m = p;
    for _ in 0..=reg.len() {
        if let Some(tail) = direct(reg, m, q, sort) {
            steps.extend(tail);
            return Some(steps);
        }
        let next = match sort {
            Sort::NoSort => None,
            Sort::Soft if steps.is_empty() && reg.is_niladic_proc(m) => reg.sub(m),
            Sort::Soft => None,
            _ => reg.depref_once(m),
        }?;
        let kind = if reg.is_ref(m) {
            CoercionKind::Dereferencing
        } else {
            CoercionKind::Deproceduring
        };
        steps.push(Step::new(kind, next));
        m = next;
    }
    None
}

/// Steps that need no further dereferencing of `p`.
fn direct(reg: &ModeRegistry, p: ModeId, q: ModeId, sort: Sort) -> Option<Vec<Step>> {
    if is_equal(reg, p, q, Deflex::Safe) {
        return Some(Vec::new());
    }
    if matches!(sort, Sort::Firm | Sort::Strong) {
        if q == ROWS && is_rows_type(reg, p) {
            return Some(vec![Step::new(CoercionKind::Uniting, ROWS)]);
        }
        if is_unitable(reg, p, q, Deflex::Safe) {
            return Some(vec![Step::new(CoercionKind::Uniting, q)]);
        }
    }
    if sort == Sort::Strong { strong(reg, p, q) } else { None }
}

fn strong(reg: &ModeRegistry, p: ModeId, q: ModeId) -> Option<Vec<Step>> {
    if q == VOID {
        return Some(vec![Step::new(CoercionKind::Voiding, VOID)]);
    }
    let transput = match q {
        SIMPLIN | ROW_SIMPLIN if is_readable(reg, p) => Some(SIMPLIN),
        SIMPLOUT | ROW_SIMPLOUT if is_printable(reg, p) => Some(SIMPLOUT),
        _ => None,
    };
    if let Some(member) = transput {
        let mut steps = vec![Step::new(CoercionKind::Uniting, member)];
        if q != member {
            steps.push(Step::new(CoercionKind::Rowing, q));
        }
        return Some(steps);
    }

    let element = reg.derow(q);
    if element != q && is_unitable(reg, p, element, Deflex::Safe) {
        let mut steps = vec![Step::new(CoercionKind::Uniting, element)];
        steps.extend(rowing(reg, element, q, |m| reg.slice(m))?);
        return Some(steps);
    }
    if reg.is_ref_row(q) && is_strong_name(reg, p, q) {
        return rowing(reg, p, q, |m| reg.multiple(m));
    }
    if reg.slice(q).is_some() {
        if let Some(steps) = strong_slice(reg, p, q) {
            return Some(steps);
        }
    }
    if let Some(sub) = flex_sub(reg, q) {
        if let Some(mut steps) = coercion_steps(reg, p, sub, Sort::Strong) {
            if let Some(last) = steps.last_mut() {
                last.mode = q;
            }
            return Some(steps);
        }
    }
    if is_widenable(p, q) {
        return widening(p, q);
    }
    None
}

/// Rowing from `from` up to `to`, where walking `down` from `to` reaches
/// `from`. One step per dimension added.
fn rowing(
    reg: &ModeRegistry,
    from: ModeId,
    to: ModeId,
    down: impl Fn(ModeId) -> Option<ModeId>,
) -> Option<Vec<Step>> {
    let mut levels = Vec::new();
    let mut m = to;
    for _ in 0..reg.len() {
        if m == from {
            return Some(
                levels
                    .into_iter()
                    .rev()
                    .map(|level| Step::new(CoercionKind::Rowing, level))
                    .collect(),
            );
        }
        levels.push(m);
        m = down(m)?;
    }
    None
}

/// `p` widens (or is) some slice of `q`, then rows up to `q`.
fn strong_slice(reg: &ModeRegistry, p: ModeId, q: ModeId) -> Option<Vec<Step>> {
    let mut levels = Vec::new();
    let mut m = q;
    for _ in 0..reg.len() {
        let base = if m == p {
            Some(Vec::new())
        } else if is_widenable(p, m) {
            widening(p, m)
        } else if let Some(slice) = reg.slice(m) {
            levels.push(m);
            m = slice;
            continue;
        } else if reg.is_ref_row(m) {
            rowing(reg, p, m, |n| reg.multiple(n))
        } else {
            None
        };
        let mut steps = base?;
        steps.extend(
            levels
                .into_iter()
                .rev()
                .map(|level| Step::new(CoercionKind::Rowing, level)),
        );
        return Some(steps);
    }
    None
}

fn widening(p: ModeId, q: ModeId) -> Option<Vec<Step>> {
    let path = widening_path(p, q)?;
    Some(
        path.into_iter()
            .map(|m| Step::new(CoercionKind::Widening, m))
            .collect(),
    )
}
