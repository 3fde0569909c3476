//! Voiding.
//!
//! Most units are voided as they are. Those that may yield a procedure or
//! a name of one are first called: `PROC VOID p; p` calls `p`, and so does
//! `REF PROC VOID q; q`. A name of a plain value is not dereferenced.

use a68_core::{CoercionKind, ModeId, NodeKind};
use a68_registry::ModeRegistry;
use a68_registry::standard::VOID;

use super::chain::Step;

/// The steps that discard a value of mode `p` yielded by a node of `kind`.
/// A call that ends in `VOID` needs no voiding step of its own.
pub fn void_steps(reg: &ModeRegistry, kind: &NodeKind, p: ModeId) -> Vec<Step> {
    let mut steps = if calls_when_voided(kind) {
        calling_steps(reg, p)
    } else {
        Vec::new()
    };
    let last = steps.last().map_or(p, |s| s.mode);
    if reg.resolve(last) != VOID {
        steps.push(Step::new(CoercionKind::Voiding, VOID));
    }
    steps
}

fn calls_when_voided(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Identifier { .. }
            | NodeKind::Call { .. }
            | NodeKind::Slice { .. }
            | NodeKind::Selection { .. }
            | NodeKind::Formula { .. }
            | NodeKind::MonadicFormula { .. }
            | NodeKind::RoutineText { .. }
    )
}

fn calling_steps(reg: &ModeRegistry, p: ModeId) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut m = reg.resolve(p);
    for _ in 0..reg.len() {
        let (kind, next) = match reg.sub(m) {
            Some(next) if reg.is_niladic_proc(m) => (CoercionKind::Deproceduring, next),
            Some(next) if reg.is_ref(m) && reaches_procedure(reg, next) => {
                (CoercionKind::Dereferencing, next)
            }
            _ => break,
        };
        steps.push(Step::new(kind, next));
        m = next;
    }
    steps
}

/// Whether dereferencing from `m` meets a niladic procedure.
fn reaches_procedure(reg: &ModeRegistry, m: ModeId) -> bool {
    let mut m = m;
    for _ in 0..reg.len() {
        if reg.is_niladic_proc(m) {
            return true;
        }
        match reg.depref_once(m) {
            Some(next) => m = next,
            None => return false,
        }
    }
    false
}
