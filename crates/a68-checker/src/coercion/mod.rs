//! Coercibility.
//!
//! [`is_coercible`] answers whether a unit yielding `p` may stand in a
//! position of sort `s` requiring `q`. The answer is a pure function of the
//! two modes, the sort and a [`Deflex`] policy; the insertion pass later
//! rebuilds the same decision step by step (see `insert::chain`).
//!
//! ## Order of checks
//!
//! 1. Absorbing modes (`ERROR`, `HIP`, anything ill) are coercible both ways.
//! 2. Equal modes under the deflex policy.
//! 3. Displays (stowed), series and the empty display `VACUUM`.
//! 4. The per-sort rules, weakest first:
//!    - soft: deproceduring, once
//!    - weak, meek: dereferencing and deproceduring
//!    - firm: + uniting and `ROWS`
//!    - strong: + rowing, widening, voiding, transput unions

mod explain;
mod transput;
mod widen;

use a68_core::{Deflex, ModeId, ModeKind, Sort};
use a68_registry::ModeRegistry;
use a68_registry::standard::{ROW_SIMPLIN, ROW_SIMPLOUT, ROWS, SIMPLIN, SIMPLOUT, VACUUM, VOID};

pub use explain::explain;
pub use transput::{is_printable, is_readable};
pub use widen::{WIDENINGS, Widening, is_widenable, widening_path, widens_to};

/// Whether `p` and `q` are the same mode under `deflex`.
pub fn is_equal(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    let (p, q) = (reg.resolve(p), reg.resolve(q));
    if p == q {
        return true;
    }
    let (p_ref, q_ref) = (reg.is_ref(p), reg.is_ref(q));
    match deflex {
        Deflex::Force => reg.deflexed(p) == reg.deflexed(q),
        Deflex::Alias => !p_ref && !q_ref && reg.deflexed(p) == reg.deflexed(q),
        Deflex::Safe => match (p_ref, q_ref) {
            (false, false) => reg.deflexed(p) == reg.deflexed(q),
            (true, true) => reg.deflexed(p) == q,
            _ => false,
        },
        Deflex::None => false,
    }
}

/// Whether a unit yielding `p` is acceptable where sort `sort` requires `q`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn is_coercible(reg: &ModeRegistry, p: ModeId, q: ModeId, sort: Sort, deflex: Deflex) -> bool {
    let (p, q) = (reg.resolve(p), reg.resolve(q));
    if reg.is_absorbing(p) || reg.is_absorbing(q) {
        return true;
    }
    if is_equal(reg, p, q, deflex) {
        return true;
    }
    match reg.kind(p) {
        ModeKind::Stowed(_) => return is_coercible_stowed(reg, p, q, sort, deflex),
        ModeKind::Series(pack) => {
            return !pack.is_empty()
                && pack
                    .modes()
                    .all(|m| is_coercible(reg, m, q, sort, deflex));
        }
        _ => {}
    }
    if p == VACUUM && reg.is_row(q) {
        return true;
    }
    match sort {
        Sort::NoSort => false,
        Sort::Soft => is_soft_coercible(reg, p, q, deflex),
        Sort::Weak | Sort::Meek => is_meek_coercible(reg, p, q, deflex),
        Sort::Firm => is_firm_coercible(reg, p, q, deflex),
        Sort::Strong => is_strong_coercible(reg, p, q, deflex),
    }
}

/// Each member of a display against the target's elements or fields.
fn is_coercible_stowed(reg: &ModeRegistry, p: ModeId, q: ModeId, sort: Sort, deflex: Deflex) -> bool {
    if sort != Sort::Strong {
        return false;
    }
    if q == VOID {
        return true;
    }
    let members = reg.members(p);
    if reg.is_row(q) {
        let Some(slice) = reg.slice(q) else {
            return false;
        };
        return members
            .iter()
            .all(|&m| is_coercible(reg, m, slice, Sort::Strong, deflex));
    }
    match reg.kind(q) {
        ModeKind::Struct(pack) | ModeKind::Proc { params: pack, .. } => {
            pack.len() == members.len()
                && members
                    .iter()
                    .zip(pack.modes())
                    .all(|(&m, f)| is_coercible(reg, m, f, Sort::Strong, deflex))
        }
        _ => false,
    }
}

/// Soft positions deprocedure at most once.
fn is_soft_coercible(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    is_equal(reg, p, q, deflex)
        || (reg.is_niladic_proc(p) && reg.sub(p).is_some_and(|r| is_equal(reg, r, q, deflex)))
}

/// Weak and meek positions allow the same steps.
fn is_meek_coercible(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    let mut p = p;
    for _ in 0..reg.len() {
        if is_equal(reg, p, q, deflex) {
            return true;
        }
        match reg.depref_once(p) {
            Some(next) => p = next,
            None => return false,
        }
    }
    false
}

fn is_firm_coercible(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    let mut p = p;
    for _ in 0..reg.len() {
        if is_equal(reg, p, q, deflex)
            || (q == ROWS && is_rows_type(reg, p))
            || is_unitable(reg, p, q, deflex)
        {
            return true;
        }
        match reg.depref_once(p) {
            Some(next) => p = next,
            None => return false,
        }
    }
    false
}

fn is_strong_coercible(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    let mut p = p;
    for _ in 0..reg.len() {
        if strong_without_depref(reg, p, q, deflex) {
            return true;
        }
        if (q == SIMPLOUT || q == ROW_SIMPLOUT) && is_printable(reg, p) {
            return true;
        }
        match reg.depref_once(p) {
            Some(next) => p = next,
            None => return false,
        }
    }
    false
}

/// The strong rules that do not strip a `REF` or `PROC` from `p`.
pub(crate) fn strong_without_depref(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    is_equal(reg, p, q, deflex)
        || q == VOID
        || ((q == SIMPLIN || q == ROW_SIMPLIN) && is_readable(reg, p))
        || (q == ROWS && is_rows_type(reg, p))
        || is_unitable(reg, p, reg.derow(q), deflex)
        || (reg.is_ref_row(q) && is_strong_name(reg, p, q))
        || (reg.slice(q).is_some() && is_strong_slice(reg, p, q))
        || flex_sub(reg, q).is_some_and(|sub| is_strong_coercible(reg, p, sub, deflex))
        || is_widenable(p, q)
}

/// The row under a `FLEX`.
pub(crate) fn flex_sub(reg: &ModeRegistry, q: ModeId) -> Option<ModeId> {
    if reg.is_flex(q) { reg.sub(q) } else { None }
}

/// `p` is a name that rows to the name of a row `q`.
pub fn is_strong_name(reg: &ModeRegistry, p: ModeId, q: ModeId) -> bool {
    let mut q = q;
    for _ in 0..reg.len() {
        if p == q {
            return true;
        }
        match reg.multiple(q) {
            Some(m) => q = m,
            None => return false,
        }
    }
    false
}

/// `p` rows to `q` through its slices.
pub fn is_strong_slice(reg: &ModeRegistry, p: ModeId, q: ModeId) -> bool {
    let mut q = q;
    for _ in 0..reg.len() {
        if p == q || is_widenable(p, q) {
            return true;
        }
        if let Some(slice) = reg.slice(q) {
            q = slice;
        } else if reg.is_ref_row(q) {
            return is_strong_name(reg, p, q);
        } else {
            return false;
        }
    }
    false
}

/// A row, or a union of rows.
pub fn is_rows_type(reg: &ModeRegistry, p: ModeId) -> bool {
    match reg.kind(p) {
        ModeKind::Row { .. } | ModeKind::Flex(_) => true,
        ModeKind::Union(pack) => pack.modes().all(|m| is_rows_type(reg, m)),
        _ => false,
    }
}

/// `q` is a union and `p` is one of its members, or a union whose members
/// all are.
pub fn is_unitable(reg: &ModeRegistry, p: ModeId, q: ModeId, deflex: Deflex) -> bool {
    if !reg.is_union(q) {
        return false;
    }
    let targets = reg.members(q);
    let contains = |m: ModeId| targets.iter().any(|&t| is_equal(reg, m, t, deflex));
    if reg.is_union(p) {
        reg.members(p).into_iter().all(contains)
    } else {
        contains(p)
    }
}
