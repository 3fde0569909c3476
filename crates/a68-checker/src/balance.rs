//! Balancing: the common mode of several branches.
//!
//! The branches of a conditional, case or conformity clause may yield
//! different modes. Outside a strong context with a known target the clause
//! yields the one mode every branch can be strongly coerced to:
//!
//! 1. Gather the yields into a united mode ([`make_united_mode`]).
//! 2. Try each member as the target ([`get_balanced_mode`]), first as is
//!    and then with more and more `REF`/`PROC` layers stripped.

use a68_core::{Deflex, ModeId, ModeKind, Sort};
use a68_registry::ModeRegistry;
use a68_registry::standard::{ERROR, HIP, VOID};
use tracing::trace;

use crate::coercion::{is_coercible, is_equal};

/// Dereferencing depth tried before giving up on a common mode.
pub const MAX_BALANCE_DEPTH: usize = 16;

/// Flattens a series (and any unions inside it) into one mode.
///
/// A mode that is not a series is returned unchanged. Members equal up to
/// `FLEX` collapse into the flexible one; a single survivor is returned
/// as itself rather than as a one-member union.
pub fn make_united_mode(reg: &mut ModeRegistry, m: ModeId) -> ModeId {
    let m = reg.resolve(m);
    if !reg.is_series(m) {
        return m;
    }

    let mut members = Vec::new();
    let mut stack = vec![m];
    while let Some(x) = stack.pop() {
        match reg.kind(x) {
            ModeKind::Series(pack) | ModeKind::Union(pack) => {
                let inner: Vec<ModeId> = pack.modes().map(|i| reg.resolve(i)).collect();
                stack.extend(inner.into_iter().rev());
            }
            _ => members.push(x),
        }
    }

    if members.iter().any(|&x| reg.is_ill(x)) {
        return ERROR;
    }
    if members.len() > 1 && members.iter().any(|&x| x != HIP) {
        members.retain(|&x| x != HIP);
    }

    loop {
        members.sort();
        members.dedup();
        let Some((keep, drop)) = deflex_pair(reg, &members) else {
            break;
        };
        if reg.is_flex(members[drop]) {
            members[keep] = members[drop];
        }
        members.remove(drop);
    }

    match members.as_slice() {
        [] => VOID,
        [single] => *single,
        _ => reg.union_of(members),
    }
}

/// Two distinct members equal up to `FLEX`; the first index is kept.
fn deflex_pair(reg: &ModeRegistry, members: &[ModeId]) -> Option<(usize, usize)> {
    for i in 0..members.len() {
        for j in i + 1..members.len() {
            if is_equal(reg, members[i], members[j], Deflex::Force) {
                return Some((i, j));
            }
        }
    }
    None
}

/// The member of union `m` that every member coerces to in `sort`.
///
/// With `depref` the candidate is the fully dereferenced member; otherwise
/// only the outer layers already stripped at the current depth are. A mode
/// that is not a union balances to itself.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn get_balanced_mode(
    reg: &ModeRegistry,
    m: ModeId,
    sort: Sort,
    depref: bool,
    deflex: Deflex,
) -> Option<ModeId> {
    let m = reg.resolve(m);
    if !reg.is_union(m) {
        return Some(m);
    }
    let members = reg.members(m);

    for depth in 0..=MAX_BALANCE_DEPTH {
        let mut pick: Option<ModeId> = None;
        let mut deeper = false;
        for &member in members.iter().filter(|&&x| x != HIP) {
            let Some(candidate) = depref_times(reg, member, depth) else {
                continue;
            };
            deeper |= reg.is_deprefable(candidate);
            let target = if depref {
                reg.depref_completely(candidate)
            } else {
                candidate
            };
            if !members
                .iter()
                .all(|&x| is_coercible(reg, x, target, sort, deflex))
            {
                continue;
            }
            pick = match pick {
                None => Some(target),
                Some(current) if reg.is_flex(target) && reg.deflexed(target) == current => {
                    Some(target)
                }
                keep => keep,
            };
        }
        if let Some(pick) = pick {
            trace!(union = %reg.display(m), balanced = %reg.display(pick), depth, "balanced");
            return Some(pick);
        }
        if !deeper {
            break;
        }
    }
    None
}

fn depref_times(reg: &ModeRegistry, m: ModeId, times: usize) -> Option<ModeId> {
    (0..times).try_fold(m, |x, _| reg.depref_once(x))
}

/// The common mode of the yields of a clause's branches.
///
/// Every yield must be strongly coercible to the answer; `None` means the
/// branches have no unique mode.
pub fn balance(reg: &mut ModeRegistry, yields: &[ModeId]) -> Option<ModeId> {
    let series = reg.series_of(yields.iter().copied());
    let united = make_united_mode(reg, series);
    let balanced = if reg.is_union(united) {
        get_balanced_mode(reg, united, Sort::Strong, false, Deflex::Safe)?
    } else {
        united
    };
    yields
        .iter()
        .all(|&y| is_coercible(reg, y, balanced, Sort::Strong, Deflex::Safe))
        .then_some(balanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use a68_registry::standard::*;

    #[test]
    fn int_and_real_balance_to_real() {
        let mut reg = ModeRegistry::new();
        assert_eq!(balance(&mut reg, &[INT, REAL]), Some(REAL));
        assert_eq!(balance(&mut reg, &[REAL, INT, LONG_INT]), None);
        assert_eq!(balance(&mut reg, &[LONG_INT, LONG_REAL]), Some(LONG_REAL));
    }

    #[test]
    fn hip_defers_to_the_other_branches() {
        let mut reg = ModeRegistry::new();
        assert_eq!(balance(&mut reg, &[HIP, BOOL]), Some(BOOL));
        assert_eq!(balance(&mut reg, &[HIP]), Some(HIP));
    }

    #[test]
    fn names_balance_to_their_referent() {
        let mut reg = ModeRegistry::new();
        let ref_int = reg.name_of(INT);
        assert_eq!(balance(&mut reg, &[ref_int, REAL]), Some(REAL));
        assert_eq!(balance(&mut reg, &[ref_int, ref_int]), Some(ref_int));
        assert_eq!(balance(&mut reg, &[ref_int, INT]), Some(INT));
    }

    #[test]
    fn unrelated_structures_do_not_balance() {
        let mut reg = ModeRegistry::new();
        let a = reg.struct_of([(INT, "a")]);
        let b = reg.struct_of([(INT, "b")]);
        assert_eq!(balance(&mut reg, &[a, b]), None);
    }

    #[test]
    fn flexible_rows_win_ties() {
        let mut reg = ModeRegistry::new();
        let series = reg.series_of([ROW_CHAR, STRING]);
        assert_eq!(make_united_mode(&mut reg, series), STRING);
    }

    #[test]
    fn united_mode_flattens_unions() {
        let mut reg = ModeRegistry::new();
        let u = reg.union_of([INT, BOOL]);
        let series = reg.series_of([u, CHAR, HIP]);
        let united = make_united_mode(&mut reg, series);
        assert_eq!(reg.members(united), vec![INT, BOOL, CHAR]);
        assert_eq!(make_united_mode(&mut reg, INT), INT);
        let ill = reg.name_of(ERROR);
        let series = reg.series_of([INT, ill]);
        assert_eq!(make_united_mode(&mut reg, series), ERROR);
    }

    #[test]
    fn balancing_a_non_union_is_identity() {
        let reg = ModeRegistry::new();
        assert_eq!(get_balanced_mode(&reg, INT, Sort::Strong, true, Deflex::Safe), Some(INT));
    }

    #[test]
    fn depref_balancing_strips_names() {
        let mut reg = ModeRegistry::new();
        let ref_int = reg.name_of(INT);
        let ref_real = reg.name_of(REAL);
        let u = reg.union_of([ref_int, ref_real]);
        assert_eq!(get_balanced_mode(&reg, u, Sort::Strong, true, Deflex::Safe), Some(REAL));
        assert_eq!(get_balanced_mode(&reg, u, Sort::Strong, false, Deflex::Safe), Some(REAL));
    }
}
