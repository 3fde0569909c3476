//! Structural equivalence of possibly cyclic modes.
//!
//! Two modes are equivalent when no finite unfolding tells them apart. The
//! check is coinductive: a pair under comparison is assumed equal while its
//! children are compared, which terminates on cycles through indicants.
//! It runs over an explicit worklist, so deeply nested modes never recurse.

use std::mem::{Discriminant, discriminant};

use a68_core::{ModeId, ModeKind, Pack};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ModeRegistry;

/// Whether `a` and `b` describe the same mode.
pub fn are_equivalent(reg: &ModeRegistry, a: ModeId, b: ModeId) -> bool {
    let mut assumed: FxHashSet<(ModeId, ModeId)> = FxHashSet::default();
    let mut work = vec![(a, b)];

    while let Some((x, y)) = work.pop() {
        let (x, y) = (reg.resolve(x), reg.resolve(y));
        if x == y || !assumed.insert((x, y)) {
            continue;
        }
        let same_shape = match (reg.kind(x), reg.kind(y)) {
            (ModeKind::Ref(p), ModeKind::Ref(q)) | (ModeKind::Flex(p), ModeKind::Flex(q)) => {
                work.push((*p, *q));
                true
            }
            (ModeKind::Row { dim: d1, elem: e1 }, ModeKind::Row { dim: d2, elem: e2 }) => {
                work.push((*e1, *e2));
                d1 == d2
            }
            (
                ModeKind::Proc {
                    params: p1,
                    result: r1,
                },
                ModeKind::Proc {
                    params: p2,
                    result: r2,
                },
            ) => {
                work.push((*r1, *r2));
                push_packs(&mut work, p1, p2, false)
            }
            (ModeKind::Struct(p1), ModeKind::Struct(p2)) => push_packs(&mut work, p1, p2, true),
            (ModeKind::Union(p1), ModeKind::Union(p2)) => push_packs(&mut work, p1, p2, false),
            _ => false,
        };
        if !same_shape {
            return false;
        }
    }
    true
}

fn push_packs(work: &mut Vec<(ModeId, ModeId)>, p: &Pack, q: &Pack, names: bool) -> bool {
    if p.len() != q.len() {
        return false;
    }
    for (e, f) in p.iter().zip(q.iter()) {
        if names && e.name != f.name {
            return false;
        }
        work.push((e.mode, f.mode));
    }
    true
}

/// Re-canonicalizes the registry after an indicant was defined.
///
/// Alternates two steps until neither merges anything: re-keying every
/// representative under its resolved structure, then pairwise coinductive
/// comparison within each kind for cycles that re-keying cannot see.
pub(crate) fn merge_equivalents(reg: &mut ModeRegistry) {
    loop {
        let rekeyed = rekey(reg);
        let merged = merge_bisimilar(reg);
        if !rekeyed && !merged {
            break;
        }
    }
}

fn rekey(reg: &mut ModeRegistry) -> bool {
    let mut changed = false;
    let reps: Vec<ModeId> = reg.representatives().collect();
    for id in reps {
        if reg.resolve(id) != id {
            continue;
        }
        let key = reg.canonical(reg.kind(id).clone());
        match reg.index.get(&key).map(|&other| reg.resolve(other)) {
            Some(other) if other != id => {
                reg.merge(other, id);
                changed = true;
            }
            Some(_) => {}
            None => {
                reg.index.insert(key, id);
            }
        }
    }
    changed
}

fn merge_bisimilar(reg: &mut ModeRegistry) -> bool {
    let mut groups: FxHashMap<Discriminant<ModeKind>, Vec<ModeId>> = FxHashMap::default();
    for id in reg.representatives() {
        let kind = reg.kind(id);
        if !matches!(kind, ModeKind::Standard(_)) {
            groups.entry(discriminant(kind)).or_default().push(id);
        }
    }

    let mut changed = false;
    for group in groups.values() {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                let (a, b) = (reg.resolve(a), reg.resolve(b));
                if a != b && are_equivalent(reg, a, b) {
                    reg.merge(a, b);
                    changed = true;
                }
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::*;

    #[test]
    fn identical_ids_are_equivalent() {
        let reg = ModeRegistry::new();
        assert!(are_equivalent(&reg, INT, INT));
        assert!(!are_equivalent(&reg, INT, REAL));
    }

    #[test]
    fn field_names_matter() {
        let mut reg = ModeRegistry::new();
        let a = reg.struct_of([(INT, "a")]);
        let b = reg.struct_of([(INT, "b")]);
        assert!(!are_equivalent(&reg, a, b));
    }

    #[test]
    fn row_dimensions_matter() {
        let reg = ModeRegistry::new();
        assert!(!are_equivalent(&reg, ROW_REAL, ROW_ROW_REAL));
    }

    #[test]
    fn cyclic_modes_compare_without_looping() {
        let mut reg = ModeRegistry::new();
        let a = reg.declare_indicant("A");
        let pa = reg.proc_of([], a);
        let ra = reg.name_of(pa);
        let body_a = reg.struct_of([(ra, "f")]);
        reg.define_indicant(a, body_a).unwrap();

        let b = reg.declare_indicant("B");
        let pb = reg.proc_of([], b);
        let rb = reg.name_of(pb);
        let body_b = reg.struct_of([(rb, "f")]);
        reg.define_indicant(b, body_b).unwrap();

        assert!(are_equivalent(&reg, a, b));
        assert_eq!(reg.resolve(body_a), reg.resolve(body_b));
    }
}
