//! Modes that `print` and `read` accept.

use a68_core::{ModeId, ModeKind};
use a68_registry::ModeRegistry;
use a68_registry::standard::*;

const PLAIN_PRINTABLE: &[ModeId] = &[
    INT,
    LONG_INT,
    LONG_LONG_INT,
    REAL,
    LONG_REAL,
    LONG_LONG_REAL,
    COMPLEX,
    LONG_COMPLEX,
    LONG_LONG_COMPLEX,
    BOOL,
    CHAR,
    BITS,
    LONG_BITS,
    LONG_LONG_BITS,
    BYTES,
    LONG_BYTES,
    FORMAT,
];

/// A value that can be united to `SIMPLOUT`.
pub fn is_printable(reg: &ModeRegistry, p: ModeId) -> bool {
    printable_at(reg, p, 0)
}

fn printable_at(reg: &ModeRegistry, p: ModeId, depth: usize) -> bool {
    let p = reg.resolve(p);
    if reg.is_absorbing(p) {
        return true;
    }
    if depth > reg.len() {
        return false;
    }
    if PLAIN_PRINTABLE.contains(&p) {
        return true;
    }
    match reg.kind(p) {
        ModeKind::Row { elem, .. } => {
            let elem = reg.resolve(*elem);
            (PLAIN_PRINTABLE.contains(&elem) || reg.is_struct(elem) || reg.is_union(elem))
                && printable_at(reg, elem, depth + 1)
        }
        ModeKind::Flex(row) => printable_at(reg, *row, depth + 1),
        ModeKind::Struct(pack) | ModeKind::Union(pack) => {
            pack.modes().all(|m| printable_at(reg, m, depth + 1))
        }
        _ => false,
    }
}

/// A name that can be united to `SIMPLIN`.
pub fn is_readable(reg: &ModeRegistry, p: ModeId) -> bool {
    let p = reg.resolve(p);
    if reg.is_absorbing(p) {
        return true;
    }
    match reg.kind(p) {
        ModeKind::Ref(sub) => is_printable(reg, *sub),
        ModeKind::Union(pack) => pack
            .modes()
            .all(|m| matches!(reg.kind(m), ModeKind::Ref(sub) if is_printable(reg, *sub))),
        _ => false,
    }
}
