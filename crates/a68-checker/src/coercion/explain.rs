//! Reasons attached to a mode mismatch.
//!
//! Composite sources are taken apart: a display names each unit that does
//! not fit its element or field, a series each branch yield, a structure
//! each field and a union each member that has no place in the target.

use a68_core::{Deflex, ModeId, ModeKind, Operations, Sort};
use a68_registry::ModeRegistry;

use super::{is_coercible, is_equal, is_unitable, is_widenable};

/// Why `p` is not coercible to `q` in a `sort` context. May be empty when
/// there is nothing more specific to say than the mismatch itself.
pub fn explain(reg: &ModeRegistry, p: ModeId, q: ModeId, sort: Sort, deflex: Deflex) -> Vec<String> {
    let (p, q) = (reg.resolve(p), reg.resolve(q));
    let mut reasons = Vec::new();
    match reg.kind(p) {
        ModeKind::Stowed(_) => {
            explain_display(reg, p, q, sort, deflex, &mut reasons);
            return reasons;
        }
        ModeKind::Series(_) => {
            for (i, m) in reg.members(p).into_iter().enumerate() {
                if !is_coercible(reg, m, q, sort, deflex) {
                    reasons.push(format!(
                        "yield {} ({}) cannot be coerced to {}",
                        i + 1,
                        reg.display(m),
                        reg.display(q)
                    ));
                }
            }
            return reasons;
        }
        _ => {}
    }

    let p_shown = reg.display(p);
    let q_shown = reg.display(q);

    if reg.is_struct(p) && reg.is_struct(q) {
        if let (Some(a), Some(b)) = (reg.pack(p), reg.pack(q)) {
            if a.len() != b.len() {
                reasons.push(format!("{} has {} fields, {} has {}", p_shown, a.len(), q_shown, b.len()));
            } else {
                for (x, y) in a.iter().zip(b.iter()) {
                    let name = x.name.as_deref().unwrap_or("?");
                    if x.name != y.name {
                        reasons.push(format!(
                            "field '{}' does not match field '{}'",
                            name,
                            y.name.as_deref().unwrap_or("?")
                        ));
                    } else if !is_equal(reg, x.mode, y.mode, deflex) {
                        reasons.push(format!(
                            "field '{}': {} cannot be coerced to {}",
                            name,
                            reg.display(x.mode),
                            reg.display(y.mode)
                        ));
                    }
                }
            }
        }
    }

    if reg.is_union(q) && !is_unitable(reg, p, q, deflex) {
        if reg.is_union(p) {
            for m in reg.members(p) {
                if !is_unitable(reg, m, q, deflex) {
                    reasons.push(format!("{} is not a member of {}", reg.display(m), q_shown));
                }
            }
        } else {
            reasons.push(format!("{} is not a member of {}", p_shown, q_shown));
        }
    }

    if is_widenable(p, q) && !sort.allows(Operations::WIDEN) {
        reasons.push(format!("widening is not allowed in a {} context", sort));
    }
    if reg.is_union(q) && is_unitable(reg, p, q, deflex) && !sort.allows(Operations::UNITE) {
        reasons.push(format!("uniting is not allowed in a {} context", sort));
    }
    if reg.is_ref(p) && !sort.allows(Operations::DEREFERENCE) {
        let deref = reg.depref_completely(p);
        if is_coercible(reg, deref, q, Sort::Strong, deflex) {
            reasons.push(format!("dereferencing is not allowed in a {} context", sort));
        }
    }
    if reg.is_row(q) && !sort.allows(Operations::ROW) {
        if let Some(slice) = reg.slice(q) {
            if is_equal(reg, p, slice, deflex) {
                reasons.push(format!("rowing is not allowed in a {} context", sort));
            }
        }
    }
    if reg.is_ref(p) && reg.is_ref(q) && deflex == Deflex::Safe {
        let (ps, qs) = (reg.sub(p), reg.sub(q));
        if let (Some(ps), Some(qs)) = (ps, qs) {
            if reg.is_flex(qs) && reg.deflexed(qs) == ps {
                reasons.push("a name of a fixed row cannot stand for a flexible one".to_string());
            }
        }
    }
    reasons
}

/// The units of a display against the elements or fields of `q`.
fn explain_display(
    reg: &ModeRegistry,
    p: ModeId,
    q: ModeId,
    sort: Sort,
    deflex: Deflex,
    reasons: &mut Vec<String>,
) {
    if sort != Sort::Strong {
        reasons.push(format!("a display needs a strong context, not a {} one", sort));
        return;
    }
    let members = reg.members(p);
    if reg.is_row(q) {
        if let Some(slice) = reg.slice(q) {
            for (i, &m) in members.iter().enumerate() {
                if !is_coercible(reg, m, slice, Sort::Strong, deflex) {
                    reasons.push(format!(
                        "element {} ({}) cannot be coerced to {}",
                        i + 1,
                        reg.display(m),
                        reg.display(slice)
                    ));
                }
            }
        }
        return;
    }
    match reg.kind(q) {
        ModeKind::Struct(pack) | ModeKind::Proc { params: pack, .. } => {
            if pack.len() != members.len() {
                reasons.push(format!(
                    "the display has {} units, {} needs {}",
                    members.len(),
                    reg.display(q),
                    pack.len()
                ));
                return;
            }
            for (i, (&m, entry)) in members.iter().zip(pack.iter()).enumerate() {
                if is_coercible(reg, m, entry.mode, Sort::Strong, deflex) {
                    continue;
                }
                let place = match &entry.name {
                    Some(name) => format!("field '{name}'"),
                    None => format!("element {}", i + 1),
                };
                reasons.push(format!(
                    "{} ({}) cannot be coerced to {}",
                    place,
                    reg.display(m),
                    reg.display(entry.mode)
                ));
            }
        }
        ModeKind::Union(_) => reasons.push(format!(
            "a display is not united to {}; cast it to one of its members",
            reg.display(q)
        )),
        _ => reasons.push(format!("a display cannot yield {}", reg.display(q))),
    }
}
