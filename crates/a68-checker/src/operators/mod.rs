//! Operator identification.
//!
//! An applied operator is matched against the operators declared with its
//! symbol, innermost range first; the first range holding a match wins, so
//! an inner declaration shadows every outer one. Operands are tested in a
//! firm context, where names dereference and values unite but nothing
//! widens.
//!
//! When that finds nothing the standard environ is searched again with the
//! operands promoted ([`fallbacks`]): monadic operands to the complex modes,
//! the scalar partner of a vector operand, then both operands to their
//! balanced mode and up the numeric ladder, and last the right operand
//! alone to the dereferenced balanced mode.

pub mod fallbacks;

use a68_core::{Deflex, ModeId, ModeKind, ScopeId, Sort, TagId};
use a68_registry::{ModeRegistry, SymbolTable};
use tracing::trace;

use crate::balance::{get_balanced_mode, make_united_mode};
use crate::coercion::is_coercible;
use fallbacks::{MONADIC_PROMOTIONS, NUMERIC_LADDER, SCALAR_PROMOTIONS, VECTOR_OPERANDS};

/// Outcome of operator identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorMatch {
    /// `promoted` is set when the operands only match after a strong
    /// coercion, which the checker must then require of them.
    Found { tag: TagId, promoted: bool },
    NotFound,
    /// An operand is already in error; nothing more is reported.
    Poisoned,
}

/// Finds the operator `name` applicable to `x` (and `y` for dyadic use)
/// as seen from `scope`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn find_operator(
    modes: &mut ModeRegistry,
    symbols: &SymbolTable,
    scope: ScopeId,
    name: &str,
    x: ModeId,
    y: Option<ModeId>,
) -> OperatorMatch {
    if modes.is_ill(x) || y.is_some_and(|y| modes.is_ill(y)) {
        return OperatorMatch::Poisoned;
    }
    let search = OperatorSearch { symbols, scope, name };

    let operands: Vec<ModeId> = std::iter::once(x).chain(y).collect();
    if let Some(tag) = search.along_chain(modes, &operands) {
        return OperatorMatch::Found { tag, promoted: false };
    }

    let promoted = match y {
        None => search.promote_monadic(modes, x),
        Some(y) => search.promote_dyadic(modes, x, y),
    };
    match promoted {
        Some(tag) => {
            trace!(operator = name, tag = %tag, "operator found after promotion");
            OperatorMatch::Found { tag, promoted: true }
        }
        None => OperatorMatch::NotFound,
    }
}

struct OperatorSearch<'a> {
    symbols: &'a SymbolTable,
    scope: ScopeId,
    name: &'a str,
}

impl OperatorSearch<'_> {
    fn accepts(&self, modes: &ModeRegistry, tag: TagId, operands: &[ModeId]) -> bool {
        match modes.kind(self.symbols.tag(tag).mode) {
            ModeKind::Proc { params, .. } => {
                params.len() == operands.len()
                    && operands
                        .iter()
                        .zip(params.modes())
                        .all(|(&o, p)| is_coercible(modes, o, p, Sort::Firm, Deflex::Alias))
            }
            _ => false,
        }
    }

    fn in_scope(&self, modes: &ModeRegistry, scope: ScopeId, operands: &[ModeId]) -> Option<TagId> {
        self.symbols
            .operators(scope, self.name)
            .iter()
            .copied()
            .find(|&tag| self.accepts(modes, tag, operands))
    }

    fn along_chain(&self, modes: &ModeRegistry, operands: &[ModeId]) -> Option<TagId> {
        self.symbols
            .enclosing(self.scope)
            .find_map(|scope| self.in_scope(modes, scope, operands))
    }

    fn in_standard(&self, modes: &ModeRegistry, operands: &[ModeId]) -> Option<TagId> {
        self.in_scope(modes, self.symbols.standard_scope(), operands)
    }

    fn promote_monadic(&self, modes: &ModeRegistry, x: ModeId) -> Option<TagId> {
        MONADIC_PROMOTIONS
            .iter()
            .filter(|&&c| is_coercible(modes, x, c, Sort::Strong, Deflex::Safe))
            .find_map(|&c| self.in_standard(modes, &[c]))
    }

    fn promote_dyadic(&self, modes: &mut ModeRegistry, x: ModeId, y: ModeId) -> Option<TagId> {
        if let Some(tag) = self.promote_scalar(modes, x, y) {
            return Some(tag);
        }

        let series = modes.series_of([x, y]);
        let united = make_united_mode(modes, series);
        if let Some(v) = get_balanced_mode(modes, united, Sort::Strong, false, Deflex::Safe) {
            if let Some(tag) = self.along_chain(modes, &[v, v]) {
                return Some(tag);
            }
        }
        let ladder = NUMERIC_LADDER
            .iter()
            .filter(|&&l| is_coercible(modes, series, l, Sort::Strong, Deflex::Safe))
            .find_map(|&l| self.in_standard(modes, &[l, l]));
        if ladder.is_some() {
            return ladder;
        }

        // `REF LONG REAL +:= INT`: the name stays, the source takes the
        // dereferenced balanced mode.
        let v = get_balanced_mode(modes, united, Sort::Strong, true, Deflex::Safe)?;
        self.along_chain(modes, &[x, v])
    }

    /// A vector or matrix operand with a scalar partner.
    fn promote_scalar(&self, modes: &ModeRegistry, x: ModeId, y: ModeId) -> Option<TagId> {
        let is_vector = |m: ModeId| VECTOR_OPERANDS.contains(&modes.depref_completely(m));
        if is_vector(x) {
            let found = scalars(modes, y).find_map(|s| self.in_standard(modes, &[x, s]));
            if found.is_some() {
                return found;
            }
        }
        if is_vector(y) {
            return scalars(modes, x).find_map(|s| self.in_standard(modes, &[s, y]));
        }
        None
    }
}

fn scalars(modes: &ModeRegistry, m: ModeId) -> impl Iterator<Item = ModeId> + '_ {
    SCALAR_PROMOTIONS
        .into_iter()
        .filter(move |&s| is_coercible(modes, m, s, Sort::Strong, Deflex::Safe))
}
