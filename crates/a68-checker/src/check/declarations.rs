//! Declarations: the source of an identity, variable or operator
//! declaration stands in a strong context of the declared mode.

use a68_core::{ClauseKind, ModeId, NodeId};
use a68_registry::standard::VOID;

use super::ModeChecker;
use crate::soid::Soid;

pub(super) fn check_source(
    checker: &mut ModeChecker<'_>,
    mode: ModeId,
    source: Option<NodeId>,
    x: Soid,
) -> Soid {
    if let Some(source) = source {
        checker.unit(source, Soid::strong(mode).with_clause(ClauseKind::Declaration));
    }
    x.yielding(VOID)
}
