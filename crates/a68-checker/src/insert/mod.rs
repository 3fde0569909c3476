//! The coercion-insertion pass.
//!
//! [`CoercionInserter`] copies a checked tree into a fresh one. Wherever a
//! node's mode differs from what the check pass required of it, the copy
//! is wrapped in one [`NodeKind::Coercion`] node per step, innermost first,
//! each carrying the mode it yields. Afterwards no coercion is implicit.
//!
//! Subtrees in which the check pass reported an error are copied as they
//! are, modes included.
//!
//! ```text
//! REF REAL x; x := 1              x := widening(1) : REAL
//! REAL r = i           (REF INT)  widening(dereferencing(i) : INT) : REAL
//! ```

mod chain;
mod fold;
mod void;

pub use chain::{Step, coercion_steps};
pub use fold::widen_literal;
pub use void::void_steps;

use a68_core::{
    CoercionKind, Deflex, Diagnostics, Literal, ModeError, ModeId, ModeKind, NodeId, NodeKind,
    ScopeId, Sort, Span, SyntaxTree,
};
use a68_registry::ModeRegistry;
use a68_registry::standard::{HIP, VACUUM, VOID};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::coercion::is_equal;
use crate::options::CheckerOptions;
use crate::soid::Soid;
use crate::tables::SideTables;

/// What the insertion pass hands on.
#[derive(Debug, Clone, Default)]
pub struct InsertOutput {
    pub tree: SyntaxTree,
    /// Each node of the checked tree to its copy. Inserted coercions wrap
    /// the copy and have no entry.
    pub node_map: FxHashMap<NodeId, NodeId>,
    pub coercions: usize,
    /// Denotations rewritten in place instead of being widened.
    pub folded: usize,
    pub diagnostics: Diagnostics,
}

pub struct CoercionInserter<'a> {
    modes: &'a ModeRegistry,
    tables: &'a SideTables,
    options: CheckerOptions,
    /// Requirements handed from a display to its elements.
    pushed: FxHashMap<NodeId, Soid>,
    out: InsertOutput,
}

impl<'a> CoercionInserter<'a> {
    pub fn new(modes: &'a ModeRegistry, tables: &'a SideTables, options: CheckerOptions) -> Self {
        Self {
            modes,
            tables,
            options,
            pushed: FxHashMap::default(),
            out: InsertOutput::default(),
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, checked: &SyntaxTree) -> InsertOutput {
        if let Some(root) = checked.root() {
            let root = self.copy(checked, root);
            self.out.tree.set_root(root);
        }
        debug!(
            nodes = self.out.tree.len(),
            coercions = self.out.coercions,
            folded = self.out.folded,
            "coercions inserted"
        );
        self.out
    }

    /// Copies `node` and its subtree, returning the outermost new node.
    fn copy(&mut self, checked: &SyntaxTree, node: NodeId) -> NodeId {
        let Some(original) = checked.get(node) else {
            self.out.diagnostics.push(
                None,
                ModeError::Internal {
                    message: format!("{node} is not in the tree"),
                    span: Span::default(),
                },
            );
            return self.out.tree.push(NodeKind::Skip, Span::default(), ScopeId::new(0));
        };
        let requirement = self
            .pushed
            .remove(&node)
            .or_else(|| self.tables.required(node).copied());
        let clean = !self.tables.is_poisoned(node);

        if clean {
            if let (Some(x), Some(p), NodeKind::Collateral { units }) =
                (requirement, original.mode, &original.kind)
            {
                self.spread_display(units, p, x.mode);
            }
        }
        let kind = original.kind.map_children(|child| self.copy(checked, child));
        let copy = self.out.tree.push(kind, original.span, original.scope);
        if let Some(mode) = original.mode {
            self.out.tree.set_mode(copy, mode);
        }
        self.out.node_map.insert(node, copy);

        match (clean, requirement, original.mode) {
            (true, Some(x), Some(p)) => self.coerce(copy, p, x),
            _ => copy,
        }
    }

    /// A display checked without a target gets one from its context.
    fn spread_display(&mut self, units: &[NodeId], p: ModeId, q: ModeId) {
        if !matches!(self.modes.kind(p), ModeKind::Stowed(_)) {
            return;
        }
        let targets: Vec<ModeId> = if self.modes.is_row(q) {
            match self.modes.slice(q) {
                Some(slice) => vec![slice; units.len()],
                None => return,
            }
        } else if q == VOID {
            vec![VOID; units.len()]
        } else {
            match self.modes.pack(q) {
                Some(pack) if self.modes.is_struct(q) => pack.modes().collect(),
                _ => return,
            }
        };
        for (&unit, target) in units.iter().zip(targets) {
            self.pushed.insert(unit, Soid::strong(target));
        }
    }

    /// Wraps `node`, which yields `p`, so that it yields what `x` requires.
    fn coerce(&mut self, node: NodeId, p: ModeId, x: Soid) -> NodeId {
        let (p, q) = (self.modes.resolve(p), self.modes.resolve(x.mode));
        if is_equal(self.modes, p, q, Deflex::Safe) || self.modes.is_absorbing(q) {
            return node;
        }
        if p == HIP || p == VACUUM || matches!(self.modes.kind(p), ModeKind::Stowed(_)) {
            self.out.tree.set_mode(node, q);
            return node;
        }

        let kind = self.out.tree.kind(node).clone();
        let steps = if q == VOID && x.sort == Sort::Strong {
            Some(void_steps(self.modes, &kind, p))
        } else {
            coercion_steps(self.modes, p, q, x.sort)
        };
        let Some(steps) = steps else {
            let error = ModeError::Internal {
                message: format!(
                    "no coercion from {} to {}",
                    self.modes.display(p),
                    self.modes.display(q)
                ),
                span: self.out.tree.span(node),
            };
            self.out.diagnostics.push(Some(node), error);
            return node;
        };

        let steps = match kind {
            NodeKind::Denotation(literal) if self.options.fold_denotations => {
                self.fold(node, literal, &steps)
            }
            _ => &steps[..],
        };
        trace!(%node, steps = ?steps, "coercion chain");
        self.wrap(node, steps)
    }

    /// Rewrites a denotation through its leading widenings and returns the
    /// steps still to be wrapped.
    fn fold<'s>(&mut self, node: NodeId, literal: Literal, steps: &'s [Step]) -> &'s [Step] {
        let mut literal = literal;
        let mut done = 0;
        for step in steps {
            if step.kind != CoercionKind::Widening {
                break;
            }
            match widen_literal(self.modes, &literal, step.mode) {
                Some(wider) => literal = wider,
                None => break,
            }
            done += 1;
        }
        if done > 0 {
            if let Some(copy) = self.out.tree.get_mut(node) {
                copy.kind = NodeKind::Denotation(literal);
                copy.mode = Some(steps[done - 1].mode);
            }
            self.out.folded += 1;
        }
        &steps[done..]
    }

    fn wrap(&mut self, node: NodeId, steps: &[Step]) -> NodeId {
        let (span, scope) = match self.out.tree.get(node) {
            Some(n) => (n.span, n.scope),
            None => return node,
        };
        let mut inner = node;
        for step in steps {
            let coercion = NodeKind::Coercion {
                kind: step.kind,
                operand: inner,
            };
            inner = self.out.tree.push(coercion, span, scope);
            self.out.tree.set_mode(inner, step.mode);
            self.out.coercions += 1;
        }
        inner
    }
}
