//! One compilation unit's checking session.

use a68_checker::{CheckerOptions, CoercionInserter, ModeCheckPass, SideTables};
use a68_core::{Diagnostics, ModeId, NodeId, ScopeId, SyntaxTree};
use a68_registry::{ModeRegistry, StandardEnviron, SymbolTable};
use rustc_hash::FxHashMap;
use tracing::{debug, info_span};

use crate::error::{Result, SessionError};

/// Owns the mode registry and symbol table of one compilation unit.
///
/// The parser and declaration collector fill in the symbol table through
/// [`Session::symbols_mut`] and build modes through [`Session::modes_mut`];
/// [`Session::check_program`] then runs both passes.
pub struct Session {
    modes: ModeRegistry,
    symbols: SymbolTable,
    options: CheckerOptions,
}

/// A checked program, ready for code generation.
#[derive(Debug, Clone)]
pub struct CheckedProgram {
    /// The tree with every coercion explicit, or the checked tree as it
    /// was when insertion is turned off.
    pub tree: SyntaxTree,
    /// Each node of the tree handed in to its counterpart in `tree`.
    pub node_map: FxHashMap<NodeId, NodeId>,
    /// Every mode used by the tree, sorted by id.
    pub modes: Vec<ModeId>,
    pub diagnostics: Diagnostics,
    /// Side tables keyed by nodes of `tree`.
    pub tables: SideTables,
    pub coercions: usize,
}

impl CheckedProgram {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

impl Session {
    /// A session with the standard environ installed.
    pub fn new() -> Self {
        Self::with_options(CheckerOptions::default())
    }

    pub fn with_options(options: CheckerOptions) -> Self {
        let mut modes = ModeRegistry::new();
        let mut symbols = SymbolTable::new();
        let operators = StandardEnviron::new(&mut modes, &mut symbols).install();
        debug!(operators, modes = modes.len(), "standard environ installed");
        Self {
            modes,
            symbols,
            options,
        }
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeRegistry {
        &mut self.modes
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn options(&self) -> CheckerOptions {
        self.options
    }

    /// Declares the mode indicant `name` in `scope` and returns the
    /// placeholder to build its definition with, so that the definition
    /// may refer to the indicant itself.
    pub fn declare_mode(&mut self, scope: ScopeId, name: &str) -> Result<ModeId> {
        let indicant = self.modes.declare_indicant(name);
        self.symbols.declare_indicant(scope, name, indicant)?;
        Ok(indicant)
    }

    /// Completes a mode declared with [`Session::declare_mode`].
    pub fn define_mode(&mut self, indicant: ModeId, body: ModeId) -> Result<()> {
        self.modes.define_indicant(indicant, body)?;
        Ok(())
    }

    /// Checks `tree` and, if the options say so, inserts its coercions.
    ///
    /// Diagnostics about the program are returned in the
    /// [`CheckedProgram`]; an `Err` means the tree itself is unusable.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check_program(&mut self, mut tree: SyntaxTree) -> Result<CheckedProgram> {
        let root = tree.root().ok_or(SessionError::NoRoot)?;
        if tree.get(root).is_none() {
            return Err(SessionError::UnknownRoot(root));
        }
        let _span = info_span!("check_program", nodes = tree.len()).entered();

        let checked = ModeCheckPass::new(&mut self.modes, &self.symbols, self.options).run(&mut tree);
        let mut diagnostics = checked.diagnostics;
        let (tree, node_map, tables, coercions) = if self.options.insert_coercions {
            let inserted = CoercionInserter::new(&self.modes, &checked.tables, self.options).run(&tree);
            for d in inserted.diagnostics.into_vec() {
                diagnostics.push(d.node, d.error);
            }
            let tables = checked.tables.remap(&inserted.node_map);
            (inserted.tree, inserted.node_map, tables, inserted.coercions)
        } else {
            let node_map = tree.iter().map(|(id, _)| (id, id)).collect();
            (tree, node_map, checked.tables, 0)
        };

        let modes = self
            .modes
            .reachable(tree.iter().filter_map(|(_, node)| node.mode));
        debug!(
            modes = modes.len(),
            coercions,
            errors = diagnostics.error_count(),
            "program checked"
        );
        Ok(CheckedProgram {
            tree,
            node_map,
            modes,
            diagnostics,
            tables,
            coercions,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
