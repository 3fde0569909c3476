//! Symbol tables: tags declared in nested ranges.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `ScopeData` (the tags declared in one range)
//! - Edges: `Encloses`, from a range to each range nested in it
//!
//! The root range is the standard environ. Lookups walk outward along the
//! incoming `Encloses` edge until a declaration is found, so an inner
//! declaration shadows an outer one.

use a68_core::{ModeId, NodeId, RegistryError, ScopeId, TagId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::standard::HIP;

/// What a tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Identifier,
    Operator,
    Label,
}

/// A declaration, as collected before mode checking.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub kind: TagKind,
    pub mode: ModeId,
    /// Operator priority; zero for other tags.
    pub priority: u8,
    pub scope: ScopeId,
    pub node: Option<NodeId>,
}

/// Edge types in the scope graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEdge {
    Encloses,
}

/// Tags declared directly in one range.
#[derive(Debug, Default)]
pub struct ScopeData {
    pub identifiers: FxHashMap<String, TagId>,
    /// Operators by symbol, in declaration order.
    pub operators: FxHashMap<String, Vec<TagId>>,
    pub labels: FxHashMap<String, TagId>,
    pub indicants: FxHashMap<String, ModeId>,
}

/// Every range and tag of one compilation.
#[derive(Debug)]
pub struct SymbolTable {
    graph: DiGraph<ScopeData, ScopeEdge>,
    tags: Vec<Tag>,
    standard: NodeIndex,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn index(scope: ScopeId) -> NodeIndex {
    NodeIndex::new(scope.slot())
}

fn scope_id(index: NodeIndex) -> ScopeId {
    ScopeId::new(index.index() as u32)
}

impl SymbolTable {
    /// A table with an empty standard environ.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let standard = graph.add_node(ScopeData::default());
        Self {
            graph,
            tags: Vec::new(),
            standard,
        }
    }

    /// The outermost range.
    pub fn standard_scope(&self) -> ScopeId {
        scope_id(self.standard)
    }

    fn data(&self, scope: ScopeId) -> Result<&ScopeData, RegistryError> {
        self.graph
            .node_weight(index(scope))
            .ok_or(RegistryError::UnknownScope(scope))
    }

    fn data_mut(&mut self, scope: ScopeId) -> Result<&mut ScopeData, RegistryError> {
        self.graph
            .node_weight_mut(index(scope))
            .ok_or(RegistryError::UnknownScope(scope))
    }

    /// Opens a range nested in `parent`.
    pub fn open_scope(&mut self, parent: ScopeId) -> Result<ScopeId, RegistryError> {
        self.data(parent)?;
        let child = self.graph.add_node(ScopeData::default());
        self.graph
            .add_edge(index(parent), child, ScopeEdge::Encloses);
        Ok(scope_id(child))
    }

    /// The range directly enclosing `scope`.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.graph
            .neighbors_directed(index(scope), Direction::Incoming)
            .next()
            .map(scope_id)
    }

    /// `scope` followed by each enclosing range out to the standard environ.
    pub fn enclosing(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let start = self.graph.node_weight(index(scope)).map(|_| scope);
        std::iter::successors(start, move |s| self.parent(*s))
    }

    fn add_tag(&mut self, tag: Tag) -> TagId {
        let id = TagId::new(self.tags.len() as u32);
        self.tags.push(tag);
        id
    }

    pub fn declare_identifier(
        &mut self,
        scope: ScopeId,
        name: &str,
        mode: ModeId,
    ) -> Result<TagId, RegistryError> {
        self.data(scope)?;
        let id = self.add_tag(Tag {
            name: name.to_string(),
            kind: TagKind::Identifier,
            mode,
            priority: 0,
            scope,
            node: None,
        });
        self.data_mut(scope)?
            .identifiers
            .insert(name.to_string(), id);
        Ok(id)
    }

    /// Declares an operator. Several operators may share a symbol in one
    /// range; resolution picks among them by operand modes.
    pub fn declare_operator(
        &mut self,
        scope: ScopeId,
        name: &str,
        mode: ModeId,
        priority: u8,
    ) -> Result<TagId, RegistryError> {
        self.data(scope)?;
        let id = self.add_tag(Tag {
            name: name.to_string(),
            kind: TagKind::Operator,
            mode,
            priority,
            scope,
            node: None,
        });
        self.data_mut(scope)?
            .operators
            .entry(name.to_string())
            .or_default()
            .push(id);
        Ok(id)
    }

    pub fn declare_label(&mut self, scope: ScopeId, name: &str) -> Result<TagId, RegistryError> {
        self.data(scope)?;
        let id = self.add_tag(Tag {
            name: name.to_string(),
            kind: TagKind::Label,
            mode: HIP,
            priority: 0,
            scope,
            node: None,
        });
        self.data_mut(scope)?.labels.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn declare_indicant(
        &mut self,
        scope: ScopeId,
        name: &str,
        mode: ModeId,
    ) -> Result<(), RegistryError> {
        self.data_mut(scope)?
            .indicants
            .insert(name.to_string(), mode);
        Ok(())
    }

    /// Declares a tag in the standard environ, which always exists.
    pub(crate) fn declare_standard(
        &mut self,
        kind: TagKind,
        name: &str,
        mode: ModeId,
        priority: u8,
    ) -> TagId {
        let id = self.add_tag(Tag {
            name: name.to_string(),
            kind,
            mode,
            priority,
            scope: scope_id(self.standard),
            node: None,
        });
        let data = &mut self.graph[self.standard];
        match kind {
            TagKind::Identifier => {
                data.identifiers.insert(name.to_string(), id);
            }
            TagKind::Operator => data.operators.entry(name.to_string()).or_default().push(id),
            TagKind::Label => {
                data.labels.insert(name.to_string(), id);
            }
        }
        id
    }

    /// Records the defining node of a tag, for diagnostics.
    pub fn set_node(&mut self, tag: TagId, node: NodeId) {
        if let Some(t) = self.tags.get_mut(tag.slot()) {
            t.node = Some(node);
        }
    }

    /// The tag with this id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this table.
    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.slot()]
    }

    pub fn lookup_identifier(&self, scope: ScopeId, name: &str) -> Option<TagId> {
        self.enclosing(scope)
            .find_map(|s| self.data(s).ok()?.identifiers.get(name).copied())
    }

    pub fn lookup_label(&self, scope: ScopeId, name: &str) -> Option<TagId> {
        self.enclosing(scope)
            .find_map(|s| self.data(s).ok()?.labels.get(name).copied())
    }

    pub fn lookup_indicant(&self, scope: ScopeId, name: &str) -> Option<ModeId> {
        self.enclosing(scope)
            .find_map(|s| self.data(s).ok()?.indicants.get(name).copied())
    }

    /// Operators with this symbol declared directly in `scope`.
    pub fn operators(&self, scope: ScopeId, name: &str) -> &[TagId] {
        self.data(scope)
            .ok()
            .and_then(|d| d.operators.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Priority of the innermost declaration of a dyadic operator.
    pub fn priority(&self, scope: ScopeId, name: &str) -> Option<u8> {
        self.enclosing(scope)
            .find_map(|s| self.operators(s, name).first())
            .map(|&t| self.tag(t).priority)
    }

    pub fn scope_count(&self) -> usize {
        self.graph.node_count()
    }
}
