//! The syntax tree consumed and produced by the checker.
//!
//! The parser and the declaration collector build a [`SyntaxTree`]; the
//! mode-check pass fills in [`Node::mode`] and the coercion-insertion pass
//! emits a fresh tree in which every coercion is an explicit
//! [`NodeKind::Coercion`] node.
//!
//! Nodes refer to their children by [`NodeId`]. [`NodeKind::children`] and
//! [`NodeKind::map_children`] are the only places that know the child layout
//! of each kind, so passes that copy or walk the tree never need their own
//! per-kind child lists.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::{ModeId, NodeId, ScopeId, Span, TagId};

/// A literal value carried by a denotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int { value: i64, size: u8 },
    Real { value: OrderedFloat<f64>, size: u8 },
    Bool(bool),
    Char(char),
    String(String),
    Bits { value: u64, size: u8 },
}

/// One indexer of a slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Indexer {
    Subscript(NodeId),
    /// `lower : upper`, either bound optional. A trimmer keeps its dimension.
    Trimmer {
        lower: Option<NodeId>,
        upper: Option<NodeId>,
    },
}

/// One arm of a conformity clause: `(specifier identifier): body`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformityArm {
    pub specifier: ModeId,
    /// Identifier declared by the specifier, if any.
    pub tag: Option<TagId>,
    pub body: NodeId,
}

/// `ANDF` / `ORF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolFunction {
    AndThen,
    OrElse,
}

/// An explicit coercion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoercionKind {
    Dereferencing,
    Deproceduring,
    Uniting,
    Rowing,
    Widening,
    Voiding,
}

impl CoercionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CoercionKind::Dereferencing => "dereferencing",
            CoercionKind::Deproceduring => "deproceduring",
            CoercionKind::Uniting => "uniting",
            CoercionKind::Rowing => "rowing",
            CoercionKind::Widening => "widening",
            CoercionKind::Voiding => "voiding",
        }
    }
}

impl fmt::Display for CoercionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every construct the checker handles. The set is closed: both passes
/// match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `( serial )` or `BEGIN serial END`.
    Closed { body: NodeId },
    /// Units and declarations; the last unit yields the value.
    Serial { units: Vec<NodeId> },
    /// A display or parallel clause `(a, b, c)`; `()` when empty.
    Collateral { units: Vec<NodeId> },
    Conditional {
        condition: NodeId,
        then: NodeId,
        otherwise: Option<NodeId>,
    },
    IntCase {
        selector: NodeId,
        branches: Vec<NodeId>,
        out: Option<NodeId>,
    },
    Conformity {
        selector: NodeId,
        arms: Vec<ConformityArm>,
        out: Option<NodeId>,
    },
    Loop {
        from: Option<NodeId>,
        by: Option<NodeId>,
        to: Option<NodeId>,
        condition: Option<NodeId>,
        body: NodeId,
    },
    IdentityDeclaration {
        tag: TagId,
        mode: ModeId,
        source: NodeId,
    },
    /// `mode x := initial`; `mode` is the referent, the tag holds `REF mode`.
    VariableDeclaration {
        tag: TagId,
        mode: ModeId,
        initial: Option<NodeId>,
    },
    OperatorDeclaration {
        tag: TagId,
        mode: ModeId,
        source: NodeId,
    },
    ModeDeclaration { indicant: String, mode: ModeId },
    Assignation { destination: NodeId, source: NodeId },
    /// `IS` / `ISNT`.
    IdentityRelation {
        left: NodeId,
        right: NodeId,
        negated: bool,
    },
    Cast { mode: ModeId, operand: NodeId },
    /// Missing arguments (`None`) make a partial parametrisation.
    Call {
        primary: NodeId,
        args: Vec<Option<NodeId>>,
    },
    Slice {
        primary: NodeId,
        indexers: Vec<Indexer>,
    },
    Selection { field: String, secondary: NodeId },
    /// `LOC mode` or `HEAP mode`.
    Generator { heap: bool, mode: ModeId },
    RoutineText { mode: ModeId, body: NodeId },
    Formula {
        operator: String,
        tag: Option<TagId>,
        left: NodeId,
        right: NodeId,
    },
    MonadicFormula {
        operator: String,
        tag: Option<TagId>,
        operand: NodeId,
    },
    FormatText,
    Jump { label: String },
    Skip,
    Nihil,
    Denotation(Literal),
    Identifier { name: String, tag: Option<TagId> },
    BoolFunction {
        function: BoolFunction,
        left: NodeId,
        right: NodeId,
    },
    Assertion { condition: NodeId },
    /// Inserted by the coercion pass; never produced by the parser.
    Coercion { kind: CoercionKind, operand: NodeId },
}

impl NodeKind {
    /// Child nodes in evaluation order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.visit_children(|id| out.push(id));
        out
    }

    fn visit_children(&self, mut f: impl FnMut(NodeId)) {
        match self {
            NodeKind::Closed { body } => f(*body),
            NodeKind::Serial { units } | NodeKind::Collateral { units } => {
                units.iter().copied().for_each(f)
            }
            NodeKind::Conditional {
                condition,
                then,
                otherwise,
            } => {
                f(*condition);
                f(*then);
                otherwise.iter().copied().for_each(f);
            }
            NodeKind::IntCase {
                selector,
                branches,
                out,
            } => {
                f(*selector);
                branches.iter().copied().for_each(&mut f);
                out.iter().copied().for_each(f);
            }
            NodeKind::Conformity { selector, arms, out } => {
                f(*selector);
                arms.iter().for_each(|arm| f(arm.body));
                out.iter().copied().for_each(f);
            }
            NodeKind::Loop {
                from,
                by,
                to,
                condition,
                body,
            } => {
                [from, by, to, condition]
                    .into_iter()
                    .flatten()
                    .copied()
                    .for_each(&mut f);
                f(*body);
            }
            NodeKind::IdentityDeclaration { source, .. }
            | NodeKind::OperatorDeclaration { source, .. } => f(*source),
            NodeKind::VariableDeclaration { initial, .. } => initial.iter().copied().for_each(f),
            NodeKind::Assignation {
                destination,
                source,
            } => {
                f(*destination);
                f(*source);
            }
            NodeKind::IdentityRelation { left, right, .. }
            | NodeKind::Formula { left, right, .. }
            | NodeKind::BoolFunction { left, right, .. } => {
                f(*left);
                f(*right);
            }
            NodeKind::Cast { operand, .. }
            | NodeKind::MonadicFormula { operand, .. }
            | NodeKind::Coercion { operand, .. } => f(*operand),
            NodeKind::Call { primary, args } => {
                f(*primary);
                args.iter().flatten().copied().for_each(f);
            }
            NodeKind::Slice { primary, indexers } => {
                f(*primary);
                for indexer in indexers {
                    match indexer {
                        Indexer::Subscript(id) => f(*id),
                        Indexer::Trimmer { lower, upper } => {
                            lower.iter().chain(upper.iter()).copied().for_each(&mut f)
                        }
                    }
                }
            }
            NodeKind::Selection { secondary, .. } => f(*secondary),
            NodeKind::RoutineText { body, .. } => f(*body),
            NodeKind::Assertion { condition } => f(*condition),
            NodeKind::ModeDeclaration { .. }
            | NodeKind::Generator { .. }
            | NodeKind::FormatText
            | NodeKind::Jump { .. }
            | NodeKind::Skip
            | NodeKind::Nihil
            | NodeKind::Denotation(_)
            | NodeKind::Identifier { .. } => {}
        }
    }

    /// Rebuilds the kind with every child passed through `f`, in the same
    /// order as [`NodeKind::children`].
    pub fn map_children(&self, mut f: impl FnMut(NodeId) -> NodeId) -> NodeKind {
        fn opt(id: &Option<NodeId>, f: &mut dyn FnMut(NodeId) -> NodeId) -> Option<NodeId> {
            id.map(f)
        }
        match self {
            NodeKind::Closed { body } => NodeKind::Closed { body: f(*body) },
            NodeKind::Serial { units } => NodeKind::Serial {
                units: units.iter().map(|u| f(*u)).collect(),
            },
            NodeKind::Collateral { units } => NodeKind::Collateral {
                units: units.iter().map(|u| f(*u)).collect(),
            },
            NodeKind::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let condition = f(*condition);
                let then = f(*then);
                NodeKind::Conditional {
                    condition,
                    then,
                    otherwise: opt(otherwise, &mut f),
                }
            }
            NodeKind::IntCase {
                selector,
                branches,
                out,
            } => {
                let selector = f(*selector);
                let branches = branches.iter().map(|b| f(*b)).collect();
                NodeKind::IntCase {
                    selector,
                    branches,
                    out: opt(out, &mut f),
                }
            }
            NodeKind::Conformity { selector, arms, out } => {
                let selector = f(*selector);
                let arms = arms
                    .iter()
                    .map(|arm| ConformityArm {
                        specifier: arm.specifier,
                        tag: arm.tag,
                        body: f(arm.body),
                    })
                    .collect();
                NodeKind::Conformity {
                    selector,
                    arms,
                    out: opt(out, &mut f),
                }
            }
            NodeKind::Loop {
                from,
                by,
                to,
                condition,
                body,
            } => {
                let from = opt(from, &mut f);
                let by = opt(by, &mut f);
                let to = opt(to, &mut f);
                let condition = opt(condition, &mut f);
                NodeKind::Loop {
                    from,
                    by,
                    to,
                    condition,
                    body: f(*body),
                }
            }
            NodeKind::IdentityDeclaration { tag, mode, source } => NodeKind::IdentityDeclaration {
                tag: *tag,
                mode: *mode,
                source: f(*source),
            },
            NodeKind::VariableDeclaration { tag, mode, initial } => {
                NodeKind::VariableDeclaration {
                    tag: *tag,
                    mode: *mode,
                    initial: opt(initial, &mut f),
                }
            }
            NodeKind::OperatorDeclaration { tag, mode, source } => NodeKind::OperatorDeclaration {
                tag: *tag,
                mode: *mode,
                source: f(*source),
            },
            NodeKind::Assignation {
                destination,
                source,
            } => {
                let destination = f(*destination);
                NodeKind::Assignation {
                    destination,
                    source: f(*source),
                }
            }
            NodeKind::IdentityRelation {
                left,
                right,
                negated,
            } => {
                let left = f(*left);
                NodeKind::IdentityRelation {
                    left,
                    right: f(*right),
                    negated: *negated,
                }
            }
            NodeKind::Cast { mode, operand } => NodeKind::Cast {
                mode: *mode,
                operand: f(*operand),
            },
            NodeKind::Call { primary, args } => {
                let primary = f(*primary);
                let args = args.iter().map(|a| opt(a, &mut f)).collect();
                NodeKind::Call { primary, args }
            }
            NodeKind::Slice { primary, indexers } => {
                let primary = f(*primary);
                let indexers = indexers
                    .iter()
                    .map(|indexer| match indexer {
                        Indexer::Subscript(id) => Indexer::Subscript(f(*id)),
                        Indexer::Trimmer { lower, upper } => {
                            let lower = opt(lower, &mut f);
                            Indexer::Trimmer {
                                lower,
                                upper: opt(upper, &mut f),
                            }
                        }
                    })
                    .collect();
                NodeKind::Slice { primary, indexers }
            }
            NodeKind::Selection { field, secondary } => NodeKind::Selection {
                field: field.clone(),
                secondary: f(*secondary),
            },
            NodeKind::RoutineText { mode, body } => NodeKind::RoutineText {
                mode: *mode,
                body: f(*body),
            },
            NodeKind::Formula {
                operator,
                tag,
                left,
                right,
            } => {
                let left = f(*left);
                NodeKind::Formula {
                    operator: operator.clone(),
                    tag: *tag,
                    left,
                    right: f(*right),
                }
            }
            NodeKind::MonadicFormula { operator, tag, operand } => NodeKind::MonadicFormula {
                operator: operator.clone(),
                tag: *tag,
                operand: f(*operand),
            },
            NodeKind::BoolFunction {
                function,
                left,
                right,
            } => {
                let left = f(*left);
                NodeKind::BoolFunction {
                    function: *function,
                    left,
                    right: f(*right),
                }
            }
            NodeKind::Assertion { condition } => NodeKind::Assertion {
                condition: f(*condition),
            },
            NodeKind::Coercion { kind, operand } => NodeKind::Coercion {
                kind: *kind,
                operand: f(*operand),
            },
            NodeKind::ModeDeclaration { .. }
            | NodeKind::Generator { .. }
            | NodeKind::FormatText
            | NodeKind::Jump { .. }
            | NodeKind::Skip
            | NodeKind::Nihil
            | NodeKind::Denotation(_)
            | NodeKind::Identifier { .. } => self.clone(),
        }
    }

    /// Short name used in diagnostics and logs.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Closed { .. } => "closed clause",
            NodeKind::Serial { .. } => "serial clause",
            NodeKind::Collateral { .. } => "collateral clause",
            NodeKind::Conditional { .. } => "conditional clause",
            NodeKind::IntCase { .. } => "case clause",
            NodeKind::Conformity { .. } => "conformity clause",
            NodeKind::Loop { .. } => "loop clause",
            NodeKind::IdentityDeclaration { .. } => "identity declaration",
            NodeKind::VariableDeclaration { .. } => "variable declaration",
            NodeKind::OperatorDeclaration { .. } => "operator declaration",
            NodeKind::ModeDeclaration { .. } => "mode declaration",
            NodeKind::Assignation { .. } => "assignation",
            NodeKind::IdentityRelation { .. } => "identity relation",
            NodeKind::Cast { .. } => "cast",
            NodeKind::Call { .. } => "call",
            NodeKind::Slice { .. } => "slice",
            NodeKind::Selection { .. } => "selection",
            NodeKind::Generator { .. } => "generator",
            NodeKind::RoutineText { .. } => "routine text",
            NodeKind::Formula { .. } => "formula",
            NodeKind::MonadicFormula { .. } => "monadic formula",
            NodeKind::FormatText => "format text",
            NodeKind::Jump { .. } => "jump",
            NodeKind::Skip => "skip",
            NodeKind::Nihil => "nihil",
            NodeKind::Denotation(_) => "denotation",
            NodeKind::Identifier { .. } => "identifier",
            NodeKind::BoolFunction { .. } => "boolean function",
            NodeKind::Assertion { .. } => "assertion",
            NodeKind::Coercion { .. } => "coercion",
        }
    }
}

/// A syntax node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// The range the node's identifiers and operators are looked up in.
    pub scope: ScopeId,
    /// Filled in by the mode checker.
    pub mode: Option<ModeId>,
}

/// Arena of syntax nodes.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its id.
    pub fn push(&mut self, kind: NodeKind, span: Span, scope: ScopeId) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            scope,
            mode: None,
        });
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.slot())
    }

    /// The node's kind.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.slot()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|n| n.span).unwrap_or_default()
    }

    pub fn mode(&self, id: NodeId) -> Option<ModeId> {
        self.get(id).and_then(|n| n.mode)
    }

    pub fn set_mode(&mut self, id: NodeId, mode: ModeId) {
        if let Some(node) = self.get_mut(id) {
            node.mode = Some(mode);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Nodes reachable from the root, parents before children.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.kind(id).children();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}
