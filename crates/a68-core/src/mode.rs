//! Structural description of modes.
//!
//! A [`ModeKind`] names its children by [`ModeId`], so a mode graph of any
//! depth (or a cyclic one, through indicants) is a flat arena of kinds.
//! Canonicalization lives in the registry; this module only describes shapes.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{ModeId, NodeId};

/// Primitive modes of the standard environ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    /// Bottom: yielded by SKIP, NIL and jumps, coercible to anything.
    Hip,
    /// Sentinel substituted after a diagnosed failure.
    Error,
    Undefined,
    Int,
    Real,
    Complex,
    Bool,
    Char,
    Bits,
    Bytes,
    Format,
    /// Any row mode; the operand mode of UPB, LWB and friends.
    Rows,
    /// Any name of a readable mode.
    SimpleIn,
    /// Any printable value.
    SimpleOut,
    /// The empty display `()`.
    Vacuum,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Void => "VOID",
            Primitive::Hip => "HIP",
            Primitive::Error => "ERROR",
            Primitive::Undefined => "UNDEFINED",
            Primitive::Int => "INT",
            Primitive::Real => "REAL",
            Primitive::Complex => "COMPLEX",
            Primitive::Bool => "BOOL",
            Primitive::Char => "CHAR",
            Primitive::Bits => "BITS",
            Primitive::Bytes => "BYTES",
            Primitive::Format => "FORMAT",
            Primitive::Rows => "ROWS",
            Primitive::SimpleIn => "SIMPLIN",
            Primitive::SimpleOut => "SIMPLOUT",
            Primitive::Vacuum => "VACUUM",
        }
    }
}

/// A primitive mode with its `LONG` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Standard {
    pub primitive: Primitive,
    /// 0 for plain, 1 for `LONG`, 2 for `LONG LONG`.
    pub size: u8,
}

impl Standard {
    pub const fn plain(primitive: Primitive) -> Self {
        Self { primitive, size: 0 }
    }

    pub const fn long(primitive: Primitive, size: u8) -> Self {
        Self { primitive, size }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.size {
            f.write_str("LONG ")?;
        }
        f.write_str(self.primitive.as_str())
    }
}

/// One entry of a [`Pack`]: a field, a union member or a parameter.
///
/// The defining node is carried for diagnostics only and takes no part in
/// equality or hashing.
#[derive(Debug, Clone)]
pub struct PackEntry {
    pub mode: ModeId,
    pub name: Option<String>,
    pub node: Option<NodeId>,
}

impl PackEntry {
    pub fn new(mode: ModeId) -> Self {
        Self {
            mode,
            name: None,
            node: None,
        }
    }

    pub fn named(mode: ModeId, name: impl Into<String>) -> Self {
        Self {
            mode,
            name: Some(name.into()),
            node: None,
        }
    }
}

impl PartialEq for PackEntry {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.name == other.name
    }
}

impl Eq for PackEntry {}

impl Hash for PackEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mode.hash(state);
        self.name.hash(state);
    }
}

/// An ordered sequence of pack entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pack(pub Vec<PackEntry>);

impl Pack {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// An unnamed pack, as used for parameters, union members and series.
    pub fn of_modes(modes: impl IntoIterator<Item = ModeId>) -> Self {
        Self(modes.into_iter().map(PackEntry::new).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackEntry> {
        self.0.iter()
    }

    pub fn modes(&self) -> impl Iterator<Item = ModeId> + '_ {
        self.0.iter().map(|e| e.mode)
    }

    /// The entry with the given field name.
    pub fn field(&self, name: &str) -> Option<&PackEntry> {
        self.0.iter().find(|e| e.name.as_deref() == Some(name))
    }
}

impl<'a> IntoIterator for &'a Pack {
    type Item = &'a PackEntry;
    type IntoIter = std::slice::Iter<'a, PackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The shape of one mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Standard(Standard),
    /// `REF m`.
    Ref(ModeId),
    /// `PROC (params) result`; niladic when `params` is empty.
    Proc { params: Pack, result: ModeId },
    /// `[,,] elem` with `dim` bounds.
    Row { dim: u8, elem: ModeId },
    /// `FLEX` applied to a row mode.
    Flex(ModeId),
    Struct(Pack),
    /// Member order is irrelevant; the registry keeps members sorted.
    Union(Pack),
    /// Transient bag of branch yields, never a real mode.
    Series(Pack),
    /// Transient yield of a display in a strong context.
    Stowed(Pack),
    /// Placeholder for a mode indicant whose definition is pending.
    Indicant(String),
}

impl ModeKind {
    /// Whether this kind only exists while checking a clause.
    pub fn is_transient(&self) -> bool {
        matches!(self, ModeKind::Series(_) | ModeKind::Stowed(_))
    }

    /// Direct children, in declaration order.
    pub fn children(&self) -> Vec<ModeId> {
        match self {
            ModeKind::Standard(_) | ModeKind::Indicant(_) => Vec::new(),
            ModeKind::Ref(sub) | ModeKind::Flex(sub) => vec![*sub],
            ModeKind::Row { elem, .. } => vec![*elem],
            ModeKind::Proc { params, result } => {
                let mut out: Vec<ModeId> = params.modes().collect();
                out.push(*result);
                out
            }
            ModeKind::Struct(pack)
            | ModeKind::Union(pack)
            | ModeKind::Series(pack)
            | ModeKind::Stowed(pack) => pack.modes().collect(),
        }
    }

    /// Rebuilds the kind with every child passed through `f`.
    pub fn map_children(&self, mut f: impl FnMut(ModeId) -> ModeId) -> ModeKind {
        let mut pack = |p: &Pack| {
            Pack(
                p.iter()
                    .map(|e| PackEntry {
                        mode: f(e.mode),
                        name: e.name.clone(),
                        node: e.node,
                    })
                    .collect(),
            )
        };
        match self {
            ModeKind::Standard(_) | ModeKind::Indicant(_) => self.clone(),
            ModeKind::Ref(sub) => ModeKind::Ref(f(*sub)),
            ModeKind::Flex(sub) => ModeKind::Flex(f(*sub)),
            ModeKind::Row { dim, elem } => ModeKind::Row {
                dim: *dim,
                elem: f(*elem),
            },
            ModeKind::Proc { params, result } => {
                let params = pack(params);
                ModeKind::Proc {
                    params,
                    result: f(*result),
                }
            }
            ModeKind::Struct(p) => ModeKind::Struct(pack(p)),
            ModeKind::Union(p) => ModeKind::Union(pack(p)),
            ModeKind::Series(p) => ModeKind::Series(pack(p)),
            ModeKind::Stowed(p) => ModeKind::Stowed(pack(p)),
        }
    }
}
