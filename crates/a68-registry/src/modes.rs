//! The mode registry.
//!
//! Every mode of a compilation lives in one [`ModeRegistry`] arena and is
//! addressed by [`ModeId`]. Interning is hash-consed on the structural
//! [`ModeKind`] (children already canonical), so two independently built
//! `[] INT` modes come back as the same id and type equality is `p == q`.
//!
//! ## Derived relations
//!
//! Computed once, when a mode is interned:
//!
//! - `deflexed`: the same mode with `FLEX` stripped at every level
//! - `name`: the `REF m` mode, once it exists
//! - `slice`: a row with one dimension fewer (the element for 1-D rows)
//! - `multiple`: for `REF [] m`, the name `REF m` a rowed name is built from
//!
//! ## Recursive modes
//!
//! `MODE LIST = STRUCT (INT v, REF LIST next)` is built through an indicant
//! placeholder (see [`ModeRegistry::declare_indicant`]). Defining the
//! indicant links it to its body and re-canonicalizes the arena so that
//! structurally equivalent modes collapse to one representative; ids that
//! lost the merge stay valid and [`ModeRegistry::resolve`] to the survivor.

use a68_core::{ModeId, ModeKind, NodeId, Pack, PackEntry, Primitive, RegistryError, Standard};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::equivalence;
use crate::standard::{self, ERROR, HIP, STRING};

const MAX_DISPLAY_DEPTH: usize = 6;

/// One mode and its derived relations.
#[derive(Debug, Clone)]
pub struct Mode {
    pub kind: ModeKind,
    /// Set when this mode was merged into a structurally equivalent one.
    pub equivalent: Option<ModeId>,
    pub deflexed: ModeId,
    pub name: Option<ModeId>,
    pub slice: Option<ModeId>,
    pub multiple: Option<ModeId>,
    /// Contains the error mode somewhere in its structure.
    pub ill: bool,
    /// The indicant this mode was declared under, for display.
    pub indicant: Option<String>,
    pub node: Option<NodeId>,
}

impl Mode {
    fn new(kind: ModeKind, id: ModeId, ill: bool) -> Self {
        Self {
            kind,
            equivalent: None,
            deflexed: id,
            name: None,
            slice: None,
            multiple: None,
            ill,
            indicant: None,
            node: None,
        }
    }
}

/// Canonicalizing arena of modes for one compilation.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    pub(crate) modes: Vec<Mode>,
    pub(crate) index: FxHashMap<ModeKind, ModeId>,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeRegistry {
    /// A registry holding the standard modes of [`crate::standard`].
    pub fn new() -> Self {
        let mut reg = Self {
            modes: Vec::new(),
            index: FxHashMap::default(),
        };
        standard::seed(&mut reg);
        reg
    }

    /// Number of mode slots, merged ones included.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    fn slot(&self, id: ModeId) -> &Mode {
        &self.modes[id.slot()]
    }

    fn slot_mut(&mut self, id: ModeId) -> &mut Mode {
        &mut self.modes[id.slot()]
    }

    // ========================================================================
    // Interning
    // ========================================================================

    /// The representative of `id` after any merges.
    pub fn resolve(&self, mut id: ModeId) -> ModeId {
        while let Some(next) = self.slot(id).equivalent {
            id = next;
        }
        id
    }

    pub fn get(&self, id: ModeId) -> &Mode {
        self.slot(self.resolve(id))
    }

    pub fn kind(&self, id: ModeId) -> &ModeKind {
        &self.get(id).kind
    }

    /// Returns the mode with this structure, allocating it if it is new.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn intern(&mut self, kind: ModeKind) -> ModeId {
        let kind = self.canonical(kind);
        if let Some(&id) = self.index.get(&kind) {
            return self.resolve(id);
        }

        let id = ModeId::new(self.modes.len() as u32);
        let ill = self.contains_error(&kind);
        self.modes.push(Mode::new(kind.clone(), id, ill));
        self.index.insert(kind, id);
        self.link(id);
        trace!(%id, mode = %self.display(id), "interned mode");
        id
    }

    /// Resolves children and normalizes union packs (flattened, sorted,
    /// duplicates removed).
    pub(crate) fn canonical(&self, kind: ModeKind) -> ModeKind {
        let kind = kind.map_children(|m| self.resolve(m));
        let ModeKind::Union(pack) = kind else {
            return kind;
        };
        let mut members = Vec::with_capacity(pack.len());
        for m in pack.modes() {
            match self.kind(m) {
                ModeKind::Union(inner) => members.extend(inner.modes().map(|i| self.resolve(i))),
                _ => members.push(m),
            }
        }
        members.sort();
        members.dedup();
        ModeKind::Union(Pack::of_modes(members))
    }

    fn contains_error(&self, kind: &ModeKind) -> bool {
        match kind {
            ModeKind::Standard(s) => s.primitive == Primitive::Error,
            other => other.children().into_iter().any(|c| self.get(c).ill),
        }
    }

    /// Fills in the derived relations of a freshly interned mode.
    fn link(&mut self, id: ModeId) {
        let kind = self.slot(id).kind.clone();
        match &kind {
            ModeKind::Ref(sub) => {
                let sub = *sub;
                if self.slot(sub).name.is_none() {
                    self.slot_mut(sub).name = Some(id);
                }
                if let Some(slice) = self.row_slice(sub) {
                    let multiple = self.intern(ModeKind::Ref(slice));
                    self.slot_mut(id).multiple = Some(multiple);
                }
            }
            ModeKind::Row { dim, elem } => {
                let slice = if *dim <= 1 {
                    *elem
                } else {
                    self.intern(ModeKind::Row {
                        dim: dim - 1,
                        elem: *elem,
                    })
                };
                self.slot_mut(id).slice = Some(slice);
            }
            ModeKind::Flex(row) => {
                let slice = self.row_slice(*row);
                self.slot_mut(id).slice = slice;
            }
            _ => {}
        }
        let deflexed = self.deflex_kind(&kind, id);
        self.slot_mut(id).deflexed = deflexed;
    }

    fn row_slice(&self, m: ModeId) -> Option<ModeId> {
        let mode = self.get(m);
        match mode.kind {
            ModeKind::Row { .. } | ModeKind::Flex(_) => mode.slice,
            _ => None,
        }
    }

    fn deflex_kind(&mut self, kind: &ModeKind, id: ModeId) -> ModeId {
        match kind {
            ModeKind::Flex(row) => self.get(*row).deflexed,
            ModeKind::Standard(_)
            | ModeKind::Indicant(_)
            | ModeKind::Series(_)
            | ModeKind::Stowed(_) => id,
            _ => {
                let stripped = kind.map_children(|m| self.get(m).deflexed);
                if &stripped == kind {
                    id
                } else {
                    self.intern(stripped)
                }
            }
        }
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn standard(&mut self, standard: Standard) -> ModeId {
        self.intern(ModeKind::Standard(standard))
    }

    /// `REF m`, memoized on `m`.
    pub fn name_of(&mut self, m: ModeId) -> ModeId {
        let m = self.resolve(m);
        match self.slot(m).name {
            Some(name) => self.resolve(name),
            None => self.intern(ModeKind::Ref(m)),
        }
    }

    pub fn proc_of(&mut self, params: impl IntoIterator<Item = ModeId>, result: ModeId) -> ModeId {
        self.intern(ModeKind::Proc {
            params: Pack::of_modes(params),
            result,
        })
    }

    pub fn row_of(&mut self, dim: u8, elem: ModeId) -> ModeId {
        self.intern(ModeKind::Row { dim, elem })
    }

    pub fn flex_of(&mut self, row: ModeId) -> ModeId {
        self.intern(ModeKind::Flex(row))
    }

    pub fn struct_of<'a>(&mut self, fields: impl IntoIterator<Item = (ModeId, &'a str)>) -> ModeId {
        let pack = fields
            .into_iter()
            .map(|(mode, name)| PackEntry::named(mode, name))
            .collect();
        self.intern(ModeKind::Struct(Pack(pack)))
    }

    pub fn union_of(&mut self, members: impl IntoIterator<Item = ModeId>) -> ModeId {
        self.intern(ModeKind::Union(Pack::of_modes(members)))
    }

    /// A transient bag of modes, as yielded by the branches of a clause.
    pub fn series_of(&mut self, members: impl IntoIterator<Item = ModeId>) -> ModeId {
        self.intern(ModeKind::Series(Pack::of_modes(members)))
    }

    /// The transient mode of a display whose target is not yet known.
    pub fn stowed_of(&mut self, members: impl IntoIterator<Item = ModeId>) -> ModeId {
        self.intern(ModeKind::Stowed(Pack::of_modes(members)))
    }

    // ========================================================================
    // Indicants
    // ========================================================================

    /// Allocates a placeholder for a mode indicant whose body refers to it.
    pub fn declare_indicant(&mut self, name: &str) -> ModeId {
        let id = ModeId::new(self.modes.len() as u32);
        let mut mode = Mode::new(ModeKind::Indicant(name.to_string()), id, false);
        mode.indicant = Some(name.to_string());
        self.modes.push(mode);
        id
    }

    /// Binds an indicant placeholder to its body and merges every mode that
    /// became structurally equivalent as a result.
    pub fn define_indicant(&mut self, indicant: ModeId, body: ModeId) -> Result<(), RegistryError> {
        let name = match &self.slot(indicant).kind {
            ModeKind::Indicant(name) => name.clone(),
            _ => return Err(RegistryError::NotAnIndicant(indicant)),
        };
        if self.slot(indicant).equivalent.is_some() {
            return Err(RegistryError::IndicantRedefined { name });
        }
        let body = self.resolve(body);
        if body == indicant {
            return Err(RegistryError::CyclicIndicant { name });
        }

        self.slot_mut(indicant).equivalent = Some(body);
        if self.slot(body).indicant.is_none() {
            self.slot_mut(body).indicant = Some(name.clone());
        }
        if self.slot(body).name.is_none() {
            self.slot_mut(body).name = self.slot(indicant).name;
        }
        equivalence::merge_equivalents(self);
        debug!(indicant = %name, body = %self.resolve(body), "defined mode indicant");
        Ok(())
    }

    /// Marks `keep` as the representative of `drop`.
    pub(crate) fn merge(&mut self, a: ModeId, b: ModeId) {
        let (keep, drop) = if a < b { (a, b) } else { (b, a) };
        self.slot_mut(drop).equivalent = Some(keep);
        if self.slot(keep).name.is_none() {
            self.slot_mut(keep).name = self.slot(drop).name;
        }
        if self.slot(keep).indicant.is_none() {
            self.slot_mut(keep).indicant = self.slot(drop).indicant.clone();
        }
        trace!(%keep, %drop, "merged equivalent modes");
    }

    /// Representatives that are neither placeholders nor transient.
    pub(crate) fn representatives(&self) -> impl Iterator<Item = ModeId> + '_ {
        self.modes.iter().enumerate().filter_map(|(i, m)| {
            let keep = m.equivalent.is_none()
                && !m.kind.is_transient()
                && !matches!(m.kind, ModeKind::Indicant(_));
            keep.then(|| ModeId::new(i as u32))
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn deflexed(&self, m: ModeId) -> ModeId {
        self.resolve(self.get(m).deflexed)
    }

    /// `REF m` if it has been interned.
    pub fn name(&self, m: ModeId) -> Option<ModeId> {
        self.get(m).name.map(|n| self.resolve(n))
    }

    pub fn slice(&self, m: ModeId) -> Option<ModeId> {
        self.get(m).slice.map(|s| self.resolve(s))
    }

    pub fn multiple(&self, m: ModeId) -> Option<ModeId> {
        self.get(m).multiple.map(|s| self.resolve(s))
    }

    /// Whether the error mode occurs anywhere inside `m`.
    pub fn is_ill(&self, m: ModeId) -> bool {
        self.get(m).ill
    }

    /// Error and HIP absorb every coercion and equality test.
    pub fn is_absorbing(&self, m: ModeId) -> bool {
        let m = self.resolve(m);
        m == ERROR || m == HIP || self.slot(m).ill
    }

    /// The single child of a `REF`, `FLEX`, row or procedure result.
    pub fn sub(&self, m: ModeId) -> Option<ModeId> {
        let sub = match self.kind(m) {
            ModeKind::Ref(sub) | ModeKind::Flex(sub) => *sub,
            ModeKind::Row { elem, .. } => *elem,
            ModeKind::Proc { result, .. } => *result,
            _ => return None,
        };
        Some(self.resolve(sub))
    }

    pub fn pack(&self, m: ModeId) -> Option<&Pack> {
        match self.kind(m) {
            ModeKind::Proc { params: pack, .. }
            | ModeKind::Struct(pack)
            | ModeKind::Union(pack)
            | ModeKind::Series(pack)
            | ModeKind::Stowed(pack) => Some(pack),
            _ => None,
        }
    }

    /// Members of a union, series or display, resolved.
    pub fn members(&self, m: ModeId) -> Vec<ModeId> {
        match self.kind(m) {
            ModeKind::Union(pack) | ModeKind::Series(pack) | ModeKind::Stowed(pack) => {
                pack.modes().map(|x| self.resolve(x)).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn is_ref(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Ref(_))
    }

    pub fn is_proc(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Proc { .. })
    }

    pub fn is_niladic_proc(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Proc { params, .. } if params.is_empty())
    }

    pub fn is_flex(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Flex(_))
    }

    /// A fixed or flexible row.
    pub fn is_row(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Row { .. } | ModeKind::Flex(_))
    }

    pub fn is_struct(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Struct(_))
    }

    pub fn is_union(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Union(_))
    }

    pub fn is_series(&self, m: ModeId) -> bool {
        matches!(self.kind(m), ModeKind::Series(_))
    }

    /// `REF [] m` or `REF FLEX [] m`.
    pub fn is_ref_row(&self, m: ModeId) -> bool {
        self.multiple(m).is_some()
    }

    /// Dimension and element mode of a fixed or flexible row.
    pub fn row_shape(&self, m: ModeId) -> Option<(u8, ModeId)> {
        match self.kind(m) {
            ModeKind::Row { dim, elem } => Some((*dim, self.resolve(*elem))),
            ModeKind::Flex(row) => self.row_shape(*row),
            _ => None,
        }
    }

    /// The mode of field `name` of a structure.
    pub fn field(&self, m: ModeId, name: &str) -> Option<ModeId> {
        match self.kind(m) {
            ModeKind::Struct(pack) => pack.field(name).map(|e| self.resolve(e.mode)),
            _ => None,
        }
    }

    /// A name or a niladic procedure.
    pub fn is_deprefable(&self, m: ModeId) -> bool {
        self.is_ref(m) || self.is_niladic_proc(m)
    }

    /// Strips one `REF` or niladic `PROC`.
    pub fn depref_once(&self, m: ModeId) -> Option<ModeId> {
        if self.is_deprefable(m) {
            self.sub(m)
        } else {
            None
        }
    }

    /// Strips every leading `REF` and niladic `PROC`.
    pub fn depref_completely(&self, m: ModeId) -> ModeId {
        let mut m = self.resolve(m);
        for _ in 0..self.modes.len() {
            match self.depref_once(m) {
                Some(next) => m = next,
                None => break,
            }
        }
        m
    }

    /// Strips every leading niladic `PROC`.
    pub fn deproc_completely(&self, m: ModeId) -> ModeId {
        let mut m = self.resolve(m);
        for _ in 0..self.modes.len() {
            if !self.is_niladic_proc(m) {
                break;
            }
            match self.sub(m) {
                Some(next) => m = next,
                None => break,
            }
        }
        m
    }

    /// Strips every leading row and `FLEX` layer.
    pub fn derow(&self, m: ModeId) -> ModeId {
        let mut m = self.resolve(m);
        while let Some((_, elem)) = self.row_shape(m) {
            m = elem;
        }
        m
    }

    /// Canonical modes reachable from `roots`, sorted by id.
    pub fn reachable(&self, roots: impl IntoIterator<Item = ModeId>) -> Vec<ModeId> {
        let mut seen = FxHashSet::default();
        let mut stack: Vec<ModeId> = roots.into_iter().map(|m| self.resolve(m)).collect();
        while let Some(m) = stack.pop() {
            if !seen.insert(m) {
                continue;
            }
            stack.extend(self.kind(m).children().into_iter().map(|c| self.resolve(c)));
        }
        let mut out: Vec<ModeId> = seen.into_iter().collect();
        out.sort();
        out
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Renders a mode the way a programmer would write it.
    pub fn display(&self, m: ModeId) -> String {
        let mut out = String::new();
        self.write_mode(&mut out, m, 0);
        out
    }

    fn write_pack(&self, out: &mut String, pack: &Pack, depth: usize) {
        out.push('(');
        for (i, entry) in pack.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_mode(out, entry.mode, depth + 1);
            if let Some(name) = &entry.name {
                out.push(' ');
                out.push_str(name);
            }
        }
        out.push(')');
    }

    fn write_mode(&self, out: &mut String, m: ModeId, depth: usize) {
        let m = self.resolve(m);
        if m == STRING {
            out.push_str("STRING");
            return;
        }
        let mode = self.slot(m);
        if depth > 0 {
            if let Some(name) = &mode.indicant {
                out.push_str(name);
                return;
            }
        }
        if depth > MAX_DISPLAY_DEPTH {
            out.push_str("...");
            return;
        }
        match &mode.kind {
            ModeKind::Standard(s) => out.push_str(&s.to_string()),
            ModeKind::Ref(sub) => {
                out.push_str("REF ");
                self.write_mode(out, *sub, depth + 1);
            }
            ModeKind::Proc { params, result } => {
                out.push_str("PROC ");
                if !params.is_empty() {
                    self.write_pack(out, params, depth);
                    out.push(' ');
                }
                self.write_mode(out, *result, depth + 1);
            }
            ModeKind::Row { dim, elem } => {
                out.push('[');
                for _ in 1..*dim {
                    out.push(',');
                }
                out.push_str("] ");
                self.write_mode(out, *elem, depth + 1);
            }
            ModeKind::Flex(row) => {
                out.push_str("FLEX ");
                self.write_mode(out, *row, depth + 1);
            }
            ModeKind::Struct(pack) => {
                out.push_str("STRUCT ");
                self.write_pack(out, pack, depth);
            }
            ModeKind::Union(pack) => {
                out.push_str("UNION ");
                self.write_pack(out, pack, depth);
            }
            ModeKind::Series(pack) => {
                out.push_str("SERIES ");
                self.write_pack(out, pack, depth);
            }
            ModeKind::Stowed(pack) => {
                out.push_str("DISPLAY ");
                self.write_pack(out, pack, depth);
            }
            ModeKind::Indicant(name) => out.push_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::*;

    #[test]
    fn interning_is_structural() {
        let mut reg = ModeRegistry::new();
        let a = reg.row_of(1, INT);
        let b = reg.intern(ModeKind::Row { dim: 1, elem: INT });
        assert_eq!(a, b);
        let before = reg.len();
        reg.row_of(1, INT);
        assert_eq!(reg.len(), before);
    }

    #[test]
    fn name_of_is_memoized() {
        let mut reg = ModeRegistry::new();
        let r = reg.name_of(REAL);
        assert_eq!(reg.name(REAL), Some(r));
        assert_eq!(reg.name_of(REAL), r);
        assert_eq!(reg.sub(r), Some(REAL));
    }

    #[test]
    fn union_members_are_sorted_and_flattened() {
        let mut reg = ModeRegistry::new();
        let inner = reg.union_of([CHAR, BOOL]);
        let a = reg.union_of([REAL, inner, INT]);
        let b = reg.union_of([BOOL, INT, CHAR, REAL, INT]);
        assert_eq!(a, b);
        assert_eq!(reg.members(a), vec![INT, REAL, BOOL, CHAR]);
    }

    #[test]
    fn slices_and_multiples() {
        let mut reg = ModeRegistry::new();
        let matrix = reg.row_of(2, INT);
        let vector = reg.row_of(1, INT);
        assert_eq!(reg.slice(matrix), Some(vector));
        assert_eq!(reg.slice(vector), Some(INT));
        assert_eq!(reg.slice(STRING), Some(CHAR));

        let ref_matrix = reg.name_of(matrix);
        let ref_vector = reg.name_of(vector);
        let ref_int = reg.name_of(INT);
        assert_eq!(reg.multiple(ref_matrix), Some(ref_vector));
        assert_eq!(reg.multiple(ref_vector), Some(ref_int));
        assert!(reg.is_ref_row(ref_vector));
        assert!(!reg.is_ref_row(ref_int));
    }

    #[test]
    fn deflexing_strips_flex_at_every_level() {
        let mut reg = ModeRegistry::new();
        let ref_string = reg.name_of(STRING);
        let ref_row_char = reg.name_of(ROW_CHAR);
        assert_eq!(reg.deflexed(STRING), ROW_CHAR);
        assert_eq!(reg.deflexed(ref_string), ref_row_char);
        let s = reg.struct_of([(STRING, "text"), (INT, "n")]);
        let fixed = reg.struct_of([(ROW_CHAR, "text"), (INT, "n")]);
        assert_eq!(reg.deflexed(s), fixed);
        assert_eq!(reg.deflexed(INT), INT);
    }

    #[test]
    fn error_taints_enclosing_modes() {
        let mut reg = ModeRegistry::new();
        let r = reg.name_of(ERROR);
        let p = reg.proc_of([INT], r);
        assert!(reg.is_ill(p));
        assert!(reg.is_absorbing(p));
        assert!(reg.is_absorbing(HIP));
        assert!(!reg.is_absorbing(INT));
    }

    #[test]
    fn depref_strips_names_and_niladic_procs() {
        let mut reg = ModeRegistry::new();
        let proc_int = reg.proc_of([], INT);
        let ref_proc = reg.name_of(proc_int);
        let ref_ref = reg.name_of(ref_proc);
        assert_eq!(reg.depref_once(ref_ref), Some(ref_proc));
        assert_eq!(reg.depref_completely(ref_ref), INT);
        assert_eq!(reg.deproc_completely(proc_int), INT);
        assert_eq!(reg.deproc_completely(ref_proc), ref_proc);
        let unary = reg.proc_of([INT], INT);
        assert_eq!(reg.depref_once(unary), None);
    }

    #[test]
    fn derow_finds_the_element() {
        let mut reg = ModeRegistry::new();
        let m = reg.row_of(2, ROW_CHAR);
        assert_eq!(reg.derow(m), CHAR);
        assert_eq!(reg.derow(STRING), CHAR);
    }

    #[test]
    fn recursive_modes_collapse() {
        let mut reg = ModeRegistry::new();
        let list = reg.declare_indicant("LIST");
        let next = reg.name_of(list);
        let body = reg.struct_of([(INT, "v"), (next, "next")]);
        reg.define_indicant(list, body).unwrap();

        assert_eq!(reg.resolve(list), body);
        let via_body = reg.name_of(body);
        assert_eq!(reg.resolve(next), via_body);
        assert_eq!(reg.display(via_body), "REF LIST");
    }

    #[test]
    fn independently_declared_recursive_modes_are_equal() {
        let mut reg = ModeRegistry::new();
        let a = reg.declare_indicant("A");
        let ra = reg.name_of(a);
        let body_a = reg.struct_of([(INT, "v"), (ra, "next")]);
        reg.define_indicant(a, body_a).unwrap();

        let b = reg.declare_indicant("B");
        let rb = reg.name_of(b);
        let body_b = reg.struct_of([(INT, "v"), (rb, "next")]);
        reg.define_indicant(b, body_b).unwrap();

        assert_eq!(reg.resolve(a), reg.resolve(b));
    }

    #[test]
    fn indicants_cannot_be_redefined() {
        let mut reg = ModeRegistry::new();
        let a = reg.declare_indicant("A");
        reg.define_indicant(a, INT).unwrap();
        assert_eq!(
            reg.define_indicant(a, REAL),
            Err(RegistryError::IndicantRedefined { name: "A".into() })
        );
        assert_eq!(reg.define_indicant(INT, REAL), Err(RegistryError::NotAnIndicant(INT)));
    }

    #[test]
    fn display_spells_modes() {
        let mut reg = ModeRegistry::new();
        let r = reg.name_of(ROW_ROW_REAL);
        assert_eq!(reg.display(r), "REF [,] REAL");
        let p = reg.proc_of([INT, STRING], BOOL);
        assert_eq!(reg.display(p), "PROC (INT, STRING) BOOL");
        let s = reg.struct_of([(INT, "a")]);
        assert_eq!(reg.display(s), "STRUCT (INT a)");
        assert_eq!(reg.display(LONG_LONG_REAL), "LONG LONG REAL");
        let u = reg.union_of([INT, REAL]);
        assert_eq!(reg.display(u), "UNION (INT, REAL)");
    }

    #[test]
    fn reachable_includes_children() {
        let mut reg = ModeRegistry::new();
        let r = reg.name_of(ROW_REAL);
        assert_eq!(reg.reachable([r]), vec![REAL, ROW_REAL, r]);
    }
}
