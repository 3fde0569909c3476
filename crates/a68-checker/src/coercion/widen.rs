//! Widening along the numeric tower.
//!
//! ```text
//! INT ──> LONG INT ──> LONG LONG INT
//!  │         │              │
//!  v         v              v
//! REAL ──> LONG REAL ──> LONG LONG REAL
//!  │         │              │
//!  v         v              v
//! COMPLEX ─> LONG COMPLEX ─> LONG LONG COMPLEX
//!
//! BITS ──> LONG BITS ──> LONG LONG BITS      any BITS ──> [] BOOL
//! BYTES, LONG BYTES ──> [] CHAR, STRING
//! ```
//!
//! A widening is taken one step at a time. Each step is chosen by where the
//! walk is heading, so `INT` bound for `LONG REAL` goes through `LONG INT`
//! while `INT` bound for `COMPLEX` goes through `REAL`.

use a68_core::ModeId;
use a68_registry::standard::*;

/// One edge of the widening graph.
#[derive(Debug, Clone, Copy)]
pub struct Widening {
    pub from: ModeId,
    pub step: ModeId,
    /// Targets for which `from` takes this edge.
    pub toward: &'static [ModeId],
}

const LONG_TARGETS: &[ModeId] = &[
    LONG_INT,
    LONG_LONG_INT,
    LONG_REAL,
    LONG_LONG_REAL,
    LONG_COMPLEX,
    LONG_LONG_COMPLEX,
];

const LONG_REAL_TARGETS: &[ModeId] = &[LONG_REAL, LONG_LONG_REAL, LONG_COMPLEX, LONG_LONG_COMPLEX];

/// Edges in the order they are tried.
pub static WIDENINGS: &[Widening] = &[
    Widening { from: INT, step: LONG_INT, toward: LONG_TARGETS },
    Widening { from: INT, step: REAL, toward: &[REAL, COMPLEX] },
    Widening { from: LONG_INT, step: LONG_LONG_INT, toward: &[LONG_LONG_INT] },
    Widening { from: LONG_INT, step: LONG_REAL, toward: LONG_REAL_TARGETS },
    Widening {
        from: LONG_LONG_INT,
        step: LONG_LONG_REAL,
        toward: &[LONG_LONG_REAL, LONG_LONG_COMPLEX],
    },
    Widening { from: REAL, step: LONG_REAL, toward: LONG_REAL_TARGETS },
    Widening { from: REAL, step: COMPLEX, toward: &[COMPLEX] },
    Widening {
        from: COMPLEX,
        step: LONG_COMPLEX,
        toward: &[LONG_COMPLEX, LONG_LONG_COMPLEX],
    },
    Widening {
        from: LONG_REAL,
        step: LONG_LONG_REAL,
        toward: &[LONG_LONG_REAL, LONG_LONG_COMPLEX],
    },
    Widening { from: LONG_REAL, step: LONG_COMPLEX, toward: &[LONG_COMPLEX] },
    Widening {
        from: LONG_COMPLEX,
        step: LONG_LONG_COMPLEX,
        toward: &[LONG_LONG_COMPLEX],
    },
    Widening {
        from: LONG_LONG_REAL,
        step: LONG_LONG_COMPLEX,
        toward: &[LONG_LONG_COMPLEX],
    },
    Widening { from: BITS, step: LONG_BITS, toward: &[LONG_BITS, LONG_LONG_BITS] },
    Widening { from: LONG_BITS, step: LONG_LONG_BITS, toward: &[LONG_LONG_BITS] },
    Widening { from: BITS, step: ROW_BOOL, toward: &[ROW_BOOL] },
    Widening { from: BITS, step: FLEX_ROW_BOOL, toward: &[FLEX_ROW_BOOL] },
    Widening { from: LONG_BITS, step: ROW_BOOL, toward: &[ROW_BOOL] },
    Widening { from: LONG_BITS, step: FLEX_ROW_BOOL, toward: &[FLEX_ROW_BOOL] },
    Widening { from: LONG_LONG_BITS, step: ROW_BOOL, toward: &[ROW_BOOL] },
    Widening { from: LONG_LONG_BITS, step: FLEX_ROW_BOOL, toward: &[FLEX_ROW_BOOL] },
    Widening { from: BYTES, step: ROW_CHAR, toward: &[ROW_CHAR] },
    Widening { from: BYTES, step: STRING, toward: &[STRING] },
    Widening { from: LONG_BYTES, step: ROW_CHAR, toward: &[ROW_CHAR] },
    Widening { from: LONG_BYTES, step: STRING, toward: &[STRING] },
];

/// The next mode on the way from `p` to `q`, if `p` widens toward `q` at all.
pub fn widens_to(p: ModeId, q: ModeId) -> Option<ModeId> {
    WIDENINGS
        .iter()
        .find(|w| w.from == p && w.toward.contains(&q))
        .map(|w| w.step)
}

/// Whether `p` reaches `q` by one or more widenings.
pub fn is_widenable(p: ModeId, q: ModeId) -> bool {
    widening_path(p, q).is_some()
}

/// The modes visited on the way from `p` to `q`, `q` included.
pub fn widening_path(p: ModeId, q: ModeId) -> Option<Vec<ModeId>> {
    let mut path = Vec::new();
    let mut current = p;
    // Every step moves strictly up the tower, so the table length bounds
    // the walk.
    for _ in 0..WIDENINGS.len() {
        let next = widens_to(current, q)?;
        path.push(next);
        if next == q {
            return Some(path);
        }
        current = next;
    }
    None
}
