//! Modes every registry starts with.
//!
//! Each constant is the id the mode gets in a fresh [`ModeRegistry`]; the
//! registry seeds them in exactly this order, so predicates can compare
//! against them without a lookup.

use a68_core::{ModeId, ModeKind, Primitive, Standard};

use crate::ModeRegistry;

pub const VOID: ModeId = ModeId::new(0);
pub const HIP: ModeId = ModeId::new(1);
pub const ERROR: ModeId = ModeId::new(2);
pub const UNDEFINED: ModeId = ModeId::new(3);
pub const INT: ModeId = ModeId::new(4);
pub const LONG_INT: ModeId = ModeId::new(5);
pub const LONG_LONG_INT: ModeId = ModeId::new(6);
pub const REAL: ModeId = ModeId::new(7);
pub const LONG_REAL: ModeId = ModeId::new(8);
pub const LONG_LONG_REAL: ModeId = ModeId::new(9);
pub const COMPLEX: ModeId = ModeId::new(10);
pub const LONG_COMPLEX: ModeId = ModeId::new(11);
pub const LONG_LONG_COMPLEX: ModeId = ModeId::new(12);
pub const BOOL: ModeId = ModeId::new(13);
pub const CHAR: ModeId = ModeId::new(14);
pub const BITS: ModeId = ModeId::new(15);
pub const LONG_BITS: ModeId = ModeId::new(16);
pub const LONG_LONG_BITS: ModeId = ModeId::new(17);
pub const BYTES: ModeId = ModeId::new(18);
pub const LONG_BYTES: ModeId = ModeId::new(19);
pub const FORMAT: ModeId = ModeId::new(20);
pub const ROWS: ModeId = ModeId::new(21);
pub const SIMPLIN: ModeId = ModeId::new(22);
pub const SIMPLOUT: ModeId = ModeId::new(23);
pub const VACUUM: ModeId = ModeId::new(24);
/// `[] BOOL`
pub const ROW_BOOL: ModeId = ModeId::new(25);
/// `FLEX [] BOOL`
pub const FLEX_ROW_BOOL: ModeId = ModeId::new(26);
/// `[] CHAR`
pub const ROW_CHAR: ModeId = ModeId::new(27);
/// `STRING`, that is `FLEX [] CHAR`
pub const STRING: ModeId = ModeId::new(28);
pub const ROW_REAL: ModeId = ModeId::new(29);
/// `[,] REAL`
pub const ROW_ROW_REAL: ModeId = ModeId::new(30);
pub const ROW_COMPLEX: ModeId = ModeId::new(31);
pub const ROW_ROW_COMPLEX: ModeId = ModeId::new(32);
pub const ROW_SIMPLIN: ModeId = ModeId::new(33);
pub const ROW_SIMPLOUT: ModeId = ModeId::new(34);

const PRIMITIVES: [(Primitive, u8); 25] = [
    (Primitive::Void, 0),
    (Primitive::Hip, 0),
    (Primitive::Error, 0),
    (Primitive::Undefined, 0),
    (Primitive::Int, 0),
    (Primitive::Int, 1),
    (Primitive::Int, 2),
    (Primitive::Real, 0),
    (Primitive::Real, 1),
    (Primitive::Real, 2),
    (Primitive::Complex, 0),
    (Primitive::Complex, 1),
    (Primitive::Complex, 2),
    (Primitive::Bool, 0),
    (Primitive::Char, 0),
    (Primitive::Bits, 0),
    (Primitive::Bits, 1),
    (Primitive::Bits, 2),
    (Primitive::Bytes, 0),
    (Primitive::Bytes, 1),
    (Primitive::Format, 0),
    (Primitive::Rows, 0),
    (Primitive::SimpleIn, 0),
    (Primitive::SimpleOut, 0),
    (Primitive::Vacuum, 0),
];

/// Interns the standard modes into an empty registry.
pub(crate) fn seed(reg: &mut ModeRegistry) {
    for (primitive, size) in PRIMITIVES {
        reg.intern(ModeKind::Standard(Standard::long(primitive, size)));
    }

    let row_bool = reg.row_of(1, BOOL);
    reg.flex_of(row_bool);
    let row_char = reg.row_of(1, CHAR);
    reg.flex_of(row_char);
    reg.row_of(1, REAL);
    reg.row_of(2, REAL);
    reg.row_of(1, COMPLEX);
    reg.row_of(2, COMPLEX);
    reg.row_of(1, SIMPLIN);
    let last = reg.row_of(1, SIMPLOUT);

    debug_assert_eq!(last, ROW_SIMPLOUT, "standard modes seeded out of order");
}

/// Whether `m` is one of the plain or long integral modes.
pub fn is_integral(m: ModeId) -> bool {
    matches!(m, INT | LONG_INT | LONG_LONG_INT)
}

/// Whether `m` is one of the plain or long real modes.
pub fn is_real(m: ModeId) -> bool {
    matches!(m, REAL | LONG_REAL | LONG_LONG_REAL)
}

/// Whether `m` is one of the plain or long complex modes.
pub fn is_complex(m: ModeId) -> bool {
    matches!(m, COMPLEX | LONG_COMPLEX | LONG_LONG_COMPLEX)
}
