//! Mode lists the operator fallbacks walk, in the order they are tried.

use a68_core::ModeId;
use a68_registry::standard::*;

/// Modes a monadic operand is promoted to when no operator takes it as is.
pub const MONADIC_PROMOTIONS: [ModeId; 3] = [COMPLEX, LONG_COMPLEX, LONG_LONG_COMPLEX];

/// Vector and matrix operands whose partner may be promoted to a scalar.
pub const VECTOR_OPERANDS: [ModeId; 4] = [ROW_REAL, ROW_ROW_REAL, ROW_COMPLEX, ROW_ROW_COMPLEX];

/// Scalars a vector operand's partner is promoted to.
pub const SCALAR_PROMOTIONS: [ModeId; 2] = [REAL, COMPLEX];

/// Common modes both dyadic operands are promoted to, narrowest first.
pub const NUMERIC_LADDER: [ModeId; 6] = [
    REAL,
    LONG_REAL,
    LONG_LONG_REAL,
    COMPLEX,
    LONG_COMPLEX,
    LONG_LONG_COMPLEX,
];
