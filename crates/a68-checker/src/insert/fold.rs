//! Widening denotations in place.
//!
//! `LONG REAL x = 1` needs no run-time widening: the denotation can be
//! rewritten as `LONG 1.0` while the value is exactly representable.

use a68_core::{Literal, ModeId, ModeKind, Primitive, Standard};
use a68_registry::ModeRegistry;
use ordered_float::OrderedFloat;

/// Largest magnitude an `f64` holds without losing integer precision.
const EXACT_INTEGER_LIMIT: u64 = 1 << 53;

/// `literal` rewritten as a denotation of mode `to`, if that is exact.
pub fn widen_literal(reg: &ModeRegistry, literal: &Literal, to: ModeId) -> Option<Literal> {
    let ModeKind::Standard(Standard { primitive, size }) = *reg.kind(to) else {
        return None;
    };
    match (literal, primitive) {
        (Literal::Int { value, .. }, Primitive::Int) => Some(Literal::Int { value: *value, size }),
        (Literal::Int { value, .. }, Primitive::Real) if value.unsigned_abs() <= EXACT_INTEGER_LIMIT => {
            Some(Literal::Real {
                value: OrderedFloat(*value as f64),
                size,
            })
        }
        (Literal::Real { value, .. }, Primitive::Real) => Some(Literal::Real { value: *value, size }),
        (Literal::Bits { value, .. }, Primitive::Bits) => Some(Literal::Bits { value: *value, size }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a68_registry::standard::*;

    #[test]
    fn integers_lengthen() {
        let reg = ModeRegistry::new();
        let one = Literal::Int { value: 1, size: 0 };
        assert_eq!(
            widen_literal(&reg, &one, LONG_INT),
            Some(Literal::Int { value: 1, size: 1 })
        );
    }

    #[test]
    fn small_integers_become_reals() {
        let reg = ModeRegistry::new();
        let three = Literal::Int { value: 3, size: 1 };
        assert_eq!(
            widen_literal(&reg, &three, LONG_REAL),
            Some(Literal::Real {
                value: OrderedFloat(3.0),
                size: 1
            })
        );
    }

    #[test]
    fn inexact_integers_stay() {
        let reg = ModeRegistry::new();
        let big = Literal::Int {
            value: (1 << 53) + 1,
            size: 0,
        };
        assert_eq!(widen_literal(&reg, &big, REAL), None);
    }

    #[test]
    fn complex_has_no_denotation() {
        let reg = ModeRegistry::new();
        let half = Literal::Real {
            value: OrderedFloat(0.5),
            size: 0,
        };
        assert_eq!(widen_literal(&reg, &half, COMPLEX), None);
    }
}
