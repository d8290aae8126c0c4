//! Deep structural `===` over value instances.

use crate::equivalence::equivalent;
use crate::instance::ValueInstance;
use crate::value::strict_equals;

/// Two instances are equal when their definitions are equivalent and every
/// field is `===`, recursing into nested instances. Depth is bounded by the
/// schema nesting depth.
pub fn value_equals(a: &ValueInstance, b: &ValueInstance) -> bool {
    if !equivalent(a.ty(), b.ty()) {
        return false;
    }
    let (xs, ys) = (a.values(), b.values());
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| strict_equals(x, y))
}
