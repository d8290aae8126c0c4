//! Structural equivalence over type definitions.
//!
//! Two definitions are equivalent when their identity symbols are the same
//! symbol and their schemas agree field by field, in order, on names and
//! (recursively) on types. Primitive types are only equivalent to themselves.
//! Recursion terminates because type graphs are acyclic by construction.

use crate::schema::{FieldSchema, FieldType};
use crate::types::{Definition, Layout};

pub fn equivalent<A, B>(a: &A, b: &B) -> bool
where
    A: Definition + ?Sized,
    B: Definition + ?Sized,
{
    if let (Some(x), Some(y)) = (a.canonical(), b.canonical()) {
        if x.ptr_eq(y) {
            return true;
        }
    }
    // Cheap rejection: never look at schemas of differently named types.
    if a.identity() != b.identity() {
        return false;
    }
    layouts_equivalent(a.layout(), b.layout())
}

fn layouts_equivalent(a: &Layout, b: &Layout) -> bool {
    match (a, b) {
        (Layout::Primitive(x), Layout::Primitive(y)) => x == y,
        (Layout::Composite(x), Layout::Composite(y)) => schemas_equivalent(x, y),
        _ => false,
    }
}

pub fn schemas_equivalent(a: &FieldSchema, b: &FieldSchema) -> bool {
    a.len() == b.len()
        && a
            .fields()
            .iter()
            .zip(b.fields())
            .all(|(x, y)| x.name() == y.name() && field_types_equivalent(x.ty(), y.ty()))
}

/// Value types compare structurally; struct types are nominal.
pub fn field_types_equivalent(a: &FieldType, b: &FieldType) -> bool {
    match (a, b) {
        (FieldType::Value(x), FieldType::Value(y)) => equivalent(x, y),
        (FieldType::Struct(x), FieldType::Struct(y)) => x.ptr_eq(y),
        _ => false,
    }
}
