//! Instance construction and field coercion.
//!
//! Fields are populated in schema order. A source field that is absent or
//! `Undefined` takes the field's default; when no default exists construction
//! fails with `MissingField`. Nothing is sealed until every field succeeded,
//! so a failed construction leaves no instance behind.

use crate::equivalence::equivalent;
use crate::instance::{FieldSource, Source, StructInstance, ValueInstance};
use crate::schema::{FieldSchema, FieldType};
use crate::types::{Layout, StructType, ValueType};
use crate::value::Value;
use smallvec::SmallVec;
use tracing::trace;
use xv_core::{CoercionMode, PrimitiveKind, Result, ValueTypeError};

pub(crate) fn construct_value(
    ty: &ValueType,
    source: Option<Source<'_>>,
) -> Result<ValueInstance> {
    let Some(schema) = ty.schema() else {
        return Err(ValueTypeError::NotCallable {
            ty: ty.name(),
            name: "constructor".to_string(),
        });
    };
    let fields = populate(&ty.name(), schema, source, ty.coercion())?;
    trace!(ty = %ty.name(), fields = fields.len(), "constructed value instance");
    Ok(ValueInstance::seal(ty.clone(), schema.clone(), fields))
}

pub(crate) fn construct_struct(
    ty: &StructType,
    source: Option<Source<'_>>,
) -> Result<StructInstance> {
    let fields = populate(ty.name(), ty.schema(), source, ty.coercion())?;
    trace!(ty = ty.name(), fields = fields.len(), "constructed struct instance");
    Ok(StructInstance::new(ty.clone(), fields))
}

fn populate(
    owner: &str,
    schema: &FieldSchema,
    source: Option<Source<'_>>,
    mode: CoercionMode,
) -> Result<Box<[Value]>> {
    let mut out: SmallVec<[Value; 8]> = SmallVec::with_capacity(schema.len());
    for field in schema.fields() {
        if field.is_static() {
            if let Some(v) = field.default() {
                out.push(v.clone());
                continue;
            }
        }
        let raw = source
            .and_then(|s| s.read_field(field.name()))
            .filter(|v| !v.is_undefined());
        let value = match raw {
            Some(v) => coerce_field(field.name(), field.ty(), v, mode)?,
            None => match field.default() {
                Some(d) => d.clone(),
                None => default_for(field.name(), field.ty(), owner)?,
            },
        };
        out.push(value);
    }
    Ok(out.into_vec().into_boxed_slice())
}

/// Type-level default for a field without an explicit one.
pub(crate) fn default_for(name: &str, ty: &FieldType, owner: &str) -> Result<Value> {
    match ty {
        FieldType::Value(t) => match t.layout() {
            Layout::Primitive(kind) => {
                primitive_default(*kind).ok_or_else(|| ValueTypeError::MissingField {
                    ty: owner.to_string(),
                    field: name.to_string(),
                })
            }
            Layout::Composite(_) => Ok(Value::Instance(construct_value(t, None)?)),
        },
        FieldType::Struct(s) => Ok(Value::Struct(construct_struct(s, None)?)),
    }
}

pub fn primitive_default(kind: PrimitiveKind) -> Option<Value> {
    match kind {
        PrimitiveKind::String => Some(Value::str("")),
        PrimitiveKind::Boolean => Some(Value::Bool(false)),
        PrimitiveKind::Symbol => None,
        k if k.is_float() => Some(Value::Float(0.0)),
        _ => Some(Value::Int(0)),
    }
}

pub(crate) fn coerce_field(
    name: &str,
    ty: &FieldType,
    value: Value,
    mode: CoercionMode,
) -> Result<Value> {
    match ty {
        FieldType::Value(t) => match t.layout() {
            Layout::Primitive(kind) => coerce_primitive(name, *kind, value, mode),
            Layout::Composite(_) => coerce_nested_value(name, t, value),
        },
        FieldType::Struct(s) => coerce_nested_struct(name, s, value),
    }
}

fn coerce_nested_value(name: &str, ty: &ValueType, value: Value) -> Result<Value> {
    if let Value::Instance(inst) = &value {
        // Sealed sub-values of an equivalent type can be shared as-is.
        if equivalent(inst.ty(), ty) {
            return Ok(value);
        }
    }
    match Source::from_value(&value) {
        Some(src) => Ok(Value::Instance(construct_value(ty, Some(src))?)),
        None => Err(ValueTypeError::type_mismatch(name, ty.name(), value.type_name())),
    }
}

fn coerce_nested_struct(name: &str, ty: &StructType, value: Value) -> Result<Value> {
    if let Value::Struct(inst) = &value {
        if inst.ty().ptr_eq(ty) {
            return Ok(value);
        }
    }
    match Source::from_value(&value) {
        Some(src) => Ok(Value::Struct(construct_struct(ty, Some(src))?)),
        None => Err(ValueTypeError::type_mismatch(name, ty.name(), value.type_name())),
    }
}

pub(crate) fn coerce_primitive(
    name: &str,
    kind: PrimitiveKind,
    value: Value,
    mode: CoercionMode,
) -> Result<Value> {
    let found = value.type_name();
    let lenient = mode == CoercionMode::Lenient;
    let converted = if kind.is_integer() {
        match value {
            Value::Int(i) => kind.int_from_i64(i, mode),
            Value::Float(f) => kind.int_from_f64(f, mode),
            Value::Bool(b) if lenient => kind.int_from_i64(b as i64, mode),
            Value::Str(s) if lenient => kind.int_from_f64(text_to_number(&s), mode),
            _ => None,
        }
        .map(Value::Int)
    } else if kind.is_float() {
        match value {
            Value::Int(i) => kind.float_from_f64(i as f64),
            Value::Float(f) => kind.float_from_f64(f),
            Value::Bool(b) if lenient => kind.float_from_f64(if b { 1.0 } else { 0.0 }),
            Value::Str(s) if lenient => kind.float_from_f64(text_to_number(&s)),
            _ => None,
        }
        .map(Value::Float)
    } else {
        match (kind, value) {
            (PrimitiveKind::String, v @ Value::Str(_)) => Some(v),
            (PrimitiveKind::String, v) if lenient => v.to_text().map(Value::from),
            (PrimitiveKind::Boolean, v @ Value::Bool(_)) => Some(v),
            (PrimitiveKind::Boolean, v) if lenient => Some(Value::Bool(v.truthy())),
            (PrimitiveKind::Symbol, v @ Value::Symbol(_)) => Some(v),
            _ => None,
        }
    };
    converted.ok_or_else(|| ValueTypeError::type_mismatch(name, kind.name(), found))
}

/// Lenient text-to-number: blank text is 0, `0x`/`0o`/`0b` prefixes select a
/// radix, anything else that does not parse is NaN.
fn text_to_number(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }
    let radix = match t.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        return u64::from_str_radix(&t[2..], radix)
            .map(|i| i as f64)
            .unwrap_or(f64::NAN);
    }
    match t {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // `str::parse` also takes `inf` and `nan`; those are not numbers here.
        _ if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        _ => t.parse().unwrap_or(f64::NAN),
    }
}
