//! Value and struct instances, and the field-accessor abstraction used to read
//! construction sources.

use crate::construct::coerce_field;
use crate::equality::value_equals;
use crate::schema::FieldSchema;
use crate::types::{StructType, ValueType};
use crate::value::{Record, Value};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use xv_core::{Result, Symbol, ValueTypeError};

/// Read access to named fields. Construction only needs this capability from
/// its source.
pub trait FieldSource {
    fn read_field(&self, name: &str) -> Option<Value>;
}

/// A construction source.
#[derive(Clone, Copy)]
pub enum Source<'a> {
    Record(&'a Record),
    Instance(&'a ValueInstance),
    Struct(&'a StructInstance),
}

impl<'a> Source<'a> {
    /// Sources can only be built from object-like values.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Record(r) => Some(Source::Record(r.as_ref())),
            Value::Instance(i) => Some(Source::Instance(i)),
            Value::Struct(s) => Some(Source::Struct(s)),
            _ => None,
        }
    }
}

impl FieldSource for Source<'_> {
    fn read_field(&self, name: &str) -> Option<Value> {
        match self {
            Source::Record(r) => r.read_field(name),
            Source::Instance(i) => i.read_field(name),
            Source::Struct(s) => s.read_field(name),
        }
    }
}

impl<'a> From<&'a Record> for Source<'a> {
    fn from(r: &'a Record) -> Self {
        Source::Record(r)
    }
}

impl<'a> From<&'a ValueInstance> for Source<'a> {
    fn from(i: &'a ValueInstance) -> Self {
        Source::Instance(i)
    }
}

impl<'a> From<&'a StructInstance> for Source<'a> {
    fn from(s: &'a StructInstance) -> Self {
        Source::Struct(s)
    }
}

impl FieldSource for Record {
    fn read_field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

struct InstanceInner {
    ty: ValueType,
    schema: FieldSchema,
    fields: Box<[Value]>,
}

/// Sealed, deeply immutable instance of a value type.
///
/// There is no way to obtain mutable access to the fields; every write
/// attempt reports `ImmutableWrite` and leaves the instance untouched.
#[derive(Clone)]
pub struct ValueInstance(Arc<InstanceInner>);

impl ValueInstance {
    pub(crate) fn seal(ty: ValueType, schema: FieldSchema, fields: Box<[Value]>) -> Self {
        Self(Arc::new(InstanceInner { ty, schema, fields }))
    }

    pub fn ty(&self) -> &ValueType {
        &self.0.ty
    }

    /// The identity symbol of the instance's definition.
    pub fn type_symbol(&self) -> &Symbol {
        self.0.ty.symbol()
    }

    fn schema(&self) -> &FieldSchema {
        &self.0.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.schema().index_of(name)?;
        self.0.fields.get(index)
    }

    /// Element access for array-shaped types.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.get(&index.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }

    /// Fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema()
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.0.fields.iter())
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.0.fields
    }

    /// Always fails: value instances are sealed at construction.
    pub fn set(&self, name: &str, _value: impl Into<Value>) -> Result<()> {
        Err(ValueTypeError::ImmutableWrite {
            ty: self.0.ty.name(),
            field: name.to_string(),
        })
    }

    pub fn ptr_eq(&self, other: &ValueInstance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl FieldSource for ValueInstance {
    fn read_field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl PartialEq for ValueInstance {
    fn eq(&self, other: &Self) -> bool {
        value_equals(self, other)
    }
}

impl fmt::Debug for ValueInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.0.ty.name());
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}

struct StructInstanceInner {
    ty: StructType,
    fields: RwLock<Box<[Value]>>,
}

/// Mutable instance of a struct type. Identity is nominal.
#[derive(Clone)]
pub struct StructInstance(Arc<StructInstanceInner>);

impl StructInstance {
    pub(crate) fn new(ty: StructType, fields: Box<[Value]>) -> Self {
        Self(Arc::new(StructInstanceInner {
            ty,
            fields: RwLock::new(fields),
        }))
    }

    pub fn ty(&self) -> &StructType {
        &self.0.ty
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let index = self.0.ty.schema().index_of(name)?;
        self.0.fields.read().get(index).cloned()
    }

    /// Coerces `value` to the field's type and stores it. Static fields are
    /// read-only.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let schema = self.0.ty.schema();
        let Some(index) = schema.index_of(name) else {
            return Err(ValueTypeError::UnknownField {
                ty: self.0.ty.name().to_string(),
                field: name.to_string(),
            });
        };
        let field = &schema.fields()[index];
        if field.is_static() {
            return Err(ValueTypeError::ImmutableWrite {
                ty: self.0.ty.name().to_string(),
                field: name.to_string(),
            });
        }
        let coerced = coerce_field(name, field.ty(), value.into(), self.0.ty.coercion())?;
        self.0.fields.write()[index] = coerced;
        Ok(())
    }

    pub fn ptr_eq(&self, other: &StructInstance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl FieldSource for StructInstance {
    fn read_field(&self, name: &str) -> Option<Value> {
        self.get(name)
    }
}

impl fmt::Debug for StructInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.0.fields.read();
        let mut s = f.debug_struct(self.0.ty.name());
        for (field, value) in self.0.ty.schema().fields().iter().zip(fields.iter()) {
            s.field(field.name(), value);
        }
        s.finish()
    }
}
