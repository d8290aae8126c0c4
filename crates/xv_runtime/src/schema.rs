//! Field schemas shared by value types and struct types.
//!
//! A schema is an ordered list of fields. Order and names are part of its
//! identity; equality and hashing follow the ordered (name, type) sequence.

use crate::construct::{coerce_field, default_for};
use crate::equivalence::schemas_equivalent;
use crate::types::{Layout, StructType, ValueType};
use crate::value::Value;
use ahash::RandomState;
use hashbrown::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;
use xv_core::{CoercionMode, DefId, RealmId, Result, ValueTypeError, fast_hasher};

/// Which field types a schema may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Every field must be a value type.
    Value,
    /// Fields may be value types or struct types.
    Struct,
}

#[derive(Clone, Debug)]
pub enum FieldType {
    Value(ValueType),
    Struct(StructType),
}

impl FieldType {
    pub fn name(&self) -> String {
        match self {
            FieldType::Value(t) => t.name(),
            FieldType::Struct(s) => s.name().to_string(),
        }
    }

    pub fn as_value_type(&self) -> Option<&ValueType> {
        match self {
            FieldType::Value(t) => Some(t),
            FieldType::Struct(_) => None,
        }
    }

    fn structural_hash(&self) -> u64 {
        match self {
            FieldType::Value(t) => t.structural_hash(),
            FieldType::Struct(s) => s.id() ^ 0x5354_5255_4354,
        }
    }

    fn realm_id(&self) -> RealmId {
        match self {
            FieldType::Value(t) => t.realm_id(),
            FieldType::Struct(s) => s.realm_id(),
        }
    }
}

impl From<ValueType> for FieldType {
    fn from(t: ValueType) -> Self {
        FieldType::Value(t)
    }
}

impl From<&ValueType> for FieldType {
    fn from(t: &ValueType) -> Self {
        FieldType::Value(t.clone())
    }
}

impl From<StructType> for FieldType {
    fn from(s: StructType) -> Self {
        FieldType::Struct(s)
    }
}

impl From<&StructType> for FieldType {
    fn from(s: &StructType) -> Self {
        FieldType::Struct(s.clone())
    }
}

/// Unvalidated field description handed to schema construction.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: Arc<str>,
    pub ty: FieldType,
    pub is_static: bool,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<Arc<str>>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_static: false,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Static fields are fixed at their default and never read from a source.
    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }
}

impl<N: Into<Arc<str>>, T: Into<FieldType>> From<(N, T)> for FieldSpec {
    fn from((name, ty): (N, T)) -> Self {
        FieldSpec::new(name, ty)
    }
}

#[derive(Clone, Debug)]
pub struct Field {
    name: Arc<str>,
    ty: FieldType,
    is_static: bool,
    default: Option<Value>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Explicit default, already coerced to the field type.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

#[derive(Clone)]
pub struct FieldSchema {
    kind: SchemaKind,
    fields: Arc<[Field]>,
    hash: u64,
    depth: usize,
}

impl FieldSchema {
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub(crate) fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// Nesting depth: 1 for a schema of primitives only.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl PartialEq for FieldSchema {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && schemas_equivalent(self, other)
    }
}

impl Eq for FieldSchema {}

impl Hash for FieldSchema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for field in self.fields.iter() {
            list.entry(&format_args!("{}: {}", field.name, field.ty.name()));
        }
        list.finish()
    }
}

/// Realm-specific limits applied while building a schema.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SchemaRules {
    pub realm: RealmId,
    pub coercion: CoercionMode,
    pub max_depth: usize,
}

pub(crate) fn make_schema(
    kind: SchemaKind,
    specs: Vec<FieldSpec>,
    rules: SchemaRules,
) -> Result<FieldSchema> {
    let mut seen: HashSet<&str, RandomState> = HashSet::with_hasher(fast_hasher());
    for spec in &specs {
        if !seen.insert(spec.name.as_ref()) {
            return Err(ValueTypeError::DuplicateFieldName {
                field: spec.name.to_string(),
            });
        }
    }
    drop(seen);

    for spec in &specs {
        check_field_type(kind, spec, rules)?;
    }
    let depth = check_acyclic(&specs, rules.max_depth)?;

    let mut fields = Vec::with_capacity(specs.len());
    for spec in specs {
        let default = match spec.default {
            Some(v) => Some(coerce_field(&spec.name, &spec.ty, v, rules.coercion)?),
            None if spec.is_static => Some(default_for(&spec.name, &spec.ty, "static field")?),
            None => None,
        };
        fields.push(Field {
            name: spec.name,
            ty: spec.ty,
            is_static: spec.is_static,
            default,
        });
    }

    let hash = hash_fields(&fields);
    Ok(FieldSchema {
        kind,
        fields: fields.into(),
        hash,
        depth,
    })
}

fn check_field_type(kind: SchemaKind, spec: &FieldSpec, rules: SchemaRules) -> Result<()> {
    if spec.ty.realm_id() != rules.realm {
        return Err(ValueTypeError::invalid_field_type(
            spec.name.as_ref(),
            format!("{} is not registered in this realm", spec.ty.name()),
        ));
    }
    if kind == SchemaKind::Value {
        if let FieldType::Struct(s) = &spec.ty {
            return Err(ValueTypeError::invalid_field_type(
                spec.name.as_ref(),
                format!("struct type {} cannot be embedded in a value type", s.name()),
            ));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum NodeKey {
    Value(DefId),
    Struct(u64),
}

/// Walks every type reachable from `specs`. A type seen again on the current
/// path is a cycle. Returns the nesting depth of the schema being built.
fn check_acyclic(specs: &[FieldSpec], max_depth: usize) -> Result<usize> {
    let mut path: HashSet<NodeKey, RandomState> = HashSet::with_hasher(fast_hasher());
    let mut done = hashbrown::HashMap::with_hasher(fast_hasher());
    let mut depth = 1;
    let mut deepest = specs.first().map(|s| s.name.as_ref()).unwrap_or("");
    for spec in specs {
        let d = walk(&spec.ty, &mut path, &mut done)
            .map_err(|reason| ValueTypeError::invalid_field_type(spec.name.as_ref(), reason))?;
        if d + 1 > depth {
            depth = d + 1;
            deepest = spec.name.as_ref();
        }
    }
    if depth > max_depth {
        return Err(ValueTypeError::invalid_field_type(
            deepest,
            format!("nesting depth {depth} exceeds the limit of {max_depth}"),
        ));
    }
    Ok(depth)
}

fn walk(
    ty: &FieldType,
    path: &mut HashSet<NodeKey, RandomState>,
    done: &mut hashbrown::HashMap<NodeKey, usize, RandomState>,
) -> std::result::Result<usize, String> {
    let (key, schema) = match ty {
        FieldType::Value(t) => match t.layout() {
            Layout::Primitive(_) => return Ok(0),
            Layout::Composite(schema) => (NodeKey::Value(t.id()), schema),
        },
        FieldType::Struct(s) => (NodeKey::Struct(s.id()), s.schema()),
    };
    if let Some(depth) = done.get(&key) {
        return Ok(*depth);
    }
    if !path.insert(key) {
        return Err(format!("{} embeds itself", ty.name()));
    }
    let mut depth = 1;
    for field in schema.fields() {
        depth = depth.max(walk(field.ty(), path, done)? + 1);
    }
    path.remove(&key);
    done.insert(key, depth);
    Ok(depth)
}

fn hash_fields(fields: &[Field]) -> u64 {
    let mut hasher = fast_hasher().build_hasher();
    hasher.write_usize(fields.len());
    for field in fields {
        field.name.as_bytes().hash(&mut hasher);
        hasher.write_u64(field.ty.structural_hash());
    }
    hasher.finish()
}
