//! Type definitions: canonical value types, drafts and struct types.

use crate::construct;
use crate::instance::{Source, StructInstance, ValueInstance};
use crate::schema::FieldSchema;
use crate::value::Value;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use xv_core::{
    CoercionMode, DefId, PrimitiveKind, RealmId, Result, Symbol, ValueTypeError, fast_hasher,
};

#[derive(Clone, Debug)]
pub enum Layout {
    Primitive(PrimitiveKind),
    Composite(FieldSchema),
}

impl Layout {
    fn structural_hash(&self) -> u64 {
        match self {
            Layout::Primitive(kind) => {
                let mut hasher = fast_hasher().build_hasher();
                kind.hash(&mut hasher);
                hasher.finish()
            }
            Layout::Composite(schema) => schema.structural_hash(),
        }
    }
}

/// Anything the equivalence engine can compare: drafts and canonical types.
pub trait Definition {
    fn identity(&self) -> &Symbol;
    fn layout(&self) -> &Layout;
    fn canonical(&self) -> Option<&ValueType> {
        None
    }
}

/// A (symbol, schema) request that has not been interned yet.
#[derive(Clone, Debug)]
pub struct TypeDraft {
    symbol: Symbol,
    layout: Layout,
}

impl TypeDraft {
    pub fn new(symbol: Symbol, schema: FieldSchema) -> Self {
        Self {
            symbol,
            layout: Layout::Composite(schema),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn schema(&self) -> Option<&FieldSchema> {
        match &self.layout {
            Layout::Composite(schema) => Some(schema),
            Layout::Primitive(_) => None,
        }
    }

    pub(crate) fn into_parts(self) -> (Symbol, Layout) {
        (self.symbol, self.layout)
    }
}

impl Definition for TypeDraft {
    fn identity(&self) -> &Symbol {
        &self.symbol
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }
}

pub(crate) struct TypeInner {
    pub(crate) id: DefId,
    pub(crate) realm: RealmId,
    pub(crate) symbol: Symbol,
    pub(crate) layout: Layout,
    pub(crate) coercion: CoercionMode,
    pub(crate) hash: u64,
}

/// Handle to a canonical value type definition owned by a realm's registry.
///
/// Handles compare by identity. Within one realm identity coincides with
/// structural equivalence because every definition is interned.
#[derive(Clone)]
pub struct ValueType(Arc<TypeInner>);

impl ValueType {
    pub(crate) fn new(
        id: DefId,
        realm: RealmId,
        symbol: Symbol,
        layout: Layout,
        coercion: CoercionMode,
    ) -> Self {
        let mut hasher = fast_hasher().build_hasher();
        hasher.write_u64(symbol.id());
        hasher.write_u64(layout.structural_hash());
        let hash = hasher.finish();
        Self(Arc::new(TypeInner {
            id,
            realm,
            symbol,
            layout,
            coercion,
            hash,
        }))
    }

    pub fn id(&self) -> DefId {
        self.0.id
    }

    pub fn realm_id(&self) -> RealmId {
        self.0.realm
    }

    pub fn symbol(&self) -> &Symbol {
        &self.0.symbol
    }

    pub fn layout(&self) -> &Layout {
        &self.0.layout
    }

    pub fn schema(&self) -> Option<&FieldSchema> {
        match &self.0.layout {
            Layout::Composite(schema) => Some(schema),
            Layout::Primitive(_) => None,
        }
    }

    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match &self.0.layout {
            Layout::Primitive(kind) => Some(*kind),
            Layout::Composite(_) => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive().is_some()
    }

    pub fn coercion(&self) -> CoercionMode {
        self.0.coercion
    }

    pub fn name(&self) -> String {
        self.0.symbol.display_name()
    }

    pub fn ptr_eq(&self, other: &ValueType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// Calls the definition as a constructor. Without a source every field
    /// takes its default.
    pub fn construct(&self, source: Option<Source<'_>>) -> Result<ValueInstance> {
        construct::construct_value(self, source)
    }

    pub fn construct_default(&self) -> Result<ValueInstance> {
        self.construct(None)
    }

    pub fn construct_from<'a>(&self, source: impl Into<Source<'a>>) -> Result<ValueInstance> {
        self.construct(Some(source.into()))
    }

    /// Converts a single value to this primitive type.
    pub fn coerce(&self, value: impl Into<Value>) -> Result<Value> {
        match self.primitive() {
            Some(kind) => {
                construct::coerce_primitive(kind.name(), kind, value.into(), self.0.coercion)
            }
            None => {
                let source = value.into();
                let instance = match Source::from_value(&source) {
                    Some(src) => self.construct(Some(src))?,
                    None => {
                        return Err(ValueTypeError::type_mismatch(
                            self.name(),
                            self.name(),
                            source.type_name(),
                        ));
                    }
                };
                Ok(Value::Instance(instance))
            }
        }
    }
}

impl Definition for ValueType {
    fn identity(&self) -> &Symbol {
        &self.0.symbol
    }

    fn layout(&self) -> &Layout {
        &self.0.layout
    }

    fn canonical(&self) -> Option<&ValueType> {
        Some(self)
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.realm.0);
        state.write_u64(self.0.id.0);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.layout {
            Layout::Primitive(kind) => write!(f, "ValueType({kind})"),
            Layout::Composite(schema) => {
                write!(f, "ValueType({}#{} {:?})", self.name(), self.0.id.0, schema)
            }
        }
    }
}

static NEXT_STRUCT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) struct StructTypeInner {
    id: u64,
    realm: RealmId,
    name: Arc<str>,
    schema: FieldSchema,
    coercion: CoercionMode,
}

/// Nominal, mutable typed-object type. Never interned: every definition is
/// distinct from every other.
#[derive(Clone)]
pub struct StructType(Arc<StructTypeInner>);

impl StructType {
    pub(crate) fn new(
        realm: RealmId,
        name: Arc<str>,
        schema: FieldSchema,
        coercion: CoercionMode,
    ) -> Self {
        Self(Arc::new(StructTypeInner {
            id: NEXT_STRUCT_ID.fetch_add(1, Ordering::Relaxed),
            realm,
            name,
            schema,
            coercion,
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn realm_id(&self) -> RealmId {
        self.0.realm
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.0.schema
    }

    pub fn coercion(&self) -> CoercionMode {
        self.0.coercion
    }

    pub fn ptr_eq(&self, other: &StructType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn construct(&self, source: Option<Source<'_>>) -> Result<StructInstance> {
        construct::construct_struct(self, source)
    }

    pub fn construct_default(&self) -> Result<StructInstance> {
        self.construct(None)
    }

    pub fn construct_from<'a>(&self, source: impl Into<Source<'a>>) -> Result<StructInstance> {
        self.construct(Some(source.into()))
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for StructType {}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructType({}#{} {:?})", self.0.name, self.0.id, self.0.schema)
    }
}
