//! Realms: the explicit owner of a type registry.
//!
//! A realm is created at session start, shared by reference (or `Arc`) with
//! every execution context that defines or constructs value types, and torn
//! down when the last handle is dropped. Nothing here is process-global
//! except symbol identity.

use crate::config::RealmConfig;
use crate::instance::ValueInstance;
use crate::methods::{BoundMethod, MethodProvider};
use crate::registry::{Bucket, TypeRegistry};
use crate::schema::{FieldSchema, FieldSpec, FieldType, SchemaKind, SchemaRules, make_schema};
use crate::types::{StructType, TypeDraft, ValueType};
use crate::value::Value;
use std::sync::Arc;
use tracing::debug;
use xv_core::{PrimitiveKind, RealmId, Result, Symbol, SymbolTable, ValueTypeError};

/// Result of a property lookup. A miss is not an error.
#[derive(Clone, Debug)]
pub enum Property {
    Field(Value),
    Method(BoundMethod),
    Missing,
}

impl Property {
    pub fn is_missing(&self) -> bool {
        matches!(self, Property::Missing)
    }

    /// The field value, or `Undefined` for methods and misses.
    pub fn into_value(self) -> Value {
        match self {
            Property::Field(v) => v,
            _ => Value::Undefined,
        }
    }
}

pub struct Realm {
    id: RealmId,
    config: RealmConfig,
    symbols: Arc<SymbolTable>,
    registry: TypeRegistry,
}

impl Realm {
    pub fn new() -> Self {
        Self::with_config(RealmConfig::default())
    }

    pub fn with_config(config: RealmConfig) -> Self {
        Self::with_symbols(config, Arc::new(SymbolTable::new()))
    }

    /// Realms sharing a symbol table agree on keyed symbols, but each keeps
    /// its own registry.
    pub fn with_symbols(config: RealmConfig, symbols: Arc<SymbolTable>) -> Self {
        let id = RealmId::next();
        debug!(realm = id.0, ?config, "realm created");
        Self {
            id,
            config,
            symbols,
            registry: TypeRegistry::new(id, config.coercion),
        }
    }

    pub fn id(&self) -> RealmId {
        self.id
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Symbol from the shared key-backed table.
    pub fn symbol_for(&self, key: &str) -> Symbol {
        self.symbols.for_key(key)
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> ValueType {
        self.registry.primitive(kind)
    }

    /// Primitive definition by type name (`"uint8"`, `"string"`, ...).
    pub fn primitive_by_name(&self, name: &str) -> Option<ValueType> {
        PrimitiveKind::builtin_by_name(name).map(|k| self.primitive(k))
    }

    fn rules(&self) -> SchemaRules {
        SchemaRules {
            realm: self.id,
            coercion: self.config.coercion,
            max_depth: self.config.max_nesting_depth,
        }
    }

    pub fn make_schema<I>(&self, kind: SchemaKind, fields: I) -> Result<FieldSchema>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        make_schema(kind, fields.into_iter().map(Into::into).collect(), self.rules())
    }

    /// Fixed-length tuple schema: fields `0..length` of `element`, then a
    /// static `length` field equal to `length`.
    pub fn make_array_schema(
        &self,
        kind: SchemaKind,
        element: impl Into<FieldType>,
        length: u32,
    ) -> Result<FieldSchema> {
        let element = element.into();
        let mut specs: Vec<FieldSpec> = (0..length)
            .map(|i| FieldSpec::new(i.to_string(), element.clone()))
            .collect();
        specs.push(
            FieldSpec::new("length", self.primitive(PrimitiveKind::Uint32))
                .with_default(length)
                .fixed(),
        );
        make_schema(kind, specs, self.rules())
    }

    pub fn intern(&self, draft: TypeDraft) -> Result<ValueType> {
        self.registry.intern(draft)
    }

    /// Builds the schema and interns `(symbol, schema)`.
    pub fn value_type<I>(&self, symbol: Symbol, fields: I) -> Result<ValueType>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        let schema = self.make_schema(SchemaKind::Value, fields)?;
        self.intern(TypeDraft::new(symbol, schema))
    }

    /// Value type of `length` elements of `element`.
    pub fn array_type(
        &self,
        symbol: Symbol,
        element: impl Into<FieldType>,
        length: u32,
    ) -> Result<ValueType> {
        let schema = self.make_array_schema(SchemaKind::Value, element, length)?;
        self.intern(TypeDraft::new(symbol, schema))
    }

    /// Every canonical definition registered under `symbol`.
    pub fn lookup(&self, symbol: &Symbol) -> Bucket {
        self.registry.lookup(symbol)
    }

    /// Nominal struct type. Every call creates a distinct type.
    pub fn struct_type<I>(&self, name: &str, fields: I) -> Result<StructType>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        let schema = self.make_schema(SchemaKind::Struct, fields)?;
        Ok(StructType::new(self.id, Arc::from(name), schema, self.config.coercion))
    }

    pub fn attach_methods(&self, ty: &ValueType, provider: &dyn MethodProvider) -> Result<()> {
        self.registry.attach_methods(ty, provider)
    }

    /// The identity symbol of an instance's definition.
    pub fn typeof_value(&self, instance: &ValueInstance) -> Symbol {
        instance.type_symbol().clone()
    }

    /// Reads `name` from `target`. Value instances fall back to their
    /// definition's method table.
    pub fn get_property(&self, target: &Value, name: &str) -> Property {
        match target {
            Value::Instance(inst) => {
                if let Some(v) = inst.get(name) {
                    return Property::Field(v.clone());
                }
                match self
                    .registry
                    .methods_for(inst.ty())
                    .and_then(|t| t.get(name))
                {
                    Some(fun) => Property::Method(BoundMethod {
                        receiver: inst.clone(),
                        name: Arc::from(name),
                        fun,
                    }),
                    None => Property::Missing,
                }
            }
            Value::Struct(s) => s
                .get(name)
                .map(Property::Field)
                .unwrap_or(Property::Missing),
            Value::Record(r) => r
                .get(name)
                .cloned()
                .map(Property::Field)
                .unwrap_or(Property::Missing),
            _ => Property::Missing,
        }
    }

    pub fn set_property(&self, target: &Value, name: &str, value: impl Into<Value>) -> Result<()> {
        match target {
            Value::Instance(inst) => inst.set(name, value),
            Value::Struct(s) => s.set(name, value),
            other => Err(ValueTypeError::UnknownField {
                ty: other.type_name().to_string(),
                field: name.to_string(),
            }),
        }
    }

    pub fn call_method(
        &self,
        receiver: &ValueInstance,
        name: &str,
        args: &[Value],
    ) -> Result<Value> {
        let fun = self
            .registry
            .methods_for(receiver.ty())
            .and_then(|t| t.get(name))
            .ok_or_else(|| ValueTypeError::NotCallable {
                ty: receiver.ty().name(),
                name: name.to_string(),
            })?;
        fun(self, receiver, args)
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Realm {
    fn drop(&mut self) {
        debug!(realm = self.id.0, "realm torn down");
    }
}
