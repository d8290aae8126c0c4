//! Value-type runtime.
//!
//! User-definable immutable value types with structural equivalence:
//! - `Realm` owns a `TypeRegistry` that interns (symbol, schema) pairs
//! - `ValueType` is a canonical definition and a constructor for instances
//! - `ValueInstance` is deeply immutable and compares by structure
//! - `StructType` / `StructInstance` are the mutable nominal counterpart

#![allow(clippy::new_without_default)]
#![allow(clippy::len_without_is_empty)]

pub mod config;
pub mod construct;
pub mod equality;
pub mod equivalence;
pub mod instance;
pub mod methods;
pub mod realm;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

pub use config::RealmConfig;
pub use construct::primitive_default;
pub use equality::value_equals;
pub use equivalence::{equivalent, field_types_equivalent, schemas_equivalent};
pub use instance::{FieldSource, Source, StructInstance, ValueInstance};
pub use methods::{BoundMethod, MethodFn, MethodProvider, MethodTable, validate_arity};
pub use realm::{Property, Realm};
pub use registry::{Bucket, TypeRegistry};
pub use schema::{Field, FieldSchema, FieldSpec, FieldType, SchemaKind};
pub use types::{Definition, Layout, StructType, TypeDraft, ValueType};
pub use value::{Record, Value, strict_equals};

pub use xv_core::{CoercionMode, PrimitiveKind, Result, Symbol, SymbolTable, ValueTypeError};
