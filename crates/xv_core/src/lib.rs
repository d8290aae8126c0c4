//! Core types for the value-type runtime.
//!
//! This crate contains the building blocks that do not depend on the registry:
//! - `Symbol` / `SymbolTable` - Identity tokens for type definitions
//! - `PrimitiveKind` - Built-in primitive value types
//! - `ValueTypeError` - Error taxonomy shared by every operation
//! - `DefId` / `RealmId` - Handles for canonical definitions and realms

pub mod error;
pub mod id;
pub mod map;
pub mod primitive;
pub mod symbol;

pub use error::{Result, ValueTypeError, codes};
pub use id::{DefId, RealmId};
pub use map::{FastHashMap, fast_hasher, fast_map_new};
pub use primitive::{CoercionMode, PrimitiveKind};
pub use symbol::{Symbol, SymbolTable};
