//! Per-definition method tables.
//!
//! Value instances have no prototype chain. Methods live in a table the
//! registry associates with a canonical definition; lookup on an instance is a
//! table lookup keyed by the instance's definition.

use crate::Realm;
use crate::instance::ValueInstance;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use xv_core::{FastHashMap, Result, ValueTypeError, fast_map_new};

pub type MethodFn = fn(&Realm, &ValueInstance, &[Value]) -> Result<Value>;

#[derive(Clone)]
pub struct MethodTable {
    entries: FastHashMap<Arc<str>, MethodFn>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self {
            entries: fast_map_new(),
        }
    }

    pub fn register(&mut self, name: &str, fun: MethodFn) -> Option<MethodFn> {
        self.entries.insert(Arc::from(name), fun)
    }

    pub fn get(&self, name: &str) -> Option<MethodFn> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().map(|n| n.to_string()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds every entry of `other`; entries already present are replaced.
    pub fn merge(&mut self, other: &MethodTable) {
        for (name, fun) in other.entries.iter() {
            self.entries.insert(name.clone(), *fun);
        }
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Installs methods for one value type. The imperative counterpart of a
/// declarative `value class` body.
pub trait MethodProvider {
    fn install(&self, table: &mut MethodTable);
}

impl MethodProvider for MethodTable {
    fn install(&self, table: &mut MethodTable) {
        table.merge(self);
    }
}

/// A method looked up through an instance, bound to that instance.
#[derive(Clone)]
pub struct BoundMethod {
    pub receiver: ValueInstance,
    pub name: Arc<str>,
    pub fun: MethodFn,
}

impl BoundMethod {
    pub fn call(&self, realm: &Realm, args: &[Value]) -> Result<Value> {
        (self.fun)(realm, &self.receiver, args)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundMethod({}.{})", self.receiver.ty().name(), self.name)
    }
}

/// Checks that `args_len` lies within `min..=max`.
pub fn validate_arity(name: &str, args_len: usize, min: usize, max: usize) -> Result<()> {
    if args_len < min || args_len > max {
        return Err(ValueTypeError::ArgumentCountMismatch {
            name: name.to_string(),
            expected_min: min,
            expected_max: max,
            actual: args_len,
        });
    }
    Ok(())
}
