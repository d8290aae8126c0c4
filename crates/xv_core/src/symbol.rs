//! Identity symbols.
//!
//! A `Symbol` is an opaque token compared by identity. Two symbols with the
//! same description are still different symbols unless they come from the same
//! `SymbolTable` key.

use crate::map::{FastHashMap, fast_map_new};
use parking_lot::Mutex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

struct SymbolInner {
    id: u64,
    description: Option<Arc<str>>,
}

#[derive(Clone)]
pub struct Symbol(Arc<SymbolInner>);

impl Symbol {
    /// Creates a fresh symbol, distinct from every other symbol in the process.
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self::alloc(Some(description.into()))
    }

    /// Creates a fresh symbol without a description.
    pub fn anonymous() -> Self {
        Self::alloc(None)
    }

    fn alloc(description: Option<Arc<str>>) -> Self {
        let id = NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed);
        Self(Arc::new(SymbolInner { id, description }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Description for diagnostics; anonymous symbols render as `#<id>`.
    pub fn display_name(&self) -> String {
        match self.description() {
            Some(d) => d.to_string(),
            None => format!("#{}", self.0.id),
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.id);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(d) => write!(f, "Symbol({d}@{})", self.0.id),
            None => write!(f, "Symbol(@{})", self.0.id),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// Key-backed symbol registry: the same key always yields the same symbol.
///
/// Tables are explicit objects; realms that should agree on keyed symbols share
/// one through an `Arc`.
pub struct SymbolTable {
    by_key: Mutex<FastHashMap<Arc<str>, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            by_key: Mutex::new(fast_map_new()),
        }
    }

    pub fn for_key(&self, key: &str) -> Symbol {
        let mut map = self.by_key.lock();
        if let Some(sym) = map.get(key) {
            return sym.clone();
        }
        let key: Arc<str> = Arc::from(key);
        let sym = Symbol::new(key.clone());
        map.insert(key, sym.clone());
        sym
    }

    /// Reverse lookup. Returns `None` for symbols not created by this table.
    pub fn key_for(&self, sym: &Symbol) -> Option<Arc<str>> {
        let map = self.by_key.lock();
        let key = sym.0.description.as_ref()?;
        match map.get(key.as_ref()) {
            Some(found) if found == sym => Some(key.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
