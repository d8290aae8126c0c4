//! Handles for canonical definitions and realms.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REALM_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a canonical definition inside one realm's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u64);

/// Identifies a realm. Unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RealmId(pub u64);

impl RealmId {
    pub fn next() -> Self {
        Self(NEXT_REALM_ID.fetch_add(1, Ordering::Relaxed))
    }
}
