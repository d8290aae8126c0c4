//! Realm configuration.

use xv_core::CoercionMode;

/// Realm configuration options.
#[derive(Clone, Copy, Debug)]
pub struct RealmConfig {
    pub coercion: CoercionMode,
    /// Deepest allowed nesting of value types inside value types.
    pub max_nesting_depth: usize,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            coercion: CoercionMode::Strict,
            max_nesting_depth: 64,
        }
    }
}

impl RealmConfig {
    pub fn lenient() -> Self {
        Self {
            coercion: CoercionMode::Lenient,
            ..Self::default()
        }
    }
}
