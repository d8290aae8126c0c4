//! Per-realm type registry.
//!
//! Maps each identity symbol to the canonical definitions registered under
//! it. A symbol may own several definitions as long as no two are
//! equivalent. The registry is created with the primitive value types already
//! present and lives exactly as long as its realm.

use crate::equivalence::equivalent;
use crate::methods::{MethodProvider, MethodTable};
use crate::schema::FieldType;
use crate::types::{Layout, TypeDraft, ValueType};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};
use xv_core::{
    CoercionMode, DefId, FastHashMap, PrimitiveKind, RealmId, Result, Symbol, ValueTypeError,
    fast_map_new,
};

pub type Bucket = SmallVec<[ValueType; 2]>;

pub struct TypeRegistry {
    realm: RealmId,
    coercion: CoercionMode,
    buckets: RwLock<FastHashMap<Symbol, Bucket>>,
    primitives: Vec<ValueType>,
    methods: RwLock<FastHashMap<DefId, Arc<MethodTable>>>,
    next_id: AtomicU64,
}

impl TypeRegistry {
    pub fn new(realm: RealmId, coercion: CoercionMode) -> Self {
        let next_id = AtomicU64::new(1);
        let mut buckets: FastHashMap<Symbol, Bucket> = fast_map_new();
        let mut primitives = Vec::with_capacity(PrimitiveKind::ALL.len());
        for kind in PrimitiveKind::ALL {
            let id = DefId(next_id.fetch_add(1, Ordering::Relaxed));
            let symbol = Symbol::new(kind.name());
            let ty = ValueType::new(id, realm, symbol.clone(), Layout::Primitive(kind), coercion);
            buckets.entry(symbol).or_default().push(ty.clone());
            primitives.push(ty);
        }
        Self {
            realm,
            coercion,
            buckets: RwLock::new(buckets),
            primitives,
            methods: RwLock::new(fast_map_new()),
            next_id,
        }
    }

    pub fn realm_id(&self) -> RealmId {
        self.realm
    }

    /// The pre-seeded definition for a primitive kind.
    pub fn primitive(&self, kind: PrimitiveKind) -> ValueType {
        // `ALL` lists kinds in declaration order.
        self.primitives[kind as usize].clone()
    }

    /// Returns the canonical definition equivalent to `draft`, inserting the
    /// draft as the new canonical definition when there is none.
    ///
    /// The lookup and the insert happen under one upgradable lock, so
    /// concurrent callers interning equivalent drafts all receive the same
    /// definition.
    pub fn intern(&self, draft: TypeDraft) -> Result<ValueType> {
        self.check_draft(&draft)?;

        {
            let buckets = self.buckets.read();
            if let Some(hit) = find_equivalent(buckets.get(draft.symbol()), &draft) {
                trace!(ty = %hit.name(), id = hit.id().0, "intern hit");
                return Ok(hit);
            }
        }

        let buckets = self.buckets.upgradable_read();
        if let Some(hit) = find_equivalent(buckets.get(draft.symbol()), &draft) {
            trace!(ty = %hit.name(), id = hit.id().0, "intern hit after contention");
            return Ok(hit);
        }
        let mut buckets = RwLockUpgradableReadGuard::upgrade(buckets);
        let id = DefId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (symbol, layout) = draft.into_parts();
        let ty = ValueType::new(id, self.realm, symbol.clone(), layout, self.coercion);
        let bucket = buckets.entry(symbol).or_default();
        bucket.push(ty.clone());
        debug!(
            ty = %ty.name(),
            id = id.0,
            bucket_len = bucket.len(),
            "registered canonical value type"
        );
        Ok(ty)
    }

    fn check_draft(&self, draft: &TypeDraft) -> Result<()> {
        let Some(schema) = draft.schema() else {
            return Ok(());
        };
        for field in schema.fields() {
            match field.ty() {
                FieldType::Value(t) if t.realm_id() == self.realm => {}
                FieldType::Value(t) => {
                    return Err(ValueTypeError::invalid_field_type(
                        field.name(),
                        format!("{} is not registered in this realm", t.name()),
                    ));
                }
                FieldType::Struct(s) => {
                    return Err(ValueTypeError::invalid_field_type(
                        field.name(),
                        format!("struct type {} cannot be embedded in a value type", s.name()),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Every canonical definition registered under `symbol`.
    pub fn lookup(&self, symbol: &Symbol) -> Bucket {
        self.buckets.read().get(symbol).cloned().unwrap_or_default()
    }

    pub fn contains(&self, ty: &ValueType) -> bool {
        ty.realm_id() == self.realm
            && self
                .buckets
                .read()
                .get(ty.symbol())
                .is_some_and(|b| b.iter().any(|d| d.ptr_eq(ty)))
    }

    /// Installs `provider`'s methods on `ty`. Names already attached are
    /// replaced.
    pub fn attach_methods(&self, ty: &ValueType, provider: &dyn MethodProvider) -> Result<()> {
        if !self.contains(ty) {
            return Err(ValueTypeError::ForeignDefinition { ty: ty.name() });
        }
        let mut added = MethodTable::new();
        provider.install(&mut added);

        let mut methods = self.methods.write();
        let mut table = methods
            .get(&ty.id())
            .map(|t| t.as_ref().clone())
            .unwrap_or_default();
        for name in added.names() {
            if table.contains(&name) {
                warn!(ty = %ty.name(), method = %name, "replacing attached method");
            }
        }
        table.merge(&added);
        debug!(ty = %ty.name(), methods = table.len(), "attached methods");
        methods.insert(ty.id(), Arc::new(table));
        Ok(())
    }

    pub fn methods_for(&self, ty: &ValueType) -> Option<Arc<MethodTable>> {
        if ty.realm_id() != self.realm {
            return None;
        }
        self.methods.read().get(&ty.id()).cloned()
    }
}

fn find_equivalent(bucket: Option<&Bucket>, draft: &TypeDraft) -> Option<ValueType> {
    bucket?.iter().find(|d| equivalent(*d, draft)).cloned()
}
