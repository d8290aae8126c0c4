mod common;

use common::{color_type, init_tracing, point_type};
use std::sync::Arc;
use xv_runtime::{
    FieldSpec, PrimitiveKind, Realm, RealmConfig, SchemaKind, Symbol, SymbolTable, TypeDraft,
    ValueTypeError, equivalent,
};

#[test]
fn interning_same_symbol_and_schema_returns_same_definition() {
    init_tracing();
    let realm = Realm::new();
    let a = color_type(&realm);
    let b = color_type(&realm);
    assert!(a.ptr_eq(&b));
    assert_eq!(a.id(), b.id());
    assert_eq!(realm.lookup(a.symbol()).len(), 1);
}

#[test]
fn symbols_with_equal_descriptions_stay_distinct() {
    let realm = Realm::new();
    let u8t = realm.primitive(PrimitiveKind::Uint8);
    let a = realm
        .value_type(Symbol::new("Color"), [("r", &u8t)])
        .unwrap();
    let b = realm
        .value_type(Symbol::new("Color"), [("r", &u8t)])
        .unwrap();
    assert!(!a.ptr_eq(&b));
    assert!(!equivalent(&a, &b));
}

#[test]
fn field_order_is_part_of_identity() {
    let realm = Realm::new();
    let sym = realm.symbol_for("Pair");
    let i32t = realm.primitive(PrimitiveKind::Int32);
    let ab = realm
        .value_type(sym.clone(), [("a", &i32t), ("b", &i32t)])
        .unwrap();
    let ba = realm
        .value_type(sym.clone(), [("b", &i32t), ("a", &i32t)])
        .unwrap();
    assert!(!ab.ptr_eq(&ba));
    assert!(!equivalent(&ab, &ba));
    // One symbol, two non-equivalent definitions.
    assert_eq!(realm.lookup(&sym).len(), 2);
}

#[test]
fn field_types_are_part_of_identity() {
    let realm = Realm::new();
    let sym = realm.symbol_for("Cell");
    let u8t = realm.primitive(PrimitiveKind::Uint8);
    let u16t = realm.primitive(PrimitiveKind::Uint16);
    let narrow = realm.value_type(sym.clone(), [("v", &u8t)]).unwrap();
    let wide = realm.value_type(sym.clone(), [("v", &u16t)]).unwrap();
    assert!(!narrow.ptr_eq(&wide));
}

#[test]
fn drafts_compare_against_canonical_definitions() {
    let realm = Realm::new();
    let color = color_type(&realm);
    let u8t = realm.primitive(PrimitiveKind::Uint8);
    let schema = realm
        .make_schema(
            SchemaKind::Value,
            [("r", &u8t), ("g", &u8t), ("b", &u8t), ("a", &u8t)],
        )
        .unwrap();
    let draft = TypeDraft::new(realm.symbol_for("Color"), schema.clone());
    assert!(equivalent(&draft, &color));
    assert!(equivalent(&color, &draft));

    let other = TypeDraft::new(Symbol::new("Color"), schema);
    assert!(!equivalent(&other, &color));
    assert!(realm.intern(draft).unwrap().ptr_eq(&color));
}

#[test]
fn nested_types_must_be_equivalent_too() {
    let realm = Realm::new();
    let p1 = point_type(&realm, "PointA");
    let p2 = point_type(&realm, "PointB");
    let line = realm.symbol_for("Line");
    let l1 = realm.value_type(line.clone(), [("from", &p1)]).unwrap();
    let l2 = realm.value_type(line.clone(), [("from", &p2)]).unwrap();
    assert!(!equivalent(&l1, &l2));

    let src = xv_runtime::Record::new().with(
        "from",
        xv_runtime::Record::new().with("x", 1).with("y", 2),
    );
    let a = l1.construct_from(&src).unwrap();
    let b = l2.construct_from(&src).unwrap();
    assert_ne!(a, b);
    assert_eq!(a, l1.construct_from(&src).unwrap());
}

#[test]
fn primitives_are_pre_seeded_per_realm() {
    let realm = Realm::new();
    for kind in PrimitiveKind::ALL {
        let ty = realm.primitive(kind);
        assert_eq!(ty.primitive(), Some(kind));
        assert!(realm.registry().contains(&ty));
        let bucket = realm.lookup(ty.symbol());
        assert_eq!(bucket.len(), 1);
        assert!(bucket[0].ptr_eq(&ty));
    }
    assert!(
        realm
            .primitive_by_name("uint8")
            .unwrap()
            .ptr_eq(&realm.primitive(PrimitiveKind::Uint8))
    );

    let other = Realm::new();
    let a = realm.primitive(PrimitiveKind::Float64);
    let b = other.primitive(PrimitiveKind::Float64);
    assert!(!a.ptr_eq(&b));
    assert!(!equivalent(&a, &b));
}

#[test]
fn concurrent_interning_yields_one_canonical_definition() {
    init_tracing();
    let realm = Realm::new();
    let sym = realm.symbol_for("Pixel");
    let u8t = realm.primitive(PrimitiveKind::Uint8);

    let ids: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..50)
                        .map(|_| {
                            realm
                                .value_type(sym.clone(), [("l", &u8t), ("a", &u8t)])
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let first = &ids[0];
    assert!(ids.iter().all(|t| t.ptr_eq(first)));
    assert_eq!(realm.lookup(&sym).len(), 1);
}

#[test]
fn duplicate_field_names_are_rejected() {
    let realm = Realm::new();
    let i32t = realm.primitive(PrimitiveKind::Int32);
    let err = realm
        .value_type(realm.symbol_for("Dup"), [("x", &i32t), ("x", &i32t)])
        .unwrap_err();
    assert_eq!(
        err,
        ValueTypeError::DuplicateFieldName {
            field: "x".to_string()
        }
    );
    assert_eq!(err.code(), "E0102");
}

#[test]
fn value_types_cannot_embed_struct_types() {
    let realm = Realm::new();
    let i32t = realm.primitive(PrimitiveKind::Int32);
    let node = realm.struct_type("Node", [("v", &i32t)]).unwrap();
    let err = realm
        .value_type(realm.symbol_for("Holder"), [("node", &node)])
        .unwrap_err();
    assert!(matches!(err, ValueTypeError::InvalidFieldType { ref field, .. } if field == "node"));

    // Struct schemas accept both kinds.
    let color = color_type(&realm);
    let sprite = realm.struct_type(
        "Sprite",
        [FieldSpec::new("node", &node), FieldSpec::new("tint", &color)],
    );
    assert!(sprite.is_ok());
}

#[test]
fn types_from_another_realm_are_rejected() {
    let realm = Realm::new();
    let other = Realm::new();
    let foreign = other.primitive(PrimitiveKind::Int32);
    let err = realm
        .value_type(realm.symbol_for("Bad"), [("x", &foreign)])
        .unwrap_err();
    assert!(matches!(err, ValueTypeError::InvalidFieldType { .. }));

    let schema = other
        .make_schema(SchemaKind::Value, [("x", &foreign)])
        .unwrap();
    let err = realm
        .intern(TypeDraft::new(realm.symbol_for("Bad"), schema))
        .unwrap_err();
    assert!(matches!(err, ValueTypeError::InvalidFieldType { .. }));
}

#[test]
fn nesting_depth_is_limited_by_config() {
    let realm = Realm::with_config(RealmConfig {
        max_nesting_depth: 2,
        ..RealmConfig::default()
    });
    let u8t = realm.primitive(PrimitiveKind::Uint8);
    let a = realm
        .value_type(realm.symbol_for("A"), [("v", &u8t)])
        .unwrap();
    let b = realm
        .value_type(realm.symbol_for("B"), [("a", &a)])
        .unwrap();
    let err = realm
        .value_type(
            realm.symbol_for("C"),
            [("x", &u8t), ("b", &b), ("y", &u8t)],
        )
        .unwrap_err();
    assert!(matches!(err, ValueTypeError::InvalidFieldType { ref field, .. } if field == "b"));
}

#[test]
fn array_types_intern_by_element_and_length() {
    let realm = Realm::new();
    let sym = realm.symbol_for("Vec3");
    let f64t = realm.primitive(PrimitiveKind::Float64);
    let a = realm.array_type(sym.clone(), &f64t, 3).unwrap();
    let b = realm.array_type(sym.clone(), &f64t, 3).unwrap();
    let c = realm.array_type(sym.clone(), &f64t, 4).unwrap();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));

    let names: Vec<_> = a
        .schema()
        .unwrap()
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, ["0", "1", "2", "length"]);
    assert!(a.schema().unwrap().field("length").unwrap().is_static());
}

#[test]
fn realms_sharing_symbols_keep_separate_registries() {
    let symbols = Arc::new(SymbolTable::new());
    let left = Realm::with_symbols(RealmConfig::default(), symbols.clone());
    let right = Realm::with_symbols(RealmConfig::default(), symbols);
    assert_eq!(left.symbol_for("Color"), right.symbol_for("Color"));

    let a = color_type(&left);
    let b = color_type(&right);
    assert_eq!(a.symbol(), b.symbol());
    assert!(!a.ptr_eq(&b));
    // Field types come from different realms, so the schemas disagree.
    assert!(!equivalent(&a, &b));
    assert!(!right.registry().contains(&a));
}
