mod common;

use common::{color_type, point_type, rgba};
use proptest::prelude::*;
use xv_runtime::{PrimitiveKind, Realm, Record, Value, strict_equals, value_equals};

#[test]
fn equal_fields_make_equal_instances() {
    let realm = Realm::new();
    let color = color_type(&realm);
    let a = color.construct_from(&rgba(22, 44, 66, 0)).unwrap();
    let b = color.construct_from(&rgba(22, 44, 66, 0)).unwrap();
    assert!(!a.ptr_eq(&b));
    assert!(value_equals(&a, &b));
    assert_eq!(a, b);
    assert!(strict_equals(&Value::from(a.clone()), &Value::from(b)));

    let c = color.construct_from(&rgba(23, 44, 66, 0)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn equality_recurses_into_nested_instances() {
    let realm = Realm::new();
    let point = point_type(&realm, "Point");
    let line = realm
        .value_type(
            realm.symbol_for("Line"),
            [("from", &point), ("to", &point)],
        )
        .unwrap();
    let src = |x: i64| {
        Record::new()
            .with("from", Record::new().with("x", 0).with("y", 0))
            .with("to", Record::new().with("x", x).with("y", 1))
    };
    let a = line.construct_from(&src(5)).unwrap();
    let b = line.construct_from(&src(5)).unwrap();
    let c = line.construct_from(&src(6)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn instances_of_distinct_types_are_never_equal() {
    let realm = Realm::new();
    let a = point_type(&realm, "Point").construct_default().unwrap();
    let b = point_type(&realm, "Pair").construct_default().unwrap();
    assert_ne!(a, b);
}

#[test]
fn float_fields_follow_strict_number_equality() {
    let realm = Realm::new();
    let f64t = realm.primitive(PrimitiveKind::Float64);
    let ty = realm
        .value_type(realm.symbol_for("Sample"), [("v", &f64t)])
        .unwrap();

    let zero = ty.construct_from(&Record::new().with("v", 0.0)).unwrap();
    let neg_zero = ty.construct_from(&Record::new().with("v", -0.0)).unwrap();
    assert_eq!(zero, neg_zero);

    // NaN is not === to itself, so neither is an instance holding it.
    let nan = ty
        .construct_from(&Record::new().with("v", f64::NAN))
        .unwrap();
    assert_ne!(nan, nan.clone());
}

#[test]
fn strict_equals_on_plain_values() {
    assert!(strict_equals(&Value::Int(3), &Value::Float(3.0)));
    assert!(!strict_equals(&Value::Int(3), &Value::from("3")));
    assert!(strict_equals(&Value::Undefined, &Value::Undefined));
    assert!(!strict_equals(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));

    let r = Value::from(Record::new().with("x", 1));
    assert!(strict_equals(&r, &r.clone()));
    assert!(!strict_equals(&r, &Value::from(Record::new().with("x", 1))));
}

proptest! {
    #[test]
    fn equality_matches_field_equality(
        x in any::<(u8, u8, u8, u8)>(),
        y in any::<(u8, u8, u8, u8)>(),
    ) {
        let realm = Realm::new();
        let color = color_type(&realm);
        let build = |(r, g, b, a): (u8, u8, u8, u8)| {
            color
                .construct_from(&rgba(r as i64, g as i64, b as i64, a as i64))
                .unwrap()
        };
        let (a, b) = (build(x), build(y));
        prop_assert_eq!(a == b, x == y);
        prop_assert_eq!(a == build(x), true);
    }

    #[test]
    fn equality_is_symmetric(v in -1000i64..1000, w in -1000i64..1000) {
        let realm = Realm::new();
        let point = point_type(&realm, "Point");
        let a = point.construct_from(&Record::new().with("x", v)).unwrap();
        let b = point.construct_from(&Record::new().with("x", w)).unwrap();
        prop_assert_eq!(value_equals(&a, &b), value_equals(&b, &a));
    }
}
