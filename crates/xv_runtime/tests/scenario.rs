//! Define, construct and compare a `Color` value type end to end.

mod common;

use common::{init_tracing, rgba};
use xv_runtime::{PrimitiveKind, Realm, Value};

#[test]
fn color_round_trip() {
    init_tracing();
    let realm = Realm::new();
    let color_sym = realm.symbol_for("Color");
    let u8t = realm.primitive(PrimitiveKind::Uint8);
    let fields = [("r", &u8t), ("g", &u8t), ("b", &u8t), ("a", &u8t)];

    let color = realm.value_type(color_sym.clone(), fields).unwrap();
    let again = realm.value_type(color_sym.clone(), fields).unwrap();
    assert!(color.ptr_eq(&again));

    let c = color.construct_from(&rgba(22, 44, 66, 0)).unwrap();
    assert_eq!(c.get("b"), Some(&Value::Int(66)));
    assert!(c.set("b", 1).is_err());
    assert_eq!(c.get("b"), Some(&Value::Int(66)));

    let same = again.construct_from(&rgba(22, 44, 66, 0)).unwrap();
    assert_eq!(c, same);
    let other = color.construct_from(&rgba(21, 44, 66, 0)).unwrap();
    assert_ne!(c, other);

    assert_eq!(realm.typeof_value(&c), color_sym);
    assert_eq!(realm.lookup(&color_sym).len(), 1);
}
