#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use xv_runtime::{PrimitiveKind, Realm, Record, ValueType};

/// Routes runtime logs through the test harness; `RUST_LOG=xv_runtime=trace`
/// shows interning decisions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn color_type(realm: &Realm) -> ValueType {
    let u8t = realm.primitive(PrimitiveKind::Uint8);
    realm
        .value_type(
            realm.symbol_for("Color"),
            [("r", &u8t), ("g", &u8t), ("b", &u8t), ("a", &u8t)],
        )
        .unwrap()
}

pub fn rgba(r: i64, g: i64, b: i64, a: i64) -> Record {
    Record::new()
        .with("r", r)
        .with("g", g)
        .with("b", b)
        .with("a", a)
}

pub fn point_type(realm: &Realm, key: &str) -> ValueType {
    let i32t = realm.primitive(PrimitiveKind::Int32);
    realm
        .value_type(realm.symbol_for(key), [("x", &i32t), ("y", &i32t)])
        .unwrap()
}
