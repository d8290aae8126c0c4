use proptest::prelude::*;
use xv_core::{CoercionMode, PrimitiveKind};

const INTEGERS: [PrimitiveKind; 6] = [
    PrimitiveKind::Int8,
    PrimitiveKind::Uint8,
    PrimitiveKind::Int16,
    PrimitiveKind::Uint16,
    PrimitiveKind::Int32,
    PrimitiveKind::Uint32,
];

#[test]
fn kind_classification() {
    assert!(PrimitiveKind::Uint8Clamped.is_integer());
    assert!(PrimitiveKind::Float32.is_float());
    assert!(!PrimitiveKind::String.is_numeric());
    assert_eq!(PrimitiveKind::Symbol.int_bounds(), None);
    assert_eq!(PrimitiveKind::builtin_by_name("uint8clamped"), None);
    assert_eq!(
        PrimitiveKind::builtin_by_name("uint8_clamped"),
        Some(PrimitiveKind::Uint8Clamped)
    );
}

#[test]
fn strict_floats_must_be_whole_and_in_range() {
    let k = PrimitiveKind::Int16;
    assert_eq!(k.int_from_f64(-32768.0, CoercionMode::Strict), Some(-32768));
    assert_eq!(k.int_from_f64(32768.0, CoercionMode::Strict), None);
    assert_eq!(k.int_from_f64(0.5, CoercionMode::Strict), None);
    assert_eq!(k.int_from_f64(f64::INFINITY, CoercionMode::Strict), None);
    assert_eq!(k.int_from_f64(f64::INFINITY, CoercionMode::Lenient), Some(0));
}

proptest! {
    #[test]
    fn strict_accepts_exactly_the_representable_range(i in any::<i64>()) {
        for kind in INTEGERS {
            let (lo, hi) = kind.int_bounds().unwrap();
            let got = kind.int_from_i64(i, CoercionMode::Strict);
            if (lo..=hi).contains(&i) {
                prop_assert_eq!(got, Some(i));
            } else {
                prop_assert_eq!(got, None);
            }
        }
    }

    #[test]
    fn lenient_integers_wrap_like_casts(i in any::<i64>()) {
        let wrap = |k: PrimitiveKind| k.int_from_i64(i, CoercionMode::Lenient);
        prop_assert_eq!(wrap(PrimitiveKind::Int8), Some(i as i8 as i64));
        prop_assert_eq!(wrap(PrimitiveKind::Uint8), Some(i as u8 as i64));
        prop_assert_eq!(wrap(PrimitiveKind::Int16), Some(i as i16 as i64));
        prop_assert_eq!(wrap(PrimitiveKind::Uint16), Some(i as u16 as i64));
        prop_assert_eq!(wrap(PrimitiveKind::Int32), Some(i as i32 as i64));
        prop_assert_eq!(wrap(PrimitiveKind::Uint32), Some(i as u32 as i64));
    }

    #[test]
    fn lenient_floats_truncate_then_wrap(f in -1.0e15f64..1.0e15) {
        let t = f.trunc() as i64;
        prop_assert_eq!(
            PrimitiveKind::Int32.int_from_f64(f, CoercionMode::Lenient),
            Some(t as i32 as i64)
        );
        prop_assert_eq!(
            PrimitiveKind::Uint8.int_from_f64(f, CoercionMode::Lenient),
            Some(t as u8 as i64)
        );
    }

    #[test]
    fn clamped_stays_in_byte_range(f in any::<f64>()) {
        for mode in [CoercionMode::Strict, CoercionMode::Lenient] {
            let got = PrimitiveKind::Uint8Clamped.int_from_f64(f, mode).unwrap();
            prop_assert!((0..=255).contains(&got));
        }
    }
}
