//! Property-based tests for jout core primitives

use jout_core::decimal::Decimal;
use jout_core::{Encoding, RowValue};
use proptest::prelude::*;
use std::cmp::Ordering;

proptest! {
    #[test]
    fn decimal_render_roundtrip_property(
        sign in any::<bool>(),
        digits in 1u128..=u128::MAX,
        exponent in -20i32..20
    ) {
        let literal = format!(
            "{}{}e{}",
            if sign { "-" } else { "" },
            digits,
            exponent
        );
        let parsed = Decimal::from_str_exact(&literal).expect("valid literal");
        let rendered = parsed.to_json_string();
        let reparsed = Decimal::from_str_exact(&rendered).expect("rendered literal parses");
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn decimal_compare_is_antisymmetric(
        a in -1_000_000_000i64..1_000_000_000,
        b in -1_000_000_000i64..1_000_000_000,
        shift in 0u32..6
    ) {
        let da = Decimal::from_str_exact(&format!("{}e-{}", a, shift)).unwrap();
        let db = Decimal::from_str_exact(&format!("{}e-{}", b, shift)).unwrap();
        prop_assert_eq!(da.compare(&db), db.compare(&da).reverse());
    }

    #[test]
    fn decimal_compare_matches_integer_order(
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000
    ) {
        let da = Decimal::from_str_exact(&a.to_string()).unwrap();
        let db = Decimal::from_str_exact(&b.to_string()).unwrap();
        prop_assert_eq!(da.compare(&db), a.cmp(&b));
    }

    #[test]
    fn row_value_int_compare_is_total_order(values in prop::collection::vec(any::<i64>(), 2..50)) {
        let mut wrapped: Vec<RowValue> = values.iter().copied().map(RowValue::Int).collect();
        wrapped.sort_by(|a, b| a.compare(b));
        let mut sorted = values.clone();
        sorted.sort();
        let unwrapped: Vec<i64> = wrapped
            .iter()
            .map(|v| match v {
                RowValue::Int(i) => *i,
                _ => unreachable!(),
            })
            .collect();
        prop_assert_eq!(unwrapped, sorted);
    }

    #[test]
    fn utf16_length_is_twice_unit_count(text in "\\PC*") {
        let units = text.encode_utf16().count();
        prop_assert_eq!(Encoding::Utf16Le.encoded_len(&text), units * 2);
        prop_assert_eq!(Encoding::Utf16Be.encoded_len(&text), units * 2);
        prop_assert_eq!(Encoding::Utf16Le.encode(&text).len(), units * 2);
    }
}

#[test]
fn null_sorts_before_everything() {
    for value in [
        RowValue::Bool(false),
        RowValue::Int(i64::MIN),
        RowValue::Float(f64::NEG_INFINITY),
        RowValue::Text(String::new()),
    ] {
        assert_eq!(RowValue::Null.compare(&value), Ordering::Less);
    }
}
