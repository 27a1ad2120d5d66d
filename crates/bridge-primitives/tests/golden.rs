use bridge_primitives::{
    period_tip, AssetKind, Canonicalizer, Color, B256, GENESIS_TIP, U256,
};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn color_serializes_as_bare_integer() {
    assert_eq!(serde_json::to_string(&Color(49_153)).unwrap(), "49153");
    let parsed: Color = serde_json::from_str("32769").unwrap();
    assert_eq!(parsed, Color(32_769));
}

#[test]
fn asset_kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&AssetKind::NonFungibleWithStorage).unwrap(),
        r#""non_fungible_with_storage""#
    );
}

#[test]
fn u256_and_b256_serialize_as_hex() {
    let value = serde_json::to_value(U256::from(300u64)).unwrap();
    assert_eq!(value, json!("0x12c"));
    let hash = serde_json::to_value(B256::repeat_byte(0xab)).unwrap();
    assert_eq!(hash, json!(format!("0x{}", "ab".repeat(32))));
}

#[test]
fn genesis_tip_is_zero() {
    assert_eq!(GENESIS_TIP, B256::ZERO);
}

#[test]
fn first_period_tip_is_stable() {
    let tip = period_tip(0, &GENESIS_TIP, &B256::repeat_byte(0x01), 0);
    let again = period_tip(0, &GENESIS_TIP, &B256::repeat_byte(0x01), 0);
    assert_eq!(tip, again);
    assert_ne!(tip, GENESIS_TIP);
    assert_eq!(hex::encode(tip.as_slice()).len(), 64);
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let canonicalizer = Canonicalizer::new();
    let value = json!({"b": 1, "a": {"nested": 2}});
    let bytes = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(bytes, br#"{"a":{"nested":2},"b":1}"#.to_vec());
}

proptest! {
    #[test]
    fn every_allocated_color_classifies_back_to_its_kind(code in 0u8..3, index in 0u32..20_000) {
        let kind = AssetKind::try_from(code).unwrap();
        match kind.nth_color(index) {
            Some(color) => prop_assert_eq!(color.kind(), Some(kind)),
            None => prop_assert!(index >= kind.capacity()),
        }
    }
}
