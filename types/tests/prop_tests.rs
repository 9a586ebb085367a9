use proptest::prelude::*;

use pocket_types::{Amount, Timestamp, TxHash};

proptest! {
    /// Amount: the fixed 7-place rendering parses back to the same value.
    #[test]
    fn amount_fixed_string_roundtrip(stroops in i64::MIN / 2..i64::MAX / 2) {
        let amount = Amount::from_stroops(stroops);
        let parsed: Amount = amount.to_fixed_string().parse().unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Amount: the trimmed display form parses back to the same value.
    #[test]
    fn amount_display_roundtrip(stroops in 0i64..1_000_000_000_000_000) {
        let amount = Amount::from_stroops(stroops);
        let parsed: Amount = amount.to_string().parse().unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Amount: display never ends in a fractional zero or a bare dot.
    #[test]
    fn amount_display_is_trimmed(stroops in 1i64..1_000_000_000_000) {
        let shown = Amount::from_stroops(stroops).to_string();
        if shown.contains('.') {
            prop_assert!(!shown.ends_with('0'));
        }
        prop_assert!(!shown.ends_with('.'));
    }

    /// Amount: whole-unit parsing scales by 10^7.
    #[test]
    fn amount_whole_units(units in 0i64..900_000_000_000) {
        let parsed: Amount = units.to_string().parse().unwrap();
        prop_assert_eq!(parsed, Amount::from_units(units));
    }

    /// Amount: checked_sub agrees with integer arithmetic.
    #[test]
    fn amount_checked_sub(a in 0i64..1_000_000_000, b in 0i64..1_000_000_000) {
        let result = Amount::from_stroops(a).checked_sub(Amount::from_stroops(b));
        prop_assert_eq!(result, Some(Amount::from_stroops(a - b)));
    }

    /// Amount: is_positive matches stroops > 0.
    #[test]
    fn amount_is_positive(stroops in -1_000i64..1_000) {
        prop_assert_eq!(Amount::from_stroops(stroops).is_positive(), stroops > 0);
    }

    /// TxHash: hex form is 64 lowercase characters and stable.
    #[test]
    fn tx_hash_hex(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let hex = hash.to_hex();
        prop_assert_eq!(hex.len(), 64);
        prop_assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
        prop_assert_eq!(now.elapsed_since(t), 0);
    }
}
