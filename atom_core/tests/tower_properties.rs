//! Property tests for TowerNumber normalization, ordering and persistence

use atom_core::TowerNumber;
use proptest::prelude::*;
use std::cmp::Ordering;

fn arb_scientific() -> impl Strategy<Value = TowerNumber> {
    (-9.99f64..9.99, -1.0e6f64..1.0e6).prop_map(|(m, e)| TowerNumber::from_scientific(m, e.floor()))
}

fn arb_any() -> impl Strategy<Value = TowerNumber> {
    prop_oneof![
        Just(TowerNumber::ZERO),
        arb_scientific(),
        (any::<bool>(), 1u32..6, 1.0f64..300.0).prop_map(|(neg, layer, value)| TowerNumber::tower(neg, layer, value)),
    ]
}

proptest! {
    #[test]
    fn prop_mantissa_normalized(n in arb_scientific()) {
        prop_assume!(!n.is_zero());
        let m = n.mantissa().abs();
        prop_assert!((1.0..10.0).contains(&m), "mantissa {} out of range for {:?}", m, n);
    }

    #[test]
    fn prop_json_round_trip(n in arb_any()) {
        let json = serde_json::to_string(&n).unwrap();
        let back: TowerNumber = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, n, "json was {}", json);
    }

    #[test]
    fn prop_compare_reflexive(n in arb_any()) {
        prop_assert_eq!(n.compare(&n), Ordering::Equal);
    }

    #[test]
    fn prop_compare_antisymmetric(a in arb_any(), b in arb_any()) {
        prop_assert_eq!(a.compare(&b), b.compare(&a).reverse());
    }

    #[test]
    fn prop_negation_flips_order(a in arb_scientific(), b in arb_scientific()) {
        prop_assert_eq!((-a).compare(&(-b)), b.compare(&a));
    }

    #[test]
    fn prop_integers_survive_downcast(n in 0u64..1_000_000_000) {
        let value = n as f64;
        prop_assert_eq!(TowerNumber::from_f64(value).to_f64(), value);
    }

    #[test]
    fn prop_floats_survive_downcast(value in -1.0e12f64..1.0e12) {
        let back = TowerNumber::from_f64(value).to_f64();
        let tolerance = value.abs().max(1.0) * 1e-12;
        prop_assert!((back - value).abs() <= tolerance, "{} came back as {}", value, back);
    }

    #[test]
    fn prop_subtracting_self_is_zero(n in arb_scientific()) {
        prop_assert!((n - n).is_zero());
    }
}
