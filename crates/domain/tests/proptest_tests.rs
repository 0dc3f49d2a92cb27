//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    DelayDescriptor, FailureProbability, IncomingData, LargeFileTier, Namespace,
};
use proptest::prelude::*;
use serde_json::{Value, json};

// ============================================================================
// FailureProbability Property Tests
// ============================================================================

mod probability_tests {
    use super::*;

    proptest! {
        #[test]
        fn in_range_values_are_accepted(p in 0.0f64..=1.0f64) {
            let probability = FailureProbability::new(p);
            prop_assert!(probability.is_ok());
            prop_assert!((probability.unwrap().value() - p).abs() < f64::EPSILON);
        }

        #[test]
        fn out_of_range_values_are_rejected(
            p in prop_oneof![(-100.0f64..-0.000_001f64), (1.000_001f64..100.0f64)]
        ) {
            prop_assert!(FailureProbability::new(p).is_err());
        }

        #[test]
        fn one_never_selects_a_fault(random in 0.0f64..1.0f64) {
            prop_assert!(FailureProbability::NEVER_FAIL.check(random).passed);
        }

        #[test]
        fn zero_always_selects_a_fault(random in 0.0f64..1.0f64) {
            prop_assert!(FailureProbability::ALWAYS_FAIL.check(random).fault_selected());
        }

        #[test]
        fn higher_probability_never_selects_more(
            low in 0.0f64..=1.0f64,
            high in 0.0f64..=1.0f64,
            random in 0.0f64..1.0f64
        ) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            let low = FailureProbability::new(low).unwrap();
            let high = FailureProbability::new(high).unwrap();
            // Passing at the lower probability implies passing at the higher one
            if low.check(random).passed {
                prop_assert!(high.check(random).passed);
            }
        }

        #[test]
        fn check_records_the_sample(p in 0.0f64..=1.0f64, random in 0.0f64..1.0f64) {
            let result = FailureProbability::new(p).unwrap().check(random);
            prop_assert!((result.random - random).abs() < f64::EPSILON);
        }
    }
}

// ============================================================================
// LargeFileTier Property Tests
// ============================================================================

mod file_tier_tests {
    use super::*;

    fn any_tier() -> impl Strategy<Value = LargeFileTier> {
        prop::sample::select(LargeFileTier::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn labels_parse_back_in_any_case(tier in any_tier(), upper in any::<bool>()) {
            let label = if upper { tier.label().to_uppercase() } else { tier.label().to_string() };
            prop_assert_eq!(label.parse::<LargeFileTier>().unwrap(), tier);
        }

        #[test]
        fn file_size_is_whole_mebibytes(tier in any_tier()) {
            prop_assert_eq!(tier.size_bytes() % 1_048_576, 0);
            prop_assert!(tier.file_name().ends_with(".bin"));
        }

        #[test]
        fn unknown_labels_are_rejected(label in "[a-z]{1,6}") {
            prop_assume!(LargeFileTier::ALL.iter().all(|t| t.label() != label));
            prop_assert!(label.parse::<LargeFileTier>().is_err());
        }
    }
}

// ============================================================================
// Namespace Property Tests
// ============================================================================

mod namespace_tests {
    use super::*;

    proptest! {
        #[test]
        fn names_without_whitespace_are_valid(name in "[a-z][a-z0-9_-]{0,20}") {
            let namespace = Namespace::new(name.clone()).unwrap();
            prop_assert_eq!(namespace.as_str(), name.as_str());
        }

        #[test]
        fn names_with_whitespace_are_invalid(head in "[a-z]{1,5}", tail in "[a-z]{1,5}") {
            let name = format!("{head} {tail}");
            prop_assert!(Namespace::new(name).is_err());
        }
    }
}

// ============================================================================
// Settings Property Tests
// ============================================================================

mod settings_tests {
    use super::*;

    proptest! {
        #[test]
        fn random_delay_validates_iff_ordered(from in 0u64..10_000, to in 0u64..10_000) {
            let descriptor = DelayDescriptor::Random { from, to };
            prop_assert_eq!(descriptor.validate().is_ok(), from <= to);
        }

        #[test]
        fn fixed_delay_decodes_from_wire(delay in 0u64..100_000) {
            let descriptor: DelayDescriptor =
                serde_json::from_value(json!({"type": "fixed", "delay": delay})).unwrap();
            prop_assert_eq!(descriptor, DelayDescriptor::Fixed { delay });
        }

        #[test]
        fn body_only_requests_keep_the_body(n in any::<i64>(), s in ".{0,20}") {
            let body = json!({"n": n, "s": s});
            let data = IncomingData::parse(json!({"body": body.clone()})).unwrap();
            prop_assert_eq!(data.body, body);
        }

        #[test]
        fn scalars_are_never_requests(n in any::<i64>()) {
            prop_assert!(IncomingData::parse(Value::from(n)).is_err());
        }
    }
}
