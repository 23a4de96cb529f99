//! Integration tests for API level and range constraints
//!
//! These tests exercise the public constraint API the way lint checks use
//! it: combining `SDK_INT` checks, describing the result, and comparing
//! declared ranges against values and inferred ranges.

use lintconstraints::constraint::{infer_float_range, infer_int_range, INFINITY};
use lintconstraints::{
    parse_api_expression, ApiConstraint, Comparison, FloatRangeConstraint, IntRangeConstraint,
    RangeConstraint, SizeConstraint,
};

/// A spread of constraints covering every shape: empty, one-sided,
/// interior and unbounded
fn samples() -> Vec<ApiConstraint> {
    vec![
        ApiConstraint::ALL,
        ApiConstraint::NOTHING,
        ApiConstraint::at_least(21),
        ApiConstraint::above(23),
        ApiConstraint::below(26),
        ApiConstraint::at_most(28),
        ApiConstraint::same(24),
        ApiConstraint::range(5, 10),
        ApiConstraint::range(21, 34),
        ApiConstraint::range(1, INFINITY),
    ]
}

// ============================================================================
// API Constraint Tests
// ============================================================================

mod api_constraint_tests {
    use super::*;

    #[test]
    fn test_serialize_round_trip() {
        for constraint in samples() {
            let text = constraint.serialize();
            assert_eq!(text, text.to_lowercase());
            assert_eq!(ApiConstraint::deserialize(&text).unwrap(), constraint);
        }
        for from in [1, 2, 21, 33] {
            for to in [from, from + 1, 40, INFINITY - 1] {
                let constraint = ApiConstraint::range(from, to);
                assert_eq!(ApiConstraint::deserialize(&constraint.serialize()).unwrap(), constraint);
            }
        }
    }

    #[test]
    fn test_serialized_layout() {
        assert_eq!(ApiConstraint::at_least(21).serialize(), "7fff0015");
        assert_eq!(ApiConstraint::below(26).serialize(), "1a0001");
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(ApiConstraint::deserialize("not hex").is_err());
        assert!(ApiConstraint::deserialize("").is_err());
        // from = 0
        assert!(ApiConstraint::deserialize("7fff0000").is_err());
    }

    #[test]
    fn test_intersect_is_commutative_and_idempotent() {
        let samples = samples();
        for a in &samples {
            assert_eq!(*a & *a, *a);
            for b in &samples {
                assert_eq!(*a & *b, *b & *a, "{} & {}", a, b);
            }
        }
    }

    #[test]
    fn test_intersect_with_all_is_identity() {
        for constraint in samples() {
            assert_eq!(constraint & ApiConstraint::ALL, constraint);
        }
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let result = ApiConstraint::below(21) & ApiConstraint::at_least(26);
        assert!(result.is_empty());
        assert_eq!(result.describe(), "Nothing");
        for level in 1..40 {
            assert!(!result.matches(level));
        }
    }

    #[test]
    fn test_invert_one_sided_ranges() {
        assert_eq!(!ApiConstraint::at_least(21), ApiConstraint::below(21));
        assert_eq!(!ApiConstraint::below(21), ApiConstraint::at_least(21));
        assert_eq!(!!ApiConstraint::at_least(26), ApiConstraint::at_least(26));
    }

    #[test]
    fn test_invert_interior_range() {
        let inverted = ApiConstraint::range(5, 10).invert();
        assert_eq!(inverted.from(), 10);
        assert_eq!(inverted.to(), 5);
        assert!(!inverted.is_empty());
        assert_eq!(inverted.describe(), "API level ≥ 10 and API level < 5");
    }

    #[test]
    fn test_inverted_constraints_survive_serialization() {
        for constraint in samples() {
            let inverted = constraint.invert();
            let back = ApiConstraint::deserialize(&inverted.serialize()).unwrap();
            assert_eq!(back, inverted, "{}", constraint);
        }
    }

    #[test]
    fn test_describe_forms() {
        assert_eq!(ApiConstraint::NOTHING.describe(), "Nothing");
        assert_eq!(ApiConstraint::at_least(21).describe(), "API level ≥ 21");
        assert_eq!(ApiConstraint::below(26).describe(), "API level < 26");
        assert_eq!(
            ApiConstraint::range(21, 26).describe(),
            "API level ≥ 21 and API level < 26"
        );
    }

    #[test]
    fn test_describe_unbounded_is_not_nothing() {
        let unbounded = ApiConstraint::range(1, INFINITY);
        assert_eq!(unbounded, ApiConstraint::ALL);
        assert_ne!(unbounded.describe(), "Nothing");
        assert_eq!(unbounded.describe(), "API level ≥ 1");
    }

    #[test]
    fn test_union() {
        let merged = ApiConstraint::range(21, 26).union(&ApiConstraint::range(26, 30));
        assert_eq!(merged, Some(ApiConstraint::range(21, 30)));
        assert_eq!(ApiConstraint::range(21, 23).union(&ApiConstraint::range(26, 30)), None);
        assert_eq!(
            ApiConstraint::NOTHING.union(&ApiConstraint::at_least(21)),
            Some(ApiConstraint::at_least(21))
        );
    }

    #[test]
    fn test_level_queries() {
        let constraint = ApiConstraint::at_least(24);
        assert!(constraint.always_at_least(24));
        assert!(constraint.always_at_least(26));
        assert!(!constraint.always_at_least(21));
        assert!(!ApiConstraint::range(24, 30).always_at_least(26));
        assert!(ApiConstraint::below(21).never_at_most(21));
        assert!(!ApiConstraint::below(21).never_at_most(20));
    }

    #[test]
    fn test_serde_uses_hex_form() {
        let json = serde_json::to_string(&ApiConstraint::at_least(21)).unwrap();
        assert_eq!(json, "\"7fff0015\"");
        let back: ApiConstraint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ApiConstraint::at_least(21));
    }
}

// ============================================================================
// SDK_INT Expression Tests
// ============================================================================

mod expression_tests {
    use super::*;

    #[test]
    fn test_combined_checks() {
        let combined = parse_api_expression(">= 21").unwrap() & parse_api_expression("SDK_INT < 26").unwrap();
        assert_eq!(combined.describe(), "API level ≥ 21 and API level < 26");
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(
            parse_api_expression("21 <= Build.VERSION.SDK_INT").unwrap(),
            ApiConstraint::at_least(21)
        );
        assert_eq!(
            parse_api_expression("Build.VERSION.SDK_INT == 24").unwrap(),
            ApiConstraint::same(24)
        );
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(parse_api_expression("SDK_INT != 21").is_err());
        assert!(parse_api_expression("x > 5").is_err());
        assert!(parse_api_expression("SDK_INT >= 99999").is_err());
        // Nothing remains once level 0 is raised to 1
        assert!(parse_api_expression("in 0 until 0").is_err());
        assert_eq!(parse_api_expression("in 0 until 1").unwrap(), ApiConstraint::same(1));
    }
}

// ============================================================================
// Range Constraint Tests
// ============================================================================

mod range_tests {
    use super::*;

    #[test]
    fn test_int_and() {
        let combined = IntRangeConstraint::range(5, 10).and(&IntRangeConstraint::range(8, 20));
        assert_eq!(combined, IntRangeConstraint::range(8, 10));
    }

    #[test]
    fn test_int_and_exclusive_float_narrows_to_integers() {
        let int: RangeConstraint = IntRangeConstraint::range(0, 10).into();
        let float: RangeConstraint = FloatRangeConstraint::greater_than(2.5).into();
        assert_eq!(int.and(&float), RangeConstraint::Int(IntRangeConstraint::range(3, 10)));
        assert_eq!(float.and(&int), RangeConstraint::Int(IntRangeConstraint::range(3, 10)));
    }

    #[test]
    fn test_float_to_int_conversion() {
        let float = FloatRangeConstraint::range(2.5, 5.0).with_to_inclusive(false);
        assert_eq!(float.to_int(), IntRangeConstraint::range(3, 4));
        assert_eq!(FloatRangeConstraint::range(-1.5, 1.5).to_int(), IntRangeConstraint::range(-1, 1));
    }

    #[test]
    fn test_cross_type_containment() {
        let allowed: RangeConstraint = IntRangeConstraint::range(0, 10).into();
        let inside: RangeConstraint = FloatRangeConstraint::range(1.5, 9.5).into();
        let outside: RangeConstraint = FloatRangeConstraint::range(-0.5, 9.5).into();
        assert_eq!(allowed.contains(&inside), Some(true));
        assert_eq!(allowed.contains(&outside), Some(false));

        let on_boundary: RangeConstraint = FloatRangeConstraint::range(0.0, 5.0).with_from_inclusive(false).into();
        assert_eq!(allowed.contains(&on_boundary), None);
    }

    #[test]
    fn test_size_does_not_mix_with_numbers() {
        let size: RangeConstraint = SizeConstraint::at_least(2).into();
        let int: RangeConstraint = IntRangeConstraint::range(0, 10).into();
        assert_eq!(size.and(&int), size);
        assert_eq!(int.and(&size), int);
        assert_eq!(size.contains(&int), None);
        assert_eq!(int.contains(&size), None);
    }

    #[test]
    fn test_size_and_combines_multiples() {
        let combined = SizeConstraint::at_least(1)
            .with_multiple(2)
            .and(&SizeConstraint::at_most(12).with_multiple(3));
        assert_eq!(combined.multiple(), 6);
        assert_eq!(combined.min(), 1);
        assert_eq!(combined.max(), 12);
        assert!(combined.is_valid(6));
        assert!(!combined.is_valid(4));
    }

    #[test]
    fn test_describe_delta() {
        let allowed: RangeConstraint = IntRangeConstraint::range(0, 255).into();
        let actual: RangeConstraint = FloatRangeConstraint::range(-0.5, 100.0).into();
        assert_eq!(allowed.contains(&actual), Some(false));
        assert_eq!(
            allowed.describe_delta(&actual, "", ""),
            "Value must be ≥ 0 but it can be < 0"
        );

        let above: RangeConstraint = IntRangeConstraint::range(10, 300).into();
        assert_eq!(
            allowed.describe_delta(&above, "`alpha`", "the alpha"),
            "The alpha must be ≤ 255 but `alpha` can be > 255"
        );
    }

    #[test]
    fn test_size_delta() {
        let allowed: RangeConstraint = SizeConstraint::at_least(4).into();
        let actual: RangeConstraint = SizeConstraint::range(2, 8).with_inferred(true).into();
        assert_eq!(allowed.contains(&actual), Some(false));
        assert_eq!(
            allowed.describe_delta(&actual, "the array", ""),
            "Size must be ≥ 4 but the array may be < 4"
        );
    }

    #[test]
    fn test_inferred_ranges() {
        let above = infer_int_range(Comparison::Greater, 10, None).unwrap();
        assert_eq!(above, IntRangeConstraint::at_least(11).with_inferred(true));

        let below = infer_int_range(Comparison::Less, 10, None).unwrap();
        assert_eq!(below.to(), 9);

        let previous = IntRangeConstraint::range(0, 10);
        let trimmed = infer_int_range(Comparison::NotEquals, 0, Some(&previous)).unwrap();
        assert_eq!(trimmed.from(), 1);
        assert_eq!(trimmed.to(), 10);
        assert!(infer_int_range(Comparison::NotEquals, 5, Some(&previous)).is_none());

        let float = infer_float_range(Comparison::Greater, 2.5).unwrap();
        assert!(!float.from_inclusive());
        assert!(float.inferred());
        assert!(infer_float_range(Comparison::Less, f64::NAN).is_none());
    }
}
