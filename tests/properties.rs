//! Property-based tests for the aggregate and arithmetic kinds.
//!
mod common;
use common::*;
use keisan::prelude::*;
use proptest::prelude::*;

fn evaluate(kind: &str, descriptor_id: &str, values: Vec<Value>) -> Resolved {
    let mut ws = workspace();
    let handle = operation_with(&mut ws, "/prop/op", kind, descriptor_id, values);
    ws.get(&handle).expect("evaluation failed")
}

fn literals(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_matches_integer_sum(terms in prop::collection::vec(any::<i32>(), 1..12)) {
        let terms: Vec<i64> = terms.into_iter().map(i64::from).collect();
        let expected: i64 = terms.iter().sum();
        prop_assert_eq!(evaluate("add", "add.terms", literals(&terms)), int(expected));
    }

    #[test]
    fn add_is_order_independent(terms in prop::collection::vec(-1000i64..1000, 1..12)) {
        let mut reversed = terms.clone();
        reversed.reverse();
        prop_assert_eq!(
            evaluate("add", "add.terms", literals(&terms)),
            evaluate("add", "add.terms", literals(&reversed))
        );
    }

    #[test]
    fn absolute_value_is_idempotent(x in any::<i64>()) {
        let mut ws = workspace();
        let once = operation_with(&mut ws, "/prop/once", "absolute_value", "absolute_value.operand", vec![x]);
        let twice = operation_with(
            &mut ws,
            "/prop/twice",
            "absolute_value",
            "absolute_value.operand",
            vec![Value::operation(&once)],
        );
        prop_assert_eq!(ws.get(&once).expect("abs failed"), ws.get(&twice).expect("abs failed"));
    }

    #[test]
    fn count_counts_every_input(paths in prop::collection::vec("[a-z]{1,6}", 1..10)) {
        let values: Vec<Value> = paths
            .iter()
            .map(|segment| Value::path(format!("/maybe/{}/value", segment)))
            .collect();
        let expected = values.len() as i64;
        prop_assert_eq!(evaluate("count", "count.items", values), int(expected));
    }

    #[test]
    fn modes_share_the_highest_frequency(items in prop::collection::vec(0i64..5, 1..16)) {
        let result = evaluate("mode", "mode.items", literals(&items));
        let frequency = |value: i64| items.iter().filter(|item| **item == value).count();
        let highest = items.iter().map(|item| frequency(*item)).max().unwrap_or(0);

        let modes = result.scalars();
        for mode in modes {
            let value = mode.as_numeric().and_then(Numeric::to_i64).expect("mode is not an integer");
            prop_assert_eq!(frequency(value), highest);
        }
        if highest <= 1 {
            prop_assert!(modes.is_empty());
        }
    }

    #[test]
    fn median_lies_within_the_terms(terms in prop::collection::vec(-1000i64..1000, 1..12)) {
        let median = evaluate("median", "median.terms", literals(&terms));
        let median = median
            .as_single()
            .and_then(Scalar::as_numeric)
            .map(Numeric::to_f64)
            .expect("median is not a number");
        let min = *terms.iter().min().expect("no terms") as f64;
        let max = *terms.iter().max().expect("no terms") as f64;
        prop_assert!(min <= median && median <= max);
    }
}
