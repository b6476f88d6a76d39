//! Property-based tests for the persistent collections and the evaluator.

use proptest::prelude::*;
use std::rc::Rc;
use xy::list::List;
use xy::map::{hash_key, Map};
use xy::{State, Value};

fn to_list(values: &[i32]) -> Rc<List> {
    List::from_values(values.iter().map(|&n| Value::Number(n as f64)).collect())
}

/// Lists on both sides of the materialization threshold
fn arb_values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-1000i32..1000, 0..24)
}

fn arb_entries() -> impl Strategy<Value = Vec<(String, i32)>> {
    prop::collection::vec(("[a-e]", 0i32..100), 0..8)
}

fn to_map(entries: &[(String, i32)]) -> Rc<Map> {
    // Later entries with the same key replace earlier ones
    let mut keys = Vec::new();
    let mut values = Vec::new();
    for (key, value) in entries {
        let hash = hash_key(key);
        let value = Value::Number(*value as f64);
        match keys.iter().position(|k| *k == hash) {
            Some(i) => values[i] = value,
            None => {
                keys.push(hash);
                values.push(value);
            }
        }
    }
    Map::create(keys, values)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn concat_preserves_size_and_order(a in arb_values(), b in arb_values()) {
        let joined = List::concat(&to_list(&a), &to_list(&b));
        prop_assert_eq!(joined.size(), a.len() + b.len());

        let expected: Vec<Value> = a.iter().chain(&b).map(|&n| Value::Number(n as f64)).collect();
        for (i, value) in expected.iter().enumerate() {
            prop_assert_eq!(&joined.get(i), value);
        }
        prop_assert_eq!(joined.get(expected.len()), Value::Void);
    }

    #[test]
    fn nested_concat_matches_flat(parts in prop::collection::vec(arb_values(), 0..6)) {
        let list = parts
            .iter()
            .fold(List::empty(), |acc, part| List::concat(&acc, &to_list(part)));
        let flat: Vec<i32> = parts.concat();
        prop_assert_eq!(list.to_vec(), to_list(&flat).to_vec());
    }

    #[test]
    fn sublist_matches_slice(values in arb_values(), start in 0usize..30, len in 0usize..30) {
        let list = to_list(&values);
        let end = start + len;
        let sub = List::sublist(&list, start, end);

        let lo = start.min(values.len());
        let hi = end.min(values.len()).max(lo);
        prop_assert_eq!(sub.to_vec(), to_list(&values[lo..hi]).to_vec());
    }

    #[test]
    fn map_concat_is_right_biased(a in arb_entries(), b in arb_entries()) {
        let left = to_map(&a);
        let right = to_map(&b);
        let merged = Map::concat(&left, &right);

        for key in ["a", "b", "c", "d", "e"] {
            let hash = hash_key(key);
            let expected = if right.contains(hash) {
                right.get(hash)
            } else {
                left.get(hash)
            };
            prop_assert_eq!(merged.get(hash), expected);
            prop_assert_eq!(merged.contains(hash), left.contains(hash) || right.contains(hash));
        }
    }

    #[test]
    fn tail_recursive_count_matches_closed_form(n in 0u32..5000) {
        let mut state = State::new();
        state
            .load_str("let count(0, acc) = acc\nlet count(n, acc) = count(n - 1, acc + n)")
            .unwrap();
        let result = state.eval_str(&format!("count({}, 0)", n)).unwrap();
        let n = n as f64;
        prop_assert_eq!(result, Value::Number(n * (n + 1.0) / 2.0));
    }
}
