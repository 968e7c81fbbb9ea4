use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tcghub_core::{
    compare_coins, compute_coin_operations, compute_coin_operations_with, merge_value,
    parse_coins_input, CoinGameResult, MergeStep, SolverLimits,
};

macro_rules! solve_case {
    ($name:ident, $coins:expr, $threshold:expr, $operations:expr, $success:expr) => {
        #[test]
        fn $name() {
            let coins: Vec<f64> = $coins.to_vec();
            let result = compute_coin_operations(&coins, $threshold);
            assert_eq!(result.operations, $operations);
            assert_eq!(result.success, $success);
            assert_invariants(&result, $threshold);
        }
    };
}

solve_case!(solve_case_reachable, [1.0, 2.0, 3.0, 9.0, 10.0, 12.0], 7.0, 2, true);
solve_case!(solve_case_pair_short, [1.0, 1.0], 10.0, 1, false);
solve_case!(solve_case_empty, [], 3.0, 0, false);
solve_case!(solve_case_single_high, [8.0], 3.0, 0, true);
solve_case!(solve_case_single_low, [1.0], 3.0, 0, false);
solve_case!(solve_case_all_solved, [5.0, 6.0, 7.0], 5.0, 0, true);
solve_case!(solve_case_exact_threshold, [2.0, 3.0], 7.0, 1, true);
solve_case!(solve_case_just_short, [2.0, 2.9], 7.0, 1, false);
solve_case!(solve_case_zeros, [0.0, 0.0, 0.0], 1.0, 2, false);
solve_case!(solve_case_fractional, [0.5, 0.25, 4.0], 1.0, 1, true);
solve_case!(solve_case_chain, [1.0, 1.0, 1.0, 1.0], 20.0, 3, false);
solve_case!(solve_case_chain_reached, [1.0, 1.0, 1.0, 1.0], 3.0, 2, true);

#[test]
fn merge_order_follows_two_smallest() {
    let result = compute_coin_operations(&[1.0, 1.0, 1.0, 1.0], 3.0);
    assert_eq!(
        result.steps,
        vec![
            MergeStep {
                x: 1.0,
                y: 1.0,
                new_coin: 3.0
            },
            MergeStep {
                x: 1.0,
                y: 1.0,
                new_coin: 3.0
            },
        ]
    );
    assert_eq!(result.final_coins, vec![3.0, 3.0]);
    assert!(result.success);
}

#[test]
fn parsed_input_flows_into_solver() {
    let coins = parse_coins_input("2, 11, -3, foo, 5");
    let result = compute_coin_operations(&coins, 10.0);
    assert_eq!(result.steps[0].x, 2.0);
    assert_eq!(result.steps[0].y, 5.0);
    assert_eq!(result.steps[0].new_coin, 9.0);
    assert!(result.success);
    assert_eq!(result.operations, 2);
}

#[test]
fn caller_coins_are_not_mutated() {
    let coins = vec![4.0, 1.0, 2.0];
    let snapshot = coins.clone();
    let _ = compute_coin_operations(&coins, 50.0);
    assert_eq!(coins, snapshot);
}

#[test]
fn large_input_respects_default_cap() {
    let coins = vec![0.0; 10_050];
    let result = compute_coin_operations(&coins, 1.0);
    assert_eq!(result.operations, 10_001);
    assert_eq!(result.steps.len(), 10_001);
    assert_eq!(result.final_coins.len(), 10_050 - 10_001);
    assert!(!result.success);
}

#[test]
fn matches_sorting_replay_on_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..400 {
        let len = rng.gen_range(0..24);
        let coins: Vec<f64> = (0..len)
            .map(|_| f64::from(rng.gen_range(0..40u32)) / 2.0)
            .collect();
        let threshold = f64::from(rng.gen_range(1..120u32)) / 2.0;
        let expected = sorting_reference(&coins, threshold, SolverLimits::default());
        let actual = compute_coin_operations(&coins, threshold);
        assert_eq!(actual, expected, "coins={coins:?} threshold={threshold}");
        assert_invariants(&actual, threshold);
        assert_eq!(actual, compute_coin_operations(&coins, threshold));
    }
}

#[test]
fn matches_sorting_replay_under_small_caps() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let len = rng.gen_range(2..30);
        let coins: Vec<f64> = (0..len).map(|_| f64::from(rng.gen_range(0..3u32))).collect();
        let limits = SolverLimits {
            max_operations: rng.gen_range(1..10),
        };
        let expected = sorting_reference(&coins, 1_000.0, limits);
        let actual = compute_coin_operations_with(&coins, 1_000.0, limits);
        assert_eq!(actual, expected, "coins={coins:?} limits={limits:?}");
    }
}

#[test]
fn solved_inputs_keep_their_multiset() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let threshold = f64::from(rng.gen_range(1..50u32));
        let coins: Vec<f64> = (0..rng.gen_range(1..12))
            .map(|_| threshold + f64::from(rng.gen_range(0..50u32)))
            .collect();
        let result = compute_coin_operations(&coins, threshold);
        assert_eq!(result.operations, 0);
        assert!(result.success);
        let mut expected = coins.clone();
        let mut actual = result.final_coins.clone();
        expected.sort_by(f64::total_cmp);
        actual.sort_by(f64::total_cmp);
        assert_eq!(actual, expected);
    }
}

fn assert_invariants(result: &CoinGameResult, threshold: f64) {
    assert_eq!(result.steps.len(), result.operations as usize);
    for step in &result.steps {
        assert!(step.x <= step.y, "{step:?}");
        assert_eq!(step.new_coin, merge_value(step.x, step.y));
    }
    if result.success {
        assert!(!result.final_coins.is_empty());
        assert!(result.final_coins.iter().all(|value| *value >= threshold));
    }
}

/// Sorts the whole working list every round, shifting off the two smallest.
fn sorting_reference(coins: &[f64], threshold: f64, limits: SolverLimits) -> CoinGameResult {
    let mut working = coins.to_vec();
    let mut steps = Vec::new();
    let mut operations = 0u32;
    if working.is_empty() {
        return CoinGameResult {
            operations,
            steps,
            final_coins: working,
            success: false,
        };
    }
    while working.len() > 1 && working.iter().any(|value| *value < threshold) {
        working.sort_by(|a, b| compare_coins(*a, *b));
        let x = working.remove(0);
        let y = working.remove(0);
        let new_coin = x.min(y) * 2.0 + x.max(y);
        operations += 1;
        steps.push(MergeStep { x, y, new_coin });
        working.push(new_coin);
        if operations > limits.max_operations {
            break;
        }
    }
    let success = !working.is_empty() && working.iter().all(|value| *value >= threshold);
    CoinGameResult {
        operations,
        steps,
        final_coins: working,
        success,
    }
}
