//! Property-based tests for entropy measures, trees and sampling.

use entropy_tree::{
    Config, DataTable, Dataset, DecisionTree, Verbosity, rng_from_seed, sample_dataset, stats
};
use proptest::prelude::*;

fn build(rows: &[(u8, i32, u8)]) -> DataTable {
    let mut table = DataTable::with_columns(["kind", "size", "label"]);
    for &(kind, size, label) in rows {
        table
            .push_record([format!("k{kind}"), size.to_string(), format!("c{label}")])
            .unwrap();
    }
    table
}

fn config() -> Config {
    Config::builder()
        .class_column("label")
        .significance(0.0)
        .verbosity(Verbosity::Silent)
        .build()
        .unwrap()
}

fn rows() -> impl Strategy<Value = Vec<(u8, i32, u8)>> {
    prop::collection::vec((0u8..4, -20i32..20, 0u8..3), 1..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Splitting never increases class entropy.
    #[test]
    fn information_gain_is_non_negative(rows in rows()) {
        let data = build(&rows);
        let ds = data.view();

        let gain = stats::information_gain(&ds, "kind", "label").unwrap();
        let num_gain = stats::information_gain(&ds, "size", "label").unwrap();

        prop_assert!(gain >= -1e-9);
        prop_assert!(num_gain >= -1e-9);
    }

    /// Scores are fractions.
    #[test]
    fn score_is_a_fraction(train in rows(), test in rows()) {
        let mut all = train.clone();
        all.extend_from_slice(&test);
        let data = build(&all);
        let train_view = Dataset::from_indices(&data, 0..train.len());
        let test_view = Dataset::from_indices(&data, train.len()..all.len());

        let tree = DecisionTree::fit(&train_view, &config()).unwrap();
        let score = tree.score(&test_view).unwrap();

        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// A pure class column gives a single leaf.
    #[test]
    fn pure_data_gives_leaf(rows in prop::collection::vec((0u8..4, -20i32..20), 1..40)) {
        let rows: Vec<(u8, i32, u8)> = rows.into_iter().map(|(k, s)| (k, s, 0)).collect();
        let data = build(&rows);

        let tree = DecisionTree::fit(&data.view(), &config()).unwrap();

        prop_assert!(tree.root().is_leaf());
        prop_assert_eq!(tree.score(&data.view()).unwrap(), 1.0);
    }

    /// A second pruning pass on the same data changes nothing.
    #[test]
    fn pruning_converges(rows in rows(), split in 1usize..60) {
        let data = build(&rows);
        let split = split.min(rows.len());
        let train = Dataset::from_indices(&data, 0..split);
        let all = data.view();

        let mut tree = DecisionTree::fit(&train, &config()).unwrap();
        let before = tree.score(&all).unwrap();
        tree.prune(&all).unwrap();
        let pruned = tree.clone();

        prop_assert!(tree.score(&all).unwrap() >= before);
        prop_assert_eq!(tree.prune(&all).unwrap(), 0.0);
        prop_assert_eq!(tree, pruned);
    }

    /// Sample size and class shares are within rounding of the target.
    #[test]
    fn sampling_keeps_proportions(rows in rows(), fraction in 0.0f64..=1.0, seed in any::<u64>()) {
        let data = build(&rows);
        let ds = data.view();
        let target = (rows.len() as f64 * fraction) as usize;

        let sample = sample_dataset(&ds, target, "label", &mut rng_from_seed(seed)).unwrap();

        let full = ds.value_counts("label").unwrap();
        let part = sample.value_counts("label").unwrap();
        let classes = full.iter().filter(|&&c| c > 0).count();
        prop_assert!(sample.len().abs_diff(target) * 2 <= classes);
        for (f, p) in full.iter().zip(&part) {
            let expected = target as f64 * *f as f64 / rows.len() as f64;
            prop_assert!((*p as f64 - expected).abs() <= 0.5 + 1e-9);
        }
    }
}
