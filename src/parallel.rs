//! Parallel classification and scoring using rayon.
//!
//! Fitted models are only read here, so rows are spread over the rayon
//! pool without any locking.

use rayon::prelude::*;

use crate::{
    dataset::Dataset,
    error::{Error, Result},
    label::ValueId,
    model::Classifier
};

/// # Overview
///
/// Parallel prediction for every row of `ds`, in view order.
pub fn classify_batch<C>(model: &C, ds: &Dataset<'_>) -> Vec<Option<ValueId>>
where
    C: Classifier + Sync
{
    let table = ds.table();
    ds.row_indices()
        .par_iter()
        .map(|&i| table.row(i).and_then(|row| model.predict(row, table.schema())))
        .collect()
}

/// # Overview
///
/// Parallel evaluation: fraction of rows whose prediction matches the
/// model's class column.
pub fn score_parallel<C>(model: &C, ds: &Dataset<'_>) -> Result<f64>
where
    C: Classifier + Sync
{
    let class_idx = ds.schema().index_of(model.class_column())?;
    if ds.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let table = ds.table();
    let correct = ds
        .row_indices()
        .par_iter()
        .filter_map(|&i| table.row(i))
        .filter(|row| {
            matches!(
                (model.predict(row, table.schema()), row[class_idx].as_value()),
                (Some(predicted), Some(actual)) if predicted == actual
            )
        })
        .count();
    Ok(correct as f64 / ds.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, DataTable, DecisionTree, Verbosity};

    fn fitted() -> (DataTable, DecisionTree) {
        let mut table = DataTable::with_columns(["size", "label"]);
        for i in 0..200 {
            let label = if i < 100 { "small" } else { "large" };
            table.push_record([i.to_string().as_str(), label]).unwrap();
        }
        let config = Config::builder()
            .class_column("label")
            .verbosity(Verbosity::Silent)
            .build()
            .unwrap();
        let tree = DecisionTree::fit(&table.view(), &config).unwrap();
        (table, tree)
    }

    #[test]
    fn batch_matches_sequential() {
        let (table, tree) = fitted();
        let ds = table.view();

        assert_eq!(classify_batch(&tree, &ds), tree.predict_batch(&ds));
    }

    #[test]
    fn score_matches_sequential() {
        let (table, tree) = fitted();
        let ds = table.view();

        assert_eq!(score_parallel(&tree, &ds).unwrap(), tree.score(&ds).unwrap());
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let (table, tree) = fitted();
        let empty = table.view().select(|_| false);

        assert_eq!(score_parallel(&tree, &empty), Err(Error::EmptyDataset));
    }
}
