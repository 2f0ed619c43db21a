//! Common interface for fitted classifiers.

use crate::{
    dataset::{Cell, Dataset},
    error::Result,
    label::{Schema, ValueId},
    tree::DecisionTree
};

/// # Overview
///
/// A fitted model that predicts a categorical class for table rows.
///
/// This is the seam driver programs and ensembles build on: they hold
/// models behind this trait and only ever predict and evaluate.
///
/// # Example
///
/// ```
/// use entropy_tree::{Classifier, Config, DataTable, DecisionTree};
///
/// let mut table = DataTable::with_columns(["colour", "label"]);
/// for (colour, label) in [("red", "yes"), ("blue", "no")] {
///     table.push_record([colour, label]).unwrap();
/// }
///
/// let config = Config::builder().class_column("label").significance(0.0).build().unwrap();
/// let tree = DecisionTree::fit(&table.view(), &config).unwrap();
///
/// let predictions = tree.predict_batch(&table.view());
/// assert_eq!(predictions.len(), 2);
/// assert_eq!(tree.evaluate(&table.view()).unwrap(), 1.0);
/// ```
pub trait Classifier {
    /// Predicts the class of one row, `None` if the row cannot be routed.
    fn predict(&self, row: &[Cell], schema: &Schema) -> Option<ValueId>;

    /// Name of the column holding the actual class.
    fn class_column(&self) -> &str;

    /// Fraction of rows predicted correctly.
    fn evaluate(&self, ds: &Dataset<'_>) -> Result<f64>;

    /// Predictions for every row of `ds`, in view order.
    fn predict_batch(&self, ds: &Dataset<'_>) -> Vec<Option<ValueId>> {
        ds.rows().map(|row| self.predict(row, ds.schema())).collect()
    }
}

impl Classifier for DecisionTree {
    #[inline]
    fn predict(&self, row: &[Cell], schema: &Schema) -> Option<ValueId> {
        self.classify(row, schema)
    }

    #[inline]
    fn class_column(&self) -> &str {
        DecisionTree::class_column(self)
    }

    #[inline]
    fn evaluate(&self, ds: &Dataset<'_>) -> Result<f64> {
        self.score(ds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataTable, Node};

    #[test]
    fn boxed_models_predict() {
        let mut table = DataTable::with_columns(["x", "label"]);
        table.push_record(["1", "a"]).unwrap();
        table.push_record(["2", "b"]).unwrap();
        let a = ValueId::new(0);
        let model: Box<dyn Classifier> = Box::new(DecisionTree::from_root(Node::leaf(a), "label"));

        assert_eq!(model.class_column(), "label");
        assert_eq!(model.predict_batch(&table.view()), vec![Some(a), Some(a)]);
        assert_eq!(model.evaluate(&table.view()).unwrap(), 0.5);
    }
}
