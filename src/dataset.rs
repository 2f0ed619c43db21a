//! Row storage and dataset views.
//!
//! [`DataTable`] owns the rows and the [`Schema`]. A [`Dataset`] is a view:
//! an ordered list of row indices into a table. Filtering, partitioning and
//! sampling produce new views over the same rows without copying them, and
//! dropping a view never touches the table.

use core::cmp::Ordering;

use crate::{
    error::{Error, Result},
    label::{Column, Kind, Schema, ValueId}
};

/// # Overview
///
/// One cell of a row: an owned number or an interned categorical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Number(f64),
    Value(ValueId)
}

impl Cell {
    #[inline]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v),
            Self::Value(_) => None
        }
    }

    #[inline]
    pub fn as_value(self) -> Option<ValueId> {
        match self {
            Self::Value(id) => Some(id),
            Self::Number(_) => None
        }
    }
}

/// # Overview
///
/// Root dataset: owns the schema (with its interned values) and every row.
///
/// # Examples
///
/// ```
/// use entropy_tree::DataTable;
///
/// let mut table = DataTable::with_columns(["colour", "label"]);
/// table.push_record(["red", "yes"]).unwrap();
/// table.push_record(["blue", "no"]).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.view().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    pub(crate) schema: Schema,
    pub(crate) rows:   Vec<Vec<Cell>>,
    pub(crate) typed:  bool
}

impl DataTable {
    /// # Overview
    ///
    /// Creates an empty table whose columns start out categorical. Kinds are
    /// fixed by the first record pushed.
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        Self {
            schema: Schema::new(names),
            rows:   Vec::new(),
            typed:  false
        }
    }

    /// # Overview
    ///
    /// Creates an empty table reusing an existing schema and its interned
    /// values, so ids stay comparable with the table the schema came from.
    /// Column kinds of a non-empty schema are kept as they are.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            typed: true
        }
    }

    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// # Overview
    ///
    /// Interns `text` under categorical column `column`.
    pub fn intern(&mut self, column: &str, text: &str) -> Result<ValueId> {
        self.schema.intern(column, text)
    }

    /// # Overview
    ///
    /// View over every row in insertion order.
    pub fn view(&self) -> Dataset<'_> {
        Dataset {
            table: self,
            rows:  (0..self.rows.len()).collect()
        }
    }

    /// Gives back the schema, dropping the rows.
    pub fn into_schema(self) -> Schema {
        self.schema
    }
}

/// # Overview
///
/// Ordered selection of rows from a [`DataTable`].
#[derive(Debug, Clone)]
pub struct Dataset<'t> {
    table: &'t DataTable,
    rows:  Vec<usize>
}

impl<'t> Dataset<'t> {
    /// # Overview
    ///
    /// Builds a view from explicit row indices. Indices past the end of the
    /// table are dropped.
    pub fn from_indices(table: &'t DataTable, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            table,
            rows: indices.into_iter().filter(|&i| i < table.len()).collect()
        }
    }

    #[inline]
    pub fn table(&self) -> &'t DataTable {
        self.table
    }

    #[inline]
    pub fn schema(&self) -> &'t Schema {
        &self.table.schema
    }

    #[inline]
    pub fn columns(&self) -> &'t [Column] {
        self.table.schema.columns()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices of the selected rows in the owning table.
    #[inline]
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// Iterates over rows in view order.
    pub fn rows(&self) -> impl Iterator<Item = &'t [Cell]> + '_ {
        let table = self.table;
        self.rows.iter().map(move |&i| table.rows[i].as_slice())
    }

    /// Row at position `pos` of this view.
    #[inline]
    pub fn row(&self, pos: usize) -> Option<&'t [Cell]> {
        let table = self.table;
        self.rows.get(pos).map(|&i| table.rows[i].as_slice())
    }

    /// # Overview
    ///
    /// New view with the rows for which `predicate` holds, in view order.
    ///
    /// Fails with `EmptyDataset` when this view has no rows or no columns.
    pub fn filter<F>(&self, predicate: F) -> Result<Dataset<'t>>
    where
        F: FnMut(&[Cell]) -> bool
    {
        if self.is_empty() || self.schema().is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(self.select(predicate))
    }

    pub(crate) fn select<F>(&self, mut predicate: F) -> Dataset<'t>
    where
        F: FnMut(&[Cell]) -> bool
    {
        let table = self.table;
        Dataset {
            table,
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|&i| predicate(&table.rows[i]))
                .collect()
        }
    }

    /// # Overview
    ///
    /// Folds the cells of `column` in view order into a single accumulator.
    ///
    /// The fold receives the column kind, the cell and the running value.
    /// See [`reducers`] for counting, summing and squared deviation.
    pub fn reduce<A, F>(&self, column: &str, init: A, fold: F) -> Result<A>
    where
        F: FnMut(A, Kind, Cell) -> A
    {
        let idx = self.schema().index_of(column)?;
        Ok(self.reduce_at(idx, init, fold))
    }

    pub(crate) fn reduce_at<A, F>(&self, idx: usize, init: A, mut fold: F) -> A
    where
        F: FnMut(A, Kind, Cell) -> A
    {
        let kind = self.columns()[idx].kind();
        self.rows().fold(init, |acc, row| fold(acc, kind, row[idx]))
    }

    /// # Overview
    ///
    /// Reorders this view by `column`: numbers by value, categorical values
    /// by byte-wise comparison of their names. Views derived earlier keep
    /// their own order.
    pub fn sort_by(&mut self, column: &str, descending: bool) -> Result<()> {
        let idx = self.schema().index_of(column)?;
        self.sort_at(idx, descending);
        Ok(())
    }

    pub(crate) fn sort_at(&mut self, idx: usize, descending: bool) {
        let table = self.table;
        let column = &table.schema.columns()[idx];
        let compare = |a: &usize, b: &usize| {
            let ord = compare_cells(column, table.rows[*a][idx], table.rows[*b][idx]);
            if descending { ord.reverse() } else { ord }
        };
        self.rows.sort_by(compare);
    }

    /// # Overview
    ///
    /// Row count per value of categorical `column`, indexed by [`ValueId`].
    pub fn value_counts(&self, column: &str) -> Result<Vec<usize>> {
        let idx = self.schema().index_of(column)?;
        let col = &self.columns()[idx];
        if !col.is_categorical() {
            return Err(Error::NotCategorical {
                field: col.name().to_string()
            });
        }
        Ok(self.value_counts_at(idx))
    }

    pub(crate) fn value_counts_at(&self, idx: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.columns()[idx].n_values()];
        for row in self.rows() {
            if let Some(id) = row[idx].as_value()
                && let Some(slot) = counts.get_mut(id.index())
            {
                *slot += 1;
            }
        }
        counts
    }

    /// Rows with `column <= threshold` and rows with `column > threshold`.
    pub(crate) fn split_at_threshold(&self, idx: usize, threshold: f64) -> [Dataset<'t>; 2] {
        let le = self.select(|row| is_at_most(row[idx], threshold));
        let gt = self.select(|row| !is_at_most(row[idx], threshold));
        [le, gt]
    }

    /// One view per value of categorical column `idx`, in value-list order.
    pub(crate) fn partition_by_value(&self, idx: usize) -> Vec<Dataset<'t>> {
        let n_values = self.columns()[idx].n_values();
        let mut parts: Vec<Vec<usize>> = vec![Vec::new(); n_values];
        for &i in &self.rows {
            if let Some(id) = self.table.rows[i][idx].as_value()
                && let Some(part) = parts.get_mut(id.index())
            {
                part.push(i);
            }
        }
        parts
            .into_iter()
            .map(|rows| Dataset {
                table: self.table,
                rows
            })
            .collect()
    }
}

#[inline]
pub(crate) fn is_at_most(cell: Cell, threshold: f64) -> bool {
    matches!(cell, Cell::Number(v) if v <= threshold)
}

fn compare_cells(column: &Column, a: Cell, b: Cell) -> Ordering {
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(&y),
        (Cell::Value(x), Cell::Value(y)) => {
            let xa = column.value_name(x).unwrap_or_default();
            let yb = column.value_name(y).unwrap_or_default();
            xa.as_bytes().cmp(yb.as_bytes())
        }
        (Cell::Number(_), Cell::Value(_)) => Ordering::Less,
        (Cell::Value(_), Cell::Number(_)) => Ordering::Greater
    }
}

/// # Overview
///
/// Ready-made folds for [`Dataset::reduce`]. Each ignores cells of the
/// wrong kind.
pub mod reducers {
    use super::Cell;
    use crate::label::{Kind, ValueId};

    /// Counts cells holding `target`.
    pub fn count(target: ValueId) -> impl FnMut(f64, Kind, Cell) -> f64 {
        move |acc, kind, cell| match (kind, cell) {
            (Kind::Categorical, Cell::Value(id)) if id == target => acc + 1.0,
            _ => acc
        }
    }

    /// Sums numeric cells.
    pub fn sum() -> impl FnMut(f64, Kind, Cell) -> f64 {
        |acc, kind, cell| match (kind, cell) {
            (Kind::Numeric, Cell::Number(v)) => acc + v,
            _ => acc
        }
    }

    /// Sums squared deviations of numeric cells from `center`.
    pub fn squared_deviation(center: f64) -> impl FnMut(f64, Kind, Cell) -> f64 {
        move |acc, kind, cell| match (kind, cell) {
            (Kind::Numeric, Cell::Number(v)) => acc + (v - center) * (v - center),
            _ => acc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{reducers::*, *};

    fn table() -> DataTable {
        let mut table = DataTable::with_columns(["size", "colour", "label"]);
        table.push_record(["3", "red", "yes"]).unwrap();
        table.push_record(["1", "blue", "no"]).unwrap();
        table.push_record(["2", "red", "yes"]).unwrap();
        table.push_record(["4", "green", "no"]).unwrap();
        table
    }

    fn sizes(ds: &Dataset<'_>) -> Vec<f64> {
        ds.rows().map(|r| r[0].as_number().unwrap()).collect()
    }

    #[test]
    fn filter_keeps_order_and_shares_rows() {
        let table = table();
        let all = table.view();
        let red = table.schema().columns()[1].find_value("red").unwrap();

        let reds = all.filter(|row| row[1] == Cell::Value(red)).unwrap();

        assert_eq!(reds.row_indices(), &[0, 2]);
        assert_eq!(sizes(&reds), vec![3.0, 2.0]);
    }

    #[test]
    fn filter_on_empty_view_fails() {
        let table = table();
        let none = table.view().select(|_| false);

        assert_eq!(none.filter(|_| true).unwrap_err(), Error::EmptyDataset);
    }

    #[test]
    fn reduce_counts_and_sums() {
        let table = table();
        let ds = table.view();
        let yes = table.schema().columns()[2].find_value("yes").unwrap();

        assert_eq!(ds.reduce("label", 0.0, count(yes)).unwrap(), 2.0);
        assert_eq!(ds.reduce("size", 0.0, sum()).unwrap(), 10.0);
        assert_eq!(ds.reduce("size", 0.0, squared_deviation(2.5)).unwrap(), 5.0);
    }

    #[test]
    fn reduce_unknown_field() {
        let table = table();

        assert!(matches!(
            table.view().reduce("weight", 0.0, sum()),
            Err(Error::FieldNotFound { .. })
        ));
    }

    #[test]
    fn sort_numeric_both_directions() {
        let table = table();
        let mut ds = table.view();

        ds.sort_by("size", false).unwrap();
        assert_eq!(sizes(&ds), vec![1.0, 2.0, 3.0, 4.0]);

        ds.sort_by("size", true).unwrap();
        assert_eq!(sizes(&ds), vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn sort_categorical_by_name() {
        let table = table();
        let mut ds = table.view();

        ds.sort_by("colour", false).unwrap();
        let col = &table.schema().columns()[1];
        let names: Vec<&str> = ds
            .rows()
            .map(|r| col.value_name(r[1].as_value().unwrap()).unwrap())
            .collect();

        assert_eq!(names, vec!["blue", "green", "red", "red"]);
    }

    #[test]
    fn sorting_does_not_reorder_derived_views() {
        let table = table();
        let mut ds = table.view();
        let derived = ds.select(|row| row[0].as_number().unwrap() > 1.0);

        ds.sort_by("size", true).unwrap();

        assert_eq!(sizes(&derived), vec![3.0, 2.0, 4.0]);
    }

    #[test]
    fn value_counts_by_id() {
        let table = table();

        assert_eq!(table.view().value_counts("colour").unwrap(), vec![2, 1, 1]);
        assert!(matches!(
            table.view().value_counts("size"),
            Err(Error::NotCategorical { .. })
        ));
    }

    #[test]
    fn partitions() {
        let table = table();
        let ds = table.view();

        let [le, gt] = ds.split_at_threshold(0, 2.0);
        assert_eq!(sizes(&le), vec![1.0, 2.0]);
        assert_eq!(sizes(&gt), vec![3.0, 4.0]);

        let parts = ds.partition_by_value(1);
        let lens: Vec<usize> = parts.iter().map(Dataset::len).collect();
        assert_eq!(lens, vec![2, 1, 1]);
    }

    #[test]
    fn from_indices_drops_out_of_range() {
        let table = table();
        let ds = Dataset::from_indices(&table, [3, 0, 9]);

        assert_eq!(ds.row_indices(), &[3, 0]);
    }
}
