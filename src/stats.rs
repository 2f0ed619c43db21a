//! Descriptive statistics, entropy measures and split tests.
//!
//! Entropies are Shannon entropies in nats. Public functions take column
//! names and fail with `FieldNotFound` for unknown names; the `_at`
//! variants used during induction take resolved column indices.

use crate::{
    dataset::{Dataset, is_at_most, reducers},
    error::{Error, Result}
};

/// # Overview
///
/// Population mean of a numeric column.
pub fn mean(ds: &Dataset<'_>, column: &str) -> Result<f64> {
    let idx = numeric_column(ds, column)?;
    if ds.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(ds.reduce_at(idx, 0.0, reducers::sum()) / ds.len() as f64)
}

/// # Overview
///
/// Population variance (divides by the row count) of a numeric column.
pub fn variance(ds: &Dataset<'_>, column: &str) -> Result<f64> {
    let idx = numeric_column(ds, column)?;
    let center = mean(ds, column)?;
    Ok(ds.reduce_at(idx, 0.0, reducers::squared_deviation(center)) / ds.len() as f64)
}

/// Population standard deviation of a numeric column.
pub fn std_dev(ds: &Dataset<'_>, column: &str) -> Result<f64> {
    variance(ds, column).map(f64::sqrt)
}

/// # Overview
///
/// Entropy of the class distribution: `-Σ p·ln(p)` over the values of
/// `class_column`. A numeric class column has entropy 0.
///
/// # Examples
///
/// ```
/// use entropy_tree::{DataTable, stats};
///
/// let mut table = DataTable::with_columns(["label"]);
/// for label in ["yes", "yes", "no", "no"] {
///     table.push_record([label]).unwrap();
/// }
///
/// let h = stats::class_entropy(&table.view(), "label").unwrap();
/// assert!((h - 2f64.ln()).abs() < 1e-12);
/// ```
pub fn class_entropy(ds: &Dataset<'_>, class_column: &str) -> Result<f64> {
    let class_idx = ds.schema().index_of(class_column)?;
    Ok(class_entropy_at(ds, class_idx))
}

pub(crate) fn class_entropy_at(ds: &Dataset<'_>, class_idx: usize) -> f64 {
    if !ds.columns()[class_idx].is_categorical() {
        return 0.0;
    }
    entropy_of_counts(&ds.value_counts_at(class_idx), ds.len())
}

/// # Overview
///
/// Weighted class entropy after partitioning by each value of the
/// categorical `column`: `Σ |subset|/|ds| · H(subset)`.
///
/// Returns 0 for a numeric `column`.
pub fn attribute_entropy(ds: &Dataset<'_>, column: &str, class_column: &str) -> Result<f64> {
    let idx = ds.schema().index_of(column)?;
    let class_idx = ds.schema().index_of(class_column)?;
    Ok(attribute_entropy_at(ds, idx, class_idx))
}

pub(crate) fn attribute_entropy_at(ds: &Dataset<'_>, idx: usize, class_idx: usize) -> f64 {
    let columns = ds.columns();
    if !columns[idx].is_categorical() || !columns[class_idx].is_categorical() || ds.is_empty() {
        return 0.0;
    }
    let n_classes = columns[class_idx].n_values();
    let mut joint = vec![vec![0usize; n_classes]; columns[idx].n_values()];
    for row in ds.rows() {
        if let (Some(value), Some(class)) = (row[idx].as_value(), row[class_idx].as_value())
            && let Some(slot) = joint
                .get_mut(value.index())
                .and_then(|counts| counts.get_mut(class.index()))
        {
            *slot += 1;
        }
    }
    weighted_entropy(&joint, ds.len())
}

/// # Overview
///
/// Weighted class entropy of the two-way split `column <= threshold` /
/// `column > threshold`. Returns 0 for a categorical `column`.
pub fn attribute_num_entropy(
    ds: &Dataset<'_>,
    column: &str,
    class_column: &str,
    threshold: f64
) -> Result<f64> {
    let idx = ds.schema().index_of(column)?;
    let class_idx = ds.schema().index_of(class_column)?;
    Ok(attribute_num_entropy_at(ds, idx, class_idx, threshold))
}

pub(crate) fn attribute_num_entropy_at(
    ds: &Dataset<'_>,
    idx: usize,
    class_idx: usize,
    threshold: f64
) -> f64 {
    let columns = ds.columns();
    if !columns[idx].is_numeric() || !columns[class_idx].is_categorical() || ds.is_empty() {
        return 0.0;
    }
    let n_classes = columns[class_idx].n_values();
    let mut sides = [vec![0usize; n_classes], vec![0usize; n_classes]];
    for row in ds.rows() {
        let side = if is_at_most(row[idx], threshold) { 0 } else { 1 };
        if let Some(slot) = row[class_idx]
            .as_value()
            .and_then(|class| sides[side].get_mut(class.index()))
        {
            *slot += 1;
        }
    }
    weighted_entropy(&sides, ds.len())
}

/// # Overview
///
/// Information gain of splitting on `column`: class entropy minus the
/// attribute entropy. Numeric columns are split at the threshold found by
/// [`optimize_threshold`].
pub fn information_gain(ds: &Dataset<'_>, column: &str, class_column: &str) -> Result<f64> {
    let idx = ds.schema().index_of(column)?;
    let class_idx = ds.schema().index_of(class_column)?;
    let entropy = class_entropy_at(ds, class_idx);
    let split = if ds.columns()[idx].is_numeric() {
        let threshold = optimize_threshold_at(ds, idx, class_idx);
        attribute_num_entropy_at(ds, idx, class_idx, threshold)
    } else {
        attribute_entropy_at(ds, idx, class_idx)
    };
    Ok(entropy - split)
}

/// # Overview
///
/// Searches for a threshold on numeric `column` with low
/// [`attribute_num_entropy`], hill-climbing from the median row.
///
/// Rows are visited in ascending order of `column`, starting at the median
/// and stepping towards larger values. A step that increases the entropy
/// reverses the walk once, resuming from the position before that step;
/// a second increase, or leaving the rows, ends the search. Steps with
/// equal entropy are accepted. The threshold with the lowest entropy seen
/// is returned.
///
/// Returns 0 for an empty dataset or a categorical column.
pub fn optimize_threshold(ds: &Dataset<'_>, column: &str, class_column: &str) -> Result<f64> {
    let idx = ds.schema().index_of(column)?;
    let class_idx = ds.schema().index_of(class_column)?;
    Ok(optimize_threshold_at(ds, idx, class_idx))
}

pub(crate) fn optimize_threshold_at(ds: &Dataset<'_>, idx: usize, class_idx: usize) -> f64 {
    if ds.is_empty() || !ds.columns()[idx].is_numeric() {
        return 0.0;
    }
    let mut sorted = ds.clone();
    sorted.sort_at(idx, false);
    let values: Vec<f64> = sorted.rows().filter_map(|row| row[idx].as_number()).collect();
    let len = values.len() as isize;

    let mut pos = len / 2;
    let mut best_threshold = values[pos as usize];
    let mut best = attribute_num_entropy_at(ds, idx, class_idx, best_threshold);
    let mut step: isize = 1;

    while step >= -1 && pos + step >= 0 && pos + step < len {
        pos += step;
        let threshold = values[pos as usize];
        let entropy = attribute_num_entropy_at(ds, idx, class_idx, threshold);
        if entropy > best {
            step -= 2;
            pos += step;
        } else {
            best = entropy;
            best_threshold = threshold;
        }
    }
    best_threshold
}

/// # Overview
///
/// Chi-squared statistic of a candidate split.
///
/// For every child and class value the expected count is the parent's
/// count of that class divided by the number of children; the statistic
/// sums `(observed - expected)² / expected`. Class values absent from the
/// parent contribute nothing.
///
/// Returns 0 when there are no children, any child is empty, or the class
/// column is not categorical.
pub fn chi_squared(parent: &Dataset<'_>, children: &[Dataset<'_>], class_column: &str) -> Result<f64> {
    let class_idx = parent.schema().index_of(class_column)?;
    Ok(chi_squared_at(parent, children, class_idx))
}

pub(crate) fn chi_squared_at(parent: &Dataset<'_>, children: &[Dataset<'_>], class_idx: usize) -> f64 {
    if children.is_empty()
        || children.iter().any(Dataset::is_empty)
        || !parent.columns()[class_idx].is_categorical()
    {
        return 0.0;
    }
    let k = children.len() as f64;
    let parent_counts = parent.value_counts_at(class_idx);
    let mut statistic = 0.0;
    for child in children {
        let observed = child.value_counts_at(class_idx);
        for (&total, &seen) in parent_counts.iter().zip(&observed) {
            let expected = total as f64 / k;
            if expected > 0.0 {
                let diff = seen as f64 - expected;
                statistic += diff * diff / expected;
            }
        }
    }
    statistic
}

fn entropy_of_counts(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    -counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * p.ln()
        })
        .sum::<f64>()
}

fn weighted_entropy(groups: &[Vec<usize>], total: usize) -> f64 {
    let n = total as f64;
    groups
        .iter()
        .map(|counts| {
            let size: usize = counts.iter().sum();
            (size as f64 / n) * entropy_of_counts(counts, size)
        })
        .sum()
}

fn numeric_column(ds: &Dataset<'_>, column: &str) -> Result<usize> {
    let idx = ds.schema().index_of(column)?;
    if !ds.columns()[idx].is_numeric() {
        return Err(Error::NotNumeric {
            field: column.to_string()
        });
    }
    Ok(idx)
}
