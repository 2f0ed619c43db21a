//! Stratified sampling and the seedable RNG it is driven by.

use rand::{Rng, SeedableRng, seq::index};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    dataset::Dataset,
    error::{Error, Result}
};

/// Fast seedable RNG for [`sample_dataset`] and synthetic data.
pub type FastRng = Xoshiro256PlusPlus;

/// # Overview
///
/// RNG seeded from a u64 value, so a sample can be drawn again.
#[inline]
pub fn rng_from_seed(seed: u64) -> FastRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// RNG seeded from the thread-local generator.
#[inline]
pub fn rng_from_entropy() -> FastRng {
    Xoshiro256PlusPlus::from_rng(&mut rand::rng())
}

/// # Overview
///
/// Draws about `target` rows from `ds` without replacement, keeping the
/// class proportions of `class_column`.
///
/// Each class contributes `round(target * p)` rows, where `p` is its share
/// of `ds`, capped at the number of rows it has. The result groups rows by
/// class in value order; within a class the rows keep their order in `ds`.
/// The returned view refers to the same rows as `ds`.
///
/// # Errors
///
/// `FieldNotFound` for an unknown column, `NotCategorical` for a numeric
/// one and `EmptyDataset` when `ds` has no rows.
///
/// # Examples
///
/// ```
/// use entropy_tree::{DataTable, rng_from_seed, sample_dataset};
///
/// let mut table = DataTable::with_columns(["label"]);
/// for label in ["a", "a", "a", "b"] {
///     table.push_record([label]).unwrap();
/// }
///
/// let mut rng = rng_from_seed(7);
/// let half = sample_dataset(&table.view(), 2, "label", &mut rng).unwrap();
///
/// assert_eq!(half.value_counts("label").unwrap(), vec![2, 1]);
/// ```
pub fn sample_dataset<'t, R>(
    ds: &Dataset<'t>,
    target: usize,
    class_column: &str,
    rng: &mut R
) -> Result<Dataset<'t>>
where
    R: Rng + ?Sized
{
    let class_idx = ds.schema().index_of(class_column)?;
    if !ds.columns()[class_idx].is_categorical() {
        return Err(Error::NotCategorical {
            field: class_column.to_string()
        });
    }
    if ds.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let total = ds.len() as f64;
    let mut rows = Vec::with_capacity(target.min(ds.len()));
    for group in ds.partition_by_value(class_idx) {
        let available = group.len();
        if available == 0 {
            continue;
        }
        let share = available as f64 / total;
        let take = ((target as f64 * share).round() as usize).min(available);

        let mut picked = index::sample(rng, available, take).into_vec();
        picked.sort_unstable();
        rows.extend(picked.into_iter().map(|pos| group.row_indices()[pos]));
    }
    Ok(Dataset::from_indices(ds.table(), rows))
}
