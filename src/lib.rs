//! # Entropy Tree
//!
//! Decision tree classifier with entropy-based induction, a chi-squared
//! significance gate on splits, and reduced-error pruning.
//!
//! Data lives in a [`DataTable`] loaded from CSV or built record by record.
//! Columns are numeric or categorical; categorical values are interned per
//! column and compared by [`ValueId`]. Algorithms work on [`Dataset`] views,
//! which select rows of a table without copying them.
//!
//! # Features
//!
//! - `parallel`: Parallel batch classification and scoring via rayon
//! - `serde`: Serialization of [`Config`] and [`Verbosity`]
//!
//! # Examples
//!
//! ```
//! use entropy_tree::{Config, DataTable, DecisionTree, rng_from_seed, sample_dataset};
//!
//! let csv = "size,label\n1,no\n2,no\n3,yes\n4,yes\n5,yes\n6,no\n";
//! let table = DataTable::from_csv_reader(csv.as_bytes()).unwrap();
//! let all = table.view();
//!
//! let train = sample_dataset(&all, 4, "label", &mut rng_from_seed(42)).unwrap();
//!
//! let config = Config::builder().class_column("label").significance(0.0).build().unwrap();
//! let mut tree = DecisionTree::fit(&train, &config).unwrap();
//! tree.prune(&all).unwrap();
//!
//! let score = tree.score(&all).unwrap();
//! assert!((0.0..=1.0).contains(&score));
//! println!("{}", tree.display(table.schema()));
//! ```

mod config;
mod dataset;
pub mod error;
mod ingest;
mod label;
mod logger;
mod model;
mod prune;
mod report;
mod sample;
pub mod stats;
mod tree;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use config::{Config, ConfigBuilder, DEFAULT_SIGNIFICANCE};
pub use dataset::{Cell, DataTable, Dataset, reducers};
pub use error::{Error, Result};
pub use label::{Column, Kind, MAX_NAME_LEN, Schema, ValueId};
pub use logger::Verbosity;
pub use model::Classifier;
pub use report::{DatasetSummary, TreeDisplay};
pub use sample::{FastRng, rng_from_entropy, rng_from_seed, sample_dataset};
pub use tree::{DecisionTree, Node};
