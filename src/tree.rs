//! Decision tree nodes, induction, classification and scoring.

use crate::{
    config::Config,
    dataset::{Cell, Dataset, is_at_most},
    error::{Error, Result},
    label::{Schema, ValueId},
    logger::{Logger, Verbosity},
    stats::{
        attribute_entropy_at, attribute_num_entropy_at, chi_squared_at, class_entropy_at,
        optimize_threshold_at
    }
};

/// # Overview
///
/// A node of a decision tree.
///
/// Numeric splits have exactly two children, `[<= threshold, > threshold]`.
/// Categorical splits have one child per interned value of their column,
/// in value-list order, so a row's [`ValueId`] indexes the child it takes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf {
        class: ValueId
    },
    Numeric {
        column:    String,
        threshold: f64,
        children:  Vec<Node>
    },
    Categorical {
        column:   String,
        children: Vec<Node>
    }
}

impl Node {
    #[inline]
    pub fn leaf(class: ValueId) -> Self {
        Self::Leaf {
            class
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Predicted class of a leaf.
    #[inline]
    pub fn class(&self) -> Option<ValueId> {
        match self {
            Self::Leaf {
                class
            } => Some(*class),
            _ => None
        }
    }

    /// Column a split node decides on.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Leaf {
                ..
            } => None,
            Self::Numeric {
                column, ..
            }
            | Self::Categorical {
                column, ..
            } => Some(column.as_str())
        }
    }

    /// Threshold of a numeric split.
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Self::Numeric {
                threshold, ..
            } => Some(*threshold),
            _ => None
        }
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Leaf {
                ..
            } => &[],
            Self::Numeric {
                children, ..
            }
            | Self::Categorical {
                children, ..
            } => children
        }
    }

    fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Self::Leaf {
                ..
            } => Default::default(),
            Self::Numeric {
                children, ..
            }
            | Self::Categorical {
                children, ..
            } => children
        }
    }

    /// # Overview
    ///
    /// Number of nodes in this subtree, leaves included.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }

    /// Length of the longest root-to-leaf path (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn n_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children().iter().map(Node::n_leaves).sum()
        }
    }

    /// # Overview
    ///
    /// Follows `row` down to a leaf and returns its class.
    ///
    /// Split columns are located by name in `schema`. Returns `None` when a
    /// column is missing, a cell has the wrong kind, or a categorical value
    /// has no branch (it was interned after this node was built).
    pub fn classify(&self, row: &[Cell], schema: &Schema) -> Option<ValueId> {
        let mut node = self;
        loop {
            node = match node {
                Self::Leaf {
                    class
                } => return Some(*class),
                Self::Numeric {
                    column,
                    threshold,
                    children
                } => {
                    let value = row.get(schema.position(column)?)?.as_number()?;
                    children.get(if value <= *threshold { 0 } else { 1 })?
                }
                Self::Categorical {
                    column,
                    children
                } => {
                    let id = row.get(schema.position(column)?)?.as_value()?;
                    children.get(id.index())?
                }
            };
        }
    }

    /// Rows of `rows` that this split sends down `branch`.
    pub(crate) fn route<'t>(&self, rows: &Dataset<'t>, branch: usize) -> Result<Dataset<'t>> {
        match self {
            Self::Leaf {
                ..
            } => Ok(rows.clone()),
            Self::Numeric {
                column,
                threshold,
                ..
            } => {
                let idx = rows.schema().index_of(column)?;
                let low = branch == 0;
                Ok(rows.select(|row| is_at_most(row[idx], *threshold) == low))
            }
            Self::Categorical {
                column, ..
            } => {
                let idx = rows.schema().index_of(column)?;
                let target = Cell::Value(ValueId::new(branch));
                Ok(rows.select(|row| row[idx] == target))
            }
        }
    }

    pub(crate) fn at(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &branch| node.children().get(branch))
    }

    pub(crate) fn at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &branch in path {
            node = node.children_mut().get_mut(branch)?;
        }
        Some(node)
    }
}

/// # Overview
///
/// A fitted classification tree and the class column it predicts.
///
/// # Examples
///
/// ```
/// use entropy_tree::{Config, DataTable, DecisionTree};
///
/// let mut table = DataTable::with_columns(["colour", "label"]);
/// for (colour, label) in [("red", "yes"), ("red", "yes"), ("blue", "no"), ("blue", "no")] {
///     table.push_record([colour, label]).unwrap();
/// }
///
/// let config = Config::builder().class_column("label").significance(0.0).build().unwrap();
/// let tree = DecisionTree::fit(&table.view(), &config).unwrap();
///
/// assert_eq!(tree.depth(), 1);
/// assert_eq!(tree.score(&table.view()).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root:         Node,
    class_column: String,
    verbosity:    Verbosity
}

impl DecisionTree {
    /// # Overview
    ///
    /// Wraps an existing node as a tree predicting `class_column`.
    pub fn from_root(root: Node, class_column: impl Into<String>) -> Self {
        Self {
            root,
            class_column: class_column.into(),
            verbosity: Verbosity::default()
        }
    }

    /// Sets diagnostic verbosity used by scoring and pruning.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// # Overview
    ///
    /// Induces a tree from `ds`.
    ///
    /// At every node the column with the highest information gain is chosen
    /// (leftmost on ties). The node becomes a leaf predicting the most
    /// frequent class when no column has positive gain, the rows are already
    /// pure, a partition would be empty, or the split's chi-squared
    /// statistic is below `config.significance`.
    pub fn fit(ds: &Dataset<'_>, config: &Config) -> Result<Self> {
        config.validate()?;
        let class_idx = ds.schema().index_of(&config.class_column)?;
        if !ds.columns()[class_idx].is_categorical() {
            return Err(Error::NotCategorical {
                field: config.class_column.clone()
            });
        }
        if ds.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let logger = Logger::new(config.verbosity);
        let grower = Grower {
            class_idx,
            significance: config.significance,
            logger
        };
        let root = grower.grow(ds, 0);
        logger.info(format_args!(
            "fitted tree on {} rows: {} nodes, {} leaves, depth {}",
            ds.len(),
            root.size(),
            root.n_leaves(),
            root.depth()
        ));

        Ok(Self {
            root,
            class_column: config.class_column.clone(),
            verbosity: config.verbosity
        })
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.root
    }

    #[inline]
    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    #[inline]
    pub fn class_column(&self) -> &str {
        &self.class_column
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.root.size()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Predicts the class of one row. See [`Node::classify`].
    #[inline]
    pub fn classify(&self, row: &[Cell], schema: &Schema) -> Option<ValueId> {
        self.root.classify(row, schema)
    }

    /// # Overview
    ///
    /// Fraction of rows in `ds` whose predicted class is their actual class.
    /// Rows that cannot be classified count as wrong.
    pub fn score(&self, ds: &Dataset<'_>) -> Result<f64> {
        let class_idx = ds.schema().index_of(&self.class_column)?;
        if ds.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let tally = tally(&self.root, ds, class_idx);
        if tally.missed > 0 {
            Logger::new(self.verbosity).warn(format_args!(
                "{} of {} rows could not be classified",
                tally.missed,
                ds.len()
            ));
        }
        Ok(tally.correct as f64 / ds.len() as f64)
    }

    /// # Overview
    ///
    /// Most frequent class predicted over the rows of `ds`, first in value
    /// order on ties. `None` if no row could be classified.
    pub fn most_frequent_prediction(&self, ds: &Dataset<'_>) -> Option<ValueId> {
        let class_idx = ds.schema().position(&self.class_column)?;
        let mut counts = vec![0usize; ds.columns()[class_idx].n_values()];
        for row in ds.rows() {
            if let Some(slot) = self
                .classify(row, ds.schema())
                .and_then(|id| counts.get_mut(id.index()))
            {
                *slot += 1;
            }
        }
        first_max(&counts).map(ValueId::new)
    }
}

/// Correct and unclassifiable row counts.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    pub(crate) correct: usize,
    pub(crate) missed:  usize
}

pub(crate) fn tally(root: &Node, ds: &Dataset<'_>, class_idx: usize) -> Tally {
    let schema = ds.schema();
    ds.rows().fold(Tally::default(), |mut acc, row| {
        match root.classify(row, schema) {
            Some(predicted) if row[class_idx].as_value() == Some(predicted) => acc.correct += 1,
            Some(_) => {}
            None => acc.missed += 1
        }
        acc
    })
}

/// Most frequent class of `ds`, first in value order on ties.
pub(crate) fn majority_class(ds: &Dataset<'_>, class_idx: usize) -> ValueId {
    first_max(&ds.value_counts_at(class_idx))
        .map(ValueId::new)
        .unwrap_or(ValueId::new(0))
}

fn first_max(counts: &[usize]) -> Option<usize> {
    let mut best = None;
    let mut max = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > max {
            max = count;
            best = Some(i);
        }
    }
    best
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    column:    usize,
    gain:      f64,
    threshold: Option<f64>
}

struct Grower {
    class_idx:    usize,
    significance: f64,
    logger:       Logger
}

impl Grower {
    fn grow(&self, ds: &Dataset<'_>, depth: usize) -> Node {
        let Some(candidate) = self.best_candidate(ds) else {
            return self.leaf(ds);
        };
        let column = &ds.columns()[candidate.column];

        let parts = match candidate.threshold {
            Some(threshold) => ds.split_at_threshold(candidate.column, threshold).to_vec(),
            None => ds.partition_by_value(candidate.column)
        };
        if parts.iter().any(Dataset::is_empty) {
            self.logger.debug(format_args!(
                "depth {depth}: split on \"{}\" leaves a partition empty, making a leaf",
                column.name()
            ));
            return self.leaf(ds);
        }

        let chi = chi_squared_at(ds, &parts, self.class_idx);
        if chi < self.significance {
            self.logger.debug(format_args!(
                "depth {depth}: split on \"{}\" rejected (chi-squared {chi:.4} < {})",
                column.name(),
                self.significance
            ));
            return self.leaf(ds);
        }

        self.logger.debug(format_args!(
            "depth {depth}: split on \"{}\" (gain {:.4}, chi-squared {chi:.4}, {} rows)",
            column.name(),
            candidate.gain,
            ds.len()
        ));
        let children = parts.iter().map(|part| self.grow(part, depth + 1)).collect();
        match candidate.threshold {
            Some(threshold) => Node::Numeric {
                column: column.name().to_string(),
                threshold,
                children
            },
            None => Node::Categorical {
                column: column.name().to_string(),
                children
            }
        }
    }

    fn best_candidate(&self, ds: &Dataset<'_>) -> Option<Candidate> {
        let entropy = class_entropy_at(ds, self.class_idx);
        if entropy == 0.0 {
            return None;
        }

        let mut best = None;
        let mut max_gain = 0.0;
        for (idx, column) in ds.columns().iter().enumerate() {
            if idx == self.class_idx {
                continue;
            }
            let (split_entropy, threshold) = if column.is_numeric() {
                let threshold = optimize_threshold_at(ds, idx, self.class_idx);
                (
                    attribute_num_entropy_at(ds, idx, self.class_idx, threshold),
                    Some(threshold)
                )
            } else {
                (attribute_entropy_at(ds, idx, self.class_idx), None)
            };
            let gain = entropy - split_entropy;
            if gain > max_gain {
                max_gain = gain;
                best = Some(Candidate {
                    column: idx,
                    gain,
                    threshold
                });
            }
        }
        best
    }

    fn leaf(&self, ds: &Dataset<'_>) -> Node {
        Node::leaf(majority_class(ds, self.class_idx))
    }
}
