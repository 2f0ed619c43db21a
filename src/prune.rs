//! Reduced-error pruning against a validation set.
//!
//! A pass walks the tree depth-first. Each split node whose children are all
//! leaves, or whose validation rows leave one of its subtrees unreached, is
//! tentatively replaced by a leaf predicting the majority class of the
//! validation rows that reach it. The replacement is kept when the
//! validation accuracy of the whole tree does not drop. Passes repeat until
//! one makes no change.

use core::mem;

use crate::{
    dataset::Dataset,
    error::Result,
    logger::Logger,
    tree::{DecisionTree, Node, majority_class, tally}
};

/// Outcome of pruning one node.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PruneStep {
    Kept,
    /// Children were leaves predicting one class and were merged.
    Simplified,
    Replaced {
        improvement: f64
    }
}

impl PruneStep {
    #[inline]
    fn changed(self) -> bool {
        self != Self::Kept
    }

    /// Accuracy gained by the step; merging identical leaves reports -1.
    #[inline]
    fn improvement(self) -> f64 {
        match self {
            Self::Kept => 0.0,
            Self::Simplified => -1.0,
            Self::Replaced {
                improvement
            } => improvement
        }
    }
}

impl DecisionTree {
    /// # Overview
    ///
    /// Prunes the tree in place against `validation` and returns the summed
    /// accuracy improvement of all replacements.
    ///
    /// A leaf, or an empty validation set, is left alone and gives `0.0`.
    /// Running it again on the same data returns `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use entropy_tree::{DataTable, DecisionTree, Node, ValueId};
    ///
    /// let mut table = DataTable::with_columns(["x", "label"]);
    /// table.push_record(["a", "yes"]).unwrap();
    /// table.push_record(["b", "yes"]).unwrap();
    ///
    /// let yes = ValueId::new(0);
    /// let split = Node::Categorical {
    ///     column:   "x".into(),
    ///     children: vec![Node::leaf(yes), Node::leaf(yes)]
    /// };
    /// let mut tree = DecisionTree::from_root(split, "label");
    ///
    /// tree.prune(&table.view()).unwrap();
    /// assert_eq!(tree.root(), &Node::leaf(yes));
    /// ```
    pub fn prune(&mut self, validation: &Dataset<'_>) -> Result<f64> {
        let class_idx = validation.schema().index_of(self.class_column())?;
        if validation.is_empty() || self.root().is_leaf() {
            return Ok(0.0);
        }

        let logger = Logger::new(self.verbosity());
        let mut total = 0.0;
        let mut pass = 0;
        loop {
            pass += 1;
            let mut pruner = Pruner {
                validation,
                class_idx,
                logger,
                changes: 0,
                improvement: 0.0
            };
            let mut path = Vec::new();
            let step = pruner.visit(self.root_mut(), &mut path, validation)?;
            pruner.record(step);

            let score = tally(self.root(), validation, class_idx).correct as f64
                / validation.len() as f64;
            logger.info(format_args!(
                "pruning pass {pass}: {} changes, score {score:.4}, improvement {:.4}, {} nodes left",
                pruner.changes,
                pruner.improvement,
                self.size()
            ));
            if pruner.changes == 0 {
                break;
            }
            total += pruner.improvement;
        }
        Ok(total)
    }
}

struct Pruner<'a, 't> {
    validation:  &'a Dataset<'t>,
    class_idx:   usize,
    logger:      Logger,
    changes:     usize,
    improvement: f64
}

impl Pruner<'_, '_> {
    fn record(&mut self, step: PruneStep) {
        if step.changed() {
            self.changes += 1;
        }
        let improvement = step.improvement();
        if improvement > 0.0 {
            self.improvement += improvement;
        }
    }

    /// Prunes the node at `path`, reached by `rows`.
    fn visit(
        &mut self,
        root: &mut Node,
        path: &mut Vec<usize>,
        rows: &Dataset<'_>
    ) -> Result<PruneStep> {
        let n_children = match root.at(path) {
            Some(node) if !node.is_leaf() && !rows.is_empty() => node.children().len(),
            _ => return Ok(PruneStep::Kept)
        };

        let mut prune_anyway = false;
        for branch in 0..n_children {
            let Some(node) = root.at(path) else {
                break;
            };
            if node.children()[branch].is_leaf() {
                continue;
            }
            let reaching = node.route(rows, branch)?;
            if reaching.is_empty() {
                prune_anyway = true;
                continue;
            }

            path.push(branch);
            loop {
                let step = self.visit(root, path, &reaching)?;
                self.record(step);
                if !step.changed() {
                    break;
                }
            }
            path.pop();
        }

        let Some(node) = root.at(path) else {
            return Ok(PruneStep::Kept);
        };
        let children = node.children();
        if children.iter().all(Node::is_leaf) {
            let first = children.first().and_then(Node::class);
            if let Some(class) = first
                && children.iter().all(|c| c.class() == first)
            {
                if let Some(slot) = root.at_mut(path) {
                    *slot = Node::leaf(class);
                }
                self.logger.debug(format_args!(
                    "node {path:?}: merged leaves predicting class {}",
                    class.index()
                ));
                return Ok(PruneStep::Simplified);
            }
            self.try_replace(root, path, rows)
        } else if prune_anyway {
            self.try_replace(root, path, rows)
        } else {
            Ok(PruneStep::Kept)
        }
    }

    fn try_replace(&self, root: &mut Node, path: &[usize], rows: &Dataset<'_>) -> Result<PruneStep> {
        let before = tally(root, self.validation, self.class_idx).correct;
        let class = majority_class(rows, self.class_idx);
        let leaf = Node::leaf(class);
        let Some(slot) = root.at_mut(path) else {
            return Ok(PruneStep::Kept);
        };
        let previous = mem::replace(slot, leaf);

        let after = tally(root, self.validation, self.class_idx).correct;
        if after < before {
            if let Some(slot) = root.at_mut(path) {
                *slot = previous;
            }
            self.logger.debug(format_args!(
                "node {path:?}: leaf rejected ({after} < {before} correct)"
            ));
            return Ok(PruneStep::Kept);
        }
        self.logger.debug(format_args!(
            "node {path:?}: replaced by leaf of class {} ({before} -> {after} correct)",
            class.index()
        ));
        Ok(PruneStep::Replaced {
            improvement: (after - before) as f64 / self.validation.len() as f64
        })
    }
}
