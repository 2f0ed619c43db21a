//! Human-readable rendering of trees and datasets.

use core::fmt;

use crate::{
    dataset::Dataset,
    label::{Kind, Schema},
    stats,
    tree::{DecisionTree, Node}
};

/// # Overview
///
/// Indented view of a tree, one line per node.
///
/// Split nodes print their column in brackets, followed by one arrow line
/// per branch (`<=(t)->` and ` >(t)->` for numeric splits, `(value)->` for
/// categorical ones). Leaves print their class in brackets followed by `*`.
/// Each level of depth adds a tab.
pub struct TreeDisplay<'a> {
    tree:   &'a DecisionTree,
    schema: &'a Schema
}

impl DecisionTree {
    /// # Overview
    ///
    /// Renders the tree using `schema` to name categorical values.
    ///
    /// # Examples
    ///
    /// ```
    /// use entropy_tree::{DataTable, DecisionTree, Node};
    ///
    /// let mut table = DataTable::with_columns(["x", "label"]);
    /// table.push_record(["1", "no"]).unwrap();
    /// table.push_record(["3", "yes"]).unwrap();
    /// let no = table.schema().columns()[1].find_value("no").unwrap();
    /// let yes = table.schema().columns()[1].find_value("yes").unwrap();
    ///
    /// let tree = DecisionTree::from_root(
    ///     Node::Numeric {
    ///         column:    "x".into(),
    ///         threshold: 2.0,
    ///         children:  vec![Node::leaf(no), Node::leaf(yes)]
    ///     },
    ///     "label"
    /// );
    ///
    /// let text = tree.display(table.schema()).to_string();
    /// assert_eq!(text, "[x]\n  <=(2.00)->\n\t[no]*\n   >(2.00)->\n\t[yes]*\n");
    /// ```
    pub fn display<'a>(&'a self, schema: &'a Schema) -> TreeDisplay<'a> {
        TreeDisplay {
            tree: self,
            schema
        }
    }
}

impl TreeDisplay<'_> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &Node, level: usize) -> fmt::Result {
        let indent = "\t".repeat(level);
        match node {
            Node::Leaf {
                class
            } => {
                let name = self
                    .schema
                    .column_by_name(self.tree.class_column())
                    .ok()
                    .and_then(|c| c.value_name(*class));
                match name {
                    Some(name) => writeln!(f, "{indent}[{name}]*"),
                    None => writeln!(f, "{indent}[#{}]*", class.index())
                }
            }
            Node::Numeric {
                column,
                threshold,
                children
            } => {
                writeln!(f, "{indent}[{column}]")?;
                for (child, arrow) in children.iter().zip(["  <=", "   >"]) {
                    writeln!(f, "{indent}{arrow}({threshold:.2})->")?;
                    self.write_node(f, child, level + 1)?;
                }
                Ok(())
            }
            Node::Categorical {
                column,
                children
            } => {
                writeln!(f, "{indent}[{column}]")?;
                let values = self.schema.column_by_name(column).ok();
                for (i, child) in children.iter().enumerate() {
                    match values.and_then(|c| c.values().get(i)) {
                        Some(value) => writeln!(f, "{indent}  ({value})->")?,
                        None => writeln!(f, "{indent}  (#{i})->")?
                    }
                    self.write_node(f, child, level + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.tree.root(), 0)
    }
}

/// # Overview
///
/// Per-column description of a dataset: row count, then mean and standard
/// deviation of numeric columns, or value counts of categorical ones.
pub struct DatasetSummary<'a, 't> {
    ds: &'a Dataset<'t>
}

impl<'t> Dataset<'t> {
    /// # Overview
    ///
    /// Summary of this view for printing.
    ///
    /// # Examples
    ///
    /// ```
    /// use entropy_tree::DataTable;
    ///
    /// let mut table = DataTable::with_columns(["colour"]);
    /// table.push_record(["red"]).unwrap();
    /// table.push_record(["red"]).unwrap();
    ///
    /// let text = table.view().summary().to_string();
    /// assert!(text.contains("red (count: 2)"));
    /// ```
    pub fn summary(&self) -> DatasetSummary<'_, 't> {
        DatasetSummary {
            ds: self
        }
    }
}

impl fmt::Display for DatasetSummary<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ds = self.ds;
        writeln!(f, "Length: {}", ds.len())?;
        for (idx, column) in ds.columns().iter().enumerate() {
            writeln!(f, "Field \"{}\":", column.name())?;
            match column.kind() {
                Kind::Numeric => {
                    writeln!(f, "\t*Type: Numerical")?;
                    if let (Ok(mean), Ok(sd)) =
                        (stats::mean(ds, column.name()), stats::std_dev(ds, column.name()))
                    {
                        writeln!(f, "\t*Mean: {mean:.4}")?;
                        writeln!(f, "\t*Standard deviation: {sd:.4}")?;
                    }
                }
                Kind::Categorical => {
                    writeln!(f, "\t*Type: Categorical")?;
                    write!(f, "\t*Labels: [ ")?;
                    let counts = ds.value_counts_at(idx);
                    for (value, count) in column.values().iter().zip(counts) {
                        write!(f, "{value} (count: {count}) ")?;
                    }
                    writeln!(f, "]")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataTable, ValueId};

    #[test]
    fn categorical_tree_layout() {
        let mut table = DataTable::with_columns(["colour", "label"]);
        table.push_record(["red", "yes"]).unwrap();
        table.push_record(["blue", "no"]).unwrap();
        let tree = DecisionTree::from_root(
            Node::Categorical {
                column:   "colour".into(),
                children: vec![Node::leaf(ValueId::new(0)), Node::leaf(ValueId::new(1))]
            },
            "label"
        );

        let text = tree.display(table.schema()).to_string();

        assert_eq!(text, "[colour]\n  (red)->\n\t[yes]*\n  (blue)->\n\t[no]*\n");
    }

    #[test]
    fn nested_levels_are_indented() {
        let mut table = DataTable::with_columns(["x", "label"]);
        table.push_record(["1", "a"]).unwrap();
        let a = ValueId::new(0);
        let tree = DecisionTree::from_root(
            Node::Numeric {
                column:    "x".into(),
                threshold: 0.5,
                children:  vec![Node::leaf(a), Node::Numeric {
                    column:    "x".into(),
                    threshold: 1.5,
                    children:  vec![Node::leaf(a), Node::leaf(ValueId::new(9))]
                }]
            },
            "label"
        );

        let text = tree.display(table.schema()).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[4], "\t[x]");
        assert_eq!(lines[5], "\t  <=(1.50)->");
        assert_eq!(lines[8], "\t\t[#9]*");
    }

    #[test]
    fn summary_lists_numeric_stats() {
        let mut table = DataTable::with_columns(["size", "colour"]);
        table.push_record(["1", "red"]).unwrap();
        table.push_record(["3", "blue"]).unwrap();

        let text = table.view().summary().to_string();

        assert!(text.starts_with("Length: 2\n"));
        assert!(text.contains("\t*Type: Numerical\n\t*Mean: 2.0000\n"));
        assert!(text.contains("\t*Standard deviation: 1.0000\n"));
        assert!(text.contains("[ red (count: 1) blue (count: 1) ]"));
    }
}
