//! Column metadata and categorical value interning.
//!
//! Every distinct string seen in a categorical column is stored once in that
//! column's value list. Rows refer to it by [`ValueId`], the value's position
//! in the list, so categorical equality is an integer comparison.

use crate::error::{Error, Result};

/// Longest column or value name kept, in bytes.
pub const MAX_NAME_LEN: usize = 63;

/// # Overview
///
/// Type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Numeric,
    Categorical
}

/// # Overview
///
/// Interned categorical value: index into its column's value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId(u32);

impl ValueId {
    #[inline]
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// # Overview
///
/// One dataset column: its name, kind and (if categorical) its interned
/// values in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name:   String,
    kind:   Kind,
    values: Vec<String>
}

impl Column {
    /// # Overview
    ///
    /// Creates a column. Names longer than [`MAX_NAME_LEN`] are truncated.
    pub fn new(name: &str, kind: Kind) -> Self {
        Self {
            name: bounded(name),
            kind,
            values: Vec::new()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.kind == Kind::Numeric
    }

    #[inline]
    pub fn is_categorical(&self) -> bool {
        self.kind == Kind::Categorical
    }

    /// Interned values in first-seen order.
    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn n_values(&self) -> usize {
        self.values.len()
    }

    /// Iterates over value ids in list order.
    pub fn value_ids(&self) -> impl Iterator<Item = ValueId> + '_ {
        (0..self.values.len()).map(ValueId::new)
    }

    /// Returns the text of an interned value.
    #[inline]
    pub fn value_name(&self, id: ValueId) -> Option<&str> {
        self.values.get(id.index()).map(String::as_str)
    }

    /// # Overview
    ///
    /// Looks up an already interned value by string equality.
    pub fn find_value(&self, text: &str) -> Option<ValueId> {
        let text = truncate(text);
        self.values
            .iter()
            .position(|v| v == text)
            .map(ValueId::new)
    }

    /// # Overview
    ///
    /// Returns the id for `text`, appending a new value if it was never seen.
    pub(crate) fn intern(&mut self, text: &str) -> ValueId {
        match self.find_value(text) {
            Some(id) => id,
            None => {
                self.values.push(bounded(text));
                ValueId::new(self.values.len() - 1)
            }
        }
    }

    pub(crate) fn set_kind(&mut self, kind: Kind) {
        self.kind = kind;
    }
}

/// # Overview
///
/// Ordered list of columns shared by a table and every view derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<Column>
}

impl Schema {
    /// # Overview
    ///
    /// Creates a schema of categorical columns with the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        Self {
            columns: names
                .into_iter()
                .map(|n| Column::new(n.as_ref(), Kind::Categorical))
                .collect()
        }
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// # Overview
    ///
    /// Position of the column named `name` (exact, case-sensitive match).
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = truncate(name);
        self.columns.iter().position(|c| c.name == name)
    }

    /// # Overview
    ///
    /// Like [`Schema::position`], failing with `FieldNotFound`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| Error::FieldNotFound {
            field: name.to_string()
        })
    }

    /// Column named `name`.
    pub fn column_by_name(&self, name: &str) -> Result<&Column> {
        self.index_of(name).map(|i| &self.columns[i])
    }

    /// # Overview
    ///
    /// Interns `text` under the categorical column `column`.
    pub fn intern(&mut self, column: &str, text: &str) -> Result<ValueId> {
        let idx = self.index_of(column)?;
        self.intern_at(idx, text)
    }

    pub(crate) fn intern_at(&mut self, index: usize, text: &str) -> Result<ValueId> {
        let col = &mut self.columns[index];
        if !col.is_categorical() {
            return Err(Error::NotCategorical {
                field: col.name.clone()
            });
        }
        Ok(col.intern(text))
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }
}

fn truncate(text: &str) -> &str {
    if text.len() <= MAX_NAME_LEN {
        return text;
    }
    let mut end = MAX_NAME_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn bounded(text: &str) -> String {
    truncate(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_reuses_existing_value() {
        let mut schema = Schema::new(["colour", "label"]);

        let red = schema.intern("colour", "red").unwrap();
        let blue = schema.intern("colour", "blue").unwrap();
        let red_again = schema.intern("colour", "red").unwrap();

        assert_eq!(red, red_again);
        assert_ne!(red, blue);
        assert_eq!(schema.columns()[0].values(), ["red", "blue"]);
    }

    #[test]
    fn intern_on_numeric_column_fails() {
        let mut schema = Schema::new(["size"]);
        schema.column_mut(0).set_kind(Kind::Numeric);

        assert_eq!(
            schema.intern("size", "1"),
            Err(Error::NotCategorical {
                field: "size".into()
            })
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let schema = Schema::new(["Colour"]);

        assert_eq!(schema.position("Colour"), Some(0));
        assert_eq!(schema.position("colour"), None);
        assert!(matches!(schema.index_of("colour"), Err(Error::FieldNotFound { .. })));
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "x".repeat(100);
        let schema = Schema::new([long.as_str()]);

        assert_eq!(schema.columns()[0].name().len(), MAX_NAME_LEN);
        assert_eq!(schema.position(&long), Some(0));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let name = "é".repeat(40);
        let col = Column::new(&name, Kind::Categorical);

        assert!(col.name().len() <= MAX_NAME_LEN);
        assert!(col.name().chars().all(|c| c == 'é'));
    }

    #[test]
    fn value_ids_follow_list_order() {
        let mut schema = Schema::new(["c"]);
        schema.intern("c", "a").unwrap();
        schema.intern("c", "b").unwrap();

        let col = &schema.columns()[0];
        let ids: Vec<usize> = col.value_ids().map(ValueId::index).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(col.value_name(ValueId::new(1)), Some("b"));
        assert_eq!(col.value_name(ValueId::new(2)), None);
    }
}
