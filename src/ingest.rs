//! Loading tables from delimited text.
//!
//! The first record supplies column names. Every column starts categorical;
//! a column whose value in the first data record parses as a number becomes
//! numeric for good, and any later non-numeric token in it is an error.

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    dataset::{Cell, DataTable},
    error::{Error, Result},
    label::{Kind, Schema}
};

impl DataTable {
    /// # Overview
    ///
    /// Reads a comma-separated file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::Csv(format!("failed to open {}: {e}", path.as_ref().display()))
        })?;
        Self::from_csv_reader(file)
    }

    /// # Overview
    ///
    /// Reads comma-separated records with a header row from any reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use entropy_tree::{DataTable, Kind};
    ///
    /// let csv = "x,colour\n1.5,red\n-2,blue\n";
    /// let table = DataTable::from_csv_reader(csv.as_bytes()).unwrap();
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.schema().columns()[0].kind(), Kind::Numeric);
    /// assert_eq!(table.schema().columns()[1].kind(), Kind::Categorical);
    /// ```
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv_reader(reader);
        let headers = read_headers(&mut rdr)?;
        let mut table = DataTable::with_columns(headers.iter());
        table.read_records(&mut rdr)?;
        Ok(table)
    }

    /// # Overview
    ///
    /// Reads records against an existing schema, typically the one of the
    /// training table, so categorical ids line up between the two tables.
    /// Header names must match the schema's columns in order.
    pub fn from_csv_reader_with_schema<R: Read>(reader: R, schema: Schema) -> Result<Self> {
        let mut rdr = csv_reader(reader);
        let headers = read_headers(&mut rdr)?;
        if headers.len() != schema.len() {
            return Err(Error::RecordLength {
                line:     1,
                expected: schema.len(),
                got:      headers.len()
            });
        }
        for (header, column) in headers.iter().zip(schema.columns()) {
            if schema.position(header) != schema.position(column.name()) {
                return Err(Error::FieldNotFound {
                    field: header.to_string()
                });
            }
        }
        let mut table = DataTable::with_schema(schema);
        table.read_records(&mut rdr)?;
        Ok(table)
    }

    /// # Overview
    ///
    /// Appends one record, typing columns from it if it is the first.
    pub fn push_record<I, S>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let line = self.rows.len() + 2;
        let fields: Vec<S> = record.into_iter().collect();
        let fields: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        self.push_fields(line, &fields)
    }

    fn read_records<R: Read>(&mut self, rdr: &mut csv::Reader<R>) -> Result<()> {
        let mut record = StringRecord::new();
        while rdr.read_record(&mut record)? {
            let line = record
                .position()
                .map_or(self.rows.len() + 2, |p| p.line() as usize);
            let fields: Vec<&str> = record.iter().collect();
            self.push_fields(line, &fields)?;
        }
        Ok(())
    }

    fn push_fields(&mut self, line: usize, fields: &[&str]) -> Result<()> {
        let n_columns = self.schema.len();
        if fields.len() != n_columns {
            return Err(Error::RecordLength {
                line,
                expected: n_columns,
                got: fields.len()
            });
        }

        if self.rows.is_empty() && !self.typed {
            for (idx, field) in fields.iter().enumerate() {
                if parse_number(field).is_some() {
                    self.schema.column_mut(idx).set_kind(Kind::Numeric);
                }
            }
        }

        for (column, field) in self.schema.columns().iter().zip(fields) {
            if column.is_numeric() && parse_number(field).is_none() {
                return Err(Error::InvalidNumber {
                    line,
                    field: column.name().to_string(),
                    value: field.to_string()
                });
            }
        }

        let mut row = Vec::with_capacity(n_columns);
        for (idx, field) in fields.iter().enumerate() {
            let cell = match parse_number(field) {
                Some(v) if self.schema.columns()[idx].is_numeric() => Cell::Number(v),
                _ => Cell::Value(self.schema.intern_at(idx, field)?)
            };
            row.push(cell);
        }
        self.rows.push(row);
        self.typed = true;
        Ok(())
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn read_headers<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<String>> {
    let mut record = StringRecord::new();
    if !rdr.read_record(&mut record)? || record.iter().all(str::is_empty) {
        return Err(Error::MissingHeader);
    }
    Ok(record.iter().map(str::to_string).collect())
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}
