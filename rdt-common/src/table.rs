//! CSV tables: input job lists, output manifests and result joins
//!
//! Tables are plain header + string cells. Every row is kept at the width
//! of the header row so columns can be addressed by name.

use crate::{Error, Result};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

/// In-memory CSV table with a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Empty table with the given columns
    pub fn with_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Load a comma-separated file with a header row
    pub fn read_csv(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::InvalidInput(format!(
                "File {} not found",
                path.display()
            )));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Self {
            headers,
            rows: Vec::new(),
        };

        for record in csv_reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect());
        }

        Ok(table)
    }

    /// Write the table to `path`, replacing any existing file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)
    }

    /// Serialize the table as CSV
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Fail with [`Error::MissingColumns`] unless every named column exists
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns(missing))
        }
    }

    /// Cell values of one column, in row order
    pub fn column_values<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = &'a str> + 'a> {
        let index = self
            .column_index(name)
            .ok_or_else(|| Error::MissingColumns(vec![name.to_string()]))?;
        Ok(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Left join `right` onto this table
    ///
    /// Every row of `self` is kept. A row with several matches in `right`
    /// appears once per match; a row with none gets empty cells for the
    /// joined columns. Columns of `right` whose names already exist in
    /// `self` (including a shared key column) are not duplicated.
    pub fn left_join(&self, left_on: &str, right: &Table, right_on: &str) -> Result<Table> {
        self.left_join_on(right, &[(left_on, right_on)])
    }

    /// Left join on several `(left column, right column)` pairs
    ///
    /// Rows match only when every pair of cells is equal. A row with a blank
    /// cell in any key column never matches.
    pub fn left_join_on(&self, right: &Table, keys: &[(&str, &str)]) -> Result<Table> {
        let mut left_keys = Vec::with_capacity(keys.len());
        let mut right_keys = Vec::with_capacity(keys.len());
        for (left_on, right_on) in keys {
            left_keys.push(
                self.column_index(left_on)
                    .ok_or_else(|| Error::MissingColumns(vec![left_on.to_string()]))?,
            );
            right_keys.push(
                right
                    .column_index(right_on)
                    .ok_or_else(|| Error::MissingColumns(vec![right_on.to_string()]))?,
            );
        }

        let carried: Vec<usize> = right
            .headers
            .iter()
            .enumerate()
            .filter(|(_, name)| self.column_index(name).is_none())
            .map(|(i, _)| i)
            .collect();

        let mut matches: HashMap<Vec<&str>, Vec<&Vec<String>>> = HashMap::new();
        for row in &right.rows {
            if let Some(key) = join_key(row, &right_keys) {
                matches.entry(key).or_default().push(row);
            }
        }

        let mut headers = self.headers.clone();
        headers.extend(carried.iter().map(|&i| right.headers[i].clone()));
        let mut joined = Table {
            headers,
            rows: Vec::with_capacity(self.rows.len()),
        };

        for row in &self.rows {
            let right_rows = join_key(row, &left_keys).and_then(|key| matches.get(&key));
            match right_rows {
                Some(right_rows) => {
                    for right_row in right_rows {
                        let mut out = row.clone();
                        out.extend(carried.iter().map(|&i| right_row[i].clone()));
                        joined.rows.push(out);
                    }
                }
                None => {
                    let mut out = row.clone();
                    out.resize(joined.headers.len(), String::new());
                    joined.rows.push(out);
                }
            }
        }

        Ok(joined)
    }
}

/// Key cells of a row, or `None` if any is blank
fn join_key<'a>(row: &'a [String], columns: &[usize]) -> Option<Vec<&'a str>> {
    columns
        .iter()
        .map(|&i| Some(row[i].as_str()).filter(|cell| !cell.is_empty()))
        .collect()
}
