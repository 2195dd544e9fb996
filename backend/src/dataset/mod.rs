//! In-memory dataset and the occurrence counting engine.
//!
//! A [`Dataset`] is loaded once from a CSV file and never mutated afterwards.
//! Requests share it through an `Arc` and only ever read from it.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use tally::Dataset;
//!
//! let csv = b"name,borough\nRex,Brooklyn\nFido,Queens\nRex,Queens\n";
//! let dataset = Dataset::from_bytes(csv, None).unwrap();
//!
//! let mut constraints = BTreeMap::new();
//! constraints.insert("name".to_string(), "rex".to_string());
//! assert_eq!(dataset.occurrences(&constraints), 2);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{DatasetError, DatasetResult};
use crate::parser::{parse_bytes, Table};

/// Column name to expected value. Ordered so the comparison tuple has a
/// stable column order.
pub type Constraints = BTreeMap<String, String>;

/// One data row. Cells line up with [`Dataset::columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    cells: Vec<String>,
}

impl Record {
    /// Cell values in column order
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Immutable table of string records with a fixed column list.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    /// Lowercased column name -> position in `columns`
    index: HashMap<String, usize>,
    records: Vec<Record>,
}

impl Dataset {
    /// Load a dataset from a CSV file, auto-detecting encoding and delimiter.
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        Self::load_with_delimiter(path, None)
    }

    /// Load a dataset from a CSV file with an optional delimiter override.
    pub fn load_with_delimiter(path: impl AsRef<Path>, delimiter: Option<u8>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(&bytes, delimiter)
    }

    /// Build a dataset from raw CSV bytes.
    pub fn from_bytes(bytes: &[u8], delimiter: Option<u8>) -> DatasetResult<Self> {
        let table = parse_bytes(bytes, delimiter)?;
        let encoding = table.encoding.clone();
        let delimiter = table.delimiter;

        let dataset = Self::from_table(table)?;

        tracing::info!(
            records = dataset.len(),
            columns = dataset.columns.len(),
            encoding = %encoding,
            delimiter = %(delimiter as char).escape_default(),
            "loaded {} records",
            dataset.len()
        );

        Ok(dataset)
    }

    /// Build a dataset from an already parsed table.
    ///
    /// Fails when the table has no data rows, when a row's width differs
    /// from the header's, or when two column names are equal ignoring case.
    pub fn from_table(table: Table) -> DatasetResult<Self> {
        let Table { headers, rows, .. } = table;

        if rows.is_empty() {
            return Err(DatasetError::Malformed(
                "CSV has a header but no data rows".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(headers.len());
        for (position, column) in headers.iter().enumerate() {
            if index.insert(column.to_lowercase(), position).is_some() {
                return Err(DatasetError::Malformed(format!(
                    "duplicate column name '{}'",
                    column
                )));
            }
        }

        if let Some(row) = rows.iter().position(|cells| cells.len() != headers.len()) {
            return Err(DatasetError::Malformed(format!(
                "row {} has {} cells, expected {}",
                row + 1,
                rows[row].len(),
                headers.len()
            )));
        }

        let records = rows.into_iter().map(|cells| Record { cells }).collect();

        Ok(Self {
            columns: headers,
            index,
            records,
        })
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Case-insensitive column membership.
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Cell of record `row` in `column` (case-insensitive).
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let position = *self.index.get(&column.to_lowercase())?;
        self.records
            .get(row)
            .map(|record| record.cells[position].as_str())
    }

    /// Count records matching every constraint, ignoring case.
    ///
    /// Keys are expected to be known columns; this does not validate them.
    /// A key naming no column can never match, so the count is 0. An empty
    /// constraint map matches every record.
    ///
    /// Each record contributes the tuple of its lowercased cells for the
    /// constrained columns, which must equal the tuple of lowercased
    /// expected values as a whole.
    pub fn occurrences(&self, constraints: &Constraints) -> usize {
        let lowered: Constraints = constraints
            .iter()
            .map(|(column, value)| (column.to_lowercase(), value.to_lowercase()))
            .collect();

        let mut positions = Vec::with_capacity(lowered.len());
        for column in lowered.keys() {
            match self.index.get(column) {
                Some(&position) => positions.push(position),
                None => return 0,
            }
        }

        let expected: Vec<&str> = lowered.values().map(String::as_str).collect();

        self.records
            .iter()
            .filter(|record| {
                positions
                    .iter()
                    .map(|&position| record.cells[position].to_lowercase())
                    .eq(expected.iter().copied())
            })
            .count()
    }
}
