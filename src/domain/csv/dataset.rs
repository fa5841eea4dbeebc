// ============================================================
// DATASET
// ============================================================
// Header-addressed table parsed from an uploaded CSV file

use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// A rectangular table of string cells addressed by column name.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset, padding short rows with empty cells.
    ///
    /// Rows wider than the header are rejected.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let width = headers.len();
        let mut normalized = Vec::with_capacity(rows.len());

        for (index, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in row {}, saw {}",
                    width,
                    index + 1,
                    row.len()
                )));
            }
            row.resize(width, String::new());
            normalized.push(row);
        }

        Ok(Self {
            headers,
            rows: normalized,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                AppError::ColumnNotFound(format!(
                    "Column '{}' does not exist. Available columns: {}",
                    name,
                    self.headers.join(", ")
                ))
            })
    }

    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Set column `name` to `values`, one per row.
    ///
    /// An existing column with the same name is overwritten in place;
    /// otherwise the column is appended at the end.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(AppError::ValidationError(format!(
                "Column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.headers.iter().position(|h| h == name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(())
    }
}
