// ============================================================
// CSV PARSER
// ============================================================
// Read uploaded CSV files into a Dataset and write results back out

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use encoding_rs::WINDOWS_1252;

use crate::domain::csv::Dataset;
use crate::domain::error::{AppError, Result};

/// CSV parser with encoding fallback
#[derive(Debug, Clone)]
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file into a dataset
    pub fn parse_file(&self, path: &Path) -> Result<Dataset> {
        let bytes = fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("File {} does not exist", path.display()))
            } else {
                AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;

        let content = decode(&bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Short rows are padded by Dataset::new
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Dataset::new(headers, rows)
    }

    /// Read only the header row of a CSV file
    pub fn read_columns(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self.parse_file(path)?.columns().to_vec())
    }

    /// Serialize a dataset to CSV bytes (header row first, no index column)
    pub fn to_bytes(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record(dataset.columns())?;
        for row in dataset.rows() {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV writer: {}", e)))
    }
}

/// Decode file bytes as UTF-8, falling back to Windows-1252 (Latin-1 superset).
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}
