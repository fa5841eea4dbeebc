// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, encoding fallback and result serialization

mod csv_parser;

pub use csv_parser::CsvParser;
