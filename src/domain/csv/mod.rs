// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Typed in-memory table for uploaded datasets
// No I/O, no async, no external dependencies

mod dataset;

pub use dataset::Dataset;
