pub mod error;
pub mod sentiment;

// CSV dataset module
pub mod csv;
