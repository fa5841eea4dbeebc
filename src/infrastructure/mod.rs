pub mod artifact_store;
pub mod bootstrap;
pub mod config;
pub mod csv;
pub mod plotting;
pub mod storage;
pub mod vader;
