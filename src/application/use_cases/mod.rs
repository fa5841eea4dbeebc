pub mod classifier;
pub mod dataset_analyzer;
pub mod sentiment_analysis;
pub mod statistics;
