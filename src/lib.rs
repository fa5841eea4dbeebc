mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::{SentimentAnalysisUseCase, SentimentClassifier};
pub use domain::error::{AppError, Result};
pub use domain::sentiment::{PolarityScorer, SentimentCounts, SentimentLabel, ThresholdPolicy};
pub use infrastructure::config::AppConfig;
