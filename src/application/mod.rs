pub mod use_cases;

pub use use_cases::classifier::SentimentClassifier;
pub use use_cases::sentiment_analysis::{AnalysisOutcome, SentimentAnalysisUseCase, UploadOutcome};
