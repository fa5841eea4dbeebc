// ============================================================
// DATASET ANALYZER
// ============================================================
// Label every row of one text column

use crate::domain::csv::Dataset;
use crate::domain::error::Result;
use crate::domain::sentiment::SentimentLabel;

use super::classifier::SentimentClassifier;

pub const SENTIMENT_COLUMN: &str = "Sentiment";

/// Classify `column` in every row and store the labels in the
/// `Sentiment` column. Returns the labels in row order.
pub fn analyze_dataset(
    dataset: &mut Dataset,
    column: &str,
    classifier: &SentimentClassifier,
) -> Result<Vec<SentimentLabel>> {
    let labels: Vec<SentimentLabel> = dataset
        .column_values(column)?
        .map(|text| classifier.classify(text))
        .collect();

    dataset.set_column(
        SENTIMENT_COLUMN,
        labels.iter().map(|l| l.to_string()).collect(),
    )?;

    Ok(labels)
}
