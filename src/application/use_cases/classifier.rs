// ============================================================
// SENTIMENT CLASSIFIER
// ============================================================
// Polarity scorer + threshold policy -> discrete label

use std::sync::Arc;

use serde::Serialize;

use crate::domain::sentiment::{PolarityScorer, SentimentLabel, ThresholdPolicy};
use crate::infrastructure::vader::VaderScorer;

/// Compound score together with the label it maps to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredText {
    pub compound: f64,
    pub label: SentimentLabel,
}

#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn PolarityScorer>,
    policy: ThresholdPolicy,
}

impl SentimentClassifier {
    pub fn new(scorer: Arc<dyn PolarityScorer>, policy: ThresholdPolicy) -> Self {
        Self { scorer, policy }
    }

    /// VADER scorer with the given policy
    pub fn vader(policy: ThresholdPolicy) -> Self {
        Self::new(Arc::new(VaderScorer::new()), policy)
    }

    pub fn score(&self, text: &str) -> ScoredText {
        let compound = self.scorer.compound(text);
        ScoredText {
            compound,
            label: self.policy.label_for(compound),
        }
    }

    pub fn classify(&self, text: &str) -> SentimentLabel {
        self.score(text).label
    }
}
