// ============================================================
// SENTIMENT DOMAIN TYPES
// ============================================================
// Labels, threshold policy and label tallies. No I/O.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Discrete sentiment label attached to every analysed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a normalized compound polarity score in [-1, 1] for a text.
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// Maps a continuous compound score onto the three labels.
///
/// A score strictly above `positive_above` is Positive, strictly below
/// `negative_below` is Negative, anything else (including NaN) is Neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub positive_above: f64,
    pub negative_below: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            positive_above: 0.0,
            negative_below: 0.0,
        }
    }
}

impl ThresholdPolicy {
    pub fn new(positive_above: f64, negative_below: f64) -> Self {
        Self {
            positive_above,
            negative_below,
        }
    }

    pub fn label_for(&self, score: f64) -> SentimentLabel {
        if score > self.positive_above {
            SentimentLabel::Positive
        } else if score < self.negative_below {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("positive_above", self.positive_above),
            ("negative_below", self.negative_below),
        ] {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(format!("{} must be between -1.0 and 1.0", name));
            }
        }
        if self.negative_below > self.positive_above {
            return Err("negative_below must be <= positive_above".to_string());
        }
        Ok(())
    }
}

/// Label tallies ordered by descending count.
///
/// Ties keep the order in which labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    entries: Vec<(SentimentLabel, usize)>,
}

impl SentimentCounts {
    pub fn tally<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = SentimentLabel>,
    {
        let mut entries: Vec<(SentimentLabel, usize)> = Vec::new();
        for label in labels {
            match entries.iter_mut().find(|(seen, _)| *seen == label) {
                Some((_, count)) => *count += 1,
                None => entries.push((label, 1)),
            }
        }
        // sort_by is stable, so first-seen order survives for equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        self.entries
            .iter()
            .find(|(seen, _)| *seen == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn entries(&self) -> &[(SentimentLabel, usize)] {
        &self.entries
    }

    pub fn max_count(&self) -> usize {
        self.entries.first().map(|(_, count)| *count).unwrap_or(0)
    }
}

impl Serialize for SentimentCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label.as_str(), count)?;
        }
        map.end()
    }
}
