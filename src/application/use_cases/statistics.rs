// ============================================================
// STATISTICS / PLOT GENERATOR
// ============================================================
// Tally labels and render the distribution chart

use std::path::Path;

use crate::domain::error::Result;
use crate::domain::sentiment::{SentimentCounts, SentimentLabel};
use crate::infrastructure::artifact_store::atomic_replace;
use crate::infrastructure::plotting::SentimentChart;

/// Count labels and draw them to `plot_path`, replacing any previous plot.
pub fn generate_statistics(
    labels: &[SentimentLabel],
    chart: &SentimentChart,
    plot_path: &Path,
) -> Result<SentimentCounts> {
    let counts = SentimentCounts::tally(labels.iter().copied());
    atomic_replace(plot_path, |tmp_path| chart.render(&counts, tmp_path))?;
    Ok(counts)
}
