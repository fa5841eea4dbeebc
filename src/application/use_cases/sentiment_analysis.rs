// ============================================================
// SENTIMENT ANALYSIS USE CASE
// ============================================================
// Upload -> analyze -> download orchestration over the artifact store

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::domain::error::Result;
use crate::domain::sentiment::SentimentCounts;
use crate::infrastructure::artifact_store::ArtifactStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::plotting::SentimentChart;

use super::classifier::SentimentClassifier;
use super::dataset_analyzer::analyze_dataset;
use super::statistics::generate_statistics;

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub file_path: PathBuf,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis_id: Uuid,
    pub counts: SentimentCounts,
    pub result_file: PathBuf,
    pub plot_path: PathBuf,
    pub row_count: usize,
}

#[derive(Clone)]
pub struct SentimentAnalysisUseCase {
    classifier: SentimentClassifier,
    chart: SentimentChart,
    parser: CsvParser,
    store: Arc<ArtifactStore>,
}

impl SentimentAnalysisUseCase {
    pub fn new(
        classifier: SentimentClassifier,
        chart: SentimentChart,
        parser: CsvParser,
        store: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            classifier,
            chart,
            parser,
            store,
        }
    }

    /// Wire the VADER classifier, chart, parser and store from config
    pub fn from_config(config: &AppConfig) -> Self {
        let parser = CsvParser::new()
            .with_delimiter(config.csv.delimiter as u8)
            .with_trim(config.csv.trim);
        Self::new(
            SentimentClassifier::vader(config.sentiment),
            SentimentChart::new(&config.plot),
            parser,
            Arc::new(ArtifactStore::new(config.storage.clone())),
        )
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Save an uploaded file and report its column names.
    pub fn upload(&self, client_filename: &str, bytes: &[u8]) -> Result<UploadOutcome> {
        let file_path = self.store.save_upload(client_filename, bytes)?;
        let columns = self.parser.read_columns(&file_path)?;

        info!(
            file = %file_path.display(),
            bytes = bytes.len(),
            columns = columns.len(),
            "Stored upload"
        );

        Ok(UploadOutcome { file_path, columns })
    }

    /// Label `column` of a previously uploaded file, write the results file
    /// and the distribution plot.
    pub fn analyze(&self, file_path: &str, column: &str) -> Result<AnalysisOutcome> {
        let start = Instant::now();

        let source = self.store.resolve_upload(file_path)?;
        let mut dataset = self.parser.parse_file(&source)?;
        let labels = analyze_dataset(&mut dataset, column, &self.classifier)?;

        let paths = self.store.plan();
        let counts = generate_statistics(&labels, &self.chart, &paths.plot)?;
        self.store.refresh_shared_plot(&paths)?;

        let bytes = self.parser.to_bytes(&dataset)?;
        self.store.write_results(&paths, &bytes)?;

        info!(
            analysis_id = %paths.analysis_id,
            source = %source.display(),
            column,
            rows = dataset.row_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(AnalysisOutcome {
            analysis_id: paths.analysis_id,
            counts,
            result_file: paths.results,
            plot_path: paths.plot,
            row_count: dataset.row_count(),
        })
    }
}
