use std::error::Error;
use std::sync::{Arc, Mutex};

use actix_web::web;
use tracing::error;

use crate::application::SentimentAnalysisUseCase;
use crate::infrastructure::config::{AppConfig, StorageMode};
use crate::interfaces::http::{add_log, HttpState, SharedLogs};

/// Validate config, prepare the storage layout and build the shared HTTP state.
pub fn setup(config: &AppConfig) -> Result<web::Data<HttpState>, Box<dyn Error>> {
    let logs: SharedLogs = Arc::new(Mutex::new(Vec::new()));

    config.validate().map_err(|err| {
        error!(error = %err, "Invalid configuration");
        err
    })?;

    let use_case = SentimentAnalysisUseCase::from_config(config);
    use_case.store().ensure().map_err(|err| {
        error!(
            error = %err,
            uploads_dir = %config.storage.uploads_dir.display(),
            static_dir = %config.storage.static_dir.display(),
            "Failed to create storage dirs"
        );
        err
    })?;

    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Storing uploads in {} and plots in {}",
            config.storage.uploads_dir.display(),
            config.storage.static_dir.display()
        ),
    );

    if config.storage.mode == StorageMode::Shared {
        add_log(
            &logs,
            "WARN",
            "Bootstrap",
            "Shared storage mode: concurrent analyses overwrite the same results and plot files",
        );
    }

    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Sentiment thresholds: positive > {}, negative < {}",
            config.sentiment.positive_above, config.sentiment.negative_below
        ),
    );

    Ok(web::Data::new(HttpState {
        use_case,
        logs,
        max_upload_bytes: config.server.max_upload_bytes,
    }))
}
