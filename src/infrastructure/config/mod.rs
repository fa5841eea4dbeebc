use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::sentiment::ThresholdPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "SentiScope.toml";
pub const CONFIG_PATH_ENV: &str = "SENTISCOPE_CONFIG";
pub const ENV_PREFIX: &str = "SENTISCOPE_";

const MIN_PLOT_WIDTH: u32 = 240;
const MIN_PLOT_HEIGHT: u32 = 180;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sentiment: ThresholdPolicy,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub csv: CsvConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// One results file and one plot, overwritten by every analysis
    #[default]
    Shared,
    /// Artifacts keyed by analysis id; the shared copies are still refreshed
    PerAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub uploads_dir: PathBuf,
    pub static_dir: PathBuf,
    pub results_file_name: String,
    pub plot_file_name: String,
    pub mode: StorageMode,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            results_file_name: "sentiment_analysis_results.csv".to_string(),
            plot_file_name: "sentiment_plot.png".to_string(),
            mode: StorageMode::Shared,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    pub delimiter: char,
    pub trim: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim: false,
        }
    }
}

impl AppConfig {
    /// Layer defaults, the optional TOML file and `SENTISCOPE_*` env vars.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::figment(&path).extract::<Self>().map_err(AppError::from)
    }

    pub fn figment(path: &std::path::Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_upload_bytes == 0 {
            return Err(AppError::ValidationError(
                "server.max_upload_bytes must be > 0".to_string(),
            ));
        }
        if self.plot.width < MIN_PLOT_WIDTH || self.plot.height < MIN_PLOT_HEIGHT {
            return Err(AppError::ValidationError(format!(
                "plot must be at least {}x{} to fit the title and axis labels",
                MIN_PLOT_WIDTH, MIN_PLOT_HEIGHT
            )));
        }
        if !self.csv.delimiter.is_ascii() {
            return Err(AppError::ValidationError(
                "csv.delimiter must be a single ASCII character".to_string(),
            ));
        }
        for (name, value) in [
            ("storage.results_file_name", &self.storage.results_file_name),
            ("storage.plot_file_name", &self.storage.plot_file_name),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) {
                return Err(AppError::ValidationError(format!(
                    "{} must be a plain file name",
                    name
                )));
            }
        }
        self.sentiment
            .validate()
            .map_err(|e| AppError::ValidationError(format!("sentiment: {}", e)))
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
