use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::{StorageConfig, StorageMode};
use crate::infrastructure::storage::{ensure_dir, resolve_within, sanitize_filename};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::IoError(msg.into())
}

/// Where one analysis writes its results file and plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub analysis_id: Uuid,
    pub results: PathBuf,
    pub plot: PathBuf,
}

/// File layout for uploads, analysis results and plots.
///
/// In `Shared` mode every analysis targets the same results/plot paths and
/// concurrent analyses overwrite each other (last writer wins). In
/// `PerAnalysis` mode each analysis gets its own paths keyed by id.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    config: StorageConfig,
}

impl ArtifactStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn ensure(&self) -> Result<()> {
        ensure_dir_logged(&self.config.uploads_dir)?;
        ensure_dir_logged(&self.config.static_dir)?;
        Ok(())
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.config.uploads_dir
    }

    pub fn results_file_name(&self) -> &str {
        &self.config.results_file_name
    }

    pub fn shared_results_path(&self) -> PathBuf {
        self.config.uploads_dir.join(&self.config.results_file_name)
    }

    pub fn shared_plot_path(&self) -> PathBuf {
        self.config.static_dir.join(&self.config.plot_file_name)
    }

    /// Persist an uploaded file under the uploads dir, replacing any file
    /// with the same name.
    pub fn save_upload(&self, client_filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let file_name = sanitize_filename(client_filename)
            .ok_or_else(|| AppError::ValidationError("No file selected".to_string()))?;
        let path = self.config.uploads_dir.join(file_name);
        atomic_write_bytes(&path, bytes)?;
        Ok(path)
    }

    /// Map an upload path echoed back by the client onto the uploads dir.
    /// Only the final component is used.
    pub fn resolve_upload(&self, file_path: &str) -> Result<PathBuf> {
        let file_name = sanitize_filename(file_path).ok_or_else(|| {
            AppError::ValidationError(format!("Invalid file path: {}", file_path))
        })?;
        let path = self.config.uploads_dir.join(file_name);
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "File {} does not exist",
                file_path
            )));
        }
        Ok(path)
    }

    /// Allocate result/plot paths for a new analysis.
    pub fn plan(&self) -> ArtifactPaths {
        let analysis_id = Uuid::new_v4();
        match self.config.mode {
            StorageMode::Shared => ArtifactPaths {
                analysis_id,
                results: self.shared_results_path(),
                plot: self.shared_plot_path(),
            },
            StorageMode::PerAnalysis => ArtifactPaths {
                analysis_id,
                results: self.results_path_for(analysis_id),
                plot: self.plot_path_for(analysis_id),
            },
        }
    }

    pub fn results_path_for(&self, analysis_id: Uuid) -> PathBuf {
        self.config
            .uploads_dir
            .join("results")
            .join(analysis_id.to_string())
            .join(&self.config.results_file_name)
    }

    pub fn plot_path_for(&self, analysis_id: Uuid) -> PathBuf {
        let extension = Path::new(&self.config.plot_file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        self.config
            .static_dir
            .join("plots")
            .join(format!("{}.{}", analysis_id, extension))
    }

    pub fn write_results(&self, paths: &ArtifactPaths, bytes: &[u8]) -> Result<()> {
        atomic_write_bytes(&paths.results, bytes)?;
        if self.config.mode == StorageMode::PerAnalysis {
            atomic_write_bytes(&self.shared_results_path(), bytes)?;
        }
        Ok(())
    }

    /// Copy a per-analysis plot over the shared plot so the fixed path keeps
    /// showing the most recent chart. No-op in shared mode.
    pub fn refresh_shared_plot(&self, paths: &ArtifactPaths) -> Result<()> {
        if self.config.mode == StorageMode::Shared {
            return Ok(());
        }
        let bytes = fs::read(&paths.plot)
            .map_err(|e| io_err(format!("Failed to read plot {}: {e}", paths.plot.display())))?;
        atomic_write_bytes(&self.shared_plot_path(), &bytes)
    }

    /// Results file to serve for a download request.
    ///
    /// Shared mode keeps a single results file, so a valid id resolves to it.
    pub fn download_path(&self, analysis_id: Option<&str>) -> Result<PathBuf> {
        let path = match analysis_id {
            None => self.shared_results_path(),
            Some(raw) => {
                let id = Uuid::parse_str(raw).map_err(|_| {
                    AppError::ValidationError(format!("Invalid analysis id: {}", raw))
                })?;
                match self.config.mode {
                    StorageMode::Shared => self.shared_results_path(),
                    StorageMode::PerAnalysis => self.results_path_for(id),
                }
            }
        };
        if !path.is_file() {
            return Err(AppError::NotFound(
                "No analysis results available. Run an analysis first.".to_string(),
            ));
        }
        Ok(path)
    }

    /// Resolve a file under the static dir for serving.
    pub fn static_file(&self, relative: &str) -> Result<PathBuf> {
        let path = resolve_within(&self.config.static_dir, relative)
            .ok_or_else(|| AppError::ValidationError(format!("Invalid path: {}", relative)))?;
        if !path.is_file() {
            return Err(AppError::NotFound(format!("{} does not exist", relative)));
        }
        Ok(path)
    }
}

fn ensure_dir_logged(path: &Path) -> Result<()> {
    ensure_dir(path)
        .map_err(|e| io_err(format!("Failed to create dir {}: {e}", path.display())))
}

/// Temp sibling of `path` that keeps the original extension, since some
/// writers pick their encoder from it.
fn temp_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.tmp-{}.{}", stem, Uuid::new_v4(), ext),
        None => format!("{}.tmp-{}", stem, Uuid::new_v4()),
    };
    path.with_file_name(name)
}

/// Let `populate` write a temp file, then move it over `path`.
pub fn atomic_replace(path: &Path, populate: impl FnOnce(&Path) -> Result<()>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_logged(parent)?;
    }

    let tmp_path = temp_sibling(path);
    if let Err(e) = populate(&tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    // Best-effort atomic replace.
    // - Rename is atomic when destination does not exist.
    // - On Windows, rename cannot replace; we move old away then swap.
    if cfg!(windows) && path.exists() {
        let backup = path.with_extension(format!("bak-{}", Uuid::new_v4()));
        fs::rename(path, &backup).map_err(|e| {
            io_err(format!(
                "Failed to move existing file {} to {}: {e}",
                path.display(),
                backup.display()
            ))
        })?;
        fs::rename(&tmp_path, path).map_err(|e| {
            io_err(format!(
                "Failed to rename temp file {} to {}: {e}",
                tmp_path.display(),
                path.display()
            ))
        })?;
        let _ = fs::remove_file(&backup);
        return Ok(());
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(format!(
            "Failed to rename temp file {} to {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })
}

pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    atomic_replace(path, |tmp_path| {
        let mut file = fs::File::create(tmp_path).map_err(|e| {
            io_err(format!(
                "Failed to create temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.write_all(bytes).map_err(|e| {
            io_err(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.sync_all().ok();
        Ok(())
    })
}
