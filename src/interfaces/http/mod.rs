use crate::application::SentimentAnalysisUseCase;
use crate::domain::error::AppError;
use crate::domain::sentiment::SentimentCounts;
use crate::infrastructure::storage::sanitize_filename;
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::dev::Server;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{
    get, middleware, post, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use chrono::Local;
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

const INDEX_HTML: &str = include_str!("../../../templates/index.html");
const UPLOAD_SUCCESS: &str = "File uploaded successfully. Click Proceed to continue.";
const NO_FILE_PART: &str = "No file part in request";
const NO_FILE_SELECTED: &str = "No file selected";
const MISSING_ANALYZE_FIELDS: &str = "Missing file path or column name";
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub type SharedLogs = Arc<Mutex<Vec<LogEntry>>>;

pub struct HttpState {
    pub use_case: SentimentAnalysisUseCase,
    pub logs: SharedLogs,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub analysis_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub columns: Vec<String>,
    pub file_path: String,
    pub success: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub sentiment_counts: SentimentCounts,
    pub result_file: String,
    pub plot_path: String,
    pub analysis_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    kind: &'a str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::ColumnNotFound(_) => StatusCode::BAD_REQUEST,
            AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::PlotError(_) | AppError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.message(),
            kind: self.kind(),
        })
    }
}

fn blocking_err(err: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(format!("Worker pool unavailable: {}", err))
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) if file.is_none() => {
                warn!(error = %err, "Upload body is not a readable multipart form");
                break;
            }
            Err(err) => return Err(AppError::ParseError(format!("Malformed upload: {}", err))),
        };

        // A `file` part without a filename parameter is a plain form value.
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let wanted = file.is_none() && field.name() == Some("file") && filename.is_some();
        let filename = filename.unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ParseError(format!("Malformed upload: {}", e)))?
        {
            if !wanted {
                continue;
            }
            if bytes.len() + chunk.len() > data.max_upload_bytes {
                add_log(
                    &data.logs,
                    "WARN",
                    "Upload",
                    &format!("Rejected {}: larger than {} bytes", filename, data.max_upload_bytes),
                );
                return Err(AppError::ValidationError(format!(
                    "File exceeds the {} byte upload limit",
                    data.max_upload_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if wanted {
            file = Some((filename, bytes));
        }
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::ValidationError(NO_FILE_PART.to_string()))?;
    if sanitize_filename(&filename).is_none() {
        return Err(AppError::ValidationError(NO_FILE_SELECTED.to_string()));
    }

    add_log(
        &data.logs,
        "INFO",
        "Upload",
        &format!("Receiving {} ({} bytes)", filename, bytes.len()),
    );

    let use_case = data.use_case.clone();
    let outcome = web::block(move || use_case.upload(&filename, &bytes))
        .await
        .map_err(blocking_err)?;

    match outcome {
        Ok(outcome) => Ok(HttpResponse::Ok().json(UploadResponse {
            columns: outcome.columns,
            file_path: outcome.file_path.display().to_string(),
            success: UPLOAD_SUCCESS.to_string(),
        })),
        Err(e) => {
            add_log(&data.logs, "ERROR", "Upload", &format!("Upload failed: {}", e));
            Err(e)
        }
    }
}

#[post("/analyze")]
async fn analyze(
    data: web::Data<HttpState>,
    req: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, AppError> {
    let AnalyzeRequest { file_path, column } = req.into_inner();
    let (file_path, column) = match (non_empty(file_path), non_empty(column)) {
        (Some(file_path), Some(column)) => (file_path, column),
        _ => return Err(AppError::ValidationError(MISSING_ANALYZE_FIELDS.to_string())),
    };

    add_log(
        &data.logs,
        "INFO",
        "Analyze",
        &format!("Analyzing column '{}' of {}", column, file_path),
    );

    let use_case = data.use_case.clone();
    let outcome = web::block(move || use_case.analyze(&file_path, &column))
        .await
        .map_err(blocking_err)?;

    match outcome {
        Ok(outcome) => {
            add_log(
                &data.logs,
                "INFO",
                "Analyze",
                &format!(
                    "Labelled {} rows (analysis {})",
                    outcome.row_count, outcome.analysis_id
                ),
            );
            Ok(HttpResponse::Ok().json(AnalyzeResponse {
                sentiment_counts: outcome.counts,
                result_file: outcome.result_file.display().to_string(),
                plot_path: outcome.plot_path.display().to_string(),
                analysis_id: outcome.analysis_id.to_string(),
            }))
        }
        Err(e) => {
            add_log(&data.logs, "ERROR", "Analyze", &format!("Analysis failed: {}", e));
            Err(e)
        }
    }
}

#[get("/download")]
async fn download(
    data: web::Data<HttpState>,
    query: web::Query<DownloadQuery>,
) -> Result<HttpResponse, AppError> {
    let store = data.use_case.store();
    let path = store.download_path(query.analysis_id.as_deref())?;
    let file_name = store.results_file_name().to_string();

    let bytes = read_file(path).await?;
    add_log(
        &data.logs,
        "INFO",
        "Download",
        &format!("Serving {} ({} bytes)", file_name, bytes.len()),
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}

#[get("/static/{tail:.*}")]
async fn static_file(
    data: web::Data<HttpState>,
    tail: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let path = data.use_case.store().static_file(&tail)?;
    let content_type = content_type_for(&path);
    let bytes = read_file(path).await?;
    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(("Cache-Control", "no-store"))
        .body(bytes))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|p| p.into_inner());
    HttpResponse::Ok().json(&*logs)
}

async fn read_file(path: std::path::PathBuf) -> Result<Vec<u8>, AppError> {
    web::block(move || std::fs::read(path))
        .await
        .map_err(blocking_err)?
        .map_err(AppError::from)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("csv") => "text/csv; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn add_log_entry(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };

    match level {
        "ERROR" => error!(source, "{}", message),
        "WARN" => warn!(source, "{}", message),
        _ => info!(source, "{}", message),
    }

    let mut logs = logs.lock().unwrap_or_else(|p| p.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Register all routes. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ParseError(format!("Invalid JSON body: {}", err)).into()
    }))
    .service(index)
    .service(upload)
    .service(analyze)
    .service(download)
    .service(static_file)
    .service(get_logs);
}

pub fn start_server(state: web::Data<HttpState>, bind: (String, u16)) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests;
