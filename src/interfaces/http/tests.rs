use super::*;
use crate::infrastructure::config::{AppConfig, PlotConfig, StorageMode};
use crate::infrastructure::csv::CsvParser;
use actix_web::test;
use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

const BOUNDARY: &str = "----sentiscope-test-boundary";

fn test_state(mode: StorageMode) -> (web::Data<HttpState>, PathBuf) {
    let root = std::env::temp_dir().join(format!("sentiscope-http-{}", Uuid::new_v4()));
    let mut config = AppConfig::default();
    config.storage.uploads_dir = root.join("uploads");
    config.storage.static_dir = root.join("static");
    config.storage.mode = mode;
    config.plot = PlotConfig {
        width: 320,
        height: 200,
    };

    let use_case = SentimentAnalysisUseCase::from_config(&config);
    use_case.store().ensure().unwrap();

    let state = web::Data::new(HttpState {
        use_case,
        logs: Arc::new(Mutex::new(Vec::new())),
        max_upload_bytes: config.server.max_upload_bytes,
    });
    (state, root)
}

/// (field name, filename, content)
fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body.into_bytes()
}

fn upload_request(parts: &[(&str, Option<&str>, &str)]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
}

fn analyze_request(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/analyze").set_json(body)
}

#[actix_web::test]
async fn test_index_serves_upload_page() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("<form id=\"upload-form\">"));
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_without_file_part() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = upload_request(&[("note", None, "hello")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part in request");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_file_field_without_filename_is_not_a_file() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = upload_request(&[("file", None, "id,text\n1,nice\n")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part in request");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_that_is_not_multipart() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/upload")
        .set_json(serde_json::json!({ "file": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part in request");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_with_empty_filename() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = upload_request(&[("file", Some(""), "")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file selected");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_returns_columns() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = upload_request(&[("file", Some("reviews.csv"), "id,text\n1,nice\n")]).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["columns"], serde_json::json!(["id", "text"]));
    assert!(body["file_path"].as_str().unwrap().ends_with("reviews.csv"));
    assert_eq!(
        body["success"],
        "File uploaded successfully. Click Proceed to continue."
    );
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_of_empty_csv_is_unprocessable() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = upload_request(&[("file", Some("empty.csv"), "")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "parse");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_analyze_missing_fields() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    for payload in [
        serde_json::json!({}),
        serde_json::json!({ "file_path": "uploads/a.csv" }),
        serde_json::json!({ "column": "text" }),
        serde_json::json!({ "file_path": "", "column": "text" }),
        serde_json::json!({ "file_path": null, "column": "text" }),
    ] {
        let resp = test::call_service(&app, analyze_request(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing file path or column name");
    }
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_analyze_invalid_json_body() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "parse");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_analyze_unknown_column() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = upload_request(&[("file", Some("r.csv"), "text\ngood\n")]).to_request();
    let uploaded: Value = test::call_and_read_body_json(&app, req).await;

    let req = analyze_request(serde_json::json!({
        "file_path": uploaded["file_path"],
        "column": "review",
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "column_not_found");
    assert!(body["error"].as_str().unwrap().contains("review"));
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_analyze_missing_upload() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = analyze_request(serde_json::json!({
        "file_path": "uploads/never-uploaded.csv",
        "column": "text",
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_download_before_analyze() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::get().uri("/download").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "not_found");
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_upload_analyze_download_end_to_end() {
    let (state, root) = test_state(StorageMode::Shared);
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let csv = "text\ngreat product\nterrible\nthe meeting is on tuesday\n";
    let req = upload_request(&[("file", Some("reviews.csv"), csv)]).to_request();
    let uploaded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(uploaded["columns"], serde_json::json!(["text"]));

    let req = analyze_request(serde_json::json!({
        "file_path": uploaded["file_path"],
        "column": "text",
    }))
    .to_request();
    let analysis: Value = test::call_and_read_body_json(&app, req).await;

    let counts = &analysis["sentiment_counts"];
    assert_eq!(counts["Positive"], 1);
    assert_eq!(counts["Negative"], 1);
    assert_eq!(counts["Neutral"], 1);
    let result_file = analysis["result_file"].as_str().unwrap();
    let plot_path = analysis["plot_path"].as_str().unwrap();
    assert!(!result_file.is_empty());
    assert!(!plot_path.is_empty());
    assert!(Uuid::parse_str(analysis["analysis_id"].as_str().unwrap()).is_ok());

    let req = test::TestRequest::get().uri("/download").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("sentiment_analysis_results.csv"));

    let body = test::read_body(resp).await;
    let downloaded = CsvParser::new()
        .parse_content(&String::from_utf8_lossy(&body))
        .unwrap();
    let on_disk = CsvParser::new()
        .parse_file(std::path::Path::new(result_file))
        .unwrap();
    assert_eq!(downloaded.row_count(), 3);
    assert_eq!(downloaded.columns(), &["text", "Sentiment"]);
    assert_eq!(downloaded, on_disk);

    let req = test::TestRequest::get()
        .uri("/static/sentiment_plot.png")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png"
    );

    let logs: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/logs").to_request(),
    )
    .await;
    assert!(!logs.as_array().unwrap().is_empty());
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_per_analysis_download_by_id() {
    let (state, root) = test_state(StorageMode::PerAnalysis);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let mut ids = Vec::new();
    for (name, content) in [("a.csv", "text\ngreat\n"), ("b.csv", "text\nterrible\nawful\n")] {
        let req = upload_request(&[("file", Some(name), content)]).to_request();
        let uploaded: Value = test::call_and_read_body_json(&app, req).await;
        let req = analyze_request(serde_json::json!({
            "file_path": uploaded["file_path"],
            "column": "text",
        }))
        .to_request();
        let analysis: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(analysis["analysis_id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/download?analysis_id={}", ids[0]))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let first = CsvParser::new()
        .parse_content(&String::from_utf8_lossy(&body))
        .unwrap();
    assert_eq!(first.row_count(), 1);

    let req = test::TestRequest::get().uri("/download").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let latest = CsvParser::new()
        .parse_content(&String::from_utf8_lossy(&body))
        .unwrap();
    assert_eq!(latest.row_count(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/download?analysis_id={}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_static_rejects_traversal() {
    let (state, root) = test_state(StorageMode::Shared);
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/static/..%2Fuploads%2Fsecret.csv")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
    let _ = std::fs::remove_dir_all(root);
}

#[actix_web::test]
async fn test_log_ring_is_bounded() {
    let logs = Mutex::new(Vec::new());
    for i in 0..(MAX_LOG_ENTRIES + 5) {
        add_log(&logs, "INFO", "Test", &format!("entry {}", i));
    }
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), MAX_LOG_ENTRIES);
    assert_eq!(logs[0].message, "entry 5");
}
