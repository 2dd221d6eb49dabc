use std::{path::Path, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use qms::{config::Config, router, state::AppState};

const BOUNDARY: &str = "qms-test-boundary";

fn test_config(upload: &Path, models: &Path, predict_url: &str) -> Config {
    Config {
        port: 0,
        allowed_origins: vec!["http://localhost:3000".to_string()],
        predict_url: predict_url.to_string(),
        forecast_url: "http://127.0.0.1:9/predict".to_string(),
        upload_dir: upload.display().to_string(),
        model_dir: models.display().to_string(),
        predict_timeout: Duration::from_millis(200),
    }
}

fn test_router(upload: &Path, models: &Path, predict_url: &str) -> Router {
    router(AppState::with_config(test_config(upload, models, predict_url)))
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn post_multipart(uri: &str, file_name: &str, csv: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n"
    ));
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn ping_pongs() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let response = app.oneshot(get("/api/ping")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "pong! 🏓");
}

#[tokio::test]
async fn hello_greets() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let body = body_json(app.oneshot(get("/api/hello")).await.unwrap()).await;

    assert!(body["message"].as_str().unwrap().contains("hello"));
}

#[tokio::test]
async fn echo_returns_message_and_fresh_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let first = body_json(
        app.clone()
            .oneshot(post_json("/api/echo", json!({"message": "hello"})))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        app.oneshot(post_json("/api/echo", json!({"message": "hello"})))
            .await
            .unwrap(),
    )
    .await;

    assert!(first["message"].as_str().unwrap().contains("hello"));
    let t1 = first["timestamp"].as_i64().unwrap();
    let t2 = second["timestamp"].as_i64().unwrap();
    assert!(t1 > 0);
    assert!(t2 >= t1);
}

#[tokio::test]
async fn reverse_reverses_characters() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let body = body_json(
        app.oneshot(post_json("/api/reverse", json!({"message": "abc"})))
            .await
            .unwrap(),
    )
    .await;

    assert!(body["message"].as_str().unwrap().contains("cba"));
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn upload_accepts_csv_and_persists_it() {
    let upload = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    let app = test_router(upload.path(), models.path(), "http://127.0.0.1:9");

    let response = app
        .oneshot(post_multipart("/upload", "data.csv", "a,b\n1,2\n", &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["filename"], "data.csv");
    assert_eq!(body["status"], "File uploaded successfully");

    let written = std::fs::read_to_string(upload.path().join("data.csv")).unwrap();
    assert_eq!(written, "a,b\n1,2\n");
}

#[tokio::test]
async fn upload_rejects_non_csv() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"data.xlsx\"\r\nContent-Type: application/vnd.ms-excel\r\n\r\njunk\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("Only CSV files"));
}

#[tokio::test]
async fn files_lists_model_artifacts() {
    let upload = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    std::fs::write(models.path().join("xgboost.joblib"), b"m").unwrap();
    std::fs::write(models.path().join("readme.md"), b"r").unwrap();
    let app = test_router(upload.path(), models.path(), "http://127.0.0.1:9");

    let body = body_json(app.oneshot(get("/api/files")).await.unwrap()).await;

    let listing = body.as_array().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["name"], "xgboost");
    assert_eq!(listing[0]["isDirectory"], false);
    assert!(listing[0]["path"].as_str().unwrap().ends_with(".joblib"));
}

#[tokio::test]
async fn weather_failure_keeps_the_known_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let response = app.oneshot(get("/weather")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.starts_with("Failed to connect to FastAPI: "));
}

#[tokio::test]
async fn predict_rejects_unknown_model() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), dir.path(), "http://127.0.0.1:9");

    let response = app
        .oneshot(post_multipart(
            "/api/predict",
            "data.csv",
            "a,b\n1,2\n",
            &[("selected_model", "/nope/model.joblib")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn predict_timeout_is_reported_distinctly() {
    let upload = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    let model_path = models.path().join("slow.joblib");
    std::fs::write(&model_path, b"m").unwrap();

    // An upstream that accepts and then says nothing, to trip the bounded
    // request timeout rather than a connect error.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let app = test_router(upload.path(), models.path(), &format!("http://{addr}"));

    let response = app
        .oneshot(post_multipart(
            "/api/predict",
            "data.csv",
            "a,b\n1,2\n",
            &[("selected_model", model_path.to_str().unwrap())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Prediction request timed out");
}
