use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use report_card::ServerSettings;
use report_card::app::{AppState, router};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

const BOUNDARY: &str = "report-card-test-boundary";
const SCORES_CSV: &str = "姓名,班级,语文,数学\n张三,1班,90,80\n李四,1班,90,85\n";

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn test_app(settings: ServerSettings) -> Router {
    router(Arc::new(AppState::new(settings).unwrap()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_method(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn upload_request(file_name: &str, contents: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, bytes.to_vec())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[cfg_attr(test, test)]
fn test_health_and_unknown_route() {
    println!("\n====== Testing health endpoint ======");
    block_on(async {
        let app = test_app(ServerSettings::default());

        let (status, body) = send(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["timestamp"].is_string());
        println!("✓ Health check answers");

        let (status, body) = send(&app, get("/api/nothing-here")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        println!("✓ Unknown route returns the 404 envelope");
    });
}

#[cfg_attr(test, test)]
fn test_upload_then_browse() {
    println!("\n====== Testing upload and browse ======");
    block_on(async {
        let app = test_app(ServerSettings::default());

        let (status, body) = send(&app, upload_request("scores.csv", SCORES_CSV.as_bytes())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalStudents"], 2);
        assert_eq!(body["data"]["subjects"][1], "数学");
        assert_eq!(body["data"]["students"][0]["姓名"], "李四");
        println!("✓ Upload ingests and previews ranked students");

        let (status, body) = send(&app, get("/api/students?page=1&limit=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["students"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["pagination"]["totalPages"], 2);
        assert_eq!(body["data"]["pagination"]["hasNext"], true);
        println!("✓ Student list is paginated");

        let (status, body) = send(&app, get("/api/students/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["姓名"], "张三");
        assert_eq!(body["data"]["averageScore"], "85.0");
        println!("✓ Single student by index");

        let (status, body) = send(&app, get("/api/students/9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        println!("✓ Out-of-range index is 404");

        for uri in ["/api/students/-1", "/api/students/abc", "/api/students/-1/report"] {
            let (status, content_type, bytes) = send_raw(&app, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["status"], "error");
            assert!(body["message"].is_string());
        }
        println!("✓ Negative and non-numeric indexes get the 404 envelope");

        let (status, body) = send(&app, get("/api/students/0/report")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["html"].as_str().unwrap().contains("李四"));
        assert_eq!(body["data"]["model"]["kind"], "report");
        assert_eq!(body["data"]["student"]["class"], "1班");
        println!("✓ Single report rendered");

        let (status, body) = send(&app, with_method("POST", "/api/reports/generate")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalReports"], 2);
        assert_eq!(body["data"]["warnings"].as_array().unwrap().len(), 0);
        println!("✓ Batch export covers every student");

        let (status, body) = send(&app, get("/api/statistics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalStudents"], 2);
        assert_eq!(body["data"]["gradeDistribution"]["good"], 2);
        println!("✓ Statistics computed");

        let (status, content_type, svg) =
            send_raw(&app, get("/api/statistics/chart.svg?kind=grades")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
        assert!(String::from_utf8_lossy(&svg).contains("<svg"));
        println!("✓ Chart served as SVG");

        let (status, _) = send(&app, with_method("DELETE", "/api/data")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, with_method("POST", "/api/reports/generate")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        println!("✓ Cleared dataset refuses batch export");
    });
}

#[cfg_attr(test, test)]
fn test_bad_uploads_keep_previous_data() {
    println!("\n====== Testing rejected uploads ======");
    block_on(async {
        let app = test_app(ServerSettings::default());
        let (status, _) = send(&app, upload_request("scores.csv", SCORES_CSV.as_bytes())).await;
        assert_eq!(status, StatusCode::OK);

        let rejected = [
            upload_request("scores.csv", "学号,语文\n1,90\n".as_bytes()),
            upload_request("scores.pdf", b"%PDF-1.4"),
            upload_request("scores.xlsx", b"not a workbook"),
            upload_request("scores.csv", b""),
        ];
        for request in rejected {
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["status"], "error");
        }
        println!("✓ Missing name column, wrong type, corrupt and empty files are 400");

        let (_, body) = send(&app, get("/api/students")).await;
        assert_eq!(body["data"]["pagination"]["totalStudents"], 2);
        println!("✓ Previous dataset still served");
    });
}

#[cfg_attr(test, test)]
fn test_template_download() {
    println!("\n====== Testing template download ======");
    block_on(async {
        let app = test_app(ServerSettings::default());

        let response = app.clone().oneshot(get("/api/template")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("attachment; filename*=UTF-8''"));
        assert!(disposition.ends_with(".xlsx"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
        println!("✓ XLSX template served as attachment");

        let (status, content_type, bytes) = send_raw(&app, get("/api/template?format=csv")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap_or_default().starts_with("text/csv"));
        assert!(String::from_utf8_lossy(&bytes).contains("姓名,班级,语文"));
        println!("✓ CSV template served");
    });
}

#[cfg_attr(test, test)]
fn test_config_round_trip() {
    println!("\n====== Testing config endpoints ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let settings = ServerSettings {
        config_path: Some(path.to_string_lossy().into_owned()),
        ..ServerSettings::default()
    };

    block_on(async {
        let app = test_app(settings.clone());

        let (_, body) = send(&app, get("/api/config")).await;
        assert_eq!(body["data"]["reportTitle"], "浙江省初中");
        println!("✓ Defaults served before any save");

        let request = Request::builder()
            .method("PUT")
            .uri("/api/config")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"schoolName":"实验中学","showSchool":true}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["schoolName"], "实验中学");
        assert_eq!(body["data"]["reportTitle"], "浙江省初中");
        assert!(path.exists());
        println!("✓ Update persisted to disk");

        // A fresh state picks the saved settings back up
        let reloaded = test_app(settings.clone());
        let (_, body) = send(&reloaded, get("/api/config")).await;
        assert_eq!(body["data"]["showSchool"], true);
        println!("✓ Saved settings loaded on startup");

        let (status, body) = send(&app, with_method("DELETE", "/api/config")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["schoolName"], "");
        println!("✓ Reset restores defaults");
    });
}

pub fn run_tests() {
    println!("Starting app tests");
    test_health_and_unknown_route();
    test_upload_then_browse();
    test_bad_uploads_keep_previous_data();
    test_template_download();
    test_config_round_trip();
    println!("All tests passed!");
}

fn main() {
    run_tests();
}
