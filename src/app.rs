#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::chart::{self, ChartOptions};
use crate::config::{ReportConfig, ServerSettings};
use crate::dataset::{DEFAULT_PAGE_SIZE, DatasetStore};
use crate::error::{ReportError, Result};
use crate::html::HtmlRenderer;
use crate::render::render;
use crate::statistics;
use crate::table::RawTable;
use crate::template;

/// Number of records echoed back after an upload.
const UPLOAD_PREVIEW: usize = 20;

pub struct AppState {
    store: DatasetStore,
    config: RwLock<ReportConfig>,
    renderer: HtmlRenderer,
    settings: ServerSettings,
}

impl AppState {
    /// Fresh state with an empty dataset. Report settings come from
    /// `settings.config_path` when that file exists.
    pub fn new(settings: ServerSettings) -> Result<Self> {
        let config = match &settings.config_path {
            Some(path) => ReportConfig::load_or_default(path)?,
            None => ReportConfig::default(),
        };
        Ok(AppState {
            store: DatasetStore::new(),
            config: RwLock::new(config),
            renderer: HtmlRenderer::new()?,
            settings,
        })
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn config(&self) -> ReportConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_config(&self, config: ReportConfig) -> Result<()> {
        if let Some(path) = &self.settings.config_path {
            config.save(path)?;
        }
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}

#[derive(Serialize)]
struct ApiResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn success(data: Value) -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "success",
        message: None,
        data: Some(data),
    })
}

fn success_with_message(message: String, data: Option<Value>) -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "success",
        message: Some(message),
        data,
    })
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = ApiResponse {
        status: "error",
        message: Some(message),
        data: None,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportError::NotFound { .. } | ReportError::InvalidIndex(_) => {
                StatusCode::NOT_FOUND
            }
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        }
        error_response(status, self.to_string())
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<usize>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct ChartQuery {
    kind: Option<String>,
}

#[derive(Deserialize)]
struct TemplateQuery {
    format: Option<String>,
}

/// Build the API router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.settings.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/students", get(list_students))
        .route("/api/students/:index", get(get_student))
        .route("/api/students/:index/report", get(student_report))
        .route("/api/reports/generate", post(generate_reports))
        .route("/api/statistics", get(get_statistics))
        .route("/api/statistics/chart.svg", get(statistics_chart))
        .route("/api/data", axum::routing::delete(clear_data))
        .route("/api/template", get(download_template))
        .route(
            "/api/config",
            get(get_config).put(update_config).delete(reset_config),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the JSON API until the process is stopped.
///
/// # Arguments
/// * `settings` - Listen address, upload cap and optional config file path
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Error if the state cannot be
///   built or the listener cannot bind
pub async fn run(settings: ServerSettings) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let address = settings.address();
    let state = Arc::new(AppState::new(settings)?);
    let app = router(state);

    let listener = TcpListener::bind(&address).await?;
    log::info!("Listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "service is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ReportError::malformed(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload.xlsx").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ReportError::malformed(e.to_string()))?;
            upload = Some((file_name, bytes));
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| ReportError::malformed("no file uploaded"))?;
    if bytes.is_empty() {
        return Err(ReportError::malformed("uploaded file is empty"));
    }
    log::info!("processing upload '{}' ({} bytes)", file_name, bytes.len());

    let table = RawTable::from_bytes(&bytes, &file_name)?;
    let dataset = state.store.ingest_table(&table)?;

    Ok(success_with_message(
        format!("imported {} students", dataset.len()),
        Some(json!({
            "totalStudents": dataset.len(),
            "subjects": dataset.subjects(),
            "students": dataset.preview(UPLOAD_PREVIEW),
        })),
    ))
}

async fn list_students(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse>> {
    let dataset = state.store.snapshot();
    let page = dataset.page(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    Ok(success(serde_json::to_value(&page)?))
}

/// Negative or non-numeric segments name no record, so they are 404s too.
fn parse_index(raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .map_err(|_| ReportError::InvalidIndex(raw.to_string()))
}

async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Json<ApiResponse>> {
    let dataset = state.store.snapshot();
    let student = dataset.get(parse_index(&index)?)?;
    Ok(success(serde_json::to_value(student)?))
}

async fn student_report(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Json<ApiResponse>> {
    let dataset = state.store.snapshot();
    let student = dataset.get(parse_index(&index)?)?;
    let model = render(student, dataset.len(), &state.config());
    let html = state.renderer.render(&model)?;

    Ok(success(json!({
        "html": html,
        "model": model,
        "student": {
            "name": student.name(),
            "studentId": student.student_id(),
            "class": student.class(),
        },
    })))
}

async fn generate_reports(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>> {
    let dataset = state.store.snapshot();
    if dataset.is_empty() {
        return Err(ReportError::malformed("no student data loaded"));
    }

    let batch = state.renderer.export_all(&dataset, &state.config());
    Ok(success_with_message(
        format!("generated {} reports", batch.total_reports),
        Some(serde_json::to_value(&batch)?),
    ))
}

async fn get_statistics(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>> {
    let stats = statistics::compute(&state.store.snapshot());
    Ok(success(serde_json::to_value(&stats)?))
}

async fn statistics_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Result<Response> {
    let stats = statistics::compute(&state.store.snapshot());
    let options = ChartOptions::default();
    let svg = match query.kind.as_deref() {
        Some("grades") => chart::grade_distribution_svg(&stats, &options)?,
        _ => chart::subject_average_svg(&stats, &options)?,
    };
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn clear_data(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.store.clear();
    success_with_message("data cleared".to_string(), None)
}

async fn download_template(Query(query): Query<TemplateQuery>) -> Result<Response> {
    let (bytes, content_type, file_name) = match query.format.as_deref() {
        Some("csv") => (
            template::template_csv()?,
            "text/csv; charset=utf-8",
            template::TEMPLATE_FILE_NAME.replace(".xlsx", ".csv"),
        ),
        _ => (
            template::template_xlsx()?,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            template::TEMPLATE_FILE_NAME.to_string(),
        ),
    };
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn get_config(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>> {
    Ok(success(serde_json::to_value(state.config())?))
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<ReportConfig>,
) -> Result<Json<ApiResponse>> {
    state.set_config(config.clone())?;
    Ok(success_with_message(
        "configuration saved".to_string(),
        Some(serde_json::to_value(config)?),
    ))
}

async fn reset_config(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>> {
    let config = ReportConfig::default();
    state.set_config(config.clone())?;
    Ok(success_with_message(
        "configuration reset".to_string(),
        Some(serde_json::to_value(config)?),
    ))
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "no such endpoint".to_string())
}
