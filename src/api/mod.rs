use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::cli::{CliRiskProfile, ProjectArgs};
use crate::core::InputError;
use crate::core::input::LenientNumber;
use crate::report::{
    CSV_FILE_NAME, Calculation, ChartKind, ReportError, breakdown_csv, report_document,
    share_message,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<ApiRiskProfile> for CliRiskProfile {
    fn from(value: ApiRiskProfile) -> Self {
        match value {
            ApiRiskProfile::Conservative => CliRiskProfile::Conservative,
            ApiRiskProfile::Moderate => CliRiskProfile::Moderate,
            ApiRiskProfile::Aggressive => CliRiskProfile::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiChartKind {
    Bar,
    Line,
}

impl From<ApiChartKind> for ChartKind {
    fn from(value: ApiChartKind) -> Self {
        match value {
            ApiChartKind::Bar => ChartKind::Bar,
            ApiChartKind::Line => ChartKind::Line,
        }
    }
}

/// Mirrors the web form. Numeric fields accept numbers or raw field text.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    initial_capital: Option<LenientNumber>,
    regular_contribution: Option<LenientNumber>,
    contribution_frequency: Option<LenientNumber>,
    interest_rate: Option<LenientNumber>,
    capitalization_frequency: Option<LenientNumber>,
    term: Option<LenientNumber>,
    currency: Option<String>,
    fallback_symbol: Option<String>,
    #[serde(alias = "risk")]
    risk_tolerance: Option<ApiRiskProfile>,
    #[serde(alias = "chart")]
    chart_type: Option<ApiChartKind>,
}

#[derive(Debug)]
struct ApiRequest {
    args: ProjectArgs,
    chart: ChartKind,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Payload(String),
    Input(InputError),
    Report(ReportError),
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Payload(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::Payload(value.body_text())
    }
}

impl From<InputError> for ApiError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<ReportError> for ApiError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Payload(msg) => {
                tracing::warn!("rejected projection payload: {msg}");
                error_response(StatusCode::BAD_REQUEST, &msg)
            }
            ApiError::Input(err) => {
                tracing::warn!("rejected projection input: {err}");
                error_response(StatusCode::BAD_REQUEST, &err.to_string())
            }
            ApiError::Report(ReportError::NoCalculation) => error_response(
                StatusCode::CONFLICT,
                &ReportError::NoCalculation.to_string(),
            ),
            ApiError::Report(err) => {
                tracing::error!("report generation failed: {err}");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route(
            "/api/export.csv",
            get(export_csv_get_handler).post(export_csv_post_handler),
        )
        .route(
            "/api/report",
            get(report_get_handler).post(report_post_handler),
        )
        .route("/api/share", get(share_get_handler).post(share_post_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("compound interest HTTP API listening on http://{addr}");
    tracing::info!("local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = payload?;
    project_handler_impl(payload)
}

async fn project_post_handler(
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    project_handler_impl(payload)
}

async fn export_csv_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = payload?;
    export_csv_handler_impl(payload)
}

async fn export_csv_post_handler(
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    export_csv_handler_impl(payload)
}

async fn report_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = payload?;
    report_handler_impl(payload)
}

async fn report_post_handler(
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    report_handler_impl(payload)
}

async fn share_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = payload?;
    share_handler_impl(payload)
}

async fn share_post_handler(
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    share_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Result<Response, ApiError> {
    let request = api_request_from_payload(payload);
    let calculation = request.args.calculation()?;
    tracing::info!(
        term_years = calculation.input().term_years,
        final_capital = calculation.result().final_capital,
        "projection served"
    );
    Ok(json_response(StatusCode::OK, calculation.view(request.chart)))
}

fn export_csv_handler_impl(payload: ProjectPayload) -> Result<Response, ApiError> {
    let calculation = calculation_from_payload(payload)?;
    let csv = breakdown_csv(&calculation)?;
    let disposition = format!("attachment; filename=\"{CSV_FILE_NAME}\"");
    Ok(with_cache_control((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )))
}

fn report_handler_impl(payload: ProjectPayload) -> Result<Response, ApiError> {
    let calculation = calculation_from_payload(payload)?;
    let document = report_document(&calculation)?;
    Ok(json_response(StatusCode::OK, document))
}

fn share_handler_impl(payload: ProjectPayload) -> Result<Response, ApiError> {
    let calculation = calculation_from_payload(payload)?;
    let message = share_message(&calculation)?;
    Ok(json_response(StatusCode::OK, message))
}

fn calculation_from_payload(payload: ProjectPayload) -> Result<Calculation, ApiError> {
    Ok(api_request_from_payload(payload).args.calculation()?)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(api_request_from_payload(payload))
}

fn api_request_from_payload(payload: ProjectPayload) -> ApiRequest {
    let mut args = ProjectArgs::default();
    let mut chart = ChartKind::default();

    if let Some(v) = payload.initial_capital {
        args.initial_capital = v.into_raw();
    }
    if let Some(v) = payload.regular_contribution {
        args.contribution = v.into_raw();
    }
    if let Some(v) = payload.contribution_frequency {
        args.contribution_frequency = v.into_raw();
    }
    if let Some(v) = payload.interest_rate {
        args.rate = Some(v.into_raw());
    }
    if let Some(v) = payload.capitalization_frequency {
        args.capitalization_frequency = v.into_raw();
    }
    if let Some(v) = payload.term {
        args.term = v.into_raw();
    }
    if let Some(v) = payload.currency {
        args.currency = v;
    }
    if let Some(v) = payload.fallback_symbol {
        args.fallback_symbol = v;
    }
    if let Some(v) = payload.risk_tolerance {
        args.risk = Some(v.into());
    }
    if let Some(v) = payload.chart_type {
        chart = v.into();
    }

    ApiRequest { args, chart }
}
