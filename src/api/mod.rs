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
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::core::{CAP, MONTH_NAMES, Preset};
use crate::error::InputError;
use crate::input::ScenarioRequest;
use crate::report::{ChartOptions, ScenarioReport, scenario_chart, smoothing_chart};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiPreset {
    Custom,
    #[serde(alias = "highCostOncology", alias = "high_cost_oncology", alias = "oncology")]
    HighCostOncology,
    #[serde(alias = "insulinDependent", alias = "insulin_dependent", alias = "insulin")]
    InsulinDependent,
    #[serde(alias = "chronicMixedMeds", alias = "chronic_mixed_meds", alias = "chronic")]
    ChronicMixedMeds,
    #[serde(alias = "occasionalUser", alias = "occasional_user", alias = "occasional")]
    OccasionalUser,
}

impl From<ApiPreset> for Preset {
    fn from(value: ApiPreset) -> Self {
        match value {
            ApiPreset::Custom => Preset::Custom,
            ApiPreset::HighCostOncology => Preset::HighCostOncology,
            ApiPreset::InsulinDependent => Preset::InsulinDependent,
            ApiPreset::ChronicMixedMeds => Preset::ChronicMixedMeds,
            ApiPreset::OccasionalUser => Preset::OccasionalUser,
        }
    }
}

impl From<Preset> for ApiPreset {
    fn from(value: Preset) -> Self {
        match value {
            Preset::Custom => ApiPreset::Custom,
            Preset::HighCostOncology => ApiPreset::HighCostOncology,
            Preset::InsulinDependent => ApiPreset::InsulinDependent,
            Preset::ChronicMixedMeds => ApiPreset::ChronicMixedMeds,
            Preset::OccasionalUser => ApiPreset::OccasionalUser,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiChartSeries {
    #[default]
    #[serde(alias = "all")]
    AllScenarios,
    #[serde(alias = "smoothing")]
    CapOnly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    annual_estimate: Option<f64>,
    start_month: Option<i64>,
    preset: Option<ApiPreset>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChartQuery {
    annual_estimate: Option<f64>,
    start_month: Option<i64>,
    preset: Option<ApiPreset>,
    series: Option<ApiChartSeries>,
    width: Option<u32>,
    height: Option<u32>,
}

impl ChartQuery {
    fn payload(&self) -> ScenarioPayload {
        ScenarioPayload {
            annual_estimate: self.annual_estimate,
            start_month: self.start_month,
            preset: self.preset,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetEntry {
    id: ApiPreset,
    label: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    annual_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetsResponse {
    cap: f64,
    months: [&'static str; 12],
    presets: Vec<PresetEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

const MIN_CHART_DIMENSION: u32 = 200;
const MAX_CHART_DIMENSION: u32 = 2000;

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/healthz", get(health_handler))
        .route("/api/presets", get(presets_handler))
        .route(
            "/api/scenario",
            get(scenario_get_handler).post(scenario_post_handler),
        )
        .route("/api/chart.svg", get(chart_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "cap explorer HTTP API listening");
    info!("local access: http://127.0.0.1:{}/", addr.port());
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

async fn health_handler() -> impl IntoResponse {
    with_cache_control("ok")
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn presets_handler() -> Response {
    json_response(StatusCode::OK, presets_response())
}

const BAD_QUERY_MSG: &str = "Could not read the query: annualEstimate must be a number, \
startMonth a whole number and preset one of the listed presets.";
const BAD_BODY_MSG: &str = "Request body must be a JSON object with annualEstimate, \
startMonth and preset fields.";

async fn scenario_get_handler(query: Result<Query<ScenarioPayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => scenario_handler_impl(payload),
        Err(rejection) => malformed(&rejection.body_text(), BAD_QUERY_MSG),
    }
}

async fn scenario_post_handler(body: Result<Json<ScenarioPayload>, JsonRejection>) -> Response {
    match body {
        Ok(Json(payload)) => scenario_handler_impl(payload),
        Err(rejection) => malformed(&rejection.body_text(), BAD_BODY_MSG),
    }
}

fn scenario_handler_impl(payload: ScenarioPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return rejected(err),
    };
    let report = ScenarioReport::build(&request);
    debug!(
        annual_estimate = request.annual_estimate,
        start_month = request.start_month,
        preset = request.preset.label(),
        "scenario computed"
    );
    json_response(StatusCode::OK, report)
}

async fn chart_handler(query: Result<Query<ChartQuery>, QueryRejection>) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return malformed(&rejection.body_text(), BAD_QUERY_MSG),
    };
    let request = match api_request_from_payload(query.payload()) {
        Ok(request) => request,
        Err(err) => return rejected(err),
    };
    let options = ChartOptions {
        width: query
            .width
            .unwrap_or(700)
            .clamp(MIN_CHART_DIMENSION, MAX_CHART_DIMENSION),
        height: query
            .height
            .unwrap_or(300)
            .clamp(MIN_CHART_DIMENSION, MAX_CHART_DIMENSION),
        ..ChartOptions::default()
    };
    let set = request.run();
    let svg = match query.series.unwrap_or_default() {
        ApiChartSeries::AllScenarios => scenario_chart(&set, &options),
        ApiChartSeries::CapOnly => smoothing_chart(&set, &options),
    };
    with_cache_control(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

fn rejected(err: InputError) -> Response {
    warn!(error = %err, "rejected scenario input");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn malformed(detail: &str, msg: &str) -> Response {
    warn!(detail, "malformed scenario request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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
fn api_request_from_json(json: &str) -> Result<ScenarioRequest, String> {
    let payload = serde_json::from_str::<ScenarioPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ScenarioPayload) -> Result<ScenarioRequest, InputError> {
    ScenarioRequest::resolve(
        payload.preset.map(Preset::from),
        payload.annual_estimate,
        payload.start_month,
    )
}

fn presets_response() -> PresetsResponse {
    PresetsResponse {
        cap: CAP,
        months: MONTH_NAMES,
        presets: Preset::ALL
            .into_iter()
            .map(|preset| PresetEntry {
                id: preset.into(),
                label: preset.label(),
                description: preset.description(),
                annual_estimate: preset.profile().map(|p| p.annual_estimate),
                start_month: preset.profile().map(|p| p.start_month),
            })
            .collect(),
    }
}
