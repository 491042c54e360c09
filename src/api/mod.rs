use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{
    ProjectionInputs, ProjectionSummary, YearlySnapshot, format_inr, sanitize_amount,
    sanitize_amount_value, summarize,
};
use crate::donation::DonationPrompt;
use crate::session::{Identity, SessionError, SessionProvider};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const DONATIONS_DISABLED: &str = "Donations are not configured";

pub struct AppState {
    pub session: Arc<dyn SessionProvider>,
    pub donation: Option<DonationPrompt>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    monthly_contribution: Option<RawNumber>,
    horizon_years: Option<RawNumber>,
    annual_rate_percent: Option<RawNumber>,
    starting_balance: Option<RawNumber>,
}

/// A numeric entry as typed by the user: a JSON number, or text from a
/// query string or form field that may be empty or garbage.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn amount(&self) -> f64 {
        match self {
            RawNumber::Number(v) => sanitize_amount_value(*v),
            RawNumber::Text(raw) => sanitize_amount(raw),
        }
    }

    fn value(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(v) => Some(*v),
            RawNumber::Text(raw) => raw.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSummary {
    pub invested: String,
    pub returns: String,
    pub total_value: String,
}

impl From<&ProjectionSummary> for FormattedSummary {
    fn from(value: &ProjectionSummary) -> Self {
        Self {
            invested: format_inr(value.invested),
            returns: format_inr(value.returns),
            total_value: format_inr(value.total_value),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSnapshot {
    pub year: u32,
    pub invested: String,
    pub returns: String,
    pub total_value: String,
}

impl From<&YearlySnapshot> for FormattedSnapshot {
    fn from(value: &YearlySnapshot) -> Self {
        Self {
            year: value.year,
            invested: format_inr(value.invested),
            returns: format_inr(value.returns),
            total_value: format_inr(value.total_value),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormattedProjection {
    pub summary: FormattedSummary,
    pub breakdown: Vec<FormattedSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub inputs: ProjectionInputs,
    pub summary: ProjectionSummary,
    pub breakdown: Vec<YearlySnapshot>,
    pub formatted: FormattedProjection,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    user: Option<Identity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DonationResponse<'a> {
    upi_id: &'a str,
    payee_name: &'a str,
    payment_uri: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16, state: AppState) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    // Held for the server's lifetime; released when serving stops.
    let _identity_log = state
        .session
        .subscribe(Box::new(|user: Option<&Identity>| match user {
            Some(identity) => log::info!("identity changed: {}", identity.id),
            None => log::info!("identity changed: signed out"),
        }));

    let app = router(Arc::new(state));
    let listener = TcpListener::bind(addr).await?;
    log::info!("SIP calculator listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/session", get(session_handler))
        .route("/api/session/sign-in", post(sign_in_handler))
        .route("/api/session/sign-out", post(sign_out_handler))
        .route("/api/donation", get(donation_handler))
        .route("/api/donation/qr.svg", get(donation_qr_handler))
        .fallback(not_found_handler)
        .with_state(state)
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

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = inputs_from_payload(payload);
    log::debug!("projecting {inputs:?}");
    json_response(StatusCode::OK, build_project_response(inputs))
}

async fn session_handler(State(state): State<Arc<AppState>>) -> Response {
    json_response(
        StatusCode::OK,
        SessionResponse {
            user: state.session.current_user(),
        },
    )
}

async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    Json(identity): Json<Identity>,
) -> Response {
    match state.session.sign_in(identity) {
        Ok(user) => json_response(StatusCode::OK, SessionResponse { user: Some(user) }),
        Err(err) => session_error_response(&err),
    }
}

async fn sign_out_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.session.sign_out() {
        Ok(()) => json_response(StatusCode::OK, SessionResponse { user: None }),
        Err(err) => session_error_response(&err),
    }
}

fn session_error_response(err: &SessionError) -> Response {
    let status = match err {
        SessionError::NotSignedIn => StatusCode::CONFLICT,
        SessionError::EmptyIdentity => StatusCode::BAD_REQUEST,
    };
    error_response(status, &err.to_string())
}

async fn donation_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(prompt) = state.donation.as_ref() else {
        return error_response(StatusCode::NOT_FOUND, DONATIONS_DISABLED);
    };
    json_response(
        StatusCode::OK,
        DonationResponse {
            upi_id: &prompt.upi_id,
            payee_name: &prompt.payee_name,
            payment_uri: prompt.payment_uri(),
        },
    )
}

async fn donation_qr_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(prompt) = state.donation.as_ref() else {
        return error_response(StatusCode::NOT_FOUND, DONATIONS_DISABLED);
    };
    match prompt.qr_svg() {
        Ok(svg) => with_cache_control(([(header::CONTENT_TYPE, "image/svg+xml")], svg)),
        Err(e) => {
            log::error!("{e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
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
fn inputs_from_json(json: &str) -> Result<ProjectionInputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(inputs_from_payload(payload))
}

fn inputs_from_payload(payload: ProjectPayload) -> ProjectionInputs {
    let mut inputs = ProjectionInputs::default();

    if let Some(v) = payload.monthly_contribution {
        inputs.monthly_contribution = v.amount();
    }
    // Blank or unreadable horizon and rate entries keep their defaults.
    if let Some(v) = payload.horizon_years.as_ref().and_then(RawNumber::value) {
        inputs.horizon_years = v.max(0.0) as u32;
    }
    if let Some(v) = payload.annual_rate_percent.as_ref().and_then(RawNumber::value) {
        inputs.annual_rate_percent = v;
    }
    if let Some(v) = payload.starting_balance {
        inputs.starting_balance = v.amount();
    }

    inputs.sanitized()
}

pub fn build_project_response(inputs: ProjectionInputs) -> ProjectResponse {
    let breakdown = inputs.project();
    let summary = summarize(&breakdown);
    let formatted = FormattedProjection {
        summary: FormattedSummary::from(&summary),
        breakdown: breakdown.iter().map(FormattedSnapshot::from).collect(),
    };
    ProjectResponse {
        inputs,
        summary,
        breakdown,
        formatted,
    }
}
