pub mod cli;

use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::arith::{format_currency, format_percent, round_to};
use crate::core::faq::{FaqCatalog, FaqEntry};
use crate::core::fraction::{self, Fraction, FractionOp, FractionOutcome};
use crate::core::paint::{self, PaintEstimate, PaintJob, ProjectType, RoomPreset, SurfaceTexture};
use crate::core::percentage::{self, PercentageKind, PercentageOutcome, PercentageQuery};
use crate::core::salary::{self, FilingStatus, PayPeriod, SalaryInput, SalaryReport};
use crate::core::wellness::{self, AgeGroup, ScreenTimeLog, WellnessReport};
use crate::core::{
    CalcError, CatchUpBasis, ProjectionPolicy, ProjectionSummary, RetirementPlan, WhatIfScenario,
    YearlyProjection, run_projection_with_policy, run_what_if_scenarios, validate_plan,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;
const MAX_OPENINGS: u32 = 50;
const MAX_DIMENSION_FT: f64 = 1_000.0;
const MAX_COATS: u32 = 5;
const HOURS_PER_WEEK_MAX: f64 = 168.0;
const WEEKS_PER_YEAR_MAX: f64 = 52.0;

type SharedCatalog = Arc<FaqCatalog>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCatchUpBasis {
    #[serde(alias = "startingAge", alias = "starting")]
    StartingAge,
    #[serde(alias = "simulatedAge", alias = "simulated")]
    SimulatedAge,
}

impl From<ApiCatchUpBasis> for CatchUpBasis {
    fn from(value: ApiCatchUpBasis) -> Self {
        match value {
            ApiCatchUpBasis::StartingAge => CatchUpBasis::StartingAge,
            ApiCatchUpBasis::SimulatedAge => CatchUpBasis::SimulatedAge,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFractionOperation {
    #[serde(alias = "+")]
    Add,
    #[serde(alias = "-")]
    Subtract,
    #[serde(alias = "*", alias = "x")]
    Multiply,
    #[serde(alias = "/")]
    Divide,
    Simplify,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetirementPayload {
    pub current_age: Option<u32>,
    pub retirement_age: Option<u32>,
    pub current_balance: Option<f64>,
    pub annual_salary: Option<f64>,
    pub contribution_percent: Option<f64>,
    pub annual_return: Option<f64>,
    pub employer_match: Option<f64>,
    pub match_limit: Option<f64>,
    pub salary_increase: Option<f64>,
    catch_up_basis: Option<ApiCatchUpBasis>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FractionPayload {
    pub numerator1: Option<i64>,
    pub denominator1: Option<i64>,
    pub numerator2: Option<i64>,
    pub denominator2: Option<i64>,
    operation: Option<ApiFractionOperation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PercentagePayload {
    pub kind: Option<PercentageKind>,
    pub value1: Option<f64>,
    pub value2: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalaryPayload {
    pub amount: Option<f64>,
    pub period: Option<PayPeriod>,
    pub hours_per_week: Option<f64>,
    pub weeks_per_year: Option<f64>,
    pub filing_status: Option<FilingStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaintPayload {
    pub preset: Option<RoomPreset>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub doors: Option<u32>,
    pub windows: Option<u32>,
    pub coats: Option<u32>,
    pub texture: Option<SurfaceTexture>,
    pub project_type: Option<ProjectType>,
    pub include_ceiling: Option<bool>,
    pub primer: Option<bool>,
    pub price_per_gallon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WellnessPayload {
    pub social_media: Option<f64>,
    pub entertainment: Option<f64>,
    pub gaming: Option<f64>,
    pub productive: Option<f64>,
    pub educational: Option<f64>,
    pub pickups: Option<u32>,
    pub bedtime_minutes: Option<u32>,
    pub age_group: Option<AgeGroup>,
}

#[derive(Debug)]
struct RetirementRequest {
    plan: RetirementPlan,
    policy: ProjectionPolicy,
}

#[derive(Debug)]
enum FractionRequest {
    Simplify { numerator: i64, denominator: i64 },
    Binary(Fraction, FractionOp, Fraction),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedSummary {
    final_balance: String,
    purchasing_power: String,
    total_contributions: String,
    investment_growth: String,
    monthly_income: String,
    employee_percent: String,
    employer_percent: String,
    growth_percent: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResponse {
    current_age: u32,
    retirement_age: u32,
    summary: ProjectionSummary,
    formatted: FormattedSummary,
    years: Vec<YearlyProjection>,
    what_if: Vec<WhatIfScenario>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageResponse {
    #[serde(flatten)]
    outcome: PercentageOutcome,
    display: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResponse {
    #[serde(flatten)]
    report: SalaryReport,
    annual_display: String,
    hourly_display: String,
    effective_rate_display: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintResponse {
    #[serde(flatten)]
    estimate: PaintEstimate,
    cost_display: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FaqResponse {
    page: String,
    faqs: Vec<FaqEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'static str>,
}

/// Failure from either request building (bad input) or an engine.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Calc(#[from] CalcError),
}

pub async fn run_http_server(port: u16, catalog: FaqCatalog) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(Arc::new(catalog));

    let listener = TcpListener::bind(addr).await?;
    info!("calculator HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route(
            "/api/fraction",
            get(fraction_get_handler).post(fraction_post_handler),
        )
        .route(
            "/api/percentage",
            get(percentage_get_handler).post(percentage_post_handler),
        )
        .route(
            "/api/salary",
            get(salary_get_handler).post(salary_post_handler),
        )
        .route("/api/paint", get(paint_get_handler).post(paint_post_handler))
        .route(
            "/api/wellness",
            get(wellness_get_handler).post(wellness_post_handler),
        )
        .route("/api/faq/:page", get(faq_handler))
        .fallback(not_found_handler)
        .with_state(catalog)
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
    error_response(StatusCode::NOT_FOUND, "Not found", None)
}

async fn retirement_get_handler(
    payload: Result<Query<RetirementPayload>, QueryRejection>,
) -> Response {
    respond(from_query(payload).and_then(retirement_response))
}

async fn retirement_post_handler(
    payload: Result<Json<RetirementPayload>, JsonRejection>,
) -> Response {
    respond(from_json(payload).and_then(retirement_response))
}

async fn fraction_get_handler(payload: Result<Query<FractionPayload>, QueryRejection>) -> Response {
    respond(from_query(payload).and_then(fraction_response))
}

async fn fraction_post_handler(payload: Result<Json<FractionPayload>, JsonRejection>) -> Response {
    respond(from_json(payload).and_then(fraction_response))
}

async fn percentage_get_handler(
    payload: Result<Query<PercentagePayload>, QueryRejection>,
) -> Response {
    respond(from_query(payload).and_then(percentage_response))
}

async fn percentage_post_handler(
    payload: Result<Json<PercentagePayload>, JsonRejection>,
) -> Response {
    respond(from_json(payload).and_then(percentage_response))
}

async fn salary_get_handler(payload: Result<Query<SalaryPayload>, QueryRejection>) -> Response {
    respond(from_query(payload).and_then(salary_response))
}

async fn salary_post_handler(payload: Result<Json<SalaryPayload>, JsonRejection>) -> Response {
    respond(from_json(payload).and_then(salary_response))
}

async fn paint_get_handler(payload: Result<Query<PaintPayload>, QueryRejection>) -> Response {
    respond(from_query(payload).and_then(paint_response))
}

async fn paint_post_handler(payload: Result<Json<PaintPayload>, JsonRejection>) -> Response {
    respond(from_json(payload).and_then(paint_response))
}

async fn wellness_get_handler(payload: Result<Query<WellnessPayload>, QueryRejection>) -> Response {
    respond(from_query(payload).and_then(wellness_response))
}

async fn wellness_post_handler(payload: Result<Json<WellnessPayload>, JsonRejection>) -> Response {
    respond(from_json(payload).and_then(wellness_response))
}

async fn faq_handler(State(catalog): State<SharedCatalog>, Path(page): Path<String>) -> Response {
    debug!("resolving FAQ for page {page}");
    let faqs = catalog.resolve(&page);
    json_response(StatusCode::OK, FaqResponse { page, faqs })
}

fn from_query<T>(payload: Result<Query<T>, QueryRejection>) -> Result<T, RequestError> {
    payload
        .map(|Query(payload)| payload)
        .map_err(|e| {
            RequestError::Invalid(format!("Invalid query string: {}", e.body_text()))
        })
}

fn from_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RequestError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|e| {
            RequestError::Invalid(format!("Invalid API JSON payload: {}", e.body_text()))
        })
}

fn respond<T: Serialize>(result: Result<T, RequestError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(RequestError::Invalid(msg)) => error_response(StatusCode::BAD_REQUEST, &msg, None),
        Err(RequestError::Calc(err)) => calc_error_response(&err),
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

fn error_response(status: StatusCode, msg: &str, result: Option<&'static str>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            result,
        },
    )
}

fn calc_error_response(err: &CalcError) -> Response {
    if err.is_undefined() {
        error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &err.to_string(),
            Some("undefined"),
        )
    } else {
        error_response(StatusCode::BAD_REQUEST, &err.to_string(), None)
    }
}

fn require_finite(fields: &[(&str, f64)]) -> Result<(), RequestError> {
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(RequestError::Invalid(format!(
                "{name} must be a finite number"
            )));
        }
    }
    Ok(())
}

fn default_retirement_plan() -> RetirementPlan {
    RetirementPlan {
        current_age: 35,
        retirement_age: 65,
        current_balance: 50_000.0,
        annual_salary: 80_000.0,
        contribution_percent: 10.0,
        annual_return_percent: 7.0,
        employer_match_percent: 50.0,
        match_limit_percent: 6.0,
        salary_growth_percent: 3.0,
    }
}

fn retirement_request(payload: RetirementPayload) -> Result<RetirementRequest, RequestError> {
    let defaults = default_retirement_plan();
    let raw = RetirementPlan {
        current_age: payload.current_age.unwrap_or(defaults.current_age),
        retirement_age: payload.retirement_age.unwrap_or(defaults.retirement_age),
        current_balance: payload.current_balance.unwrap_or(defaults.current_balance),
        annual_salary: payload.annual_salary.unwrap_or(defaults.annual_salary),
        contribution_percent: payload
            .contribution_percent
            .unwrap_or(defaults.contribution_percent),
        annual_return_percent: payload
            .annual_return
            .unwrap_or(defaults.annual_return_percent),
        employer_match_percent: payload
            .employer_match
            .unwrap_or(defaults.employer_match_percent),
        match_limit_percent: payload.match_limit.unwrap_or(defaults.match_limit_percent),
        salary_growth_percent: payload
            .salary_increase
            .unwrap_or(defaults.salary_growth_percent),
    };
    require_finite(&[
        ("currentBalance", raw.current_balance),
        ("annualSalary", raw.annual_salary),
        ("contributionPercent", raw.contribution_percent),
        ("annualReturn", raw.annual_return_percent),
        ("employerMatch", raw.employer_match_percent),
        ("matchLimit", raw.match_limit_percent),
        ("salaryIncrease", raw.salary_growth_percent),
    ])?;

    let plan = clamp_retirement_plan(raw);
    validate_plan(&plan)?;

    let policy = ProjectionPolicy {
        catch_up_basis: payload
            .catch_up_basis
            .map(CatchUpBasis::from)
            .unwrap_or_default(),
        ..ProjectionPolicy::default()
    };
    Ok(RetirementRequest { plan, policy })
}

/// Clamps raw form input into the range the projection accepts.
fn clamp_retirement_plan(plan: RetirementPlan) -> RetirementPlan {
    let current_age = plan.current_age.clamp(MIN_AGE, MAX_AGE - 1);
    RetirementPlan {
        current_age,
        retirement_age: plan.retirement_age.clamp(current_age + 1, MAX_AGE),
        current_balance: plan.current_balance.max(0.0),
        annual_salary: plan.annual_salary.max(0.0),
        contribution_percent: plan.contribution_percent.clamp(0.0, 100.0),
        annual_return_percent: plan.annual_return_percent.clamp(-99.0, 100.0),
        employer_match_percent: plan.employer_match_percent.clamp(0.0, 100.0),
        match_limit_percent: plan.match_limit_percent.clamp(0.0, 100.0),
        salary_growth_percent: plan.salary_growth_percent.clamp(-99.0, 100.0),
    }
}

pub fn retirement_response(payload: RetirementPayload) -> Result<RetirementResponse, RequestError> {
    let RetirementRequest { plan, policy } = retirement_request(payload)?;
    debug!(
        "projecting 401(k) from age {} to {}",
        plan.current_age, plan.retirement_age
    );

    let projection = run_projection_with_policy(&plan, &policy);
    let what_if = run_what_if_scenarios(&plan, &policy, projection.summary.final_balance);
    let summary = projection.summary;
    let formatted = FormattedSummary {
        final_balance: format_currency(summary.final_balance),
        purchasing_power: format_currency(summary.purchasing_power),
        total_contributions: format_currency(summary.total_contributions),
        investment_growth: format_currency(summary.investment_growth),
        monthly_income: format_currency(summary.estimated_monthly_income),
        employee_percent: format_percent(summary.employee_percent, 1),
        employer_percent: format_percent(summary.employer_percent, 1),
        growth_percent: format_percent(summary.growth_percent, 1),
    };

    Ok(RetirementResponse {
        current_age: plan.current_age,
        retirement_age: plan.retirement_age,
        summary,
        formatted,
        years: projection.years,
        what_if,
    })
}

fn fraction_request(payload: FractionPayload) -> Result<FractionRequest, RequestError> {
    let numerator1 = payload.numerator1.unwrap_or(1);
    let denominator1 = payload.denominator1.unwrap_or(2);
    let operation = payload.operation.unwrap_or(ApiFractionOperation::Add);

    let op = match operation {
        ApiFractionOperation::Simplify => {
            return Ok(FractionRequest::Simplify {
                numerator: numerator1,
                denominator: denominator1,
            });
        }
        ApiFractionOperation::Add => FractionOp::Add,
        ApiFractionOperation::Subtract => FractionOp::Subtract,
        ApiFractionOperation::Multiply => FractionOp::Multiply,
        ApiFractionOperation::Divide => FractionOp::Divide,
    };

    let left = Fraction::new(numerator1, denominator1)?;
    let right = Fraction::new(
        payload.numerator2.unwrap_or(1),
        payload.denominator2.unwrap_or(3),
    )?;
    Ok(FractionRequest::Binary(left, op, right))
}

pub fn fraction_response(payload: FractionPayload) -> Result<FractionOutcome, RequestError> {
    let outcome = match fraction_request(payload)? {
        FractionRequest::Simplify {
            numerator,
            denominator,
        } => fraction::simplify_outcome(numerator, denominator)?,
        FractionRequest::Binary(left, op, right) => fraction::evaluate(left, op, right)?,
    };
    Ok(outcome)
}

pub fn percentage_response(
    payload: PercentagePayload,
) -> Result<PercentageResponse, RequestError> {
    let query = PercentageQuery {
        kind: payload.kind.unwrap_or(PercentageKind::PercentOf),
        value1: payload.value1.unwrap_or(20.0),
        value2: payload.value2.unwrap_or(150.0),
    };
    require_finite(&[("value1", query.value1), ("value2", query.value2)])?;

    let outcome = percentage::evaluate(&query)?;
    let display = match outcome.kind {
        PercentageKind::WhatPercent | PercentageKind::PercentChange => {
            format_percent(outcome.result, 2)
        }
        PercentageKind::PercentOf | PercentageKind::IncreaseBy | PercentageKind::DecreaseBy => {
            round_to(outcome.result, 2).to_string()
        }
    };
    Ok(PercentageResponse { outcome, display })
}

fn salary_input(payload: SalaryPayload) -> Result<SalaryInput, RequestError> {
    let input = SalaryInput {
        amount: payload.amount.unwrap_or(60_000.0),
        period: payload.period.unwrap_or(PayPeriod::Annual),
        hours_per_week: payload.hours_per_week.unwrap_or(40.0),
        weeks_per_year: payload.weeks_per_year.unwrap_or(52.0),
        filing_status: payload.filing_status.unwrap_or(FilingStatus::Single),
    };
    require_finite(&[
        ("amount", input.amount),
        ("hoursPerWeek", input.hours_per_week),
        ("weeksPerYear", input.weeks_per_year),
    ])?;

    Ok(SalaryInput {
        amount: input.amount.max(0.0),
        hours_per_week: input.hours_per_week.clamp(1.0, HOURS_PER_WEEK_MAX),
        weeks_per_year: input.weeks_per_year.clamp(1.0, WEEKS_PER_YEAR_MAX),
        ..input
    })
}

pub fn salary_response(payload: SalaryPayload) -> Result<SalaryResponse, RequestError> {
    let input = salary_input(payload)?;
    let report = salary::salary_report(&input)?;
    Ok(SalaryResponse {
        annual_display: format_currency(report.breakdown.annual),
        hourly_display: format!("${:.2}", report.breakdown.hourly),
        effective_rate_display: format_percent(report.tax.effective_rate, 1),
        report,
    })
}

fn paint_job(payload: PaintPayload) -> Result<PaintJob, RequestError> {
    let mut room = payload.preset.unwrap_or(RoomPreset::Bedroom).dimensions();
    if let Some(v) = payload.length {
        room.length = v;
    }
    if let Some(v) = payload.width {
        room.width = v;
    }
    if let Some(v) = payload.height {
        room.height = v;
    }
    if let Some(v) = payload.doors {
        room.doors = v;
    }
    if let Some(v) = payload.windows {
        room.windows = v;
    }
    let price_per_gallon = payload.price_per_gallon.unwrap_or(35.0);
    require_finite(&[
        ("length", room.length),
        ("width", room.width),
        ("height", room.height),
        ("pricePerGallon", price_per_gallon),
    ])?;

    room.length = room.length.clamp(0.0, MAX_DIMENSION_FT);
    room.width = room.width.clamp(0.0, MAX_DIMENSION_FT);
    room.height = room.height.clamp(0.0, MAX_DIMENSION_FT);
    room.doors = room.doors.min(MAX_OPENINGS);
    room.windows = room.windows.min(MAX_OPENINGS);

    Ok(PaintJob {
        room,
        coats: payload.coats.unwrap_or(2).clamp(1, MAX_COATS),
        texture: payload.texture.unwrap_or(SurfaceTexture::Smooth),
        project: payload.project_type.unwrap_or(ProjectType::Interior),
        include_ceiling: payload.include_ceiling.unwrap_or(false),
        primer: payload.primer.unwrap_or(false),
        price_per_gallon: price_per_gallon.max(0.0),
    })
}

pub fn paint_response(payload: PaintPayload) -> Result<PaintResponse, RequestError> {
    let job = paint_job(payload)?;
    let estimate = paint::estimate(&job)?;
    Ok(PaintResponse {
        cost_display: format_currency(estimate.estimated_cost),
        estimate,
    })
}

fn screen_time_log(payload: WellnessPayload) -> Result<ScreenTimeLog, RequestError> {
    let hours = [
        ("socialMedia", payload.social_media.unwrap_or(2.0)),
        ("entertainment", payload.entertainment.unwrap_or(2.0)),
        ("gaming", payload.gaming.unwrap_or(0.0)),
        ("productive", payload.productive.unwrap_or(1.0)),
        ("educational", payload.educational.unwrap_or(0.0)),
    ];
    require_finite(&hours)?;
    let [social_media, entertainment, gaming, productive, educational] =
        hours.map(|(_, h)| h.clamp(0.0, 24.0));

    Ok(ScreenTimeLog {
        social_media,
        entertainment,
        gaming,
        productive,
        educational,
        pickups_per_day: payload.pickups.unwrap_or(58),
        screen_before_bed_minutes: payload.bedtime_minutes.unwrap_or(30),
        age_group: payload.age_group.unwrap_or(AgeGroup::Adult),
    })
}

pub fn wellness_response(payload: WellnessPayload) -> Result<WellnessReport, RequestError> {
    let log = screen_time_log(payload)?;
    Ok(wellness::score(&log)?)
}
