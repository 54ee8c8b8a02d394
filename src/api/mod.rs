use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::RateTables;
use crate::core::{
    Currency, ElectricityInput, FixedPeg, FuelInput, FuelType, GasInput, LoanInput, Metering,
    PayrollBreakdown, PayrollRates, Ranked, WaterInput, compare_electricity, compare_fuel,
    compare_gas, compare_loans, compare_water, gross_from_net, net_from_gross,
};
use crate::error::{InputError, quantity, require};

/// Everything a request needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub tables: RateTables,
    pub payroll: PayrollRates,
    pub peg: FixedPeg,
}

type SharedState = Arc<AppState>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiMetering {
    #[serde(alias = "one", alias = "single-rate")]
    Single,
    #[serde(alias = "two", alias = "day-night", alias = "dayNight")]
    Dual,
}

impl From<ApiMetering> for Metering {
    fn from(value: ApiMetering) -> Self {
        match value {
            ApiMetering::Single => Metering::Single,
            ApiMetering::Dual => Metering::Dual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiFuelType {
    #[serde(alias = "A95", alias = "a-95")]
    A95,
    #[serde(alias = "A98", alias = "a-98")]
    A98,
    #[serde(alias = "Diesel")]
    Diesel,
    #[serde(alias = "LPG", alias = "autogas")]
    Lpg,
}

impl From<ApiFuelType> for FuelType {
    fn from(value: ApiFuelType) -> Self {
        match value {
            ApiFuelType::A95 => FuelType::A95,
            ApiFuelType::A98 => FuelType::A98,
            ApiFuelType::Diesel => FuelType::Diesel,
            ApiFuelType::Lpg => FuelType::Lpg,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum PayrollDirection {
    #[serde(alias = "grossToNet", alias = "gross")]
    GrossToNet,
    #[serde(alias = "netToGross", alias = "net")]
    NetToGross,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiCurrency {
    #[serde(alias = "EUR")]
    Eur,
    #[serde(alias = "BGN", alias = "lev")]
    Bgn,
}

impl From<ApiCurrency> for Currency {
    fn from(value: ApiCurrency) -> Self {
        match value {
            ApiCurrency::Eur => Currency::Eur,
            ApiCurrency::Bgn => Currency::Bgn,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ElectricityPayload {
    metering: Option<String>,
    day_kwh: Option<f64>,
    night_kwh: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WaterPayload {
    #[serde(alias = "m3")]
    cubic_meters: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GasPayload {
    kwh: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FuelPayload {
    fuel_type: Option<String>,
    #[serde(alias = "liters")]
    monthly_liters: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    amount: Option<f64>,
    #[serde(alias = "term")]
    term_months: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PayrollPayload {
    direction: Option<String>,
    amount: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PayrollRequest {
    direction: PayrollDirection,
    amount_eur: f64,
    currency: Currency,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonResponse<T> {
    domain: &'static str,
    count: usize,
    results: Vec<Ranked<T>>,
}

impl<T> ComparisonResponse<T> {
    fn new(domain: &'static str, results: Vec<Ranked<T>>) -> Self {
        Self {
            domain,
            count: results.len(),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayrollResponse {
    direction: PayrollDirection,
    input_currency: Currency,
    breakdown: PayrollBreakdown,
    gross_bgn: f64,
    net_bgn: f64,
    total_cost_bgn: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/rates", get(rates_handler))
        .route(
            "/api/electricity",
            get(electricity_get_handler).post(electricity_post_handler),
        )
        .route("/api/water", get(water_get_handler).post(water_post_handler))
        .route("/api/gas", get(gas_get_handler).post(gas_post_handler))
        .route("/api/fuel", get(fuel_get_handler).post(fuel_post_handler))
        .route("/api/loans", get(loans_get_handler).post(loans_post_handler))
        .route(
            "/api/payroll",
            get(payroll_get_handler).post(payroll_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(Arc::new(state));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "tariff comparison API listening");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn rates_handler(State(state): State<SharedState>) -> Response {
    json_response(StatusCode::OK, &state.tables)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn electricity_get_handler(
    State(state): State<SharedState>,
    payload: Result<Query<ElectricityPayload>, QueryRejection>,
) -> Response {
    electricity_handler_impl(&state, from_query(payload))
}

async fn electricity_post_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ElectricityPayload>, JsonRejection>,
) -> Response {
    electricity_handler_impl(&state, from_json(payload))
}

fn electricity_handler_impl(
    state: &AppState,
    payload: Result<ElectricityPayload, InputError>,
) -> Response {
    match payload.and_then(electricity_input) {
        Ok(input) => comparison_response(
            "electricity",
            compare_electricity(&input, &state.tables.electricity),
        ),
        Err(err) => rejected("electricity", err),
    }
}

async fn water_get_handler(
    State(state): State<SharedState>,
    payload: Result<Query<WaterPayload>, QueryRejection>,
) -> Response {
    water_handler_impl(&state, from_query(payload))
}

async fn water_post_handler(
    State(state): State<SharedState>,
    payload: Result<Json<WaterPayload>, JsonRejection>,
) -> Response {
    water_handler_impl(&state, from_json(payload))
}

fn water_handler_impl(state: &AppState, payload: Result<WaterPayload, InputError>) -> Response {
    match payload.and_then(water_input) {
        Ok(input) => comparison_response("water", compare_water(&input, &state.tables.water)),
        Err(err) => rejected("water", err),
    }
}

async fn gas_get_handler(
    State(state): State<SharedState>,
    payload: Result<Query<GasPayload>, QueryRejection>,
) -> Response {
    gas_handler_impl(&state, from_query(payload))
}

async fn gas_post_handler(
    State(state): State<SharedState>,
    payload: Result<Json<GasPayload>, JsonRejection>,
) -> Response {
    gas_handler_impl(&state, from_json(payload))
}

fn gas_handler_impl(state: &AppState, payload: Result<GasPayload, InputError>) -> Response {
    match payload.and_then(gas_input) {
        Ok(input) => comparison_response("gas", compare_gas(&input, &state.tables.gas)),
        Err(err) => rejected("gas", err),
    }
}

async fn fuel_get_handler(
    State(state): State<SharedState>,
    payload: Result<Query<FuelPayload>, QueryRejection>,
) -> Response {
    fuel_handler_impl(&state, from_query(payload))
}

async fn fuel_post_handler(
    State(state): State<SharedState>,
    payload: Result<Json<FuelPayload>, JsonRejection>,
) -> Response {
    fuel_handler_impl(&state, from_json(payload))
}

fn fuel_handler_impl(state: &AppState, payload: Result<FuelPayload, InputError>) -> Response {
    match payload.and_then(fuel_input) {
        Ok(input) => comparison_response("fuel", compare_fuel(&input, &state.tables.fuel)),
        Err(err) => rejected("fuel", err),
    }
}

async fn loans_get_handler(
    State(state): State<SharedState>,
    payload: Result<Query<LoanPayload>, QueryRejection>,
) -> Response {
    loans_handler_impl(&state, from_query(payload))
}

async fn loans_post_handler(
    State(state): State<SharedState>,
    payload: Result<Json<LoanPayload>, JsonRejection>,
) -> Response {
    loans_handler_impl(&state, from_json(payload))
}

fn loans_handler_impl(state: &AppState, payload: Result<LoanPayload, InputError>) -> Response {
    match payload.and_then(loan_input) {
        Ok(input) => comparison_response("loans", compare_loans(&input, &state.tables.loans)),
        Err(err) => rejected("loans", err),
    }
}

async fn payroll_get_handler(
    State(state): State<SharedState>,
    payload: Result<Query<PayrollPayload>, QueryRejection>,
) -> Response {
    payroll_handler_impl(&state, from_query(payload))
}

async fn payroll_post_handler(
    State(state): State<SharedState>,
    payload: Result<Json<PayrollPayload>, JsonRejection>,
) -> Response {
    payroll_handler_impl(&state, from_json(payload))
}

fn payroll_handler_impl(state: &AppState, payload: Result<PayrollPayload, InputError>) -> Response {
    let request = match payload.and_then(|payload| payroll_request(payload, state.peg)) {
        Ok(request) => request,
        Err(err) => return rejected("payroll", err),
    };
    json_response(StatusCode::OK, build_payroll_response(state, request))
}

fn from_query<T>(payload: Result<Query<T>, QueryRejection>) -> Result<T, InputError> {
    payload
        .map(|Query(payload)| payload)
        .map_err(|rejection| InputError::Malformed(rejection.body_text()))
}

fn from_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, InputError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| InputError::Malformed(rejection.body_text()))
}

/// Enum-valued fields arrive as plain strings so that an unrecognised name
/// surfaces as [`InputError::Unknown`] instead of a generic decode failure.
fn parse_choice<T: DeserializeOwned>(kind: &'static str, raw: &str) -> Result<T, InputError> {
    let de: StrDeserializer<'_, ValueError> = raw.into_deserializer();
    T::deserialize(de).map_err(|_| InputError::Unknown {
        kind,
        value: raw.to_string(),
    })
}

fn electricity_input(payload: ElectricityPayload) -> Result<ElectricityInput, InputError> {
    Ok(ElectricityInput {
        metering: payload
            .metering
            .as_deref()
            .map(|raw| parse_choice::<ApiMetering>("metering", raw))
            .transpose()?
            .unwrap_or(ApiMetering::Dual)
            .into(),
        day_kwh: quantity("dayKwh", require("dayKwh", payload.day_kwh)?)?,
        night_kwh: quantity("nightKwh", payload.night_kwh.unwrap_or(0.0))?,
    })
}

fn water_input(payload: WaterPayload) -> Result<WaterInput, InputError> {
    Ok(WaterInput {
        cubic_meters: quantity("cubicMeters", require("cubicMeters", payload.cubic_meters)?)?,
    })
}

fn gas_input(payload: GasPayload) -> Result<GasInput, InputError> {
    Ok(GasInput {
        kwh: quantity("kwh", require("kwh", payload.kwh)?)?,
    })
}

fn fuel_input(payload: FuelPayload) -> Result<FuelInput, InputError> {
    Ok(FuelInput {
        fuel_type: parse_choice::<ApiFuelType>(
            "fuelType",
            &require("fuelType", payload.fuel_type)?,
        )?
        .into(),
        monthly_liters: quantity(
            "monthlyLiters",
            require("monthlyLiters", payload.monthly_liters)?,
        )?,
    })
}

fn loan_input(payload: LoanPayload) -> Result<LoanInput, InputError> {
    let amount = quantity("amount", require("amount", payload.amount)?)?;
    let term_months = require("termMonths", payload.term_months)?;
    if term_months == 0 {
        return Err(InputError::ZeroTerm);
    }
    Ok(LoanInput {
        amount,
        term_months,
    })
}

fn payroll_request(payload: PayrollPayload, peg: FixedPeg) -> Result<PayrollRequest, InputError> {
    let direction = payload
        .direction
        .as_deref()
        .map(|raw| parse_choice("direction", raw))
        .transpose()?
        .unwrap_or(PayrollDirection::GrossToNet);
    let currency: Currency = payload
        .currency
        .as_deref()
        .map(|raw| parse_choice::<ApiCurrency>("currency", raw))
        .transpose()?
        .unwrap_or(ApiCurrency::Eur)
        .into();
    let amount = quantity("amount", require("amount", payload.amount)?)?;
    Ok(PayrollRequest {
        direction,
        amount_eur: peg.to_reporting(amount, currency),
        currency,
    })
}

fn build_payroll_response(state: &AppState, request: PayrollRequest) -> PayrollResponse {
    let breakdown = match request.direction {
        PayrollDirection::GrossToNet => net_from_gross(request.amount_eur, &state.payroll),
        PayrollDirection::NetToGross => gross_from_net(request.amount_eur, &state.payroll),
    };
    PayrollResponse {
        direction: request.direction,
        input_currency: request.currency,
        breakdown,
        gross_bgn: state.peg.to_bgn(breakdown.gross_eur),
        net_bgn: state.peg.to_bgn(breakdown.net_eur),
        total_cost_bgn: state.peg.to_bgn(breakdown.total_cost_eur),
    }
}

fn comparison_response<T: Serialize>(domain: &'static str, results: Vec<Ranked<T>>) -> Response {
    json_response(StatusCode::OK, ComparisonResponse::new(domain, results))
}

fn rejected(domain: &'static str, err: InputError) -> Response {
    warn!(domain, error = %err, "rejected request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
