use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

pub fn stock_routes() -> Router<AppState> {
    Router::new().route("/kardex/", get(kardex))
}

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/lotes_vencimento/", get(batches_by_expiry))
        .route("/estoque/", get(stock_valuation))
        .route("/curva_abc/", get(abc_curve))
}

pub fn crm_routes() -> Router<AppState> {
    Router::new().route("/oportunidades/", get(crm_opportunities))
}

/// Movement audit trail, newest first.
#[utoipa::path(
    get,
    path = "/estoque/kardex/",
    responses(
        (status = 200, description = "Movement log", body = [crate::services::reports::KardexRow])
    ),
    tag = "Reports"
)]
pub async fn kardex(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .kardex()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Active batches ordered by expiry date, soonest first.
#[utoipa::path(
    get,
    path = "/relatorios/lotes_vencimento/",
    responses(
        (status = 200, description = "Active batches", body = [crate::services::reports::ExpiryRow])
    ),
    tag = "Reports"
)]
pub async fn batches_by_expiry(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .batches_by_expiry()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

async fn stock_valuation(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let valuation = state
        .services
        .reports
        .stock_valuation()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(valuation))
}

async fn abc_curve(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .abc_curve()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

async fn crm_opportunities(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .crm_opportunities()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}
