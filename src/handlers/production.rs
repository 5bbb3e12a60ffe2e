use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/confirmar_lote/", post(confirm_production))
        .route("/historico/", get(production_history))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmProductionRequest {
    pub formula_id: i64,
    pub quantidade: Decimal,
    #[validate(length(min = 1))]
    pub lote_final: String,
    #[validate(length(min = 1))]
    pub validade_final: String,
}

/// Confirm a production run: consume every ingredient, book the finished
/// good under a new lot and record the completed run.
#[utoipa::path(
    post,
    path = "/producao/confirmar_lote/",
    request_body = ConfirmProductionRequest,
    responses(
        (status = 201, description = "Production confirmed", body = crate::entities::production_record::Model),
        (status = 404, description = "Unknown formula", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient raw material", body = crate::errors::ErrorResponse)
    ),
    tag = "Production"
)]
pub async fn confirm_production(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmProductionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .production
        .confirm(
            payload.formula_id,
            payload.quantidade,
            &payload.lote_final,
            &payload.validade_final,
        )
        .await
        .map_err(map_service_error)?;
    Ok(created_response(record))
}

async fn production_history(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .services
        .production
        .history()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(records))
}
