use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn formulas_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_formula).get(list_formulas))
        .route("/itens/", post(add_item))
        .route("/itens/:item_id", delete(remove_item))
}

pub fn planning_routes() -> Router<AppState> {
    Router::new().route("/calcular/", post(calculate_plan))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFormulaRequest {
    #[validate(length(min = 1))]
    pub nome: String,
    pub produto_final_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddFormulaItemRequest {
    pub formula_id: i64,
    pub materia_prima_id: i64,
    pub quantidade: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlanRequest {
    pub formula_id: i64,
    pub quantidade_producao: Decimal,
}

async fn create_formula(
    State(state): State<AppState>,
    Json(payload): Json<CreateFormulaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .formulas
        .create_formula(payload.nome, payload.produto_final_id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn list_formulas(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let formulas = state
        .services
        .formulas
        .list_formulas()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(formulas))
}

async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddFormulaItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .formulas
        .add_item(
            payload.formula_id,
            payload.materia_prima_id,
            payload.quantidade,
        )
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn remove_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .formulas
        .remove_item(item_id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Material requirements plan: required quantity, cost and availability
/// per ingredient for a target production quantity.
#[utoipa::path(
    post,
    path = "/planejamento/calcular/",
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Computed plan", body = crate::services::formulas::MaterialPlan),
        (status = 404, description = "Unknown formula", body = crate::errors::ErrorResponse)
    ),
    tag = "Production"
)]
pub async fn calculate_plan(
    State(state): State<AppState>,
    Json(payload): Json<PlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let plan = state
        .services
        .formulas
        .plan(payload.formula_id, payload.quantidade_producao)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plan))
}
