use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    entities::financial_entry::EntryKind,
    errors::ApiError,
    handlers::AppState,
    services::finance::CreateEntryInput,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn finance_routes() -> Router<AppState> {
    Router::new()
        .route("/lancamento/", post(create_entry))
        .route("/lancamentos/", get(list_entries))
        .route("/pagar/:id", post(toggle_paid))
        .route("/dashboard/", get(dashboard))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1))]
    pub descricao: String,
    pub tipo: EntryKind,
    #[serde(default = "default_category")]
    pub categoria: String,
    pub valor: Decimal,
    pub data_vencimento: String,
    #[serde(default)]
    pub pago: bool,
}

fn default_category() -> String {
    "Geral".to_string()
}

async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .finance
        .create_entry(CreateEntryInput {
            description: payload.descricao,
            kind: payload.tipo,
            category: payload.categoria,
            amount: payload.valor,
            due_date: payload.data_vencimento,
            paid: payload.pago,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn list_entries(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let entries = state
        .services
        .finance
        .list_entries()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(entries))
}

async fn toggle_paid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .finance
        .toggle_paid(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(updated))
}

async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .finance
        .dashboard()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(summary))
}
