use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn suppliers_routes() -> Router<AppState> {
    Router::new().route("/", post(create_supplier).get(list_suppliers))
}

pub fn customers_routes() -> Router<AppState> {
    Router::new().route("/", post(create_customer).get(list_customers))
}

pub fn quotations_routes() -> Router<AppState> {
    Router::new().route("/", post(create_quotation).get(list_quotations))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1))]
    pub nome: String,
    #[serde(default)]
    pub prazo_entrega_dias: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1))]
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuotationRequest {
    pub produto_id: i64,
    pub fornecedor_id: i64,
    pub preco: Decimal,
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .partners
        .create_supplier(payload.nome, payload.prazo_entrega_dias)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn list_suppliers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let suppliers = state
        .services
        .partners
        .list_suppliers()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(suppliers))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .partners
        .create_customer(payload.nome, payload.email, payload.telefone)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn list_customers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let customers = state
        .services
        .partners
        .list_customers()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(customers))
}

async fn create_quotation(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuotationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .partners
        .create_quotation(payload.produto_id, payload.fornecedor_id, payload.preco)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn list_quotations(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let quotations = state
        .services
        .partners
        .list_quotations()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(quotations))
}
