use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState, services::sales::CheckoutLine};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/pdv/", post(checkout))
        .route("/", get(list_sales))
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CheckoutItemRequest {
    pub produto_id: i64,
    pub quantidade: Decimal,
    pub valor_total: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    pub cliente_id: i64,
    #[validate(length(min = 1))]
    pub itens: Vec<CheckoutItemRequest>,
    #[validate(length(min = 1))]
    pub metodo_pagamento: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub grupo_id: Uuid,
}

/// Point-of-sale checkout. All line items commit atomically; any
/// shortage rejects the whole cart.
#[utoipa::path(
    post,
    path = "/vendas/pdv/",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Checkout completed", body = CheckoutResponse),
        (status = 404, description = "Unknown customer or product", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .itens
        .into_iter()
        .map(|item| CheckoutLine {
            product_id: item.produto_id,
            quantity: item.quantidade,
            line_total: item.valor_total,
        })
        .collect();

    let group_id = state
        .services
        .sales
        .checkout(payload.cliente_id, lines, &payload.metodo_pagamento)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(CheckoutResponse { grupo_id: group_id }))
}

async fn list_sales(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let sales = state
        .services
        .sales
        .list_recent()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(sales))
}
