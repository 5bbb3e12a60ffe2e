use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn purchasing_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id/processar/", post(receive_order))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub fornecedor_id: i64,
    pub produto_id: i64,
    pub quantidade: Decimal,
    pub valor_unitario: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReceivePurchaseRequest {
    #[validate(length(min = 1))]
    pub lote: String,
    #[validate(length(min = 1))]
    pub validade: String,
}

async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .purchasing
        .create_order(
            payload.fornecedor_id,
            payload.produto_id,
            payload.quantidade,
            payload.valor_unitario,
        )
        .await
        .map_err(map_service_error)?;
    Ok(created_response(created))
}

async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .purchasing
        .list_orders()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

/// Receive a pending purchase order into stock under a new lot.
#[utoipa::path(
    post,
    path = "/compras/{id}/processar/",
    params(("id" = i64, Path, description = "Purchase order id")),
    request_body = ReceivePurchaseRequest,
    responses(
        (status = 200, description = "Order received", body = crate::entities::purchase_order::Model),
        (status = 400, description = "Order not pending", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown order", body = crate::errors::ErrorResponse)
    ),
    tag = "Purchasing"
)]
pub async fn receive_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReceivePurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let received = state
        .services
        .purchasing
        .receive(id, &payload.lote, &payload.validade)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(received))
}
