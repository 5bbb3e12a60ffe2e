use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    entities::product::ProductKind,
    errors::ApiError,
    handlers::AppState,
    services::catalog::CreateProductInput,
};
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

pub fn products_routes() -> Router<AppState> {
    Router::new().route("/", post(create_product).get(list_products))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1))]
    pub nome: String,
    pub tipo: ProductKind,
    #[serde(default = "default_unit")]
    pub unidade: String,
    #[serde(default)]
    pub estoque_atual: Decimal,
    #[serde(default)]
    pub custo: Decimal,
}

fn default_unit() -> String {
    "Un".to_string()
}

/// Create a product. A positive initial stock seeds an `INI-CAD` batch
/// and a `Cadastro Inicial` movement in the same transaction.
#[utoipa::path(
    post,
    path = "/produtos/",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = crate::entities::product::Model),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Catalog"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let created = state
        .services
        .catalog
        .create_product(CreateProductInput {
            name: payload.nome,
            kind: payload.tipo,
            unit: payload.unidade,
            initial_stock: payload.estoque_atual,
            unit_cost: payload.custo,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .services
        .catalog
        .list_products()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(products))
}
