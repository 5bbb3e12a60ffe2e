use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{extract::State, response::IntoResponse, routing::delete, Router};
use serde_json::json;

pub fn system_routes() -> Router<AppState> {
    Router::new().route("/resetar_dados/", delete(reset_data))
}

/// Administrative wipe of every domain table.
#[utoipa::path(
    delete,
    path = "/sistema/resetar_dados/",
    responses((status = 200, description = "All domain data deleted")),
    tag = "Admin"
)]
pub async fn reset_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .system
        .reset_all_data()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "message": "All domain data deleted" })))
}
