use axum::Json;
use utoipa::OpenApi;

/// OpenAPI document for the business endpoints. Served as plain JSON;
/// there is no bundled UI.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Decant API",
        version = "0.3.0",
        description = "Inventory, production and point-of-sale backend: FEFO batch ledger, \
formula-based production planning, purchasing and a simple financial ledger."
    ),
    paths(
        crate::handlers::products::create_product,
        crate::handlers::sales::checkout,
        crate::handlers::purchasing::receive_order,
        crate::handlers::production::confirm_production,
        crate::handlers::formulas::calculate_plan,
        crate::handlers::reports::kardex,
        crate::handlers::reports::batches_by_expiry,
        crate::handlers::system::reset_data,
        crate::handlers::health::health,
    ),
    components(schemas(
        crate::entities::product::Model,
        crate::entities::product::ProductKind,
        crate::entities::purchase_order::Model,
        crate::entities::purchase_order::PurchaseOrderStatus,
        crate::entities::production_record::Model,
        crate::entities::production_record::ProductionStatus,
        crate::errors::ErrorResponse,
        crate::handlers::products::CreateProductRequest,
        crate::handlers::sales::CheckoutRequest,
        crate::handlers::sales::CheckoutItemRequest,
        crate::handlers::sales::CheckoutResponse,
        crate::handlers::purchasing::ReceivePurchaseRequest,
        crate::handlers::production::ConfirmProductionRequest,
        crate::handlers::formulas::PlanRequest,
        crate::services::formulas::MaterialPlan,
        crate::services::formulas::PlanLine,
        crate::services::formulas::PlanLineStatus,
        crate::services::reports::KardexRow,
        crate::services::reports::ExpiryRow,
        crate::handlers::health::HealthResponse,
    )),
    tags(
        (name = "Catalog", description = "Product master data"),
        (name = "Sales", description = "Point-of-sale checkout"),
        (name = "Purchasing", description = "Purchase orders and receipts"),
        (name = "Production", description = "Formula planning and production runs"),
        (name = "Reports", description = "Read-only stock reports"),
        (name = "Admin", description = "Administrative endpoints"),
        (name = "Health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
