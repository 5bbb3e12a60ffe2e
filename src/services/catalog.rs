use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder, TransactionTrait};
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as ProductEntity, ProductKind},
        stock_movement::MovementKind,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_ledger,
};

/// Lot code and expiry used when a product is registered already holding
/// stock. The seed batch has no real provenance, so it carries a fixed
/// far-future expiry.
const INITIAL_LOT_CODE: &str = "INI-CAD";
const INITIAL_LOT_EXPIRY: (i32, u32, u32) = (2030, 12, 31);

#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub kind: ProductKind,
    pub unit: String,
    pub initial_stock: Decimal,
    pub unit_cost: Decimal,
}

/// Product master data. Creation seeds the batch ledger when the product
/// arrives with stock already on the shelf.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "product name must not be empty".into(),
            ));
        }
        if input.initial_stock < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "initial stock must not be negative, got {}",
                input.initial_stock
            )));
        }
        if input.unit_cost < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "unit cost must not be negative, got {}",
                input.unit_cost
            )));
        }

        let txn = self.db.begin().await?;

        let created = product::ActiveModel {
            name: Set(input.name.trim().to_string()),
            kind: Set(input.kind),
            unit: Set(input.unit),
            stock_on_hand: Set(input.initial_stock),
            unit_cost: Set(input.unit_cost),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if input.initial_stock > Decimal::ZERO {
            let (y, m, d) = INITIAL_LOT_EXPIRY;
            let expiry = NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| ServiceError::InternalError("invalid seed expiry".into()))?;
            stock_ledger::receive_batch(
                &txn,
                created.id,
                INITIAL_LOT_CODE,
                expiry,
                input.initial_stock,
            )
            .await?;
            stock_ledger::record_movement(
                &txn,
                created.id,
                MovementKind::Inbound,
                input.initial_stock,
                "Cadastro Inicial",
                "Admin",
            )
            .await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ProductCreated {
                product_id: created.id,
            })
            .await;

        info!(product_id = created.id, "Product created");
        Ok(created)
    }

    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        let products = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(products)
    }

    pub async fn get_product(&self, product_id: i64) -> Result<product::Model, ServiceError> {
        ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {} not found", product_id)))
    }
}
