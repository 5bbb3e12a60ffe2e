use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder};
use tracing::instrument;

use crate::{
    db::DbPool,
    entities::{
        customer::{self, Entity as CustomerEntity},
        product::Entity as ProductEntity,
        quotation::{self, Entity as QuotationEntity},
        supplier::{self, Entity as SupplierEntity},
    },
    errors::ServiceError,
};

/// Suppliers, customers and price quotations. Plain master data with no
/// workflow; the orchestrators only need these rows to exist.
#[derive(Clone)]
pub struct PartnerService {
    db: Arc<DbPool>,
}

impl PartnerService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_supplier(
        &self,
        name: String,
        lead_time_days: i32,
    ) -> Result<supplier::Model, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "supplier name must not be empty".into(),
            ));
        }
        if lead_time_days < 0 {
            return Err(ServiceError::ValidationError(
                "lead time must not be negative".into(),
            ));
        }

        let created = supplier::ActiveModel {
            name: Set(name.trim().to_string()),
            lead_time_days: Set(lead_time_days),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(created)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        let suppliers = SupplierEntity::find()
            .order_by_asc(supplier::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(suppliers)
    }

    #[instrument(skip(self))]
    pub async fn create_customer(
        &self,
        name: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<customer::Model, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "customer name must not be empty".into(),
            ));
        }

        let created = customer::ActiveModel {
            name: Set(name.trim().to_string()),
            email: Set(email),
            phone: Set(phone),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(created)
    }

    pub async fn list_customers(&self) -> Result<Vec<customer::Model>, ServiceError> {
        let customers = CustomerEntity::find()
            .order_by_asc(customer::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(customers)
    }

    #[instrument(skip(self))]
    pub async fn create_quotation(
        &self,
        product_id: i64,
        supplier_id: i64,
        unit_price: Decimal,
    ) -> Result<quotation::Model, ServiceError> {
        super::require_positive("preco", unit_price)?;

        ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {} not found", product_id)))?;
        SupplierEntity::find_by_id(supplier_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("supplier {} not found", supplier_id)))?;

        let created = quotation::ActiveModel {
            product_id: Set(product_id),
            supplier_id: Set(supplier_id),
            unit_price: Set(unit_price),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(created)
    }

    pub async fn list_quotations(&self) -> Result<Vec<quotation::Model>, ServiceError> {
        let quotations = QuotationEntity::find()
            .order_by_asc(quotation::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(quotations)
    }
}
