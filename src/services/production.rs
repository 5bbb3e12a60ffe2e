use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::{
        formula::Entity as FormulaEntity,
        formula_item::{self, Entity as FormulaItemEntity},
        product::{self, Entity as ProductEntity},
        production_record::{self, Entity as ProductionRecordEntity, ProductionStatus},
        stock_movement::MovementKind,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_ledger,
};

/// Production confirmation orchestrator.
///
/// A confirmed run consumes every formula ingredient from the batch
/// ledger, books the finished good in under a fresh lot, and leaves a
/// completed production record — all in one transaction. Raw-material
/// sufficiency is checked up front so a shortage can never leave a
/// half-consumed run behind.
#[derive(Clone)]
pub struct ProductionService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ProductionService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self), fields(formula_id, quantity = %quantity))]
    pub async fn confirm(
        &self,
        formula_id: i64,
        quantity: Decimal,
        final_lot_code: &str,
        final_expiry: &str,
    ) -> Result<production_record::Model, ServiceError> {
        super::require_positive("quantidade", quantity)?;
        let final_expiry = super::parse_date("validade_final", final_expiry)?;

        let txn = self.db.begin().await?;

        let formula = FormulaEntity::find_by_id(formula_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("formula {} not found", formula_id)))?;

        let items = FormulaItemEntity::find()
            .filter(formula_item::Column::FormulaId.eq(formula_id))
            .order_by_asc(formula_item::Column::Id)
            .all(&txn)
            .await?;
        if items.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "formula '{}' has no ingredients",
                formula.name
            )));
        }

        let material_ids: Vec<i64> = items.iter().map(|i| i.raw_material_id).collect();
        let materials: HashMap<i64, product::Model> = ProductEntity::find()
            .filter(product::Column::Id.is_in(material_ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // Validate every ingredient before consuming any of them.
        for item in &items {
            let material = materials.get(&item.raw_material_id).ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "raw material {} not found",
                    item.raw_material_id
                ))
            })?;
            let required = item.quantity_per_unit * quantity;
            if material.stock_on_hand < required {
                return Err(ServiceError::InsufficientStock(format!(
                    "insufficient stock of '{}': {} on hand, {} required",
                    material.name, material.stock_on_hand, required
                )));
            }
        }

        for item in &items {
            let material = &materials[&item.raw_material_id];
            let required = item.quantity_per_unit * quantity;

            let new_stock = material.stock_on_hand - required;
            let mut active: product::ActiveModel = material.clone().into();
            active.stock_on_hand = Set(new_stock);
            active.update(&txn).await?;

            stock_ledger::deplete_batches(&txn, material.id, required).await?;
            stock_ledger::record_movement(
                &txn,
                material.id,
                MovementKind::Outbound,
                required,
                "OP (Consumo)",
                "Produção",
            )
            .await?;
        }

        let finished = ProductEntity::find_by_id(formula.finished_product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "product {} not found",
                    formula.finished_product_id
                ))
            })?;
        let finished_id = finished.id;
        let new_stock = finished.stock_on_hand + quantity;
        let mut active: product::ActiveModel = finished.into();
        active.stock_on_hand = Set(new_stock);
        active.update(&txn).await?;

        stock_ledger::receive_batch(&txn, finished_id, final_lot_code, final_expiry, quantity)
            .await?;
        stock_ledger::record_movement(
            &txn,
            finished_id,
            MovementKind::Inbound,
            quantity,
            "OP (Conclusão)",
            "Produção",
        )
        .await?;

        let record = production_record::ActiveModel {
            formula_id: Set(formula_id),
            quantity_produced: Set(quantity),
            lot_code: Set(final_lot_code.to_string()),
            produced_at: Set(Utc::now()),
            status: Set(ProductionStatus::Completed),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ProductionCompleted {
                production_record_id: record.id,
                formula_id,
                quantity,
            })
            .await;

        info!(
            production_record_id = record.id,
            lot_code = final_lot_code,
            "Production confirmed"
        );
        Ok(record)
    }

    /// Production history, newest first.
    pub async fn history(&self) -> Result<Vec<production_record::Model>, ServiceError> {
        let records = ProductionRecordEntity::find()
            .order_by_desc(production_record::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(records)
    }
}
