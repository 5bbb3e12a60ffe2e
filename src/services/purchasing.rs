use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::{
        financial_entry::{self, EntryKind},
        product::{self, Entity as ProductEntity},
        purchase_order::{self, Entity as PurchaseOrderEntity, PurchaseOrderStatus},
        stock_movement::MovementKind,
        supplier::Entity as SupplierEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_ledger,
};

/// Purchase orders and the goods-receipt orchestrator.
///
/// Receipt is the terminal transition of the order state machine
/// (`Pendente -> Recebido`) and runs as one transaction: stock increment,
/// new batch, kardex row, cost update and the expense entry.
#[derive(Clone)]
pub struct PurchasingService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl PurchasingService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        supplier_id: i64,
        product_id: i64,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<purchase_order::Model, ServiceError> {
        super::require_positive("quantidade", quantity)?;
        if unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "unit price must not be negative, got {}",
                unit_price
            )));
        }

        SupplierEntity::find_by_id(supplier_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("supplier {} not found", supplier_id)))?;
        ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {} not found", product_id)))?;

        let created = purchase_order::ActiveModel {
            supplier_id: Set(supplier_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            status: Set(PurchaseOrderStatus::Pending),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(purchase_order_id = created.id, "Purchase order created");
        Ok(created)
    }

    pub async fn list_orders(&self) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let orders = PurchaseOrderEntity::find()
            .order_by_asc(purchase_order::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(orders)
    }

    /// Receives a pending purchase order into stock under the given lot.
    #[instrument(skip(self), fields(order_id))]
    pub async fn receive(
        &self,
        order_id: i64,
        lot_code: &str,
        expiry: &str,
    ) -> Result<purchase_order::Model, ServiceError> {
        let expiry = super::parse_date("validade", expiry)?;

        let txn = self.db.begin().await?;

        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("purchase order {} not found", order_id))
            })?;
        if order.status != PurchaseOrderStatus::Pending {
            return Err(ServiceError::InvalidState(format!(
                "purchase order {} was already received",
                order_id
            )));
        }

        let p = ProductEntity::find_by_id(order.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("product {} not found", order.product_id))
            })?;
        let new_stock = p.stock_on_hand + order.quantity;
        let mut active: product::ActiveModel = p.into();
        active.stock_on_hand = Set(new_stock);
        // Last purchase price becomes the valuation cost.
        active.unit_cost = Set(order.unit_price);
        active.update(&txn).await?;

        let mut order_active: purchase_order::ActiveModel = order.clone().into();
        order_active.status = Set(PurchaseOrderStatus::Received);
        let received = order_active.update(&txn).await?;

        let batch =
            stock_ledger::receive_batch(&txn, order.product_id, lot_code, expiry, order.quantity)
                .await?;
        stock_ledger::record_movement(
            &txn,
            order.product_id,
            MovementKind::Inbound,
            order.quantity,
            &format!("Compra #{}", order.id),
            "Almox.",
        )
        .await?;

        financial_entry::ActiveModel {
            description: Set(format!("Compra #{} (Recebimento)", order.id)),
            kind: Set(EntryKind::Expense),
            category: Set("Compras".to_string()),
            amount: Set(order.total_value()),
            due_date: Set(Utc::now().date_naive()),
            paid: Set(false),
            paid_date: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseOrderReceived {
                purchase_order_id: order.id,
                product_id: order.product_id,
                quantity: order.quantity,
            })
            .await;
        self.event_sender
            .send_or_log(Event::StockReceived {
                product_id: order.product_id,
                batch_id: batch.id,
                quantity: order.quantity,
            })
            .await;

        info!(
            purchase_order_id = order.id,
            product_id = order.product_id,
            quantity = %order.quantity,
            "Purchase order received"
        );
        Ok(received)
    }
}
