use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        customer::Entity as CustomerEntity,
        financial_entry::{self, EntryKind},
        product::{self, Entity as ProductEntity},
        sale_record::{self, Entity as SaleRecordEntity},
        stock_movement::MovementKind,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_ledger,
};

/// One line of a point-of-sale checkout.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub product_id: i64,
    pub quantity: Decimal,
    pub line_total: Decimal,
}

/// Point-of-sale checkout orchestrator.
///
/// A checkout runs in a single transaction: stock decrement, batch
/// depletion, sale record, kardex row for every line, plus one revenue
/// entry for the whole cart. Any failure rolls the entire checkout back.
#[derive(Clone)]
pub struct SalesService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl SalesService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, lines), fields(customer_id, lines = lines.len()))]
    pub async fn checkout(
        &self,
        customer_id: i64,
        lines: Vec<CheckoutLine>,
        payment_method: &str,
    ) -> Result<Uuid, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "checkout requires at least one line item".into(),
            ));
        }
        if payment_method.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "payment method must not be empty".into(),
            ));
        }
        for line in &lines {
            super::require_positive("quantidade", line.quantity)?;
            if line.line_total < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "line total must not be negative, got {}",
                    line.line_total
                )));
            }
        }

        CustomerEntity::find_by_id(customer_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {} not found", customer_id)))?;

        let group_id = Uuid::new_v4();
        let txn = self.db.begin().await?;
        let mut total = Decimal::ZERO;

        for line in &lines {
            let p = ProductEntity::find_by_id(line.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("product {} not found", line.product_id))
                })?;

            if p.stock_on_hand < line.quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "insufficient stock for product '{}': {} on hand, {} requested",
                    p.name, p.stock_on_hand, line.quantity
                )));
            }

            let new_stock = p.stock_on_hand - line.quantity;
            let product_name = p.name.clone();
            let mut active: product::ActiveModel = p.into();
            active.stock_on_hand = Set(new_stock);
            active.update(&txn).await?;

            stock_ledger::deplete_batches(&txn, line.product_id, line.quantity).await?;

            sale_record::ActiveModel {
                customer_id: Set(customer_id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                line_total: Set(line.line_total),
                payment_method: Set(payment_method.to_string()),
                group_id: Set(group_id),
                sold_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            stock_ledger::record_movement(
                &txn,
                line.product_id,
                MovementKind::Outbound,
                line.quantity,
                &format!("PDV {}", payment_method),
                "Vendas",
            )
            .await?;

            info!(product = %product_name, quantity = %line.quantity, "Checkout line processed");
            total += line.line_total;
        }

        if total > Decimal::ZERO {
            let today = Utc::now().date_naive();
            let reference = &group_id.to_string()[..8];
            financial_entry::ActiveModel {
                description: Set(format!("Venda PDV (Ref: {})", reference)),
                kind: Set(EntryKind::Revenue),
                category: Set("Vendas".to_string()),
                amount: Set(total),
                due_date: Set(today),
                paid: Set(true),
                paid_date: Set(Some(today)),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CheckoutCompleted {
                group_id,
                lines: lines.len(),
                total,
            })
            .await;

        info!(%group_id, %total, "Checkout completed");
        Ok(group_id)
    }

    /// The 20 most recent sale lines, newest first.
    pub async fn list_recent(&self) -> Result<Vec<sale_record::Model>, ServiceError> {
        let sales = SaleRecordEntity::find()
            .order_by_desc(sale_record::Column::Id)
            .limit(20)
            .all(&*self.db)
            .await?;
        Ok(sales)
    }
}
