use std::sync::Arc;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{
        financial_entry::{self, Entity as FinancialEntryEntity, EntryKind},
        purchase_order::Entity as PurchaseOrderEntity,
        sale_record::Entity as SaleRecordEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    pub description: String,
    pub kind: EntryKind,
    pub category: String,
    pub amount: Decimal,
    pub due_date: String,
    pub paid: bool,
}

/// Net cash movement for one calendar month: sales add, paid expenses
/// subtract.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyNet {
    pub month: String,
    pub value: Decimal,
}

/// Aggregate figures for the finance dashboard. Revenue counts every sale
/// line plus paid manual revenue entries; expenses count every purchase
/// order plus paid expense entries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
    pub margin_pct: Decimal,
    pub monthly: Vec<MonthlyNet>,
}

/// Cash ledger: manual entries, settlement toggling and the dashboard
/// aggregates.
#[derive(Clone)]
pub struct FinanceService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl FinanceService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(description = %input.description))]
    pub async fn create_entry(
        &self,
        input: CreateEntryInput,
    ) -> Result<financial_entry::Model, ServiceError> {
        super::require_positive("valor", input.amount)?;
        if input.description.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "description must not be empty".into(),
            ));
        }
        let due_date = super::parse_date("data_vencimento", &input.due_date)?;

        let created = financial_entry::ActiveModel {
            description: Set(input.description.trim().to_string()),
            kind: Set(input.kind),
            category: Set(input.category),
            amount: Set(input.amount),
            due_date: Set(due_date),
            paid: Set(input.paid),
            paid_date: Set(input.paid.then_some(due_date)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(entry_id = created.id, "Financial entry created");
        Ok(created)
    }

    pub async fn list_entries(&self) -> Result<Vec<financial_entry::Model>, ServiceError> {
        let entries = FinancialEntryEntity::find()
            .order_by_desc(financial_entry::Column::DueDate)
            .order_by_desc(financial_entry::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(entries)
    }

    /// Flips an entry's settled flag. Settling stamps today as the payment
    /// date; unsettling clears it.
    #[instrument(skip(self))]
    pub async fn toggle_paid(&self, entry_id: i64) -> Result<financial_entry::Model, ServiceError> {
        let entry = FinancialEntryEntity::find_by_id(entry_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("financial entry {} not found", entry_id))
            })?;

        let now_paid = !entry.paid;
        let mut active: financial_entry::ActiveModel = entry.into();
        active.paid = Set(now_paid);
        active.paid_date = Set(now_paid.then(|| Utc::now().date_naive()));
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::FinancialEntrySettled {
                entry_id: updated.id,
                paid: updated.paid,
            })
            .await;
        Ok(updated)
    }

    /// Dashboard figures. Revenue is every sale line plus paid revenue
    /// entries; expenses are every purchase order plus paid expense
    /// entries. Note the overlap: a purchase receipt's expense entry,
    /// once settled, is counted here a second time on top of its order.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let sales = SaleRecordEntity::find().all(&*self.db).await?;
        let orders = PurchaseOrderEntity::find().all(&*self.db).await?;
        let entries = FinancialEntryEntity::find().all(&*self.db).await?;

        let sales_revenue: Decimal = sales.iter().map(|s| s.line_total).sum();
        let material_cost: Decimal = orders.iter().map(|o| o.total_value()).sum();
        let extra_revenue: Decimal = entries
            .iter()
            .filter(|e| e.paid && e.is_revenue())
            .map(|e| e.amount)
            .sum();
        let paid_expenses: Decimal = entries
            .iter()
            .filter(|e| e.paid && !e.is_revenue())
            .map(|e| e.amount)
            .sum();

        let revenue = sales_revenue + extra_revenue;
        let expenses = material_cost + paid_expenses;
        let profit = revenue - expenses;
        let margin_pct = if revenue > Decimal::ZERO {
            profit / revenue * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        let mut per_month = [Decimal::ZERO; 12];
        for sale in &sales {
            per_month[sale.sold_at.month0() as usize] += sale.line_total;
        }
        for entry in &entries {
            if entry.paid && !entry.is_revenue() {
                if let Some(paid_date) = entry.paid_date {
                    per_month[paid_date.month0() as usize] -= entry.amount;
                }
            }
        }
        let monthly = MONTH_LABELS
            .iter()
            .zip(per_month)
            .filter(|(_, value)| *value != Decimal::ZERO)
            .map(|(label, value)| MonthlyNet {
                month: (*label).to_string(),
                value,
            })
            .collect();

        Ok(DashboardSummary {
            revenue,
            expenses,
            profit,
            margin_pct,
            monthly,
        })
    }
}
