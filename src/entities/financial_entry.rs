use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry direction for the simple cash ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryKind {
    #[sea_orm(string_value = "Receita")]
    #[serde(rename = "Receita")]
    Revenue,
    #[sea_orm(string_value = "Despesa")]
    #[serde(rename = "Despesa")]
    Expense,
}

/// Accounting entry. Written automatically by checkouts and purchase
/// receipts, and manually through the finance endpoints.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "financial_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub description: String,

    /// Revenue or expense.
    pub kind: EntryKind,

    /// Free-form bucket, e.g. "Vendas" or "Compras".
    pub category: String,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,

    pub due_date: NaiveDate,

    /// Settled flag; `paid_date` is set exactly when this is true.
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_revenue(&self) -> bool {
        self.kind == EntryKind::Revenue
    }
}
