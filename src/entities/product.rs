use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Product classification. The wire values are the Portuguese labels the
/// storefront and reports have always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ProductKind {
    #[sea_orm(string_value = "Materia Prima")]
    #[serde(rename = "Materia Prima")]
    RawMaterial,
    #[sea_orm(string_value = "Produto Acabado")]
    #[serde(rename = "Produto Acabado")]
    FinishedGood,
}

/// Master record for anything that holds stock: raw materials consumed by
/// production and finished goods sold at the counter.
///
/// `stock_on_hand` is a cached aggregate. After every committed transaction
/// it must equal the sum of `remaining_quantity` across the product's
/// batches; only the transaction services are allowed to write it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub kind: ProductKind,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub stock_on_hand: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batch::Entity")]
    Batches,
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stock value at current unit cost.
    pub fn stock_value(&self) -> Decimal {
        self.stock_on_hand * self.unit_cost
    }
}
