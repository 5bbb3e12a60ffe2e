use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Production runs are recorded only once they have fully completed, so
/// the status carries a single terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ProductionStatus {
    #[sea_orm(string_value = "Concluída")]
    #[serde(rename = "Concluída")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "production_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub formula_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity_produced: Decimal,
    pub lot_code: String,
    pub produced_at: DateTime<Utc>,
    pub status: ProductionStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::formula::Entity",
        from = "Column::FormulaId",
        to = "super::formula::Column::Id"
    )]
    Formula,
}

impl Related<super::formula::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Formula.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
