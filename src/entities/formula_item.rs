use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One bill-of-materials line: how much of a raw material goes into a
/// single unit of the formula's finished product.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "formula_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub formula_id: i64,
    pub raw_material_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity_per_unit: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::formula::Entity",
        from = "Column::FormulaId",
        to = "super::formula::Column::Id"
    )]
    Formula,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::RawMaterialId",
        to = "super::product::Column::Id"
    )]
    RawMaterial,
}

impl Related<super::formula::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Formula.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RawMaterial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
