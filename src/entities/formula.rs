use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Bill of materials header: one finished good, a set of weighted
/// raw-material lines in [`super::formula_item`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "formulas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub finished_product_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::FinishedProductId",
        to = "super::product::Column::Id"
    )]
    FinishedProduct,
    #[sea_orm(has_many = "super::formula_item::Entity")]
    Items,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinishedProduct.def()
    }
}

impl Related<super::formula_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
