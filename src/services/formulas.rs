use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{
        formula::{self, Entity as FormulaEntity},
        formula_item::{self, Entity as FormulaItemEntity},
        product::{Entity as ProductEntity, ProductKind},
    },
    errors::ServiceError,
};

/// Availability flag on a plan line. Wire values match what the planning
/// screens have always displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PlanLineStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FALTA")]
    Shortage,
}

/// One raw-material requirement inside a production plan.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlanLine {
    pub formula_item_id: i64,
    pub raw_material_id: i64,
    pub ingredient: String,
    pub required_quantity: Decimal,
    pub unit: String,
    pub stock_on_hand: Decimal,
    pub unit_cost: Decimal,
    pub subtotal: Decimal,
    pub status: PlanLineStatus,
}

/// MRP output for one formula at a target quantity. Pure read model; the
/// same inputs always produce the same plan.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaterialPlan {
    pub production_quantity: Decimal,
    pub lines: Vec<PlanLine>,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormulaWithItems {
    #[serde(flatten)]
    pub formula: formula::Model,
    pub items: Vec<formula_item::Model>,
}

/// Formula (bill of materials) maintenance and material requirements
/// planning.
#[derive(Clone)]
pub struct FormulaService {
    db: Arc<DbPool>,
}

impl FormulaService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_formula(
        &self,
        name: String,
        finished_product_id: i64,
    ) -> Result<formula::Model, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "formula name must not be empty".into(),
            ));
        }

        let product = ProductEntity::find_by_id(finished_product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("product {} not found", finished_product_id))
            })?;
        if product.kind != ProductKind::FinishedGood {
            return Err(ServiceError::ValidationError(format!(
                "product '{}' is not a finished good",
                product.name
            )));
        }

        let created = formula::ActiveModel {
            name: Set(name.trim().to_string()),
            finished_product_id: Set(finished_product_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(created)
    }

    pub async fn list_formulas(&self) -> Result<Vec<FormulaWithItems>, ServiceError> {
        let rows = FormulaEntity::find()
            .find_with_related(FormulaItemEntity)
            .order_by_asc(formula::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(formula, items)| FormulaWithItems { formula, items })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        formula_id: i64,
        raw_material_id: i64,
        quantity_per_unit: Decimal,
    ) -> Result<formula_item::Model, ServiceError> {
        super::require_positive("quantidade", quantity_per_unit)?;

        FormulaEntity::find_by_id(formula_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("formula {} not found", formula_id)))?;
        let material = ProductEntity::find_by_id(raw_material_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("product {} not found", raw_material_id))
            })?;
        if material.kind != ProductKind::RawMaterial {
            return Err(ServiceError::ValidationError(format!(
                "product '{}' is not a raw material",
                material.name
            )));
        }

        let created = formula_item::ActiveModel {
            formula_id: Set(formula_id),
            raw_material_id: Set(raw_material_id),
            quantity_per_unit: Set(quantity_per_unit),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, item_id: i64) -> Result<(), ServiceError> {
        let item = FormulaItemEntity::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("formula item {} not found", item_id))
            })?;
        item.delete(&*self.db).await?;
        Ok(())
    }

    /// Computes material requirements and cost for producing
    /// `target_quantity` units of the formula's finished good. Reads only;
    /// consumption happens in the production orchestrator.
    #[instrument(skip(self))]
    pub async fn plan(
        &self,
        formula_id: i64,
        target_quantity: Decimal,
    ) -> Result<MaterialPlan, ServiceError> {
        super::require_positive("quantidade_producao", target_quantity)?;

        FormulaEntity::find_by_id(formula_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("formula {} not found", formula_id)))?;

        let items = FormulaItemEntity::find()
            .filter(formula_item::Column::FormulaId.eq(formula_id))
            .order_by_asc(formula_item::Column::Id)
            .all(&*self.db)
            .await?;

        let material_ids: Vec<i64> = items.iter().map(|i| i.raw_material_id).collect();
        let materials: HashMap<i64, _> = ProductEntity::find()
            .filter(crate::entities::product::Column::Id.is_in(material_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut lines = Vec::with_capacity(items.len());
        let mut total_cost = Decimal::ZERO;
        for item in items {
            let material = materials.get(&item.raw_material_id).ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "raw material {} not found",
                    item.raw_material_id
                ))
            })?;

            let required = item.quantity_per_unit * target_quantity;
            let subtotal = required * material.unit_cost;
            total_cost += subtotal;

            lines.push(PlanLine {
                formula_item_id: item.id,
                raw_material_id: material.id,
                ingredient: material.name.clone(),
                required_quantity: required,
                unit: material.unit.clone(),
                stock_on_hand: material.stock_on_hand,
                unit_cost: material.unit_cost,
                subtotal,
                status: if material.stock_on_hand >= required {
                    PlanLineStatus::Ok
                } else {
                    PlanLineStatus::Shortage
                },
            });
        }

        Ok(MaterialPlan {
            production_quantity: target_quantity,
            lines,
            total_cost,
        })
    }
}
