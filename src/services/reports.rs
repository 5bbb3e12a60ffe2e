use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{
        batch::{self, Entity as BatchEntity},
        customer::Entity as CustomerEntity,
        product::{self, Entity as ProductEntity},
        sale_record::{self, Entity as SaleRecordEntity},
        stock_movement::{self, Entity as StockMovementEntity, MovementKind},
    },
    errors::ServiceError,
};

/// One kardex row with the product name already resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KardexRow {
    pub occurred_at: DateTime<Utc>,
    pub product: String,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub origin: String,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiryRow {
    pub product: String,
    pub lot_code: String,
    pub expiry_date: NaiveDate,
    pub remaining_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValuationRow {
    pub product: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockValuation {
    pub total: Decimal,
    pub items: Vec<ValuationRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AbcRow {
    pub product: String,
    pub revenue: Decimal,
    pub class: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CrmOpportunity {
    pub customer: String,
    pub phone: Option<String>,
    pub last_product: String,
    pub last_sale_at: DateTime<Utc>,
    pub days_since_purchase: i64,
    pub status: String,
}

/// Read-only reporting over the ledger tables. Product and customer names
/// are resolved through a single batched lookup per report, never one
/// query per row.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    async fn product_names(&self) -> Result<HashMap<i64, product::Model>, ServiceError> {
        let products = ProductEntity::find().all(&*self.db).await?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Movement log, newest first.
    #[instrument(skip(self))]
    pub async fn kardex(&self) -> Result<Vec<KardexRow>, ServiceError> {
        let movements = StockMovementEntity::find()
            .order_by_desc(stock_movement::Column::OccurredAt)
            .order_by_desc(stock_movement::Column::Id)
            .all(&*self.db)
            .await?;
        let products = self.product_names().await?;

        Ok(movements
            .into_iter()
            .map(|m| KardexRow {
                occurred_at: m.occurred_at,
                product: products
                    .get(&m.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "?".to_string()),
                kind: m.kind,
                quantity: m.quantity,
                origin: m.origin,
                actor: m.actor,
            })
            .collect())
    }

    /// Active batches ordered by expiry, soonest first.
    #[instrument(skip(self))]
    pub async fn batches_by_expiry(&self) -> Result<Vec<ExpiryRow>, ServiceError> {
        let batches = BatchEntity::find()
            .order_by_asc(batch::Column::ExpiryDate)
            .order_by_asc(batch::Column::Id)
            .all(&*self.db)
            .await?;
        let products = self.product_names().await?;

        Ok(batches
            .into_iter()
            .filter(|b| b.is_active())
            .map(|b| ExpiryRow {
                product: products
                    .get(&b.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "?".to_string()),
                lot_code: b.lot_code,
                expiry_date: b.expiry_date,
                remaining_quantity: b.remaining_quantity,
            })
            .collect())
    }

    /// Stock value per product at current unit cost, plus the grand total.
    #[instrument(skip(self))]
    pub async fn stock_valuation(&self) -> Result<StockValuation, ServiceError> {
        let products = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?;

        let mut total = Decimal::ZERO;
        let items = products
            .into_iter()
            .map(|p| {
                let value = p.stock_value();
                total += value;
                ValuationRow {
                    product: p.name,
                    quantity: p.stock_on_hand,
                    unit_cost: p.unit_cost,
                    total_value: value,
                }
            })
            .collect();

        Ok(StockValuation { total, items })
    }

    /// Revenue ranking per product. The top seller is class A, the runner
    /// up B, everything else C.
    #[instrument(skip(self))]
    pub async fn abc_curve(&self) -> Result<Vec<AbcRow>, ServiceError> {
        let sales = SaleRecordEntity::find().all(&*self.db).await?;
        let products = self.product_names().await?;

        let mut revenue_by_product: HashMap<i64, Decimal> = HashMap::new();
        for sale in sales {
            if products.contains_key(&sale.product_id) {
                *revenue_by_product.entry(sale.product_id).or_default() += sale.line_total;
            }
        }

        let mut ranked: Vec<(i64, Decimal)> = revenue_by_product.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(rank, (product_id, revenue))| AbcRow {
                product: products[&product_id].name.clone(),
                revenue,
                class: match rank {
                    0 => "A",
                    1 => "B",
                    _ => "C",
                }
                .to_string(),
            })
            .collect())
    }

    /// Customers that have gone quiet: the latest sale per customer, kept
    /// when it is at least 25 days old, labelled by how stale it is.
    #[instrument(skip(self))]
    pub async fn crm_opportunities(&self) -> Result<Vec<CrmOpportunity>, ServiceError> {
        let sales = SaleRecordEntity::find()
            .order_by_desc(sale_record::Column::SoldAt)
            .order_by_desc(sale_record::Column::Id)
            .all(&*self.db)
            .await?;
        let products = self.product_names().await?;
        let customers: HashMap<i64, _> = CustomerEntity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let now = Utc::now();
        let mut seen: HashSet<i64> = HashSet::new();
        let mut opportunities = Vec::new();

        // Sales are newest-first, so the first row per customer is their
        // latest purchase.
        for sale in sales {
            if !seen.insert(sale.customer_id) {
                continue;
            }
            let (customer, prod) = match (
                customers.get(&sale.customer_id),
                products.get(&sale.product_id),
            ) {
                (Some(c), Some(p)) => (c, p),
                _ => continue,
            };

            let days = (now - sale.sold_at).num_days();
            if days < 25 {
                continue;
            }
            let status = if days > 90 {
                "Inativo"
            } else if days > 45 {
                "Crítico (45+ dias)"
            } else {
                "Atenção (25+ dias)"
            };

            opportunities.push(CrmOpportunity {
                customer: customer.name.clone(),
                phone: customer.phone.clone(),
                last_product: prod.name.clone(),
                last_sale_at: sale.sold_at,
                days_since_purchase: days,
                status: status.to_string(),
            });
        }

        Ok(opportunities)
    }
}
