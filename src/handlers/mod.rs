pub mod common;

pub mod finance;
pub mod formulas;
pub mod health;
pub mod partners;
pub mod production;
pub mod products;
pub mod purchasing;
pub mod reports;
pub mod sales;
pub mod system;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub partners: Arc<crate::services::partners::PartnerService>,
    pub formulas: Arc<crate::services::formulas::FormulaService>,
    pub sales: Arc<crate::services::sales::SalesService>,
    pub purchasing: Arc<crate::services::purchasing::PurchasingService>,
    pub production: Arc<crate::services::production::ProductionService>,
    pub finance: Arc<crate::services::finance::FinanceService>,
    pub reports: Arc<crate::services::reports::ReportService>,
    pub system: Arc<crate::services::system::SystemService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            catalog: Arc::new(crate::services::catalog::CatalogService::new(
                db.clone(),
                event_sender.clone(),
            )),
            partners: Arc::new(crate::services::partners::PartnerService::new(db.clone())),
            formulas: Arc::new(crate::services::formulas::FormulaService::new(db.clone())),
            sales: Arc::new(crate::services::sales::SalesService::new(
                db.clone(),
                event_sender.clone(),
            )),
            purchasing: Arc::new(crate::services::purchasing::PurchasingService::new(
                db.clone(),
                event_sender.clone(),
            )),
            production: Arc::new(crate::services::production::ProductionService::new(
                db.clone(),
                event_sender.clone(),
            )),
            finance: Arc::new(crate::services::finance::FinanceService::new(
                db.clone(),
                event_sender.clone(),
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(db.clone())),
            system: Arc::new(crate::services::system::SystemService::new(db, event_sender)),
        }
    }
}
