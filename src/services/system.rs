use std::sync::Arc;

use sea_orm::{EntityTrait, TransactionTrait};
use tracing::{instrument, warn};

use crate::{
    db::DbPool,
    entities::{
        batch, customer, financial_entry, formula, formula_item, product, production_record,
        purchase_order, quotation, sale_record, stock_movement, supplier,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Administrative full reset. Wipes every domain table in one
/// transaction, children before parents.
#[derive(Clone)]
pub struct SystemService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl SystemService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn reset_all_data(&self) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        stock_movement::Entity::delete_many().exec(&txn).await?;
        sale_record::Entity::delete_many().exec(&txn).await?;
        production_record::Entity::delete_many().exec(&txn).await?;
        purchase_order::Entity::delete_many().exec(&txn).await?;
        formula_item::Entity::delete_many().exec(&txn).await?;
        formula::Entity::delete_many().exec(&txn).await?;
        batch::Entity::delete_many().exec(&txn).await?;
        quotation::Entity::delete_many().exec(&txn).await?;
        product::Entity::delete_many().exec(&txn).await?;
        customer::Entity::delete_many().exec(&txn).await?;
        supplier::Entity::delete_many().exec(&txn).await?;
        financial_entry::Entity::delete_many().exec(&txn).await?;

        txn.commit().await?;

        self.event_sender.send_or_log(Event::DataReset).await;
        warn!("All domain data wiped by administrative reset");
        Ok(())
    }
}
