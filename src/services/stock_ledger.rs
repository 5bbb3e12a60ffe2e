//! Batch ledger primitives: FEFO depletion and batch receipt.
//!
//! Every function here is generic over [`ConnectionTrait`] and runs against
//! whatever connection the caller passes in. The orchestrators hand these a
//! transaction handle, which is what keeps a whole business procedure atomic:
//! any error bubbles out, the transaction is dropped, and nothing commits.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use crate::{
    entities::{
        batch::{self, Entity as BatchEntity},
        stock_movement::{self, MovementKind},
    },
    errors::ServiceError,
};

/// Active batches for a product in FEFO order: earliest expiry first,
/// ties broken by receipt time, then id, so the walk is stable.
pub async fn active_batches<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
) -> Result<Vec<batch::Model>, ServiceError> {
    let batches = BatchEntity::find()
        .filter(batch::Column::ProductId.eq(product_id))
        .filter(batch::Column::RemainingQuantity.gt(Decimal::ZERO))
        .order_by_asc(batch::Column::ExpiryDate)
        .order_by_asc(batch::Column::ReceivedAt)
        .order_by_asc(batch::Column::Id)
        .all(conn)
        .await?;
    Ok(batches)
}

/// Consumes `quantity` from a product's batches, oldest expiry first.
///
/// The available total is checked before any row is touched; a shortfall
/// fails with [`ServiceError::InsufficientStock`] and leaves every batch
/// unchanged. Depleted batches are zeroed, never deleted.
pub async fn deplete_batches<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    quantity: Decimal,
) -> Result<(), ServiceError> {
    super::require_positive("quantity", quantity)?;

    let batches = active_batches(conn, product_id).await?;
    let available: Decimal = batches.iter().map(|b| b.remaining_quantity).sum();
    if available < quantity {
        return Err(ServiceError::InsufficientStock(format!(
            "product {} has {} across active batches, requested {}",
            product_id, available, quantity
        )));
    }

    let mut remaining_to_consume = quantity;
    for b in batches {
        if remaining_to_consume == Decimal::ZERO {
            break;
        }
        let take = remaining_to_consume.min(b.remaining_quantity);
        let new_remaining = b.remaining_quantity - take;
        debug!(
            batch_id = b.id,
            lot_code = %b.lot_code,
            %take,
            %new_remaining,
            "Depleting batch"
        );

        let mut active: batch::ActiveModel = b.into();
        active.remaining_quantity = Set(new_remaining);
        active.update(conn).await?;

        remaining_to_consume -= take;
    }

    Ok(())
}

/// Registers a new batch for a product. Batches start full and only ever
/// shrink afterwards.
pub async fn receive_batch<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    lot_code: &str,
    expiry: NaiveDate,
    quantity: Decimal,
) -> Result<batch::Model, ServiceError> {
    super::require_positive("quantity", quantity)?;
    if lot_code.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "lot code must not be empty".into(),
        ));
    }

    let created = batch::ActiveModel {
        product_id: Set(product_id),
        lot_code: Set(lot_code.to_string()),
        expiry_date: Set(expiry),
        initial_quantity: Set(quantity),
        remaining_quantity: Set(quantity),
        received_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    debug!(
        batch_id = created.id,
        product_id,
        lot_code,
        %quantity,
        "Batch received"
    );
    Ok(created)
}

/// Appends a kardex row. Movements are write-once; nothing in the crate
/// updates them afterwards.
pub async fn record_movement<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    kind: MovementKind,
    quantity: Decimal,
    origin: &str,
    actor: &str,
) -> Result<stock_movement::Model, ServiceError> {
    let created = stock_movement::ActiveModel {
        product_id: Set(product_id),
        kind: Set(kind),
        quantity: Set(quantity),
        origin: Set(origin.to_string()),
        actor: Set(actor.to_string()),
        occurred_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(created)
}
