use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Domain events emitted after a transaction commits. Delivery is
/// best-effort; a dropped event never fails the request that produced it.
#[derive(Debug, Clone)]
pub enum Event {
    ProductCreated {
        product_id: i64,
    },
    StockReceived {
        product_id: i64,
        batch_id: i64,
        quantity: Decimal,
    },
    CheckoutCompleted {
        group_id: Uuid,
        lines: usize,
        total: Decimal,
    },
    PurchaseOrderReceived {
        purchase_order_id: i64,
        product_id: i64,
        quantity: Decimal,
    },
    ProductionCompleted {
        production_record_id: i64,
        formula_id: i64,
        quantity: Decimal,
    },
    FinancialEntrySettled {
        entry_id: i64,
        paid: bool,
    },
    DataReset,
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, surfacing channel failures to the caller.
    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("Failed to send event: {}", e)))
    }

    /// Sends an event and logs a warning instead of failing when the
    /// channel is closed or full. Used on the post-commit path.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "Dropping domain event");
        }
    }
}

/// Consumes events off the channel and logs them. Runs for the lifetime
/// of the process; returns when every sender has been dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::ProductCreated { product_id } => {
                info!(product_id, "Product created");
            }
            Event::StockReceived {
                product_id,
                batch_id,
                quantity,
            } => {
                info!(product_id, batch_id, %quantity, "Stock received");
            }
            Event::CheckoutCompleted {
                group_id,
                lines,
                total,
            } => {
                info!(%group_id, lines, %total, "Checkout completed");
            }
            Event::PurchaseOrderReceived {
                purchase_order_id,
                product_id,
                quantity,
            } => {
                info!(purchase_order_id, product_id, %quantity, "Purchase order received");
            }
            Event::ProductionCompleted {
                production_record_id,
                formula_id,
                quantity,
            } => {
                info!(production_record_id, formula_id, %quantity, "Production completed");
            }
            Event::FinancialEntrySettled { entry_id, paid } => {
                info!(entry_id, paid, "Financial entry settled");
            }
            Event::DataReset => {
                warn!("All domain data was reset");
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::ProductCreated { product_id: 7 })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::ProductCreated { product_id }) => assert_eq!(product_id, 7),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_on_closed_channel_surfaces_an_event_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let err = sender.send(Event::DataReset).await.unwrap_err();
        assert!(matches!(err, ServiceError::EventError(_)));
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or error out.
        sender.send_or_log(Event::DataReset).await;
    }
}
