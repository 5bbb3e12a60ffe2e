//! Point-of-sale checkout: multi-line carts, the revenue entry for the cart
//! total, and full rollback when any line is short.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::TestApp;
use decant_api::{
    entities::{
        financial_entry::{self, Entity as FinancialEntryEntity, EntryKind},
        sale_record::{self, Entity as SaleRecordEntity},
        stock_movement::{self, Entity as StockMovementEntity, MovementKind},
    },
    errors::ServiceError,
    services::sales::CheckoutLine,
};

#[tokio::test]
async fn checkout_updates_stock_ledger_and_finance() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Maria Souza").await;
    let soap = app.seed_finished_good("Sabonete Lavanda", dec!(10), dec!(5)).await;
    let cream = app.seed_finished_good("Creme Hidratante", dec!(8), dec!(12)).await;

    let group_id = app
        .state
        .services
        .sales
        .checkout(
            customer.id,
            vec![
                CheckoutLine {
                    product_id: soap.id,
                    quantity: dec!(3),
                    line_total: dec!(45),
                },
                CheckoutLine {
                    product_id: cream.id,
                    quantity: dec!(2),
                    line_total: dec!(60),
                },
            ],
            "Pix",
        )
        .await
        .unwrap();

    assert_eq!(app.reload_product(soap.id).await.stock_on_hand, dec!(7));
    assert_eq!(app.reload_product(cream.id).await.stock_on_hand, dec!(6));
    app.assert_conservation(soap.id).await;
    app.assert_conservation(cream.id).await;

    // Both lines share the cart's group id.
    let sales = SaleRecordEntity::find()
        .filter(sale_record::Column::GroupId.eq(group_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(sales.len(), 2);
    assert!(sales.iter().all(|s| s.payment_method == "Pix"));

    let movements = StockMovementEntity::find()
        .filter(stock_movement::Column::ProductId.eq(soap.id))
        .filter(stock_movement::Column::Kind.eq(MovementKind::Outbound))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].origin, "PDV Pix");
    assert_eq!(movements[0].actor, "Vendas");

    // One paid revenue entry for the whole cart.
    let entries = FinancialEntryEntity::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.kind, EntryKind::Revenue);
    assert_eq!(entry.category, "Vendas");
    assert_eq!(entry.amount, dec!(105));
    assert!(entry.paid);
    assert!(entry.paid_date.is_some());
    let reference = &group_id.to_string()[..8];
    assert_eq!(entry.description, format!("Venda PDV (Ref: {})", reference));
}

/// When the second line is short the first line's effects must roll back
/// too: no stock change, no sale rows, no revenue entry.
#[tokio::test]
async fn short_line_rolls_back_the_whole_cart() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("João Lima").await;
    let soap = app.seed_finished_good("Sabonete Mel", dec!(10), dec!(5)).await;
    let cream = app.seed_finished_good("Creme Facial", dec!(1), dec!(12)).await;

    let err = app
        .state
        .services
        .sales
        .checkout(
            customer.id,
            vec![
                CheckoutLine {
                    product_id: soap.id,
                    quantity: dec!(3),
                    line_total: dec!(45),
                },
                CheckoutLine {
                    product_id: cream.id,
                    quantity: dec!(5),
                    line_total: dec!(150),
                },
            ],
            "Dinheiro",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock(_)));
    assert!(err.to_string().contains("Creme Facial"));

    assert_eq!(app.reload_product(soap.id).await.stock_on_hand, dec!(10));
    assert_eq!(app.reload_product(cream.id).await.stock_on_hand, dec!(1));
    assert_eq!(app.batch_remaining(soap.id).await, vec![dec!(10)]);

    let sales = SaleRecordEntity::find().all(&*app.state.db).await.unwrap();
    assert!(sales.is_empty());
    let entries = FinancialEntryEntity::find()
        .filter(financial_entry::Column::Category.eq("Vendas"))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn checkout_requires_known_customer_and_lines() {
    let app = TestApp::new().await;
    let soap = app.seed_finished_good("Sabonete Neutro", dec!(5), dec!(4)).await;

    let err = app
        .state
        .services
        .sales
        .checkout(
            42,
            vec![CheckoutLine {
                product_id: soap.id,
                quantity: dec!(1),
                line_total: dec!(10),
            }],
            "Pix",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let customer = app.seed_customer("Ana Dias").await;
    let err = app
        .state
        .services
        .sales
        .checkout(customer.id, vec![], "Pix")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn free_cart_records_sales_but_no_revenue_entry() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Brinde Institucional").await;
    let sample = app.seed_finished_good("Amostra Grátis", dec!(5), dec!(1)).await;

    app.state
        .services
        .sales
        .checkout(
            customer.id,
            vec![CheckoutLine {
                product_id: sample.id,
                quantity: dec!(2),
                line_total: dec!(0),
            }],
            "Cortesia",
        )
        .await
        .unwrap();

    assert_eq!(app.reload_product(sample.id).await.stock_on_hand, dec!(3));
    let entries = FinancialEntryEntity::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(entries.is_empty());
}
