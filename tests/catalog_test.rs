//! Product registration: seed batch and opening movement for products that
//! arrive already holding stock.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::TestApp;
use decant_api::{
    entities::{
        batch::{self, Entity as BatchEntity},
        stock_movement::{self, Entity as StockMovementEntity, MovementKind},
    },
    errors::ServiceError,
    services::catalog::CreateProductInput,
};

#[tokio::test]
async fn initial_stock_seeds_batch_and_movement() {
    let app = TestApp::new().await;
    let product = app.seed_raw_material("Manteiga de Karité", dec!(12.5), dec!(30)).await;

    let batches = BatchEntity::find()
        .filter(batch::Column::ProductId.eq(product.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].lot_code, "INI-CAD");
    assert_eq!(batches[0].expiry_date.to_string(), "2030-12-31");
    assert_eq!(batches[0].initial_quantity, dec!(12.5));
    assert_eq!(batches[0].remaining_quantity, dec!(12.5));

    let movements = StockMovementEntity::find()
        .filter(stock_movement::Column::ProductId.eq(product.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::Inbound);
    assert_eq!(movements[0].quantity, dec!(12.5));
    assert_eq!(movements[0].origin, "Cadastro Inicial");
    assert_eq!(movements[0].actor, "Admin");

    app.assert_conservation(product.id).await;
}

#[tokio::test]
async fn zero_stock_product_gets_no_batch_and_no_movement() {
    let app = TestApp::new().await;
    let product = app.seed_raw_material("Conservante", dec!(0), dec!(8)).await;

    let batches = BatchEntity::find()
        .filter(batch::Column::ProductId.eq(product.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(batches.is_empty());

    let movements = StockMovementEntity::find()
        .filter(stock_movement::Column::ProductId.eq(product.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn create_product_rejects_blank_name_and_negative_amounts() {
    let app = TestApp::new().await;
    let catalog = &app.state.services.catalog;

    let err = catalog
        .create_product(CreateProductInput {
            name: "  ".into(),
            kind: decant_api::entities::product::ProductKind::RawMaterial,
            unit: "Kg".into(),
            initial_stock: dec!(1),
            unit_cost: dec!(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = catalog
        .create_product(CreateProductInput {
            name: "Ácido Lático".into(),
            kind: decant_api::entities::product::ProductKind::RawMaterial,
            unit: "Kg".into(),
            initial_stock: dec!(-1),
            unit_cost: dec!(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn get_product_unknown_id_is_not_found() {
    let app = TestApp::new().await;
    let err = app.state.services.catalog.get_product(9_999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
