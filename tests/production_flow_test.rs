//! Formulas, material planning and production confirmation.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::TestApp;
use decant_api::{
    entities::{
        batch::{self, Entity as BatchEntity},
        production_record::ProductionStatus,
        stock_movement::{self, Entity as StockMovementEntity},
    },
    errors::ServiceError,
    services::formulas::PlanLineStatus,
};

/// Standard fixture: a 100 mL cream whose unit takes 0.5 water and 0.1 oil.
async fn cream_formula(app: &TestApp) -> (i64, i64, i64, i64) {
    let water = app.seed_raw_material("Água Deionizada", dec!(100), dec!(2)).await;
    let oil = app.seed_raw_material("Óleo de Amêndoas", dec!(20), dec!(10)).await;
    let cream = app.seed_finished_good("Creme Corporal 100ml", dec!(0), dec!(0)).await;

    let formulas = &app.state.services.formulas;
    let formula = formulas
        .create_formula("Creme Corporal v1".into(), cream.id)
        .await
        .unwrap();
    formulas.add_item(formula.id, water.id, dec!(0.5)).await.unwrap();
    formulas.add_item(formula.id, oil.id, dec!(0.1)).await.unwrap();

    (formula.id, water.id, oil.id, cream.id)
}

#[tokio::test]
async fn plan_computes_requirements_and_cost() {
    let app = TestApp::new().await;
    let (formula_id, water_id, oil_id, _) = cream_formula(&app).await;

    let plan = app
        .state
        .services
        .formulas
        .plan(formula_id, dec!(100))
        .await
        .unwrap();

    assert_eq!(plan.production_quantity, dec!(100));
    assert_eq!(plan.lines.len(), 2);

    let water_line = plan.lines.iter().find(|l| l.raw_material_id == water_id).unwrap();
    assert_eq!(water_line.required_quantity, dec!(50));
    assert_eq!(water_line.subtotal, dec!(100));
    assert_eq!(water_line.status, PlanLineStatus::Ok);

    let oil_line = plan.lines.iter().find(|l| l.raw_material_id == oil_id).unwrap();
    assert_eq!(oil_line.required_quantity, dec!(10));
    assert_eq!(oil_line.subtotal, dec!(100));
    assert_eq!(oil_line.status, PlanLineStatus::Ok);

    // 50 * 2 + 10 * 10
    assert_eq!(plan.total_cost, dec!(200));
}

#[tokio::test]
async fn plan_flags_shortages_and_never_mutates_stock() {
    let app = TestApp::new().await;
    let (formula_id, water_id, oil_id, _) = cream_formula(&app).await;

    // 300 units need 30 oil but only 20 is on hand.
    let plan = app
        .state
        .services
        .formulas
        .plan(formula_id, dec!(300))
        .await
        .unwrap();
    let oil_line = plan.lines.iter().find(|l| l.raw_material_id == oil_id).unwrap();
    assert_eq!(oil_line.status, PlanLineStatus::Shortage);

    // Planning twice gives identical numbers and touches nothing.
    let again = app
        .state
        .services
        .formulas
        .plan(formula_id, dec!(300))
        .await
        .unwrap();
    assert_eq!(again.total_cost, plan.total_cost);
    assert_eq!(app.reload_product(water_id).await.stock_on_hand, dec!(100));
    assert_eq!(app.reload_product(oil_id).await.stock_on_hand, dec!(20));
}

#[tokio::test]
async fn production_consumes_materials_and_receives_finished_batch() {
    let app = TestApp::new().await;
    let (formula_id, water_id, oil_id, cream_id) = cream_formula(&app).await;

    let record = app
        .state
        .services
        .production
        .confirm(formula_id, dec!(100), "OP-2026-001", "2027-06-30")
        .await
        .unwrap();
    assert_eq!(record.status, ProductionStatus::Completed);
    assert_eq!(record.quantity_produced, dec!(100));
    assert_eq!(record.lot_code, "OP-2026-001");

    assert_eq!(app.reload_product(water_id).await.stock_on_hand, dec!(50));
    assert_eq!(app.reload_product(oil_id).await.stock_on_hand, dec!(10));
    assert_eq!(app.reload_product(cream_id).await.stock_on_hand, dec!(100));
    app.assert_conservation(water_id).await;
    app.assert_conservation(oil_id).await;
    app.assert_conservation(cream_id).await;

    let finished_batches = BatchEntity::find()
        .filter(batch::Column::ProductId.eq(cream_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(finished_batches.len(), 1);
    assert_eq!(finished_batches[0].lot_code, "OP-2026-001");
    assert_eq!(finished_batches[0].expiry_date.to_string(), "2027-06-30");

    let consumption = StockMovementEntity::find()
        .filter(stock_movement::Column::Origin.eq("OP (Consumo)"))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(consumption.len(), 2);
    assert!(consumption.iter().all(|m| m.actor == "Produção"));

    let conclusion = StockMovementEntity::find()
        .filter(stock_movement::Column::Origin.eq("OP (Conclusão)"))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(conclusion.len(), 1);
    assert_eq!(conclusion[0].product_id, cream_id);
    assert_eq!(conclusion[0].quantity, dec!(100));
}

/// Shortage on the second ingredient must consume nothing of the first.
#[tokio::test]
async fn short_ingredient_aborts_the_whole_order() {
    let app = TestApp::new().await;
    let (formula_id, water_id, oil_id, cream_id) = cream_formula(&app).await;

    let err = app
        .state
        .services
        .production
        .confirm(formula_id, dec!(300), "OP-2026-002", "2027-06-30")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock(_)));
    assert!(err.to_string().contains("Óleo de Amêndoas"));

    assert_eq!(app.reload_product(water_id).await.stock_on_hand, dec!(100));
    assert_eq!(app.reload_product(oil_id).await.stock_on_hand, dec!(20));
    assert_eq!(app.reload_product(cream_id).await.stock_on_hand, dec!(0));
    assert!(app
        .state
        .services
        .production
        .history()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn formula_guards_product_kinds() {
    let app = TestApp::new().await;
    let water = app.seed_raw_material("Água", dec!(10), dec!(1)).await;
    let cream = app.seed_finished_good("Creme", dec!(0), dec!(0)).await;

    // Formulas produce finished goods only.
    let err = app
        .state
        .services
        .formulas
        .create_formula("Inválida".into(), water.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // Ingredients must be raw materials.
    let formula = app
        .state
        .services
        .formulas
        .create_formula("Creme v1".into(), cream.id)
        .await
        .unwrap();
    let err = app
        .state
        .services
        .formulas
        .add_item(formula.id, cream.id, dec!(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn empty_formula_cannot_be_produced() {
    let app = TestApp::new().await;
    let cream = app.seed_finished_good("Creme Vazio", dec!(0), dec!(0)).await;
    let formula = app
        .state
        .services
        .formulas
        .create_formula("Sem Ingredientes".into(), cream.id)
        .await
        .unwrap();

    let err = app
        .state
        .services
        .production
        .confirm(formula.id, dec!(10), "OP-2026-003", "2027-01-01")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
