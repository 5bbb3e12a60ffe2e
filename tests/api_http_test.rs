//! End-to-end exercise of the HTTP surface: Portuguese routes and payload
//! fields, status codes and the error body shape.

mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_and_status_respond() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");

    let (status, body) = app.request_json(Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "decant-api");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn product_create_and_list_over_http() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/produtos/",
            Some(json!({
                "nome": "Manteiga de Cacau",
                "tipo": "Materia Prima",
                "unidade": "Kg",
                "estoque_atual": "25",
                "custo": "18.5"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Manteiga de Cacau");
    assert_eq!(body["kind"], "Materia Prima");
    let product_id = body["id"].as_i64().unwrap();

    let (status, body) = app.request_json(Method::GET, "/produtos/", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"].as_i64(), Some(product_id));

    // Blank name is rejected at the boundary.
    let (status, _) = app
        .request_json(
            Method::POST,
            "/produtos/",
            Some(json!({ "nome": "", "tipo": "Materia Prima" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn purchase_flow_over_http() {
    let app = TestApp::new().await;
    let oil = app.seed_raw_material("Óleo de Jojoba", dec!(0), dec!(20)).await;
    let supplier = app.seed_supplier("Importadora Vegetal").await;

    let (status, order) = app
        .request_json(
            Method::POST,
            "/compras/",
            Some(json!({
                "fornecedor_id": supplier.id,
                "produto_id": oil.id,
                "quantidade": "15",
                "valor_unitario": "22"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Pendente");
    let order_id = order["id"].as_i64().unwrap();

    let uri = format!("/compras/{}/processar/", order_id);
    let (status, received) = app
        .request_json(
            Method::POST,
            &uri,
            Some(json!({ "lote": "JOJ-001", "validade": "2027-12-31" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(received["status"], "Recebido");

    // A second receipt reports the state-machine violation.
    let (status, error) = app
        .request_json(
            Method::POST,
            &uri,
            Some(json!({ "lote": "JOJ-002", "validade": "2027-12-31" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().is_some());

    assert_eq!(app.reload_product(oil.id).await.stock_on_hand, dec!(15));
}

#[tokio::test]
async fn checkout_over_http_reports_shortage_as_unprocessable() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Laura Reis").await;
    let soap = app.seed_finished_good("Sabonete Rosa", dec!(4), dec!(3)).await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/vendas/pdv/",
            Some(json!({
                "cliente_id": customer.id,
                "itens": [{ "produto_id": soap.id, "quantidade": "2", "valor_total": "24" }],
                "metodo_pagamento": "Pix"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["grupo_id"].as_str().is_some());

    let (status, _) = app
        .request_json(
            Method::POST,
            "/vendas/pdv/",
            Some(json!({
                "cliente_id": customer.id,
                "itens": [{ "produto_id": soap.id, "quantidade": "10", "valor_total": "120" }],
                "metodo_pagamento": "Pix"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.reload_product(soap.id).await.stock_on_hand, dec!(2));
}

#[tokio::test]
async fn planning_and_reports_over_http() {
    let app = TestApp::new().await;
    let water = app.seed_raw_material("Água Purificada", dec!(100), dec!(2)).await;
    let cream = app.seed_finished_good("Creme Leve", dec!(0), dec!(0)).await;

    let (status, formula) = app
        .request_json(
            Method::POST,
            "/formulas/",
            Some(json!({ "nome": "Creme Leve v1", "produto_final_id": cream.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let formula_id = formula["id"].as_i64().unwrap();

    let (status, _) = app
        .request_json(
            Method::POST,
            "/formulas/itens/",
            Some(json!({
                "formula_id": formula_id,
                "materia_prima_id": water.id,
                "quantidade": "0.5"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, plan) = app
        .request_json(
            Method::POST,
            "/planejamento/calcular/",
            Some(json!({ "formula_id": formula_id, "quantidade_producao": "100" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["lines"][0]["status"], "OK");
    let total: rust_decimal::Decimal = plan["total_cost"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, dec!(100));

    let (status, kardex) = app.request_json(Method::GET, "/estoque/kardex/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kardex.as_array().unwrap().len(), 1);
    assert_eq!(kardex[0]["kind"], "Entrada");

    let (status, expiring) = app
        .request_json(Method::GET, "/relatorios/lotes_vencimento/", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(expiring[0]["lot_code"], "INI-CAD");
}

#[tokio::test]
async fn reset_endpoint_clears_domain_data() {
    let app = TestApp::new().await;
    app.seed_raw_material("Descartável", dec!(5), dec!(1)).await;

    let (status, body) = app
        .request_json(Method::DELETE, "/sistema/resetar_dados/", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().is_some());

    let (_, products) = app.request_json(Method::GET, "/produtos/", None).await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, doc) = app
        .request_json(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"].as_str(), Some("Decant API"));
    assert!(doc["paths"]["/vendas/pdv/"].is_object());
}
