//! Decant API Library
//!
//! Inventory, production and point-of-sale backend for a small cosmetics
//! manufacturer: FEFO batch ledger, formula-based production, purchasing
//! and a simple financial ledger.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Full route tree, including health endpoints and the OpenAPI document.
/// Route paths keep the Portuguese surface the storefront has always
/// called.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/status", get(handlers::health::status))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .nest("/produtos", handlers::products::products_routes())
        .nest("/fornecedores", handlers::partners::suppliers_routes())
        .nest("/clientes", handlers::partners::customers_routes())
        .nest("/cotacoes", handlers::partners::quotations_routes())
        .nest("/formulas", handlers::formulas::formulas_routes())
        .nest("/planejamento", handlers::formulas::planning_routes())
        .nest("/compras", handlers::purchasing::purchasing_routes())
        .nest("/vendas", handlers::sales::sales_routes())
        .nest("/producao", handlers::production::production_routes())
        .nest("/financeiro", handlers::finance::finance_routes())
        .nest("/estoque", handlers::reports::stock_routes())
        .nest("/relatorios", handlers::reports::reports_routes())
        .nest("/crm", handlers::reports::crm_routes())
        .nest("/sistema", handlers::system::system_routes())
}
