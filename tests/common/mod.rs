//! Shared harness for integration tests: a file-backed SQLite database in a
//! temp directory, the migrated schema, the full service stack and the HTTP
//! router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

use decant_api::{
    api_routes,
    config::AppConfig,
    db,
    entities::{
        batch::{self, Entity as BatchEntity},
        customer,
        product::{self, Entity as ProductEntity, ProductKind},
        supplier,
    },
    events::{self, EventSender},
    handlers::AppServices,
    services::catalog::CreateProductInput,
    AppState,
};

/// One application instance backed by a throwaway SQLite file.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: TempDir,
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 18_080,
        environment: "test".to_string(),
        log_level: "warn".to_string(),
        log_json: false,
        auto_migrate: true,
        cors_allowed_origins: None,
        // A single connection keeps SQLite writes serialized in tests.
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
        db_acquire_timeout_secs: 5,
        db_idle_timeout_secs: 60,
        event_channel_capacity: 64,
        request_timeout_secs: 5,
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let db_path = tmp.path().join("decant_test.db");
        let cfg = test_config(format!("sqlite://{}?mode=rwc", db_path.display()));

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), event_sender.clone());
        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };
        let router = api_routes().with_state(state.clone());

        Self {
            state,
            router,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    /// Sends a request through the router without binding a socket.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error")
    }

    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response was not JSON")
        };
        (status, json)
    }

    /// Registers a raw material, seeding its batch ledger via the catalog
    /// service when `initial_stock` is positive.
    pub async fn seed_raw_material(
        &self,
        name: &str,
        initial_stock: Decimal,
        unit_cost: Decimal,
    ) -> product::Model {
        self.state
            .services
            .catalog
            .create_product(CreateProductInput {
                name: name.to_string(),
                kind: ProductKind::RawMaterial,
                unit: "Kg".to_string(),
                initial_stock,
                unit_cost,
            })
            .await
            .expect("failed to seed raw material")
    }

    pub async fn seed_finished_good(
        &self,
        name: &str,
        initial_stock: Decimal,
        unit_cost: Decimal,
    ) -> product::Model {
        self.state
            .services
            .catalog
            .create_product(CreateProductInput {
                name: name.to_string(),
                kind: ProductKind::FinishedGood,
                unit: "Un".to_string(),
                initial_stock,
                unit_cost,
            })
            .await
            .expect("failed to seed finished good")
    }

    pub async fn seed_supplier(&self, name: &str) -> supplier::Model {
        self.state
            .services
            .partners
            .create_supplier(name.to_string(), 7)
            .await
            .expect("failed to seed supplier")
    }

    pub async fn seed_customer(&self, name: &str) -> customer::Model {
        self.state
            .services
            .partners
            .create_customer(name.to_string(), None, None)
            .await
            .expect("failed to seed customer")
    }

    /// Remaining quantities of a product's batches in FEFO order, zeroed
    /// batches included.
    pub async fn batch_remaining(&self, product_id: i64) -> Vec<Decimal> {
        BatchEntity::find()
            .filter(batch::Column::ProductId.eq(product_id))
            .order_by_asc(batch::Column::ExpiryDate)
            .order_by_asc(batch::Column::ReceivedAt)
            .order_by_asc(batch::Column::Id)
            .all(&*self.state.db)
            .await
            .expect("failed to load batches")
            .into_iter()
            .map(|b| b.remaining_quantity)
            .collect()
    }

    pub async fn reload_product(&self, product_id: i64) -> product::Model {
        ProductEntity::find_by_id(product_id)
            .one(&*self.state.db)
            .await
            .expect("failed to load product")
            .expect("product vanished")
    }

    /// Checks the ledger invariant: a product's stock on hand equals the sum
    /// of its batches' remaining quantities.
    pub async fn assert_conservation(&self, product_id: i64) {
        let product = self.reload_product(product_id).await;
        let batch_sum: Decimal = self.batch_remaining(product_id).await.into_iter().sum();
        assert_eq!(
            product.stock_on_hand, batch_sum,
            "stock on hand diverged from batch ledger for product {}",
            product_id
        );
    }
}
