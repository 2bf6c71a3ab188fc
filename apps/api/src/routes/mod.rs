//! # Route Layer
//!
//! HTTP route definitions and shared application state.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Route Map                                      │
//! │                                                                         │
//! │  PUBLIC                                                                 │
//! │  ├── GET  /health                      liveness probe                  │
//! │  ├── POST /sales                       create sale (workflow)          │
//! │  ├── GET  /sales                       list sales, newest first        │
//! │  └── GET  /sales/{saleId}              single sale with lines          │
//! │                                                                         │
//! │  ADMIN (JWT bearer, role = admin)                                      │
//! │  ├── GET  /admin/top10sales            top items by revenue            │
//! │  ├── GET  /admin/topSalesman           salesmen ranked by revenue      │
//! │  ├── GET  /admin/totalRevenuePerYear   revenue grouped by year         │
//! │  ├── GET  /admin/stockCount            stock levels, lowest first      │
//! │  └── POST /items/{itemId}/stock        manual stock adjustment         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod sales;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde_json::json;
use std::sync::Arc;

use bazaar_db::Database;

use crate::auth::{self, JwtManager};

/// Shared application state.
///
/// Constructed once in `main` and passed explicitly into every handler;
/// there are no globals. Holds exactly what handlers read: the database
/// handle and the token verifier.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/admin/top10sales", get(admin::top10sales))
        .route("/admin/topSalesman", get(admin::top_salesman))
        .route("/admin/totalRevenuePerYear", get(admin::total_revenue_per_year))
        .route("/admin/stockCount", get(admin::stock_count))
        .route("/items/{itemId}/stock", post(admin::adjust_stock))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/sales", post(sales::create_sale).get(sales::list_sales))
        .route("/sales/{saleId}", get(sales::get_sale))
        .merge(admin_routes)
        .with_state(state)
}

/// Liveness probe. Checks that the database answers a trivial query.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
