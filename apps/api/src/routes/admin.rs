//! # Admin Routes
//!
//! Reporting endpoints and the manual stock adjustment, all behind the
//! admin JWT middleware (see [`crate::auth::require_admin`]).
//!
//! Reports come straight from [`bazaar_db::ReportRepository`]; this layer
//! only renames fields to the wire shape and converts cents to decimal.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use bazaar_core::{Money, ValidationError};
use bazaar_db::repository::reporting::{
    StockLevelRow, TopItemRow, TopSalesmanRow, YearRevenueRow,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::routes::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// One row of `GET /admin/top10sales`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItemDto {
    pub item_id: String,
    pub name: String,
    pub total_sold: i64,
    /// Revenue in decimal currency units.
    pub total_revenue: f64,
}

impl From<TopItemRow> for TopItemDto {
    fn from(row: TopItemRow) -> Self {
        TopItemDto {
            item_id: row.item_id,
            name: row.name,
            total_sold: row.total_sold,
            total_revenue: Money::from_cents(row.revenue_cents).to_decimal(),
        }
    }
}

/// One row of `GET /admin/topSalesman`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSalesmanDto {
    pub salesman_id: String,
    pub name: String,
    pub sales_count: i64,
    pub total_revenue: f64,
}

impl From<TopSalesmanRow> for TopSalesmanDto {
    fn from(row: TopSalesmanRow) -> Self {
        TopSalesmanDto {
            salesman_id: row.salesman_id,
            name: row.name,
            sales_count: row.sales_count,
            total_revenue: Money::from_cents(row.revenue_cents).to_decimal(),
        }
    }
}

/// One row of `GET /admin/totalRevenuePerYear`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRevenueDto {
    pub year: i64,
    pub total_revenue: f64,
}

impl From<YearRevenueRow> for YearRevenueDto {
    fn from(row: YearRevenueRow) -> Self {
        YearRevenueDto {
            year: row.year,
            total_revenue: Money::from_cents(row.revenue_cents).to_decimal(),
        }
    }
}

/// One row of `GET /admin/stockCount`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelDto {
    pub item_id: String,
    pub name: String,
    pub stock: i64,
}

impl From<StockLevelRow> for StockLevelDto {
    fn from(row: StockLevelRow) -> Self {
        StockLevelDto {
            item_id: row.item_id,
            name: row.name,
            stock: row.stock,
        }
    }
}

/// Request body for `POST /items/{itemId}/stock`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockBody {
    /// Signed quantity change (positive = restock).
    pub delta: Option<i64>,
}

/// Response for `POST /items/{itemId}/stock`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedItemDto {
    pub item_id: String,
    pub name: String,
    pub stock: i64,
    pub sold_count: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /admin/top10sales` — top items by revenue, at most 10.
pub async fn top10sales(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopItemDto>>, ApiError> {
    let rows = state.db.reports().top_items().await?;
    Ok(Json(rows.into_iter().map(TopItemDto::from).collect()))
}

/// `GET /admin/topSalesman` — salesmen ranked by revenue.
pub async fn top_salesman(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopSalesmanDto>>, ApiError> {
    let rows = state.db.reports().top_salesmen().await?;
    Ok(Json(rows.into_iter().map(TopSalesmanDto::from).collect()))
}

/// `GET /admin/totalRevenuePerYear` — revenue grouped by calendar year.
pub async fn total_revenue_per_year(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<YearRevenueDto>>, ApiError> {
    let rows = state.db.reports().revenue_by_year().await?;
    Ok(Json(rows.into_iter().map(YearRevenueDto::from).collect()))
}

/// `GET /admin/stockCount` — stock per item, lowest first. An empty catalog
/// is an empty list, not an error.
pub async fn stock_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StockLevelDto>>, ApiError> {
    let rows = state.db.reports().stock_levels().await?;
    Ok(Json(rows.into_iter().map(StockLevelDto::from).collect()))
}

/// `POST /items/{itemId}/stock` — manual stock adjustment with audit record.
///
/// The acting admin comes from the validated token claims; the repository
/// writes the audit row in the same transaction as the stock change.
pub async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<String>,
    Json(body): Json<AdjustStockBody>,
) -> Result<Json<AdjustedItemDto>, ApiError> {
    let delta = body.delta.ok_or_else(|| ValidationError::Required {
        field: "delta".to_string(),
    })?;

    if delta == 0 {
        return Err(ApiError::validation("delta must be non-zero"));
    }

    let item = state
        .db
        .items()
        .adjust_stock(&item_id, &claims.sub, delta)
        .await?;

    info!(item_id = %item.id, delta = delta, admin = %claims.sub, "Stock adjusted");

    Ok(Json(AdjustedItemDto {
        item_id: item.id,
        name: item.name,
        stock: item.stock,
        sold_count: item.sold_count,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtManager;
    use crate::config::ApiConfig;
    use crate::error::ErrorCode;
    use bazaar_core::{Item, NewSaleLine, NewSaleRequest, User, UserRole};
    use bazaar_db::{Database, DbConfig};
    use chrono::Utc;

    async fn test_state() -> Arc<AppState> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ApiConfig::default();
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
        Arc::new(AppState { db, jwt })
    }

    fn admin_claims() -> Claims {
        Claims {
            sub: "admin-1".to_string(),
            role: "admin".to_string(),
            iat: 0,
            exp: i64::MAX,
            jti: "test".to_string(),
        }
    }

    async fn seed(state: &AppState) {
        let now = Utc::now();
        for (id, name, price) in [("item-1", "Widget", 1000), ("item-2", "Gadget", 500)] {
            state
                .db
                .items()
                .insert(&Item {
                    id: id.to_string(),
                    name: name.to_string(),
                    category: None,
                    price_cents: price,
                    stock: 20,
                    sold_count: 0,
                    description: None,
                    image_url: None,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        for (id, first, last, role) in [
            ("admin-1", "Amira", "Khan", UserRole::Admin),
            ("user-1", "Grace", "Hopper", UserRole::User),
        ] {
            state
                .db
                .users()
                .insert(&User {
                    id: id.to_string(),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: format!("{id}@example.com"),
                    role,
                    created_at: now,
                })
                .await
                .unwrap();
        }
    }

    async fn record_sale(state: &AppState, item: &str, qty: i64, price_cents: i64) {
        state
            .db
            .workflow()
            .create_sale(&NewSaleRequest {
                customer_name: "Ada".to_string(),
                customer_email: "ada@example.com".to_string(),
                phone_number: "555-0100".to_string(),
                salesman_id: "user-1".to_string(),
                lines: vec![NewSaleLine {
                    item_id: item.to_string(),
                    quantity: qty,
                    unit_price_cents: price_cents,
                }],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_top10sales_reports_aggregates() {
        let state = test_state().await;
        seed(&state).await;
        record_sale(&state, "item-1", 2, 1000).await;
        record_sale(&state, "item-1", 3, 1000).await;

        let Json(rows) = top10sales(State(state)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_sold, 5);
        assert!((rows[0].total_revenue - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_stock_count_lowest_first() {
        let state = test_state().await;
        seed(&state).await;
        record_sale(&state, "item-2", 15, 500).await;

        let Json(rows) = stock_count(State(state)).await.unwrap();
        assert_eq!(rows[0].item_id, "item-2");
        assert_eq!(rows[0].stock, 5);
        assert_eq!(rows[1].stock, 20);
    }

    #[tokio::test]
    async fn test_adjust_stock_applies_delta() {
        let state = test_state().await;
        seed(&state).await;

        let Json(dto) = adjust_stock(
            State(state.clone()),
            Extension(admin_claims()),
            Path("item-1".to_string()),
            Json(AdjustStockBody { delta: Some(-5) }),
        )
        .await
        .unwrap();

        assert_eq!(dto.stock, 15);

        let audit = state.db.items().adjustments("item-1").await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].delta, -5);
        assert_eq!(audit[0].user_id, "admin-1");
    }

    #[tokio::test]
    async fn test_adjust_stock_requires_delta() {
        let state = test_state().await;
        seed(&state).await;

        let err = adjust_stock(
            State(state),
            Extension(admin_claims()),
            Path("item-1".to_string()),
            Json(AdjustStockBody { delta: None }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_adjust_stock_unknown_item() {
        let state = test_state().await;
        seed(&state).await;

        let err = adjust_stock(
            State(state),
            Extension(admin_claims()),
            Path("missing".to_string()),
            Json(AdjustStockBody { delta: Some(1) }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_revenue_per_year_single_bucket() {
        let state = test_state().await;
        seed(&state).await;
        record_sale(&state, "item-1", 2, 1000).await;

        let Json(rows) = total_revenue_per_year(State(state)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].total_revenue - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_top_salesman_ranked_by_revenue() {
        let state = test_state().await;
        seed(&state).await;
        record_sale(&state, "item-1", 4, 1000).await;

        let Json(rows) = top_salesman(State(state)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Grace Hopper");
        assert_eq!(rows[0].sales_count, 1);
        assert!((rows[0].total_revenue - 40.0).abs() < f64::EPSILON);
    }
}
