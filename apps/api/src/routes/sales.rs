//! # Sales Routes
//!
//! The sale creation and read endpoints.
//!
//! ## Boundary Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     POST /sales Boundary                                │
//! │                                                                         │
//! │  1. Deserialize the wire body (every field optional at this stage)     │
//! │  2. Enumerate ALL missing required fields into one 400                 │
//! │  3. Convert decimal wire prices to cents, exactly once                 │
//! │  4. Hand a validated NewSaleRequest to the workflow engine             │
//! │  5. Map the committed sale back to wire shape (camelCase, decimal      │
//! │     prices, derived totalPrice)                                        │
//! │                                                                         │
//! │  No business rule lives here. Stock, item, and salesman checks all     │
//! │  belong to the workflow transaction.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bazaar_core::validation::require_fields;
use bazaar_core::{Money, NewSaleLine, NewSaleRequest, SaleWithItems, ValidationError};

use crate::error::ApiError;
use crate::routes::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Request body for `POST /sales`.
///
/// Every field is optional at the deserialization stage so that presence
/// checking can name every absent field at once, instead of failing on the
/// first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleBody {
    pub sales: Option<Vec<SaleLineBody>>,
    pub customer_full_name: Option<String>,
    pub customer_email: Option<String>,
    pub phone_number: Option<String>,
    /// Salesman user id.
    pub salesman: Option<String>,
}

/// One line of a `POST /sales` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineBody {
    pub item_id: Option<String>,
    pub amount_of: Option<i64>,
    /// Unit price in decimal currency units.
    pub price: Option<f64>,
}

/// A sale as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub customer_full_name: String,
    pub customer_email: String,
    pub phone_number: String,
    pub salesman: String,
    pub created_at: DateTime<Utc>,
    pub sales: Vec<SaleLineDto>,
    /// Derived from the lines; never stored.
    pub total_price: f64,
}

/// One expanded sale line as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDto {
    pub item_id: String,
    pub item_name: String,
    pub amount_of: i64,
    /// Unit price in decimal currency units, frozen at time of sale.
    pub price: f64,
}

impl From<SaleWithItems> for SaleDto {
    fn from(sale: SaleWithItems) -> Self {
        let total_price = sale.total().to_decimal();
        SaleDto {
            id: sale.sale.id,
            customer_full_name: sale.sale.customer_name,
            customer_email: sale.sale.customer_email,
            phone_number: sale.sale.phone_number,
            salesman: sale.sale.salesman_id,
            created_at: sale.sale.created_at,
            sales: sale
                .lines
                .into_iter()
                .map(|line| SaleLineDto {
                    item_id: line.item_id,
                    item_name: line.item_name,
                    amount_of: line.quantity,
                    price: Money::from_cents(line.unit_price_cents).to_decimal(),
                })
                .collect(),
            total_price,
        }
    }
}

// =============================================================================
// Boundary Validation
// =============================================================================

/// Converts a wire body into a validated [`NewSaleRequest`].
///
/// Presence errors use wire field names so clients see the names they sent.
/// Value constraints (positive quantity, price range) run inside
/// `NewSaleRequest::validate` in the workflow.
fn into_request(body: CreateSaleBody) -> Result<NewSaleRequest, ApiError> {
    require_fields(&[
        ("customerFullName", body.customer_full_name.as_deref()),
        ("customerEmail", body.customer_email.as_deref()),
        ("phoneNumber", body.phone_number.as_deref()),
        ("salesman", body.salesman.as_deref()),
    ])?;

    let line_bodies = body.sales.unwrap_or_default();
    if line_bodies.is_empty() {
        return Err(ValidationError::Required {
            field: "sales".to_string(),
        }
        .into());
    }

    let mut lines = Vec::with_capacity(line_bodies.len());
    for line in line_bodies {
        let item_id = line
            .item_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ValidationError::Required {
                field: "itemId".to_string(),
            })?;
        let quantity = line.amount_of.ok_or_else(|| ValidationError::Required {
            field: "amountOf".to_string(),
        })?;
        let price = line.price.ok_or_else(|| ValidationError::Required {
            field: "price".to_string(),
        })?;

        lines.push(NewSaleLine {
            item_id,
            quantity,
            // The only decimal-to-cents conversion in the system.
            unit_price_cents: Money::from_decimal(price).cents(),
        });
    }

    Ok(NewSaleRequest {
        customer_name: body.customer_full_name.unwrap_or_default(),
        customer_email: body.customer_email.unwrap_or_default(),
        phone_number: body.phone_number.unwrap_or_default(),
        salesman_id: body.salesman.unwrap_or_default(),
        lines,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /sales` — create a sale through the workflow engine.
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSaleBody>,
) -> Result<(StatusCode, Json<SaleDto>), ApiError> {
    let request = into_request(body)?;
    let sale = state.db.workflow().create_sale(&request).await?;

    Ok((StatusCode::CREATED, Json(SaleDto::from(sale))))
}

/// `GET /sales` — all sales, newest first.
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SaleDto>>, ApiError> {
    let sales = state.db.sales().list_all().await?;
    Ok(Json(sales.into_iter().map(SaleDto::from).collect()))
}

/// `GET /sales/{saleId}` — a single sale with its lines.
pub async fn get_sale(
    State(state): State<Arc<AppState>>,
    Path(sale_id): Path<String>,
) -> Result<Json<SaleDto>, ApiError> {
    let sale = state
        .db
        .sales()
        .get_by_id(&sale_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &sale_id))?;

    Ok(Json(SaleDto::from(sale)))
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
    use bazaar_core::{Item, User, UserRole};
    use bazaar_db::{Database, DbConfig};

    async fn test_state() -> Arc<AppState> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ApiConfig::default();
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
        Arc::new(AppState { db, jwt })
    }

    async fn seed(state: &AppState) {
        let now = Utc::now();
        state
            .db
            .items()
            .insert(&Item {
                id: "item-1".to_string(),
                name: "Widget".to_string(),
                category: None,
                price_cents: 1000,
                stock: 10,
                sold_count: 0,
                description: None,
                image_url: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        state
            .db
            .users()
            .insert(&User {
                id: "user-1".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
                role: UserRole::User,
                created_at: now,
            })
            .await
            .unwrap();
    }

    fn body(qty: i64, price: f64) -> CreateSaleBody {
        CreateSaleBody {
            sales: Some(vec![SaleLineBody {
                item_id: Some("item-1".to_string()),
                amount_of: Some(qty),
                price: Some(price),
            }]),
            customer_full_name: Some("Ada Lovelace".to_string()),
            customer_email: Some("ada@example.com".to_string()),
            phone_number: Some("555-0100".to_string()),
            salesman: Some("user-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_sale_returns_created_with_derived_total() {
        let state = test_state().await;
        seed(&state).await;

        let (status, Json(dto)) = create_sale(State(state.clone()), Json(body(4, 10.0)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(dto.sales.len(), 1);
        assert_eq!(dto.sales[0].item_name, "Widget");
        assert_eq!(dto.sales[0].amount_of, 4);
        assert!((dto.total_price - 40.0).abs() < f64::EPSILON);

        let item = state.db.items().get_by_id("item-1").await.unwrap().unwrap();
        assert_eq!(item.stock, 6);
    }

    #[tokio::test]
    async fn test_missing_fields_named_together() {
        let state = test_state().await;

        let mut b = body(1, 10.0);
        b.customer_full_name = None;
        b.phone_number = Some("  ".to_string()); // blank counts as missing

        let err = create_sale(State(state), Json(b)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(
            err.fields.as_deref(),
            Some(&["customerFullName".to_string(), "phoneNumber".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_empty_sales_rejected() {
        let state = test_state().await;

        let mut b = body(1, 10.0);
        b.sales = Some(vec![]);

        let err = create_sale(State(state), Json(b)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.fields.as_deref(), Some(&["sales".to_string()][..]));
    }

    #[tokio::test]
    async fn test_insufficient_stock_discloses_available() {
        let state = test_state().await;
        seed(&state).await;

        let err = create_sale(State(state.clone()), Json(body(11, 10.0)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.available, Some(10));

        let item = state.db.items().get_by_id("item-1").await.unwrap().unwrap();
        assert_eq!(item.stock, 10);
    }

    #[tokio::test]
    async fn test_unknown_salesman_is_404() {
        let state = test_state().await;
        seed(&state).await;

        let mut b = body(1, 10.0);
        b.salesman = Some("ghost".to_string());

        let err = create_sale(State(state), Json(b)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_get_sale_not_found() {
        let state = test_state().await;

        let err = get_sale(State(state), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_decimal_price_converted_once() {
        let state = test_state().await;
        seed(&state).await;

        let (_, Json(dto)) = create_sale(State(state.clone()), Json(body(3, 10.99)))
            .await
            .unwrap();

        // 3 × $10.99 = $32.97, exact in cents
        assert!((dto.total_price - 32.97).abs() < 1e-9);
        assert!((dto.sales[0].price - 10.99).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_list_sales_newest_first() {
        let state = test_state().await;
        seed(&state).await;

        let (_, Json(first)) = create_sale(State(state.clone()), Json(body(1, 10.0)))
            .await
            .unwrap();
        let (_, Json(second)) = create_sale(State(state.clone()), Json(body(2, 10.0)))
            .await
            .unwrap();

        let Json(sales) = list_sales(State(state)).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales[0].created_at >= sales[1].created_at);
        assert!(sales.iter().any(|s| s.id == first.id));
        assert!(sales.iter().any(|s| s.id == second.id));
    }
}
