//! # Sale Workflow Engine
//!
//! The transactional create-sale workflow.
//!
//! ## Workflow Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Create Sale Workflow                                │
//! │                                                                         │
//! │  1. VALIDATE (pure, bazaar-core)                                       │
//! │     └── request.validate() - shape and value constraints               │
//! │                                                                         │
//! │  2. BEGIN IMMEDIATE (write transaction, serializes with other writers) │
//! │                                                                         │
//! │  3. RESERVE per line, in request order                                 │
//! │     ├── fetch item            → ItemNotFound if missing                │
//! │     └── reservation.reserve() → InsufficientStock if over available    │
//! │         (pending decrements from earlier lines of the SAME request     │
//! │          count against availability)                                   │
//! │                                                                         │
//! │  4. CHECK SALESMAN            → SalesmanNotFound if missing            │
//! │                                                                         │
//! │  5. INSERT sale + line rows (price snapshot from the request)          │
//! │                                                                         │
//! │  6. APPLY DECREMENTS, one conditional UPDATE per distinct item         │
//! │     └── guard failed          → InsufficientStock, roll back           │
//! │                                                                         │
//! │  7. COMMIT                                                             │
//! │                                                                         │
//! │  8. READ BACK the sale with joined item names (derived total)          │
//! │                                                                         │
//! │  Any error before COMMIT rolls the whole transaction back: either      │
//! │  every effect of a sale happens or none does.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Re-check At Write Time
//! Step 3 validates against a read taken inside the write transaction, so
//! no other writer commits between read and write. Step 6 still enforces
//! the invariant in the UPDATE's WHERE clause, and the schema's CHECK
//! constraint backs both: stock never goes negative.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::item::ItemRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::user::UserRepository;
use bazaar_core::{
    CoreError, NewSaleRequest, Sale, SaleLineItem, SaleWithItems, StockReservation,
    ValidationError,
};

// =============================================================================
// Workflow Error
// =============================================================================

/// Errors produced by the sale workflow.
///
/// Merges business rule violations (from bazaar-core) with storage failures
/// so callers get one error type with both branches intact.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A business rule rejected the sale (unknown item, unknown salesman,
    /// insufficient stock, invalid request).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for WorkflowError {
    fn from(err: sqlx::Error) -> Self {
        WorkflowError::Db(DbError::from(err))
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

// =============================================================================
// Sale Workflow
// =============================================================================

/// The sale workflow engine.
///
/// Owns no state beyond the pool; construct per call via
/// [`Database::workflow`](crate::Database::workflow).
#[derive(Debug, Clone)]
pub struct SaleWorkflow {
    pool: SqlitePool,
}

impl SaleWorkflow {
    /// Creates a new SaleWorkflow.
    pub fn new(pool: SqlitePool) -> Self {
        SaleWorkflow { pool }
    }

    /// Creates a sale from a validated request, atomically.
    ///
    /// ## Returns
    /// The persisted sale read back with joined item names, so the response
    /// reflects exactly what was committed.
    ///
    /// ## Errors
    /// * `Core(Validation)` - the request shape or values are invalid
    /// * `Core(ItemNotFound)` - a line references an unknown item
    /// * `Core(InsufficientStock)` - a line exceeds effective availability
    /// * `Core(SalesmanNotFound)` - the salesman id is unknown
    /// * `Db(_)` - storage failure
    ///
    /// On any error no sale row, line row, or stock change persists.
    pub async fn create_sale(&self, request: &NewSaleRequest) -> WorkflowResult<SaleWithItems> {
        // Pure validation first; nothing touches the database for a
        // malformed request.
        request.validate()?;

        debug!(
            salesman_id = %request.salesman_id,
            lines = request.lines.len(),
            "Starting sale workflow"
        );

        // BEGIN IMMEDIATE takes the write lock up front. Concurrent writers
        // serialize here instead of taking a deferred read snapshot that the
        // later conditional UPDATE cannot upgrade; the loser waits, then sees
        // the committed stock and reports InsufficientStock rather than a
        // busy-snapshot database error.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        // Reserve stock per line, in request order. The reservation tracks
        // pending decrements so a later line for the same item sees the
        // remaining availability, not the raw stock.
        let mut reservation = StockReservation::new();
        for line in &request.lines {
            let item = ItemRepository::get_by_id_tx(tx.as_mut(), &line.item_id)
                .await?
                .ok_or_else(|| CoreError::ItemNotFound(line.item_id.clone()))?;

            reservation.reserve(&line.item_id, item.stock, line.quantity)?;
        }

        // Salesman check runs after stock checks, matching the order in
        // which clients expect rejections to surface.
        if !UserRepository::exists_tx(tx.as_mut(), &request.salesman_id).await? {
            return Err(CoreError::SalesmanNotFound(request.salesman_id.clone()).into());
        }

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let sale = Sale {
            id: sale_id.clone(),
            customer_name: request.customer_name.clone(),
            customer_email: request.customer_email.clone(),
            phone_number: request.phone_number.clone(),
            salesman_id: request.salesman_id.clone(),
            created_at: now,
        };
        SaleRepository::insert_tx(tx.as_mut(), &sale).await?;

        // One line row per request line, price snapshot taken from the
        // request (never re-derived from the catalog).
        for line in &request.lines {
            let row = SaleLineItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                item_id: line.item_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                created_at: now,
            };
            SaleRepository::insert_line_tx(tx.as_mut(), &row).await?;
        }

        // One conditional decrement per distinct item, with per-item totals
        // accumulated across lines. The WHERE guard re-enforces the stock
        // invariant at write time.
        for (item_id, quantity) in reservation.totals() {
            let applied =
                ItemRepository::decrement_stock_tx(tx.as_mut(), item_id, quantity).await?;

            if !applied {
                let available = ItemRepository::get_by_id_tx(tx.as_mut(), item_id)
                    .await?
                    .map(|item| item.stock)
                    .unwrap_or(0);

                return Err(CoreError::InsufficientStock {
                    item_id: item_id.to_string(),
                    available,
                    requested: quantity,
                }
                .into());
            }
        }

        tx.commit().await?;

        info!(
            id = %sale_id,
            salesman_id = %request.salesman_id,
            lines = request.lines.len(),
            "Sale created"
        );

        // Read-after-write: the response is what the database now holds.
        self.read_back(&sale_id).await
    }

    async fn read_back(&self, sale_id: &str) -> WorkflowResult<SaleWithItems> {
        let sale = SaleRepository::new(self.pool.clone())
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
