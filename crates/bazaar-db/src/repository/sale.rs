//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Sale Ledger
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Ledger                                      │
//! │                                                                         │
//! │  Sales are append-only. Inserts happen exclusively inside the sale     │
//! │  workflow transaction (workflow.rs), which is why this repository      │
//! │  exposes inserts only as `*_tx` functions over a borrowed connection.  │
//! │                                                                         │
//! │  Reads always return a sale WITH its line items, joined with current   │
//! │  item names, and the total is derived from the lines at read time.     │
//! │  There is no stored total to drift.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use bazaar_core::{Sale, SaleLineDetail, SaleLineItem, SaleWithItems};

/// Columns selected for a [`Sale`] row, in struct field order.
const SALE_COLUMNS: &str =
    "id, customer_name, customer_email, phone_number, salesman_id, created_at";

/// Join producing [`SaleLineDetail`] rows for one sale, in line insert order.
const LINES_FOR_SALE: &str = r#"
    SELECT si.item_id, i.name AS item_name, si.quantity, si.unit_price_cents
    FROM sale_items si
    JOIN items i ON i.id = si.item_id
    WHERE si.sale_id = ?1
    ORDER BY si.created_at, si.id
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale with its line items by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleWithItems>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(sale) = sale else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, SaleLineDetail>(LINES_FOR_SALE)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(SaleWithItems { sale, lines }))
    }

    /// Lists all sales with their line items, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<SaleWithItems>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(sales.len());
        for sale in sales {
            let lines = sqlx::query_as::<_, SaleLineDetail>(LINES_FOR_SALE)
                .bind(&sale.id)
                .fetch_all(&self.pool)
                .await?;
            result.push(SaleWithItems { sale, lines });
        }

        Ok(result)
    }

    // =========================================================================
    // Transaction-scoped operations (used by the sale workflow)
    // =========================================================================

    /// Inserts a sale row on a borrowed connection.
    pub async fn insert_tx(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, salesman_id = %sale.salesman_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_name, customer_email, phone_number,
                salesman_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_email)
        .bind(&sale.phone_number)
        .bind(&sale.salesman_id)
        .bind(sale.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts a sale line item on a borrowed connection.
    ///
    /// ## Snapshot Pattern
    /// The line carries the unit price frozen at time of sale; it is never
    /// re-derived from the item's current catalog price.
    pub async fn insert_line_tx(
        conn: &mut SqliteConnection,
        line: &SaleLineItem,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, item_id, quantity, unit_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(&line.item_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
