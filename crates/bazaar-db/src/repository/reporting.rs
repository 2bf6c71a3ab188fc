//! # Reporting Repository
//!
//! Read-only aggregation queries over the sale ledger and catalog.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Reporting Aggregation                               │
//! │                                                                         │
//! │  All reports are computed by SQL aggregation at query time.            │
//! │  Nothing is precomputed or cached; the sale ledger plus the catalog    │
//! │  is the single source of truth, so reports can never disagree with    │
//! │  the data they summarize.                                              │
//! │                                                                         │
//! │  top_items        SUM(quantity), SUM(quantity × unit_price) per item  │
//! │  top_salesmen     COUNT(sales), revenue per salesman                   │
//! │  revenue_by_year  revenue grouped by calendar year of sale            │
//! │  stock_levels     current stock per item, lowest first                 │
//! │                                                                         │
//! │  Revenue always uses the frozen line item price, never the item's     │
//! │  current catalog price.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;

// =============================================================================
// Report Row Types
// =============================================================================

/// One row of the top-selling-items report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopItemRow {
    pub item_id: String,
    pub name: String,
    /// Total units sold across all sales.
    pub total_sold: i64,
    /// Revenue in cents, from frozen line item prices.
    pub revenue_cents: i64,
}

/// One row of the top-salesmen report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopSalesmanRow {
    pub salesman_id: String,
    /// Display name (first + last).
    pub name: String,
    /// Number of sales recorded by this salesman.
    pub sales_count: i64,
    pub revenue_cents: i64,
}

/// One row of the revenue-by-year report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct YearRevenueRow {
    /// Calendar year of the sale timestamp (UTC).
    pub year: i64,
    pub revenue_cents: i64,
}

/// One row of the stock level listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockLevelRow {
    pub item_id: String,
    pub name: String,
    pub stock: i64,
}

// =============================================================================
// Report Repository
// =============================================================================

/// Repository for reporting queries. Strictly read-only.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Top selling items by revenue, descending. At most 10 rows.
    ///
    /// Items that have never sold do not appear. An empty ledger yields an
    /// empty report, not an error.
    pub async fn top_items(&self) -> DbResult<Vec<TopItemRow>> {
        let rows = sqlx::query_as::<_, TopItemRow>(
            r#"
            SELECT
                si.item_id,
                i.name,
                SUM(si.quantity) AS total_sold,
                SUM(si.quantity * si.unit_price_cents) AS revenue_cents
            FROM sale_items si
            JOIN items i ON i.id = si.item_id
            GROUP BY si.item_id, i.name
            ORDER BY revenue_cents DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Salesmen ranked by revenue, descending. No limit.
    pub async fn top_salesmen(&self) -> DbResult<Vec<TopSalesmanRow>> {
        let rows = sqlx::query_as::<_, TopSalesmanRow>(
            r#"
            SELECT
                s.salesman_id,
                u.first_name || ' ' || u.last_name AS name,
                COUNT(DISTINCT s.id) AS sales_count,
                SUM(si.quantity * si.unit_price_cents) AS revenue_cents
            FROM sales s
            JOIN users u ON u.id = s.salesman_id
            JOIN sale_items si ON si.sale_id = s.id
            GROUP BY s.salesman_id, name
            ORDER BY revenue_cents DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue grouped by calendar year of the sale timestamp, ascending.
    pub async fn revenue_by_year(&self) -> DbResult<Vec<YearRevenueRow>> {
        let rows = sqlx::query_as::<_, YearRevenueRow>(
            r#"
            SELECT
                CAST(strftime('%Y', s.created_at) AS INTEGER) AS year,
                SUM(si.quantity * si.unit_price_cents) AS revenue_cents
            FROM sales s
            JOIN sale_items si ON si.sale_id = s.id
            GROUP BY year
            ORDER BY year
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Current stock per item, lowest stock first.
    ///
    /// Includes items with zero stock; an empty catalog yields an empty list.
    pub async fn stock_levels(&self) -> DbResult<Vec<StockLevelRow>> {
        let rows = sqlx::query_as::<_, StockLevelRow>(
            r#"
            SELECT id AS item_id, name, stock
            FROM items
            ORDER BY stock ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::repository::sale::SaleRepository;
    use bazaar_core::{Item, Sale, SaleLineItem, User, UserRole};
    use chrono::Utc;
    use uuid::Uuid;

    async fn seed_item(db: &Database, id: &str, name: &str, price_cents: i64, stock: i64) {
        let now = Utc::now();
        db.items()
            .insert(&Item {
                id: id.to_string(),
                name: name.to_string(),
                category: None,
                price_cents,
                stock,
                sold_count: 0,
                description: None,
                image_url: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    async fn seed_user(db: &Database, id: &str, first: &str, last: &str) {
        db.users()
            .insert(&User {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{id}@example.com"),
                role: UserRole::User,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    async fn record_sale(db: &Database, salesman: &str, item: &str, qty: i64, price: i64) {
        let now = Utc::now();
        let sale_id = Uuid::new_v4().to_string();
        let mut tx = db.pool().begin().await.unwrap();
        SaleRepository::insert_tx(
            &mut tx,
            &Sale {
                id: sale_id.clone(),
                customer_name: "Ada".to_string(),
                customer_email: "ada@example.com".to_string(),
                phone_number: "555-0100".to_string(),
                salesman_id: salesman.to_string(),
                created_at: now,
            },
        )
        .await
        .unwrap();
        SaleRepository::insert_line_tx(
            &mut tx,
            &SaleLineItem {
                id: Uuid::new_v4().to_string(),
                sale_id,
                item_id: item.to_string(),
                quantity: qty,
                unit_price_cents: price,
                created_at: now,
            },
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_top_items_aggregates_across_sales() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_user(&db, "user-1", "Grace", "Hopper").await;
        seed_item(&db, "item-1", "Widget", 1000, 100).await;
        seed_item(&db, "item-2", "Gadget", 500, 100).await;

        // Two sales of Widget at $10: 2 + 3 units
        record_sale(&db, "user-1", "item-1", 2, 1000).await;
        record_sale(&db, "user-1", "item-1", 3, 1000).await;
        record_sale(&db, "user-1", "item-2", 1, 500).await;

        let rows = db.reports().top_items().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_id, "item-1");
        assert_eq!(rows[0].total_sold, 5);
        assert_eq!(rows[0].revenue_cents, 5000);
        assert_eq!(rows[1].item_id, "item-2");
    }

    #[tokio::test]
    async fn test_revenue_uses_frozen_line_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_user(&db, "user-1", "Grace", "Hopper").await;
        // Catalog price is $99.99, but the sale was recorded at $10.00
        seed_item(&db, "item-1", "Widget", 9999, 100).await;
        record_sale(&db, "user-1", "item-1", 2, 1000).await;

        let rows = db.reports().top_items().await.unwrap();
        assert_eq!(rows[0].revenue_cents, 2000);
    }

    #[tokio::test]
    async fn test_top_salesmen() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_user(&db, "user-1", "Grace", "Hopper").await;
        seed_user(&db, "user-2", "Alan", "Turing").await;
        seed_item(&db, "item-1", "Widget", 1000, 100).await;

        record_sale(&db, "user-1", "item-1", 1, 1000).await;
        record_sale(&db, "user-2", "item-1", 5, 1000).await;

        let rows = db.reports().top_salesmen().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].salesman_id, "user-2");
        assert_eq!(rows[0].name, "Alan Turing");
        assert_eq!(rows[0].sales_count, 1);
        assert_eq!(rows[0].revenue_cents, 5000);
    }

    #[tokio::test]
    async fn test_revenue_by_year_groups_current_year() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_user(&db, "user-1", "Grace", "Hopper").await;
        seed_item(&db, "item-1", "Widget", 1000, 100).await;
        record_sale(&db, "user-1", "item-1", 2, 1000).await;

        let rows = db.reports().revenue_by_year().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, Utc::now().format("%Y").to_string().parse::<i64>().unwrap());
        assert_eq!(rows[0].revenue_cents, 2000);
    }

    #[tokio::test]
    async fn test_stock_levels_lowest_first_and_empty_ok() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Empty catalog is an empty report, not an error
        assert!(db.reports().stock_levels().await.unwrap().is_empty());

        seed_item(&db, "item-1", "Widget", 1000, 7).await;
        seed_item(&db, "item-2", "Gadget", 500, 0).await;

        let rows = db.reports().stock_levels().await.unwrap();
        assert_eq!(rows[0].item_id, "item-2");
        assert_eq!(rows[0].stock, 0);
        assert_eq!(rows[1].item_id, "item-1");
    }

    #[tokio::test]
    async fn test_empty_ledger_reports_are_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.reports().top_items().await.unwrap().is_empty());
        assert!(db.reports().top_salesmen().await.unwrap().is_empty());
        assert!(db.reports().revenue_by_year().await.unwrap().is_empty());
    }
}
