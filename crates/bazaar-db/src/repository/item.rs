//! # Item Repository
//!
//! Database operations for catalog items and stock adjustments.
//!
//! ## The Stock Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock never goes negative. Every stock write is conditional:          │
//! │                                                                         │
//! │    UPDATE items SET stock = stock - N, ...                             │
//! │    WHERE id = ? AND stock >= N                                         │
//! │                                                                         │
//! │  rows_affected == 0 means the guard failed (or the item vanished),     │
//! │  never a silent partial write. The schema CHECK (stock >= 0) backs     │
//! │  this up as a last line of defense.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::{Item, StockAdjustment};

/// Columns selected for an [`Item`] row, in struct field order.
const ITEM_COLUMNS: &str = "id, name, category, price_cents, stock, sold_count, \
     description, image_url, created_at, updated_at";

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Gets an item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all items, name order.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a new item.
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, category, price_cents, stock, sold_count,
                description, image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.stock)
        .bind(item.sold_count)
        .bind(&item.description)
        .bind(&item.image_url)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a signed manual stock adjustment and records an audit row,
    /// atomically.
    ///
    /// ## Arguments
    /// * `item_id` - The item to adjust
    /// * `user_id` - The user performing the adjustment (for the audit trail)
    /// * `delta` - Signed quantity change (positive = restock)
    ///
    /// ## Errors
    /// * `NotFound` - The item does not exist
    /// * `CheckViolation` - The adjustment would take stock below zero
    pub async fn adjust_stock(
        &self,
        item_id: &str,
        user_id: &str,
        delta: i64,
    ) -> DbResult<Item> {
        debug!(item_id = %item_id, delta = delta, "Adjusting stock");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Conditional update: refuses to take stock negative.
        let result = sqlx::query(
            r#"
            UPDATE items SET
                stock = stock + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock + ?2 >= 0
            "#,
        )
        .bind(item_id)
        .bind(delta)
        .bind(now)
        .execute(tx.as_mut())
        .await?;

        if result.rows_affected() == 0 {
            // Disambiguate: missing item vs. guard failure.
            let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM items WHERE id = ?1")
                .bind(item_id)
                .fetch_optional(tx.as_mut())
                .await?;

            return match exists {
                None => Err(DbError::not_found("Item", item_id)),
                Some(_) => Err(DbError::CheckViolation {
                    message: format!("stock adjustment of {delta} would take item {item_id} below zero"),
                }),
            };
        }

        let adjustment = StockAdjustment {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
            delta,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO stock_adjustments (id, item_id, user_id, delta, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&adjustment.id)
        .bind(&adjustment.item_id)
        .bind(&adjustment.user_id)
        .bind(adjustment.delta)
        .bind(adjustment.created_at)
        .execute(tx.as_mut())
        .await?;

        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(item_id)
        .fetch_one(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Lists the audit trail for an item, newest first.
    pub async fn adjustments(&self, item_id: &str) -> DbResult<Vec<StockAdjustment>> {
        let rows = sqlx::query_as::<_, StockAdjustment>(
            r#"
            SELECT id, item_id, user_id, delta, created_at
            FROM stock_adjustments
            WHERE item_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    // Transaction-scoped operations (used by the sale workflow)
    // =========================================================================

    /// Gets an item by ID on a borrowed connection.
    pub async fn get_by_id_tx(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(item)
    }

    /// Applies a sale decrement on a borrowed connection.
    ///
    /// Decrements stock and increments sold_count in one conditional write.
    /// Returns `false` when the guard failed (insufficient stock at write
    /// time); the caller decides whether to roll back.
    pub async fn decrement_stock_tx(
        conn: &mut SqliteConnection,
        item_id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE items SET
                stock = stock - ?2,
                sold_count = sold_count + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn widget(id: &str, stock: i64) -> Item {
        let now = Utc::now();
        Item {
            id: id.to_string(),
            name: format!("Widget {id}"),
            category: Some("widgets".to_string()),
            price_cents: 1099,
            stock,
            sold_count: 0,
            description: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database, id: &str) {
        let user = bazaar_core::User {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{id}@example.com"),
            role: bazaar_core::UserRole::Admin,
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.items();

        repo.insert(&widget("item-1", 5)).await.unwrap();

        let found = repo.get_by_id("item-1").await.unwrap().unwrap();
        assert_eq!(found.name, "Widget item-1");
        assert_eq!(found.stock, 5);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_adjust_stock_writes_audit_row() {
        let db = test_db().await;
        let repo = db.items();
        seed_user(&db, "admin-1").await;

        repo.insert(&widget("item-1", 5)).await.unwrap();

        let updated = repo.adjust_stock("item-1", "admin-1", 7).await.unwrap();
        assert_eq!(updated.stock, 12);

        let audit = repo.adjustments("item-1").await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].delta, 7);
        assert_eq!(audit[0].user_id, "admin-1");
    }

    #[tokio::test]
    async fn test_adjust_stock_refuses_negative() {
        let db = test_db().await;
        let repo = db.items();
        seed_user(&db, "admin-1").await;

        repo.insert(&widget("item-1", 3)).await.unwrap();

        let err = repo.adjust_stock("item-1", "admin-1", -5).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        // Stock untouched, no audit row
        let item = repo.get_by_id("item-1").await.unwrap().unwrap();
        assert_eq!(item.stock, 3);
        assert!(repo.adjustments("item-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_stock_missing_item() {
        let db = test_db().await;
        seed_user(&db, "admin-1").await;

        let err = db
            .items()
            .adjust_stock("missing", "admin-1", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decrement_guard() {
        let db = test_db().await;
        let repo = db.items();

        repo.insert(&widget("item-1", 4)).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        // Within stock: succeeds
        assert!(ItemRepository::decrement_stock_tx(&mut conn, "item-1", 4)
            .await
            .unwrap());

        // Exhausted: guard refuses
        assert!(!ItemRepository::decrement_stock_tx(&mut conn, "item-1", 1)
            .await
            .unwrap());

        drop(conn);
        let item = repo.get_by_id("item-1").await.unwrap().unwrap();
        assert_eq!(item.stock, 0);
        assert_eq!(item.sold_count, 4);
    }
}
