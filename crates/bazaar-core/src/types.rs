//! # Domain Types
//!
//! Core domain types used throughout Bazaar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Sale       │   │  SaleLineItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  item_id (FK)   │       │
//! │  │  name           │   │  customer_*     │   │  quantity       │       │
//! │  │  price_cents    │   │  salesman (FK)  │   │  unit_price     │       │
//! │  │  stock          │   │  created_at     │   │  (snapshot)     │       │
//! │  │  sold_count     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │ StockAdjustment │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id, name       │   │  item_id, user  │                             │
//! │  │  role           │   │  signed delta   │  ← audit trail, append-only │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A `Sale` exclusively owns its embedded line items; `Item` and `User` are
//! referenced by id, never owned - their lifetimes are independent and
//! longer-lived. Sales are append-only: once created they are never updated
//! or deleted; corrections happen via new compensating records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// User Role
// =============================================================================

/// The role of a user account.
///
/// Roles form a small closed set; the core only ever reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account (salesman).
    User,
    /// Administrative account (reporting access).
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Category reference (free-text name; the category tree itself is
    /// managed outside the core).
    pub category: Option<String>,

    /// Current price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units currently in stock. Never negative - enforced both by a DB
    /// CHECK constraint and by the conditional decrement in the store.
    pub stock: i64,

    /// Cumulative units sold. Monotonically non-decreasing.
    pub sold_count: i64,

    /// Optional long description.
    pub description: Option<String>,

    /// Optional image reference.
    pub image_url: Option<String>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Returns the current price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units could be sold from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account. Inside the sale workflow, users only appear as salesmen:
/// the core verifies existence and reads display names for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name for reports (first + last).
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction (ledger entry).
///
/// Note the absence of a `total` field: the total is always derived from the
/// line items (see [`SaleWithItems::total`]) so it can never drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub phone_number: String,
    /// References an existing User at creation time.
    pub salesman_id: String,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern: the unit price is frozen at time of sale,
/// independent of the item's current catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub item_id: String,
    /// Quantity sold. Always positive.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A sale line expanded with current item details for client convenience
/// (the read-after-write join performed when returning a sale).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineDetail {
    pub item_id: String,
    /// Item display name at read time.
    pub item_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleLineDetail {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// A sale together with its expanded line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithItems {
    pub sale: Sale,
    pub lines: Vec<SaleLineDetail>,
}

impl SaleWithItems {
    /// Derived total: the sum over line items of quantity × unit price.
    ///
    /// This is a pure function of the lines - the total is never stored, so
    /// it cannot drift from the line items.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total())
    }
}

// =============================================================================
// Stock Adjustment (audit trail)
// =============================================================================

/// An append-only audit record written whenever stock changes outside of a
/// sale (e.g. a manual restock). Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockAdjustment {
    pub id: String,
    pub item_id: String,
    /// The user who performed the adjustment.
    pub user_id: String,
    /// Signed quantity delta (positive = restock, negative = correction).
    pub delta: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Request (validated input)
// =============================================================================

/// One requested line of a new sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSaleLine {
    pub item_id: String,
    pub quantity: i64,
    /// Unit price trusted from the request - a historical snapshot, NOT
    /// re-derived from the item's current catalog price.
    pub unit_price_cents: i64,
}

/// A validated sale request, constructed once at the HTTP boundary before
/// the workflow engine is invoked. Field presence has already been checked;
/// value constraints are enforced by [`NewSaleRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSaleRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub phone_number: String,
    pub salesman_id: String,
    pub lines: Vec<NewSaleLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
