//! # Repository Module
//!
//! Database repository implementations for Bazaar.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.items().get_by_id("item-1")                                │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, item)                                               │
//! │  ├── list(&self)                                                       │
//! │  └── adjust_stock(&self, ...)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The `*_tx` associated functions operate on a borrowed connection      │
//! │  instead of the pool, so the sale workflow can compose them inside     │
//! │  one transaction.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Catalog items and stock adjustments
//! - [`user::UserRepository`] - User accounts (salesmen)
//! - [`sale::SaleRepository`] - Sale and line item reads/inserts
//! - [`reporting::ReportRepository`] - Aggregated reporting queries

pub mod item;
pub mod reporting;
pub mod sale;
pub mod user;
