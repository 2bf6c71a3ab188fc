//! # bazaar-db: Database Layer for Bazaar
//!
//! This crate provides database access for the Bazaar backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Data Flow                                 │
//! │                                                                         │
//! │  HTTP Handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bazaar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │   (item.rs,   │    │  (embedded)  │  │   │
//! │  │   │               │    │    sale.rs,   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│    user.rs,   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ reporting.rs) │    │              │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │          ▲                                                      │   │
//! │  │          │    ┌────────────────────────────┐                   │   │
//! │  │          └────│  SaleWorkflow (workflow.rs)│                   │   │
//! │  │               │  validate → reserve →      │                   │   │
//! │  │               │  decrement → commit        │                   │   │
//! │  │               └────────────────────────────┘                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (item, user, sale, reporting)
//! - [`workflow`] - The transactional create-sale workflow
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/bazaar.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let item = db.items().get_by_id("item-1").await?;
//!
//! // Run the sale workflow
//! let sale = db.workflow().create_sale(&request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use workflow::{SaleWorkflow, WorkflowError};

// Repository re-exports for convenience
pub use repository::item::ItemRepository;
pub use repository::reporting::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
