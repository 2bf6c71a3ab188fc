//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bazaar-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── WorkflowError    - CoreError | DbError during create-sale         │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What clients see, mapped to status codes       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → WorkflowError → ApiError → 4xx/5xx│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, available stock, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every variant carries enough structure for the HTTP boundary to pick
//!    a status code and build a machine-checkable body

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations during the sale workflow.
/// The workflow never swallows them - each one reaches the HTTP boundary
/// with its structured detail intact.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item references an item id that does not resolve.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The salesman id does not resolve to an existing user.
    #[error("Salesman not found: {0}")]
    SalesmanNotFound(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Requested quantity exceeds the item's effective available stock.
    ///
    /// ## Note on `available`
    /// Within one request, `available` already accounts for decrements
    /// pending from earlier lines of the same request, so a second line for
    /// the same item sees the remaining stock, not the raw stock.
    #[error("Insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a request doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more required fields are missing or empty.
    /// Every absent field is named, not just the first one found.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            item_id: "item-42".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for item item-42: available 3, requested 5"
        );
    }

    #[test]
    fn test_missing_fields_names_every_field() {
        let err = ValidationError::MissingFields {
            fields: vec!["customerFullName".to_string(), "phoneNumber".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: customerFullName, phoneNumber"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sales".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
