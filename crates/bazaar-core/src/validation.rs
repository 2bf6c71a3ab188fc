//! # Validation Module
//!
//! Request validation and in-request stock accounting for Bazaar.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (apps/api)                                     │
//! │  ├── Field presence: every absent field enumerated in one error        │
//! │  └── DTO → NewSaleRequest construction (cents conversion)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure rules)                                     │
//! │  ├── Non-empty line list, positive quantities, non-negative prices     │
//! │  └── StockReservation: cumulative per-item stock accounting            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Conditional decrement: UPDATE ... WHERE stock >= qty              │
//! │                                                                         │
//! │  Defense in depth: each layer catches a different failure class        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, ValidationError};
use crate::types::NewSaleRequest;
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Required-Field Enumeration
// =============================================================================

/// Checks a set of named fields for presence, naming EVERY absent field.
///
/// A field counts as missing when it is `None` or blank after trimming.
/// The caller supplies wire-level field names so the resulting error is
/// meaningful to the client.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::require_fields;
///
/// let err = require_fields(&[
///     ("customerFullName", Some("Ada")),
///     ("customerEmail", None),
///     ("phoneNumber", Some("  ")),
/// ])
/// .unwrap_err();
/// assert_eq!(err.to_string(), "Missing required fields: customerEmail, phoneNumber");
/// ```
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> ValidationResult<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.map(str::trim).filter(|v| !v.is_empty()).is_none())
        .map(|(name, _)| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

// =============================================================================
// Sale Request Rules
// =============================================================================

impl NewSaleRequest {
    /// Validates the value constraints of a sale request.
    ///
    /// ## Rules
    /// - At least one line item
    /// - At most [`MAX_SALE_LINES`] lines
    /// - Every quantity positive and at most [`MAX_LINE_QUANTITY`]
    /// - Every unit price non-negative
    ///
    /// Field presence has already been handled at the boundary via
    /// [`require_fields`]; existence checks against the catalog and the
    /// identity store belong to the workflow engine, which owns the
    /// transaction.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "sales".to_string(),
            });
        }

        if self.lines.len() > MAX_SALE_LINES {
            return Err(ValidationError::OutOfRange {
                field: "sales".to_string(),
                min: 1,
                max: MAX_SALE_LINES as i64,
            });
        }

        for line in &self.lines {
            if line.item_id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "itemId".to_string(),
                });
            }
            validate_quantity(line.quantity)?;
            validate_price_cents(line.unit_price_cents)?;
        }

        Ok(())
    }
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amountOf".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "amountOf".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// In-Request Stock Reservation
// =============================================================================

/// Accumulates pending stock decrements while validating a single request.
///
/// ## Why This Exists
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cross-line stock accounting                                            │
/// │                                                                         │
/// │  Item I1 has stock = 5.  Request: [ {I1, qty 3}, {I1, qty 3} ]          │
/// │                                                                         │
/// │  ❌ WRONG: validate each line against raw stock                         │
/// │     line 1: 3 <= 5 OK    line 2: 3 <= 5 OK    → oversell by 1          │
/// │                                                                         │
/// │  ✅ CORRECT: validate against stock minus pending decrements            │
/// │     line 1: 3 <= 5 OK (pending 3)                                       │
/// │     line 2: 3 <= 5 - 3 = 2 FAIL → InsufficientStock { available: 2 }    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// The workflow engine reserves each line in request order, then applies the
/// accumulated per-item totals as conditional decrements at the store.
#[derive(Debug, Default)]
pub struct StockReservation {
    // item id → quantity already reserved by earlier lines of this request
    pending: HashMap<String, i64>,
    // item ids in first-seen order, so decrements apply deterministically
    order: Vec<String>,
}

impl StockReservation {
    /// Creates an empty reservation.
    pub fn new() -> Self {
        StockReservation::default()
    }

    /// Reserves `quantity` units of an item, given the item's stock as read
    /// at the start of the request.
    ///
    /// Fails with [`CoreError::InsufficientStock`] when the quantity exceeds
    /// the effective remaining stock (`stock - already reserved`). The
    /// reported `available` is that effective remainder.
    pub fn reserve(&mut self, item_id: &str, stock: i64, quantity: i64) -> Result<(), CoreError> {
        let reserved = self.pending.get(item_id).copied().unwrap_or(0);
        let available = stock - reserved;

        if quantity > available {
            return Err(CoreError::InsufficientStock {
                item_id: item_id.to_string(),
                available,
                requested: quantity,
            });
        }

        if reserved == 0 {
            self.order.push(item_id.to_string());
        }
        *self.pending.entry(item_id.to_string()).or_insert(0) += quantity;
        Ok(())
    }

    /// Total quantity reserved for an item so far.
    pub fn reserved(&self, item_id: &str) -> i64 {
        self.pending.get(item_id).copied().unwrap_or(0)
    }

    /// Iterates (item id, total reserved quantity) in first-seen order.
    pub fn totals(&self) -> impl Iterator<Item = (&str, i64)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.pending[id]))
    }

    /// True when nothing has been reserved.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewSaleLine;

    fn request_with_lines(lines: Vec<NewSaleLine>) -> NewSaleRequest {
        NewSaleRequest {
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            phone_number: "555-0100".to_string(),
            salesman_id: "user-1".to_string(),
            lines,
        }
    }

    #[test]
    fn test_require_fields_enumerates_every_missing_field() {
        let err = require_fields(&[
            ("customerFullName", None),
            ("customerEmail", Some("ada@example.com")),
            ("phoneNumber", Some("   ")),
            ("salesman", None),
        ])
        .unwrap_err();

        match err {
            ValidationError::MissingFields { fields } => {
                assert_eq!(fields, vec!["customerFullName", "phoneNumber", "salesman"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_fields_all_present() {
        assert!(require_fields(&[("a", Some("x")), ("b", Some("y"))]).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_request_requires_at_least_one_line() {
        let req = request_with_lines(vec![]);
        assert!(matches!(
            req.validate(),
            Err(ValidationError::Required { ref field }) if field == "sales"
        ));
    }

    #[test]
    fn test_request_rejects_non_positive_quantity() {
        let req = request_with_lines(vec![NewSaleLine {
            item_id: "item-1".to_string(),
            quantity: 0,
            unit_price_cents: 100,
        }]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_rejects_negative_price() {
        let req = request_with_lines(vec![NewSaleLine {
            item_id: "item-1".to_string(),
            quantity: 1,
            unit_price_cents: -1,
        }]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_accepts_valid_lines() {
        let req = request_with_lines(vec![
            NewSaleLine {
                item_id: "item-1".to_string(),
                quantity: 2,
                unit_price_cents: 250,
            },
            NewSaleLine {
                item_id: "item-2".to_string(),
                quantity: 1,
                unit_price_cents: 0,
            },
        ]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_reservation_single_line() {
        let mut res = StockReservation::new();
        assert!(res.reserve("item-1", 10, 4).is_ok());
        assert_eq!(res.reserved("item-1"), 4);
    }

    #[test]
    fn test_reservation_cumulative_same_item() {
        let mut res = StockReservation::new();
        // stock 5: 3 fits, then only 2 remain
        assert!(res.reserve("item-1", 5, 3).is_ok());
        let err = res.reserve("item-1", 5, 3).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        // the failed line must not have changed the reservation
        assert_eq!(res.reserved("item-1"), 3);
    }

    #[test]
    fn test_reservation_exact_fit_across_lines() {
        let mut res = StockReservation::new();
        assert!(res.reserve("item-1", 5, 3).is_ok());
        assert!(res.reserve("item-1", 5, 2).is_ok());
        assert_eq!(res.reserved("item-1"), 5);
    }

    #[test]
    fn test_reservation_totals_in_first_seen_order() {
        let mut res = StockReservation::new();
        res.reserve("b", 10, 1).unwrap();
        res.reserve("a", 10, 2).unwrap();
        res.reserve("b", 10, 3).unwrap();

        let totals: Vec<(String, i64)> = res
            .totals()
            .map(|(id, qty)| (id.to_string(), qty))
            .collect();
        assert_eq!(totals, vec![("b".to_string(), 4), ("a".to_string(), 2)]);
    }

    #[test]
    fn test_reservation_independent_items() {
        let mut res = StockReservation::new();
        assert!(res.reserve("item-1", 2, 2).is_ok());
        // item-2 is unaffected by item-1's reservation
        assert!(res.reserve("item-2", 1, 1).is_ok());
    }
}
