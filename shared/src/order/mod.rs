//! Order domain value types
//!
//! The order entity itself lives in the server's `db::models` (it carries a
//! database record id); everything embedded in it (workflow state, soft-delete
//! status, service line items, comments) is defined here so clients can share
//! the wire representation.

mod state;

pub use state::{can_advance, next_state, TransitionError, STATE_SEQUENCE};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Workflow stage of an order. Advances only through
/// `CREATED → ANALYSIS → COMPLETED`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Created,
    Analysis,
    Completed,
}

/// Soft-delete marker, independent of the workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Active,
    Deleted,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Active
    }
}

/// Completion marker of a single service line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Pending,
    Done,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        ServiceStatus::Pending
    }
}

/// A priced line item within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub name: String,
    /// Monetary amount, must be > 0.
    pub value: Decimal,
    #[serde(default)]
    pub status: ServiceStatus,
}

/// Free-text annotation on an order. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
}
