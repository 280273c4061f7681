//! Order Model

use serde::{Deserialize, Serialize};
use shared::{Comment, OrderState, OrderStatus, ServiceItem};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order entity as stored in the `order` table.
///
/// `user_id` is set once at creation and never mutated; every repository
/// query is scoped by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub lab: String,
    pub patient: String,
    pub customer: String,
    pub services: Vec<ServiceItem>,
    pub state: OrderState,
    pub status: OrderStatus,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Record id in "order:key" string form. Empty only for unsaved values.
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub lab: String,
    pub patient: String,
    pub customer: String,
    pub services: Vec<ServiceItem>,
}

/// Update order payload (partial; omitted fields are left unchanged)
///
/// `state` is carried only so the service can reject any attempt to change
/// it through a general update; state moves exclusively via the advance
/// operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<OrderState>,
}

/// Workflow-position projection of an order (`GET /orders/{id}/status`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusView {
    pub id: String,
    pub state: OrderState,
    pub status: OrderStatus,
}

impl From<&Order> for OrderStatusView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id_string(),
            state: order.state,
            status: order.status,
        }
    }
}
