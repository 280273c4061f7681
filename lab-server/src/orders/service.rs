//! Order Service
//!
//! The single entry point for order operations. Checks run in a fixed
//! order: role policy, then input validation, then the ownership-scoped
//! load, then state rules, then persistence. Handlers construct it per
//! request with the repository injected, so tests can run the full service
//! against an in-memory store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::{can_advance, next_state, STATE_SEQUENCE};
use shared::{Comment, OrderState, PaginatedResponse, ServiceItem};

use crate::auth::CurrentUser;
use crate::db::models::{CreateOrderRequest, Order, OrderStatusView, UpdateOrderRequest};
use crate::db::repository::OrderRepository;
use crate::orders::policy::{self, OrderAction};
use crate::orders::query::OrderListQuery;
use crate::utils::validation::{
    validate_comment, validate_service, validate_services, validate_text, MIN_LAB_LEN,
    MIN_PERSON_NAME_LEN,
};
use crate::utils::{AppError, AppResult};

const ORDER_NOT_FOUND: &str = "Order not found";

/// Per-state aggregate for `GET /api/orders/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStateStats {
    pub state: OrderState,
    pub count: u64,
    #[serde(rename = "totalValue")]
    pub total_value: Decimal,
}

pub struct OrderService {
    repo: OrderRepository,
}

impl OrderService {
    pub fn new(repo: OrderRepository) -> Self {
        Self { repo }
    }

    /// Create an order owned by the caller, `state = CREATED`,
    /// `status = ACTIVE`.
    pub async fn create(&self, user: &CurrentUser, req: CreateOrderRequest) -> AppResult<Order> {
        policy::authorize(&user.role, OrderAction::Create)?;

        validate_text(&req.lab, "lab", MIN_LAB_LEN)?;
        validate_text(&req.patient, "patient", MIN_PERSON_NAME_LEN)?;
        validate_text(&req.customer, "customer", MIN_PERSON_NAME_LEN)?;
        validate_services(&req.services)?;

        let order = self.repo.create(&user.id, req).await?;
        tracing::info!(order_id = %order.id_string(), user_id = %user.id, "Order created");
        Ok(order)
    }

    /// Filtered, sorted, paginated listing of the caller's own orders.
    pub async fn list(
        &self,
        user: &CurrentUser,
        query: OrderListQuery,
    ) -> AppResult<PaginatedResponse<Order>> {
        policy::authorize(&user.role, OrderAction::Read)?;

        let page = query.page();
        let limit = query.limit();
        let (orders, total) = self.repo.find(&user.id, query.into_filter()).await?;
        Ok(PaginatedResponse::new(orders, page, limit, total))
    }

    /// Fetch one order. A foreign id and a missing id produce the same
    /// `NotFound`; existence is never leaked across owners.
    pub async fn get(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        policy::authorize(&user.role, OrderAction::Read)?;
        self.load(user, id).await
    }

    /// Workflow-position projection of one order.
    pub async fn get_status(&self, user: &CurrentUser, id: &str) -> AppResult<OrderStatusView> {
        let order = self.get(user, id).await?;
        Ok(OrderStatusView::from(&order))
    }

    /// Partial update of descriptive fields. The workflow state is not
    /// reachable from here.
    pub async fn update(
        &self,
        user: &CurrentUser,
        id: &str,
        patch: UpdateOrderRequest,
    ) -> AppResult<Order> {
        policy::authorize(&user.role, OrderAction::Update)?;

        if patch.state.is_some() {
            return Err(AppError::invalid_request(
                "state is not mutable via update; use the advance operation",
            ));
        }
        if let Some(lab) = &patch.lab {
            validate_text(lab, "lab", MIN_LAB_LEN)?;
        }
        if let Some(patient) = &patch.patient {
            validate_text(patient, "patient", MIN_PERSON_NAME_LEN)?;
        }
        if let Some(customer) = &patch.customer {
            validate_text(customer, "customer", MIN_PERSON_NAME_LEN)?;
        }
        if let Some(services) = &patch.services {
            validate_services(services)?;
        }

        self.repo
            .update(&user.id, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(ORDER_NOT_FOUND))
    }

    /// Soft delete: the order is marked `DELETED` and disappears from
    /// default listings and lookups.
    pub async fn delete(&self, user: &CurrentUser, id: &str) -> AppResult<()> {
        policy::authorize(&user.role, OrderAction::Delete)?;

        if !self.repo.soft_delete(&user.id, id).await? {
            return Err(AppError::not_found(ORDER_NOT_FOUND));
        }
        tracing::info!(order_id = %id, user_id = %user.id, "Order deleted");
        Ok(())
    }

    /// Advance the order one stage along `CREATED → ANALYSIS → COMPLETED`.
    ///
    /// The write is conditional on the state still being the one loaded, so
    /// two concurrent advances cannot both succeed on the same stage.
    pub async fn advance(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        policy::authorize(&user.role, OrderAction::Advance)?;

        let order = self.load(user, id).await?;
        let next = next_state(order.state).map_err(|_| AppError::FinalStateReached)?;

        match self.repo.advance_state(&user.id, id, order.state, next).await? {
            Some(updated) => {
                tracing::info!(
                    order_id = %updated.id_string(),
                    user_id = %user.id,
                    from = ?order.state,
                    to = ?updated.state,
                    "Order state advanced"
                );
                Ok(updated)
            }
            None => {
                // The conditional write missed: the order moved (or vanished)
                // underneath us. Reload to report the true cause.
                let current = self.load(user, id).await?;
                if can_advance(current.state) {
                    Err(AppError::conflict("order state changed concurrently"))
                } else {
                    Err(AppError::FinalStateReached)
                }
            }
        }
    }

    /// Append a priced service line item. Rejected on completed orders.
    pub async fn add_service(
        &self,
        user: &CurrentUser,
        id: &str,
        service: ServiceItem,
    ) -> AppResult<Order> {
        policy::authorize(&user.role, OrderAction::AddService)?;
        validate_service(&service)?;

        let order = self.load(user, id).await?;
        if order.state == OrderState::Completed {
            return Err(AppError::validation(
                "cannot add a service to a completed order",
            ));
        }

        // The repository re-checks the completed guard inside the write
        // condition; a concurrent advance surfaces here as a miss.
        match self.repo.add_service(&user.id, id, service).await? {
            Some(updated) => Ok(updated),
            None => Err(AppError::validation(
                "cannot add a service to a completed order",
            )),
        }
    }

    /// Append a free-text comment.
    pub async fn add_comment(
        &self,
        user: &CurrentUser,
        id: &str,
        comment: Comment,
    ) -> AppResult<Order> {
        policy::authorize(&user.role, OrderAction::AddComment)?;
        validate_comment(&comment)?;

        // Ensures the NotFound path before the write
        self.load(user, id).await?;

        self.repo
            .add_comment(&user.id, id, comment)
            .await?
            .ok_or_else(|| AppError::not_found(ORDER_NOT_FOUND))
    }

    /// Per-state order count and summed service value over the caller's
    /// active orders. All three workflow states appear, zeroed when empty.
    pub async fn stats(&self, user: &CurrentUser) -> AppResult<Vec<OrderStateStats>> {
        policy::authorize(&user.role, OrderAction::Stats)?;

        let rows = self.repo.state_value_rows(&user.id).await?;

        let mut stats: Vec<OrderStateStats> = STATE_SEQUENCE
            .iter()
            .map(|&state| OrderStateStats {
                state,
                count: 0,
                total_value: Decimal::ZERO,
            })
            .collect();

        for row in rows {
            if let Some(entry) = stats.iter_mut().find(|s| s.state == row.state) {
                entry.count += 1;
                entry.total_value += row.total;
            }
        }

        Ok(stats)
    }

    async fn load(&self, user: &CurrentUser, id: &str) -> AppResult<Order> {
        self.repo
            .find_by_id(&user.id, id)
            .await?
            .ok_or_else(|| AppError::not_found(ORDER_NOT_FOUND))
    }
}
