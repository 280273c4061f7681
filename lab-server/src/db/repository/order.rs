//! Order Repository
//!
//! Every query binds the owning `user_id`; an order belonging to another
//! owner is indistinguishable from a missing one at this layer.

use serde::Deserialize;
use shared::{Comment, OrderState, OrderStatus, ServiceItem};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoResult};
use crate::db::models::{CreateOrderRequest, Order, UpdateOrderRequest};

/// Resolved list filter, produced by the query engine. `sort_field` and
/// `sort_dir` are whitelisted keywords, never raw user input.
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub state: Option<OrderState>,
    pub status: OrderStatus,
    pub patient_name: Option<String>,
    pub dentist_name: Option<String>,
    pub sort_field: &'static str,
    pub sort_dir: &'static str,
    pub start: u64,
    pub limit: u32,
}

/// Per-order stats row: workflow state plus summed service value.
#[derive(Debug, Clone, Deserialize)]
pub struct StateValueRow {
    pub state: OrderState,
    pub total: rust_decimal::Decimal,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse an id from the URL path. Accepts both the bare key and the
    /// full "order:key" form; anything else resolves to no record.
    fn parse_id(id: &str) -> Option<RecordId> {
        if id.contains(':') {
            id.parse::<RecordId>()
                .ok()
                .filter(|rid| rid.table() == "order")
        } else {
            Some(RecordId::from_table_key("order", id))
        }
    }

    /// Persist a new order with `state = CREATED`, `status = ACTIVE`.
    pub async fn create(&self, user_id: &str, data: CreateOrderRequest) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    user_id = $user_id,
                    lab = $lab,
                    patient = $patient,
                    customer = $customer,
                    services = $services,
                    state = $state,
                    status = $status,
                    comments = [],
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("lab", data.lab))
            .bind(("patient", data.patient))
            .bind(("customer", data.customer))
            .bind(("services", data.services))
            .bind(("state", OrderState::Created))
            .bind(("status", OrderStatus::Active))
            .bind(("now", now_millis()))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| super::RepoError::Database("Failed to create order".to_string()))
    }

    /// Find an active order by id, scoped to its owner.
    pub async fn find_by_id(&self, user_id: &str, id: &str) -> RepoResult<Option<Order>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order
                 WHERE id = $id AND user_id = $user_id AND status = 'ACTIVE'",
            )
            .bind(("id", record_id))
            .bind(("user_id", user_id.to_string()))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Filtered, sorted, paginated page plus the pre-pagination total.
    pub async fn find(&self, user_id: &str, filter: ListFilter) -> RepoResult<(Vec<Order>, u64)> {
        let mut conditions = vec!["user_id = $user_id", "status = $status"];
        if filter.state.is_some() {
            conditions.push("state = $state");
        }
        if filter.patient_name.is_some() {
            conditions
                .push("string::contains(string::lowercase(patient), string::lowercase($patient_name))");
        }
        if filter.dentist_name.is_some() {
            conditions
                .push("string::contains(string::lowercase(customer), string::lowercase($dentist_name))");
        }
        let where_sql = conditions.join(" AND ");

        // Secondary ORDER BY id keeps page boundaries stable across equal
        // sort keys.
        let data_sql = format!(
            "SELECT * FROM order WHERE {where_sql} \
             ORDER BY {} {}, id ASC LIMIT $limit START $start",
            filter.sort_field, filter.sort_dir
        );
        let count_sql = format!("SELECT count() AS total FROM order WHERE {where_sql} GROUP ALL");

        let mut result = self
            .base
            .db()
            .query(data_sql)
            .query(count_sql)
            .bind(("user_id", user_id.to_string()))
            .bind(("status", filter.status))
            .bind(("state", filter.state))
            .bind(("patient_name", filter.patient_name))
            .bind(("dentist_name", filter.dentist_name))
            .bind(("limit", filter.limit as i64))
            .bind(("start", filter.start as i64))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        let count: Option<CountRow> = result.take(1)?;
        Ok((orders, count.map(|c| c.total).unwrap_or(0)))
    }

    /// Partial update of the mutable descriptive fields. Returns `None`
    /// when no active order matched this owner and id.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        data: UpdateOrderRequest,
    ) -> RepoResult<Option<Order>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE order SET
                    lab = IF $has_lab THEN $lab ELSE lab END,
                    patient = IF $has_patient THEN $patient ELSE patient END,
                    customer = IF $has_customer THEN $customer ELSE customer END,
                    services = IF $has_services THEN $services ELSE services END,
                    updated_at = $now
                WHERE id = $id AND user_id = $user_id AND status = 'ACTIVE'
                RETURN AFTER"#,
            )
            .bind(("id", record_id))
            .bind(("user_id", user_id.to_string()))
            .bind(("has_lab", data.lab.is_some()))
            .bind(("lab", data.lab))
            .bind(("has_patient", data.patient.is_some()))
            .bind(("patient", data.patient))
            .bind(("has_customer", data.customer.is_some()))
            .bind(("customer", data.customer))
            .bind(("has_services", data.services.is_some()))
            .bind(("services", data.services))
            .bind(("now", now_millis()))
            .await?;

        Ok(result.take::<Vec<Order>>(0)?.into_iter().next())
    }

    /// Soft delete: mark the order `DELETED`. Returns false when no active
    /// order matched.
    pub async fn soft_delete(&self, user_id: &str, id: &str) -> RepoResult<bool> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(false);
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order SET status = 'DELETED', updated_at = $now
                 WHERE id = $id AND user_id = $user_id AND status = 'ACTIVE'
                 RETURN AFTER",
            )
            .bind(("id", record_id))
            .bind(("user_id", user_id.to_string()))
            .bind(("now", now_millis()))
            .await?;

        Ok(result.take::<Vec<Order>>(0)?.into_iter().next().is_some())
    }

    /// Conditional state transition: writes `to` only where the stored
    /// state still equals `from`. A lost race returns `None` instead of
    /// overwriting a concurrent advance.
    pub async fn advance_state(
        &self,
        user_id: &str,
        id: &str,
        from: OrderState,
        to: OrderState,
    ) -> RepoResult<Option<Order>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order SET state = $to, updated_at = $now
                 WHERE id = $id AND user_id = $user_id AND status = 'ACTIVE' AND state = $from
                 RETURN AFTER",
            )
            .bind(("id", record_id))
            .bind(("user_id", user_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("now", now_millis()))
            .await?;

        Ok(result.take::<Vec<Order>>(0)?.into_iter().next())
    }

    /// Append a service line item. The completed-state guard is part of the
    /// write condition, so a concurrent advance cannot slip a service into
    /// a completed order.
    pub async fn add_service(
        &self,
        user_id: &str,
        id: &str,
        service: ServiceItem,
    ) -> RepoResult<Option<Order>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order SET services = array::append(services, $service), updated_at = $now
                 WHERE id = $id AND user_id = $user_id AND status = 'ACTIVE' AND state != 'COMPLETED'
                 RETURN AFTER",
            )
            .bind(("id", record_id))
            .bind(("user_id", user_id.to_string()))
            .bind(("service", service))
            .bind(("now", now_millis()))
            .await?;

        Ok(result.take::<Vec<Order>>(0)?.into_iter().next())
    }

    /// Append a comment.
    pub async fn add_comment(
        &self,
        user_id: &str,
        id: &str,
        comment: Comment,
    ) -> RepoResult<Option<Order>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE order SET comments = array::append(comments, $comment), updated_at = $now
                 WHERE id = $id AND user_id = $user_id AND status = 'ACTIVE'
                 RETURN AFTER",
            )
            .bind(("id", record_id))
            .bind(("user_id", user_id.to_string()))
            .bind(("comment", comment))
            .bind(("now", now_millis()))
            .await?;

        Ok(result.take::<Vec<Order>>(0)?.into_iter().next())
    }

    /// One row per active order of this owner: state plus summed service
    /// value. The service layer folds these into per-state aggregates.
    pub async fn state_value_rows(&self, user_id: &str) -> RepoResult<Vec<StateValueRow>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT state, math::sum(services.value) AS total FROM order
                 WHERE user_id = $user_id AND status = 'ACTIVE'",
            )
            .bind(("user_id", user_id.to_string()))
            .await?;

        Ok(result.take(0)?)
    }
}
