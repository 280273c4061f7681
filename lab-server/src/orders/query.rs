//! Order list query parameters
//!
//! Translates the HTTP query string into the repository's [`ListFilter`]:
//! clamped pagination, whitelisted sort fields, owner scoping added by the
//! repository itself.

use serde::Deserialize;
use shared::{OrderState, OrderStatus};

use crate::db::repository::ListFilter;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Sortable fields. Anything else is rejected at deserialization.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
    #[serde(rename = "patient")]
    Patient,
    #[serde(rename = "customer")]
    Customer,
    #[serde(rename = "lab")]
    Lab,
    #[serde(rename = "state")]
    State,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Patient => "patient",
            SortField::Customer => "customer",
            SortField::Lab => "lab",
            SortField::State => "state",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[default]
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query params for `GET /api/orders`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub state: Option<OrderState>,
    pub status: Option<OrderStatus>,
    #[serde(rename = "patientName")]
    pub patient_name: Option<String>,
    #[serde(rename = "dentistName")]
    pub dentist_name: Option<String>,
    #[serde(rename = "sortBy", default)]
    pub sort_by: SortField,
    #[serde(rename = "sortOrder", default)]
    pub sort_order: SortOrder,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            state: None,
            status: None,
            patient_name: None,
            dentist_name: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl OrderListQuery {
    /// Effective page (≥ 1).
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Effective page size (1..=100).
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// Resolve into the repository filter. Soft-deleted orders are excluded
    /// unless the caller asks for them explicitly.
    pub fn into_filter(self) -> ListFilter {
        let page = self.page();
        let limit = self.limit();
        ListFilter {
            state: self.state,
            status: self.status.unwrap_or(OrderStatus::Active),
            patient_name: self.patient_name.filter(|s| !s.trim().is_empty()),
            dentist_name: self.dentist_name.filter(|s| !s.trim().is_empty()),
            sort_field: self.sort_by.column(),
            sort_dir: self.sort_order.keyword(),
            start: (page as u64 - 1) * limit as u64,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_page_of_twenty_newest() {
        let q: OrderListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 20);
        let filter = q.into_filter();
        assert_eq!(filter.sort_field, "created_at");
        assert_eq!(filter.sort_dir, "DESC");
        assert_eq!(filter.status, OrderStatus::Active);
        assert_eq!(filter.start, 0);
    }

    #[test]
    fn limit_is_clamped() {
        let q = OrderListQuery {
            page: 0,
            limit: 1000,
            ..Default::default()
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_LIMIT);
    }

    #[test]
    fn start_offset_accounts_for_page() {
        let q = OrderListQuery {
            page: 3,
            limit: 25,
            ..Default::default()
        };
        assert_eq!(q.into_filter().start, 50);
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let result: Result<OrderListQuery, _> =
            serde_json::from_str(r#"{"sortBy": "hash_pass"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn camel_case_filters_parse() {
        let q: OrderListQuery = serde_json::from_str(
            r#"{"patientName": "Ana", "dentistName": "Silva", "state": "ANALYSIS", "sortOrder": "asc"}"#,
        )
        .unwrap();
        assert_eq!(q.patient_name.as_deref(), Some("Ana"));
        assert_eq!(q.dentist_name.as_deref(), Some("Silva"));
        assert_eq!(q.state, Some(OrderState::Analysis));
        let filter = q.into_filter();
        assert_eq!(filter.sort_dir, "ASC");
    }
}
