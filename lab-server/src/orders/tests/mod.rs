use super::*;

use rust_decimal::Decimal;
use shared::{Comment, OrderState, OrderStatus, ServiceItem, ServiceStatus};

use crate::auth::CurrentUser;
use crate::db::models::{CreateOrderRequest, UpdateOrderRequest};
use crate::db::repository::OrderRepository;
use crate::db::DbService;
use crate::utils::AppError;

mod test_isolation;
mod test_lifecycle;

/// Fresh service over a fresh in-memory database.
async fn create_test_service() -> OrderService {
    let db = DbService::open_in_memory()
        .await
        .expect("in-memory db should open");
    OrderService::new(OrderRepository::new(db.db))
}

fn user_with_role(key: &str, role: &str) -> CurrentUser {
    CurrentUser {
        id: format!("user:{key}"),
        name: format!("Test {key}"),
        role: role.to_string(),
    }
}

fn attendant(key: &str) -> CurrentUser {
    user_with_role(key, "ATTENDANT")
}

fn service_item(name: &str, value: i64) -> ServiceItem {
    ServiceItem {
        name: name.to_string(),
        value: Decimal::from(value),
        status: ServiceStatus::Pending,
    }
}

fn crown_order() -> CreateOrderRequest {
    CreateOrderRequest {
        lab: "Central Lab".to_string(),
        patient: "Maria Souza".to_string(),
        customer: "Dr. Silva".to_string(),
        services: vec![service_item("Crown", 800)],
    }
}

fn order_for(patient: &str, customer: &str, value: i64) -> CreateOrderRequest {
    CreateOrderRequest {
        lab: "Central Lab".to_string(),
        patient: patient.to_string(),
        customer: customer.to_string(),
        services: vec![service_item("Crown", value)],
    }
}
