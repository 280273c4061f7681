//! Database models

pub mod serde_helpers;

mod order;
mod user;

pub use order::{CreateOrderRequest, Order, OrderStatusView, UpdateOrderRequest};
pub use user::{User, UserCreate};
