//! API route modules
//!
//! - [`auth`] - registration, login, current user
//! - [`orders`] - order management
//! - [`health`] - liveness probe

pub mod auth;
pub mod health;
pub mod orders;
