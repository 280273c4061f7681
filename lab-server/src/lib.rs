//! Lab Server - order management backend for dental prosthesis labs
//!
//! # Module structure
//!
//! ```text
//! lab-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT authentication
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order service, access policy, query engine
//! ├── db/            # database layer (models, repositories)
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use utils::{AppError, AppResult};

// Security logging macro - structured events with tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:ident, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            level = stringify!($level),
            event = $event,
            $($arg)*
        );
    };
}

/// Set up the process environment: dotenv and logging.
pub fn setup_environment() {
    let _ = dotenv::dotenv();
    utils::logger::init_logger();
}
