//! Menu Server - digital menu and table ordering for a single restaurant
//!
//! Customers browse the menu from a table QR code, call the waiter or ask
//! for the bill. Staff manage the catalog, take orders per table, follow
//! the kitchen board and print receipts.
//!
//! ```text
//! menu-server/src/
//! ├── core/      # config, state, background tasks, server
//! ├── auth/      # JWT + argon2 staff login
//! ├── api/       # HTTP routes and handlers
//! ├── services/  # router assembly
//! ├── db/        # redb storage and catalog repositories
//! ├── orders/    # order lifecycle manager
//! ├── kitchen/   # kitchen board and alerts
//! ├── menu/      # customer menu composition
//! ├── receipt/   # HTML receipt rendering
//! └── utils/     # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod receipt;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStorage, OrdersManager};
pub use services::https::build_app;
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Security event log under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and initialize logging
///
/// Must run before [`Config::from_env`] so `.env` values are visible.
pub fn setup_environment() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env: {e}");
    }

    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty());
    let json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    init_logger_with_file(level.as_deref(), json, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  __  __                    ____
 |  \/  | ___ _ __  _   _  / ___|  ___ _ ____   _____ _ __
 | |\/| |/ _ \ '_ \| | | | \___ \ / _ \ '__\ \ / / _ \ '__|
 | |  | |  __/ | | | |_| |  ___) |  __/ |   \ V /  __/ |
 |_|  |_|\___|_| |_|\__,_| |____/ \___|_|    \_/ \___|_|
    "#
    );
}
