//! # Weightboard
//!
//! Live web dashboard for daily average weight measurements. Fetches
//! aggregated rows from a MariaDB/MySQL store, renders a per-identifier
//! line chart in the browser, and pushes dropdown-option updates to
//! connected clients over WebSocket.
//!
//! ## Modules
//!
//! - [`store`]: Data fetcher for the measurement store
//! - [`chart`]: Chart builder for one identifier's series
//! - [`page`]: Reactive page rules and the static shell
//! - [`websocket`]: Dropdown push channel
//! - [`api`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weightboard::api::{serve, AppState};
//! use weightboard::config::Config;
//! use weightboard::store::MySqlStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = Arc::new(MySqlStore::connect(&config.database).await?);
//!     let state = AppState::new(store, config.api.clone());
//!     serve(state, &config.api).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod page;
pub mod store;
pub mod websocket;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};

pub use chart::{ChartDescriptor, ChartPoint};

pub use config::{ApiConfig, Config, ConfigError, DatabaseConfig, LoggingConfig};

pub use page::{Effect, PageError, RuleTable, Trigger, TriggerKind};

pub use store::{MeasurementRow, MeasurementSource, MySqlStore, StoreError, StoreResult};

pub use websocket::{
    websocket_handler, ClientMessage, DropdownHub, HubConfig, HubError, NotifyTrigger,
    ServerMessage,
};
