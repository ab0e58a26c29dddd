//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::page::{standard_rules, RuleTable};
use crate::store::MeasurementSource;
use crate::websocket::{DropdownHub, HubConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Measurement source, injected rather than held as global state
    pub source: Arc<dyn MeasurementSource>,
    /// Reactive rule table for the dashboard page
    pub rules: Arc<RuleTable>,
    /// Push channel hub for dropdown updates
    pub hub: Arc<DropdownHub>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the standard rule set
    pub fn new(source: Arc<dyn MeasurementSource>, config: ApiConfig) -> Self {
        let rules = Arc::new(standard_rules(Arc::clone(&source)));
        Self {
            source,
            rules,
            hub: Arc::new(DropdownHub::new(HubConfig::default())),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Create AppState with custom push channel configuration
    pub fn with_hub_config(
        source: Arc<dyn MeasurementSource>,
        config: ApiConfig,
        hub_config: HubConfig,
    ) -> Self {
        let rules = Arc::new(standard_rules(Arc::clone(&source)));
        Self {
            source,
            rules,
            hub: Arc::new(DropdownHub::new(hub_config)),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
