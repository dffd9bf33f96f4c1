//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor and
//! handed to the refresh task. The device registry and rendered page are
//! fixed at startup; the only mutable part is `LiveValues`, the latest
//! reading per widget id.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::channel::ChannelService;
use crate::registry::DeviceRegistry;
use crate::widget::WidgetId;

// =============================================================================
// LIVE VALUES
// =============================================================================

/// Latest known reading for one widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveValue {
    /// Last good value; kept across failed reads.
    pub value: Option<f64>,
    /// Error from the most recent read, if it failed.
    pub error: Option<String>,
    /// Generation of the refresh or write that produced this entry.
    pub generation: u64,
}

/// Live readings keyed by widget id, with stale-result rejection.
///
/// Every refresh cycle and every write takes a generation from `begin`
/// before it contacts the service. A result is applied only if no newer
/// generation has already been recorded for that widget, so a slow refresh
/// can never overwrite the readback of a write that started after it.
#[derive(Clone, Default)]
pub struct LiveValues {
    values: Arc<RwLock<HashMap<WidgetId, LiveValue>>>,
    generation: Arc<AtomicU64>,
}

impl LiveValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record an outcome. Returns `false` if the result was stale and
    /// discarded.
    pub async fn record(&self, id: &WidgetId, generation: u64, outcome: Result<f64, String>) -> bool {
        let mut values = self.values.write().await;
        let previous = values.get(id);
        if previous.is_some_and(|p| p.generation > generation) {
            return false;
        }
        let entry = match outcome {
            Ok(value) => LiveValue { value: Some(value), error: None, generation },
            Err(error) => LiveValue { value: previous.and_then(|p| p.value), error: Some(error), generation },
        };
        values.insert(id.clone(), entry);
        true
    }

    pub async fn get(&self, id: &WidgetId) -> Option<LiveValue> {
        self.values.read().await.get(id).cloned()
    }

    /// All entries, ordered by widget id.
    pub async fn snapshot(&self) -> BTreeMap<String, LiveValue> {
        self.values
            .read()
            .await
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .collect()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; all fields are
/// Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DeviceRegistry>,
    pub service: Arc<dyn ChannelService>,
    pub live: LiveValues,
    /// Fully rendered page, built once at startup.
    pub page: Arc<str>,
    pub refresh_interval: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(registry: DeviceRegistry, service: Arc<dyn ChannelService>, page: String, refresh_interval: Duration) -> Self {
        Self { registry: Arc::new(registry), service, live: LiveValues::new(), page: page.into(), refresh_interval }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
