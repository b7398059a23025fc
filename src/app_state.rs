//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::SessionSettings;
use crate::domain::RoomRegistry;
use crate::service::BroadcastRelay;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Active rooms, shared with every session.
    pub registry: Arc<RoomRegistry>,
    /// Fan-out over `registry`.
    pub relay: BroadcastRelay,
    /// Per-connection settings.
    pub settings: SessionSettings,
}

impl AppState {
    /// Builds state around a fresh, empty registry.
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        Self {
            registry,
            relay,
            settings,
        }
    }
}
