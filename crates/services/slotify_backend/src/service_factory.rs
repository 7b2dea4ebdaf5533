// --- File: crates/services/slotify_backend/src/service_factory.rs ---
//! Backing store selection.
//!
//! The slot engine only sees `Arc<dyn CalendarStore>`; which implementation sits
//! behind it is decided here from `calendar.store`.
use slotify_common::{CalendarStore, SlotifyError};
use slotify_config::{CalendarConfig, StoreKind};
use slotify_gcal::{auth::create_calendar_hub, memory::InMemoryCalendarStore, service::GoogleCalendarStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the store named by the configuration.
pub async fn build_store(config: &CalendarConfig) -> Result<Arc<dyn CalendarStore>, SlotifyError> {
    match config.store {
        StoreKind::Google => {
            let hub = create_calendar_hub(config).await?;
            info!(agendas = config.agendas.len(), "Google Calendar store initialized");
            Ok(Arc::new(GoogleCalendarStore::new(Arc::new(hub))))
        }
        StoreKind::Memory => {
            warn!("Using the in-memory calendar store, slots are lost on restart");
            Ok(Arc::new(InMemoryCalendarStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotify_common::ItemQuery;

    #[tokio::test]
    async fn test_memory_store_selected() {
        let config = CalendarConfig {
            store: StoreKind::Memory,
            ..Default::default()
        };
        let store = build_store(&config).await.unwrap();
        let items = store
            .enumerate(
                "any",
                ItemQuery {
                    time_min: None,
                    time_max: None,
                    max_results: 10,
                },
            )
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_google_store_requires_key() {
        let config = CalendarConfig {
            store: StoreKind::Google,
            key_path: None,
            ..Default::default()
        };
        let err = build_store(&config).await.err().unwrap();
        assert!(matches!(err, SlotifyError::ConfigError(_)));
    }
}
