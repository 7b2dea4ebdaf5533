// File: crates/slotify_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use slotify_common::{config_error, SlotifyError};
use slotify_config::CalendarConfig;
use std::path::Path;
use tracing::info;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Builds an authenticated Calendar client from the service account key named in the config.
pub async fn create_calendar_hub(config: &CalendarConfig) -> Result<HubType, SlotifyError> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| config_error("calendar.key_path is required for the google store"))?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| config_error(format!("Cannot read service account key {}: {}", key_path, e)))?;
    info!(client_email = %sa_key.client_email, "Loaded service account key");

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| config_error(format!("Service account authenticator failed: {}", e)))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_path_is_a_config_error() {
        let config = CalendarConfig::default();
        let err = create_calendar_hub(&config).await.err().unwrap();
        assert!(matches!(err, SlotifyError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_unreadable_key_is_a_config_error() {
        let config = CalendarConfig {
            key_path: Some("/nonexistent/service_account.json".to_string()),
            ..Default::default()
        };
        let err = create_calendar_hub(&config).await.err().unwrap();
        assert!(matches!(err, SlotifyError::ConfigError(ref m) if m.contains("service_account.json")));
    }
}
