//! Application state shared across all handlers

use std::sync::Arc;

use crate::config::Config;
use crate::credentials::{CredentialResolver, CredentialSet, CredentialStore};
use crate::error::Result;
use crate::hms::HmsClient;
use crate::settings_store::SupabaseSettingsStore;

/// Application state shared across all handlers. No per-request state lives
/// here; the resolver's cache slot is the only mutable piece.
pub struct AppState {
    pub config: Config,
    pub resolver: CredentialResolver,
    pub hms: HmsClient,
}

impl AppState {
    /// Build the state from configuration. One reqwest client is shared by
    /// the management API client and the settings store.
    pub fn new(config: Config) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;

        let store = config.has_settings_store().then(|| {
            Arc::new(SupabaseSettingsStore::new(&config, http_client.clone()))
                as Arc<dyn CredentialStore>
        });
        let resolver = CredentialResolver::new(CredentialSet::from_config(&config), store);
        let hms = HmsClient::new(config.hms_api_url.clone(), http_client);

        Ok(Self {
            config,
            resolver,
            hms,
        })
    }
}
